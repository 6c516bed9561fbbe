use std::{
    ffi::{CStr, CString},
    os::raw::c_char,
    path::Path,
    ptr,
};

use pcd_core::pointcloud::point::Coord;
use proj_sys as proj;

#[derive(Debug, thiserror::Error)]
#[error("PROJ error ({context}): {code} {message}")]
pub struct ProjError {
    pub code: i32,
    pub message: String,
    pub context: &'static str,
}

impl ProjError {
    fn new(context: &'static str, message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            context,
        }
    }
}

/// Owned `PJ_CONTEXT`. A context must be used by only one thread at a time.
struct Context {
    ctx: *mut proj::PJ_CONTEXT,
}

impl Context {
    fn new(proj_data_dir: Option<&Path>) -> Result<Self, ProjError> {
        let ctx = unsafe { proj::proj_context_create() };
        if ctx.is_null() {
            return Err(ProjError::new(
                "proj_context_create",
                "proj_context_create() returned NULL",
            ));
        }
        let context = Self { ctx };

        // Enable network access for automatic grid file downloads from CDN.
        // Grid files will be cached in the user's local directory.
        unsafe {
            proj::proj_context_set_enable_network(context.ctx, 1);
            proj::proj_grid_cache_set_enable(context.ctx, 1);
        }

        if let Some(dir) = proj_data_dir {
            let c_path = CString::new(dir.to_string_lossy().as_bytes()).map_err(|_| {
                ProjError::new(
                    "proj_context_set_search_paths",
                    "proj_data_dir contains NUL byte",
                )
            })?;
            let paths = [c_path.as_ptr()];
            unsafe {
                proj::proj_context_set_search_paths(
                    context.ctx,
                    paths.len() as i32,
                    paths.as_ptr(),
                );
            }
        }

        Ok(context)
    }

    fn error(&self, context: &'static str) -> ProjError {
        let code = unsafe { proj::proj_context_errno(self.ctx) } as i32;
        ProjError {
            code,
            message: proj_error_message(self.ctx, code),
            context,
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.ctx.is_null() {
            unsafe { proj::proj_context_destroy(self.ctx) };
            self.ctx = ptr::null_mut();
        }
    }
}

/// What PROJ knows about a CRS definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsInfo {
    pub definition: String,
    pub name: String,
}

/// Parses `definition` (EPSG code, WKT, PROJJSON or PROJ string) and checks
/// that it describes a coordinate reference system.
pub fn describe_crs(definition: &str, proj_data_dir: Option<&Path>) -> Result<CrsInfo, ProjError> {
    let context = Context::new(proj_data_dir)?;
    let c_definition = CString::new(definition)
        .map_err(|_| ProjError::new("proj_create", "CRS definition contains NUL byte"))?;

    let obj = unsafe { proj::proj_create(context.ctx, c_definition.as_ptr()) };
    if obj.is_null() {
        return Err(context.error("proj_create"));
    }

    let is_crs = unsafe { proj::proj_is_crs(obj) } != 0;
    let name = unsafe {
        let c_name = proj::proj_get_name(obj);
        if c_name.is_null() {
            None
        } else {
            Some(CStr::from_ptr(c_name).to_string_lossy().into_owned())
        }
    };
    unsafe { proj::proj_destroy(obj) };

    if !is_crs {
        return Err(ProjError::new(
            "proj_is_crs",
            format!("{definition:?} is not a coordinate reference system"),
        ));
    }

    Ok(CrsInfo {
        definition: definition.to_string(),
        name: name.unwrap_or_else(|| definition.to_string()),
    })
}

/// A `source -> target` transformation with x-then-y axis order on both sides.
pub struct ProjTransformer {
    pj: *mut proj::PJ,
    // Declared after `pj` so the operation is destroyed before its context.
    context: Context,
}

impl std::fmt::Debug for ProjTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjTransformer").field("pj", &self.pj).finish()
    }
}

impl ProjTransformer {
    pub fn new(
        source: &str,
        target: &str,
        proj_data_dir: Option<&Path>,
    ) -> Result<Self, ProjError> {
        let context = Context::new(proj_data_dir)?;

        let source = CString::new(source)
            .map_err(|_| ProjError::new("proj_create_crs_to_crs", "source CRS contains NUL byte"))?;
        let target = CString::new(target)
            .map_err(|_| ProjError::new("proj_create_crs_to_crs", "target CRS contains NUL byte"))?;

        let pj = unsafe {
            proj::proj_create_crs_to_crs(
                context.ctx,
                source.as_ptr(),
                target.as_ptr(),
                ptr::null_mut(),
            )
        };
        if pj.is_null() {
            return Err(context.error("proj_create_crs_to_crs"));
        }

        // Normalize axis order (e.g. EPSG:4326 is lat,lon by definition).
        let normalized = unsafe { proj::proj_normalize_for_visualization(context.ctx, pj) };
        unsafe {
            proj::proj_destroy(pj);
        }
        if normalized.is_null() {
            return Err(context.error("proj_normalize_for_visualization"));
        }

        Ok(Self {
            pj: normalized,
            context,
        })
    }

    /// Transforms x and y of every coordinate in one call. z is not handed
    /// to PROJ and keeps its input value.
    pub fn transform_xy_in_place(&mut self, coords: &mut [Coord]) -> Result<(), ProjError> {
        if coords.is_empty() {
            return Ok(());
        }

        let stride = std::mem::size_of::<Coord>();
        let n = coords.len();

        unsafe {
            proj::proj_errno_reset(self.pj);

            let first = coords.as_mut_ptr() as *mut f64;
            let x = first;
            let y = first.add(1);

            proj::proj_trans_generic(
                self.pj,
                proj::PJ_DIRECTION_PJ_FWD,
                x,
                stride,
                n,
                y,
                stride,
                n,
                ptr::null_mut(),
                0,
                0,
                ptr::null_mut(),
                0,
                0,
            );

            let err = proj::proj_errno(self.pj);
            if err != 0 {
                return Err(proj_error_from_pj(self.context.ctx, self.pj, "proj_trans_generic"));
            }
        }

        // Out-of-domain input comes back as HUGE_VAL without always setting errno.
        if let Some(index) = coords
            .iter()
            .position(|c| !c[0].is_finite() || !c[1].is_finite())
        {
            return Err(ProjError::new(
                "proj_trans_generic",
                format!("coordinate #{index} could not be transformed"),
            ));
        }

        Ok(())
    }
}

impl Drop for ProjTransformer {
    fn drop(&mut self) {
        if !self.pj.is_null() {
            unsafe { proj::proj_destroy(self.pj) };
            self.pj = ptr::null_mut();
        }
    }
}

fn proj_error_from_pj(
    ctx: *mut proj::PJ_CONTEXT,
    pj: *mut proj::PJ,
    context: &'static str,
) -> ProjError {
    let code = unsafe { proj::proj_errno(pj) } as i32;
    let message = proj_error_message(ctx, code);
    ProjError {
        code,
        message,
        context,
    }
}

fn proj_error_message(ctx: *mut proj::PJ_CONTEXT, code: i32) -> String {
    let c_msg = unsafe { proj::proj_context_errno_string(ctx, code) };
    if c_msg.is_null() {
        return "unknown error".to_string();
    }
    unsafe { CStr::from_ptr(c_msg as *const c_char) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_epsg_codes() {
        let info = describe_crs("EPSG:4326", None).unwrap();
        assert_eq!(info.definition, "EPSG:4326");
        assert_eq!(info.name, "WGS 84");
    }

    #[test]
    fn rejects_garbage() {
        assert!(describe_crs("NOT_A_CRS", None).is_err());
        assert!(describe_crs("", None).is_err());
    }

    #[test]
    fn lnglat_to_web_mercator_keeps_z() {
        let mut transformer = ProjTransformer::new("EPSG:4326", "EPSG:3857", None).unwrap();
        let mut coords = vec![[0.0, 0.0, 12.5], [10.0, 20.0, -3.0]];
        transformer.transform_xy_in_place(&mut coords).unwrap();

        assert!(coords[0][0].abs() < 1e-6);
        assert!(coords[0][1].abs() < 1e-6);
        assert!((coords[1][0] - 1_113_194.907_932_735_7).abs() < 1e-3);
        assert!((coords[1][1] - 2_273_030.926_987_689).abs() < 1e-3);
        assert_eq!(coords[0][2], 12.5);
        assert_eq!(coords[1][2], -3.0);
    }

    #[test]
    fn empty_slice_is_ok() {
        let mut transformer = ProjTransformer::new("EPSG:4326", "EPSG:3857", None).unwrap();
        transformer.transform_xy_in_place(&mut []).unwrap();
    }
}
