use std::path::PathBuf;

use log::debug;
use proj_sys_transformer::describe_crs;

use crate::{
    error::ProjectionError,
    transformer::{CoordinateTransform, PointTransformer},
};

/// EPSG code type alias
pub type EpsgCode = u16;

/// WGS84 Geographic 2D (EPSG:4326)
pub const EPSG_WGS84_GEOGRAPHIC: EpsgCode = 4326;

/// WGS84 / Pseudo-Mercator (EPSG:3857)
pub const EPSG_WEB_MERCATOR: EpsgCode = 3857;

/// Target CRS used when the caller does not name one.
pub const DEFAULT_TARGET_CRS: &str = "EPSG:3857";

/// A coordinate reference system known to a [`CrsBackend`].
///
/// Two values are equal when their definitions are equal.
#[derive(Debug, Clone)]
pub struct Crs {
    definition: String,
    name: String,
}

impl Crs {
    pub fn new(definition: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            name: name.into(),
        }
    }

    pub fn from_epsg(code: EpsgCode, name: impl Into<String>) -> Self {
        Self::new(format!("EPSG:{code}"), name)
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Human readable name, e.g. `WGS 84 / Pseudo-Mercator`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl Eq for Crs {}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.definition)
    }
}

/// Parses CRS definitions and builds transformers between them.
pub trait CrsBackend: Send + Sync {
    fn parse(&self, definition: &str) -> Result<Crs, ProjectionError>;

    fn transformer(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Box<dyn CoordinateTransform>, ProjectionError>;
}

/// [`CrsBackend`] backed by the PROJ library.
#[derive(Debug, Clone, Default)]
pub struct ProjBackend {
    proj_data_dir: Option<PathBuf>,
}

impl ProjBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory to PROJ's search path (for `proj.db` and grids).
    pub fn with_proj_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.proj_data_dir = Some(dir.into());
        self
    }
}

impl CrsBackend for ProjBackend {
    fn parse(&self, definition: &str) -> Result<Crs, ProjectionError> {
        let definition = definition.trim();
        if definition.is_empty() {
            return Err(ProjectionError::InvalidCrs {
                definition: definition.to_string(),
                reason: "empty definition".to_string(),
            });
        }
        let info = describe_crs(definition, self.proj_data_dir.as_deref())?;
        Ok(Crs::new(info.definition, info.name))
    }

    fn transformer(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Box<dyn CoordinateTransform>, ProjectionError> {
        debug!("building transformer {source} -> {target}");
        let transformer = PointTransformer::new(source, target, self.proj_data_dir.as_deref())?;
        Ok(Box::new(transformer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_definition() {
        let a = Crs::new("EPSG:4326", "WGS 84");
        let b = Crs::new("EPSG:4326", "another label");
        let c = Crs::from_epsg(EPSG_WEB_MERCATOR, "WGS 84 / Pseudo-Mercator");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.definition(), DEFAULT_TARGET_CRS);
    }

    #[test]
    fn proj_backend_parses_epsg() {
        let crs = ProjBackend::new().parse(" EPSG:4326 ").unwrap();
        assert_eq!(crs.definition(), "EPSG:4326");
        assert_eq!(crs.name(), "WGS 84");
    }

    #[test]
    fn proj_backend_rejects_invalid() {
        let backend = ProjBackend::new();
        assert!(backend.parse("NOT_A_CRS").is_err());
        assert!(matches!(
            backend.parse("   "),
            Err(ProjectionError::InvalidCrs { .. })
        ));
    }
}
