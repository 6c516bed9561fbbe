use std::path::Path;

use pcd_core::pointcloud::point::Coord;
use proj_sys_transformer::ProjTransformer;

use crate::{crs::Crs, error::ProjectionError};

/// Planar transformation applied to whole coordinate arrays.
///
/// Only x and y are transformed; z must come out exactly as it went in.
pub trait CoordinateTransform {
    fn transform_xy_in_place(&mut self, coords: &mut [Coord]) -> Result<(), ProjectionError>;
}

pub enum PointTransformer {
    Identity,
    Proj(ProjTransformer),
}

impl PointTransformer {
    pub fn new(
        source: &Crs,
        target: &Crs,
        proj_data_dir: Option<&Path>,
    ) -> Result<Self, ProjectionError> {
        if source == target {
            return Ok(Self::Identity);
        }

        Ok(Self::Proj(ProjTransformer::new(
            source.definition(),
            target.definition(),
            proj_data_dir,
        )?))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl CoordinateTransform for PointTransformer {
    fn transform_xy_in_place(&mut self, coords: &mut [Coord]) -> Result<(), ProjectionError> {
        match self {
            Self::Identity => Ok(()),
            Self::Proj(t) => t
                .transform_xy_in_place(coords)
                .map_err(ProjectionError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{EPSG_WEB_MERCATOR, EPSG_WGS84_GEOGRAPHIC};

    #[test]
    fn identity_transform() {
        let wgs84 = Crs::from_epsg(EPSG_WGS84_GEOGRAPHIC, "WGS 84");
        let mut transformer = PointTransformer::new(&wgs84, &wgs84.clone(), None).unwrap();
        assert!(transformer.is_identity());

        let mut coords = vec![[1.0, 2.0, 3.0], [0.1 + 0.2, -7.25, f64::MIN_POSITIVE]];
        let before = coords.clone();
        transformer.transform_xy_in_place(&mut coords).unwrap();
        assert_eq!(coords, before);
    }

    #[test]
    fn wgs84_to_web_mercator() {
        let wgs84 = Crs::from_epsg(EPSG_WGS84_GEOGRAPHIC, "WGS 84");
        let mercator = Crs::from_epsg(EPSG_WEB_MERCATOR, "WGS 84 / Pseudo-Mercator");
        let mut transformer = PointTransformer::new(&wgs84, &mercator, None).unwrap();
        assert!(!transformer.is_identity());

        let mut coords = vec![[139.7, 35.7, 40.0]];
        transformer.transform_xy_in_place(&mut coords).unwrap();
        assert!((coords[0][0] - 15_551_332.863_820_316).abs() < 1e-3);
        assert!((coords[0][1] - 4_259_419.965_547_92).abs() < 1e-3);
        assert_eq!(coords[0][2], 40.0);
    }
}
