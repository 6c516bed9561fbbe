use coordinate_transformer::Crs;
use pcd_core::pointcloud::{
    point::{BoundingVolume, Coord, PointCloudSource},
    result::{ImportMetadata, ReprojectionResult},
};

use crate::error::ImportError;

pub mod center;
pub mod projection;
pub mod scale;

/// A point cloud moving through the pipeline stages.
#[derive(Debug, Clone)]
pub struct WorkingCloud {
    pub name: String,
    pub points: Vec<Coord>,
    pub classifications: Option<Vec<u8>>,
    pub bounding_volume: BoundingVolume,
    pub source_crs: Crs,
    pub used_fallback: bool,
    /// CRS the coordinates are currently expressed in.
    pub current_crs: Crs,
    pub scale: f64,
    /// Set once points have been made relative to the bounding box center.
    pub midpoint: Option<Coord>,
}

impl WorkingCloud {
    pub fn new(source: PointCloudSource, source_crs: Crs, used_fallback: bool) -> Self {
        Self {
            name: source.name,
            points: source.points,
            classifications: source.classifications,
            bounding_volume: source.bounding_volume,
            current_crs: source_crs.clone(),
            source_crs,
            used_fallback,
            scale: 1.0,
            midpoint: None,
        }
    }

    pub fn into_result(self) -> ReprojectionResult {
        let midpoint = self
            .midpoint
            .unwrap_or_else(|| self.bounding_volume.center());
        ReprojectionResult {
            name: self.name,
            points: self.points,
            classifications: self.classifications,
            bounding_volume: self.bounding_volume,
            midpoint,
            metadata: ImportMetadata {
                used_fallback: self.used_fallback,
                source_crs: self.source_crs.name().to_string(),
                target_crs: self.current_crs.name().to_string(),
                scale: self.scale,
            },
        }
    }
}

pub trait Transform {
    fn transform(&self, cloud: &mut WorkingCloud) -> Result<(), ImportError>;
}

pub struct CompositeTransform<'a> {
    transforms: Vec<Box<dyn Transform + 'a>>,
}

impl<'a> CompositeTransform<'a> {
    pub fn new(transforms: Vec<Box<dyn Transform + 'a>>) -> Self {
        Self { transforms }
    }
}

impl Transform for CompositeTransform<'_> {
    fn transform(&self, cloud: &mut WorkingCloud) -> Result<(), ImportError> {
        for transform in &self.transforms {
            transform.transform(cloud)?;
        }
        Ok(())
    }
}

/// Scales points and header bounds, then makes the points relative to the
/// scaled bounds' center. Returns the scaled bounds and that center.
pub fn scale_and_center(
    points: &mut [Coord],
    bounding_volume: &BoundingVolume,
    scale: f64,
) -> (BoundingVolume, Coord) {
    let scaled = scale::scale_points(points, bounding_volume, scale);
    let midpoint = center::center_points(points, &scaled);
    (scaled, midpoint)
}
