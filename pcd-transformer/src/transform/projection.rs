use coordinate_transformer::{CoordinateTransform as _, Crs, CrsBackend, ProjectionError};
use log::debug;
use pcd_core::pointcloud::point::{BoundingVolume, Coord};

use super::{Transform, WorkingCloud};
use crate::error::ImportError;

/// Reprojects x/y of `points` in place and returns the reprojected header
/// bounds. One transformer serves both the points and the two bound corners.
pub fn reproject(
    backend: &dyn CrsBackend,
    points: &mut [Coord],
    bounding_volume: &BoundingVolume,
    source: &Crs,
    target: &Crs,
) -> Result<BoundingVolume, ProjectionError> {
    let mut transformer = backend.transformer(source, target)?;

    transformer.transform_xy_in_place(points)?;

    let mut corners = bounding_volume.corners();
    transformer.transform_xy_in_place(&mut corners)?;
    let [min, max] = corners;
    Ok(BoundingVolume::new(min, max))
}

pub struct ReprojectTransform<'a> {
    backend: &'a dyn CrsBackend,
    target: Crs,
}

impl<'a> ReprojectTransform<'a> {
    pub fn new(backend: &'a dyn CrsBackend, target: Crs) -> Self {
        Self { backend, target }
    }
}

impl Transform for ReprojectTransform<'_> {
    fn transform(&self, cloud: &mut WorkingCloud) -> Result<(), ImportError> {
        let start = std::time::Instant::now();
        cloud.bounding_volume = reproject(
            self.backend,
            &mut cloud.points,
            &cloud.bounding_volume,
            &cloud.current_crs,
            &self.target,
        )
        .map_err(|source| ImportError::Projection {
            name: cloud.name.clone(),
            source,
        })?;
        debug!(
            "reprojected {} from {} to {} in {:?}",
            cloud.name,
            cloud.current_crs,
            self.target,
            start.elapsed()
        );
        cloud.current_crs = self.target.clone();
        Ok(())
    }
}
