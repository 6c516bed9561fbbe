use pcd_core::pointcloud::point::{BoundingVolume, Coord};
use rayon::prelude::*;

use super::{Transform, WorkingCloud};
use crate::error::ImportError;

/// Multiplies every coordinate by `scale` and returns the scaled bounds.
pub fn scale_points(
    points: &mut [Coord],
    bounding_volume: &BoundingVolume,
    scale: f64,
) -> BoundingVolume {
    points.par_iter_mut().for_each(|point| {
        point[0] *= scale;
        point[1] *= scale;
        point[2] *= scale;
    });
    bounding_volume.scaled(scale)
}

pub struct ScaleTransform {
    scale: f64,
}

impl ScaleTransform {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Transform for ScaleTransform {
    fn transform(&self, cloud: &mut WorkingCloud) -> Result<(), ImportError> {
        cloud.bounding_volume = scale_points(&mut cloud.points, &cloud.bounding_volume, self.scale);
        cloud.scale *= self.scale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_scale_is_identity() {
        let original = vec![[0.1, -2.7, 1e12], [f64::MIN_POSITIVE, 3.0, -0.0]];
        let bv = BoundingVolume::new([0.0, -3.0, -1.0], [1.0, 3.0, 1e12]);
        let mut points = original.clone();

        let scaled = scale_points(&mut points, &bv, 1.0);

        assert_eq!(points, original);
        assert_eq!(scaled, bv);
    }

    #[test]
    fn scales_all_axes() {
        let mut points = vec![[1.0, 2.0, 3.0]];
        let bv = BoundingVolume::new([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
        let scaled = scale_points(&mut points, &bv, 2.0);
        assert_eq!(points, vec![[2.0, 4.0, 6.0]]);
        assert_eq!(scaled.min, [2.0, 4.0, 6.0]);
    }
}
