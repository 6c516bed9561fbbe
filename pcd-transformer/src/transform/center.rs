use pcd_core::pointcloud::point::{BoundingVolume, Coord};
use rayon::prelude::*;

use super::{Transform, WorkingCloud};
use crate::error::ImportError;

/// Expresses points relative to the center of `bounding_volume` and returns
/// that center.
///
/// Points pass through the box's normalized space (`[-1, 1]` per axis) and
/// back. On an axis with zero extent the normalized value is 0, which puts
/// every point on the center there, even when the header bounds are stale.
pub fn center_points(points: &mut [Coord], bounding_volume: &BoundingVolume) -> Coord {
    let min = bounding_volume.min;
    let delta = bounding_volume.extent();
    let half = [delta[0] / 2.0, delta[1] / 2.0, delta[2] / 2.0];
    let midpoint = bounding_volume.center();

    points.par_iter_mut().for_each(|point| {
        for axis in 0..3 {
            let normalized = if half[axis] == 0.0 {
                0.0
            } else {
                (point[axis] - min[axis] - half[axis]) / half[axis]
            };
            point[axis] = normalized * half[axis];
        }
    });

    midpoint
}

pub struct CenterTransform;

impl CenterTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CenterTransform {
    fn default() -> Self {
        Self
    }
}

impl Transform for CenterTransform {
    fn transform(&self, cloud: &mut WorkingCloud) -> Result<(), ImportError> {
        cloud.midpoint = Some(center_points(&mut cloud.points, &cloud.bounding_volume));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_axis_is_zero() {
        let mut points = vec![[3.0, 4.0, 5.0]];
        let bv = BoundingVolume::new([3.0, 4.0, 5.0], [3.0, 4.0, 5.0]);

        let midpoint = center_points(&mut points, &bv);

        assert_eq!(midpoint, [3.0, 4.0, 5.0]);
        assert_eq!(points, vec![[0.0, 0.0, 0.0]]);
        assert!(points[0].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn flat_cloud_only_collapses_flat_axis() {
        // z disagrees with the header, which says the tile is flat at 0
        let mut points = vec![[0.0, 0.0, 7.0], [10.0, 10.0, -2.0]];
        let bv = BoundingVolume::new([0.0, 0.0, 0.0], [10.0, 10.0, 0.0]);

        let midpoint = center_points(&mut points, &bv);

        assert_eq!(midpoint, [5.0, 5.0, 0.0]);
        assert_eq!(points, vec![[-5.0, -5.0, 0.0], [5.0, 5.0, 0.0]]);
    }

    #[test]
    fn relative_to_center() {
        let mut points = vec![[2.0, -1.0, 0.5]];
        let bv = BoundingVolume::new([0.0, -2.0, 0.0], [4.0, 2.0, 1.0]);

        let midpoint = center_points(&mut points, &bv);

        assert_eq!(midpoint, [2.0, 0.0, 0.5]);
        assert_eq!(points, vec![[0.0, -1.0, 0.0]]);
    }
}
