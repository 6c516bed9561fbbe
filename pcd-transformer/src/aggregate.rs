use pcd_core::pointcloud::point::Coord;

use crate::error::ImportError;

/// Componentwise mean of the per-file midpoints.
pub fn aggregate_midpoints(midpoints: &[Coord]) -> Result<Coord, ImportError> {
    if midpoints.is_empty() {
        return Err(ImportError::EmptyBatch);
    }

    let count = midpoints.len() as f64;
    let sum = midpoints.iter().fold([0.0; 3], |acc, m| {
        [acc[0] + m[0], acc[1] + m[1], acc[2] + m[2]]
    });
    Ok([sum[0] / count, sum[1] / count, sum[2] / count])
}
