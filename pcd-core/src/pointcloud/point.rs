use serde::Serialize;

/// x, y, z in that order. For projected CRSs x is easting and y is northing.
pub type Coord = [f64; 3];

/// Axis-aligned box given by its two corners.
///
/// For a LAS/LAZ source this comes from the file header and is treated as
/// authoritative even if it does not tightly bound the point records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingVolume {
    pub min: Coord,
    pub max: Coord,
}

impl BoundingVolume {
    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Coord]) -> Option<Self> {
        let first = points.first()?;
        let mut bounding_volume = Self {
            min: *first,
            max: *first,
        };
        for point in &points[1..] {
            for axis in 0..3 {
                bounding_volume.min[axis] = bounding_volume.min[axis].min(point[axis]);
                bounding_volume.max[axis] = bounding_volume.max[axis].max(point[axis]);
            }
        }
        Some(bounding_volume)
    }

    /// Per-axis `max - min`.
    pub fn extent(&self) -> Coord {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// `min + (max - min) / 2` per axis.
    pub fn center(&self) -> Coord {
        let extent = self.extent();
        [
            self.min[0] + extent[0] / 2.0,
            self.min[1] + extent[1] / 2.0,
            self.min[2] + extent[2] / 2.0,
        ]
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            min: scale_coord(self.min, scale),
            max: scale_coord(self.max, scale),
        }
    }

    pub fn corners(&self) -> [Coord; 2] {
        [self.min, self.max]
    }
}

pub fn scale_coord(coord: Coord, scale: f64) -> Coord {
    [coord[0] * scale, coord[1] * scale, coord[2] * scale]
}

pub fn sub_coord(a: Coord, b: Coord) -> Coord {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// A parsed LAS/LAZ file, before any reprojection.
#[derive(Debug, Clone)]
pub struct PointCloudSource {
    /// File stem of the source, used to name the imported object.
    pub name: String,
    pub points: Vec<Coord>,
    /// One class code per point, when the point format records classification.
    pub classifications: Option<Vec<u8>>,
    pub bounding_volume: BoundingVolume,
    /// CRS definition found in the file metadata (WKT or `EPSG:<code>`).
    pub embedded_crs: Option<String>,
}

impl PointCloudSource {
    pub fn new(
        name: impl Into<String>,
        points: Vec<Coord>,
        bounding_volume: BoundingVolume,
    ) -> Self {
        Self {
            name: name.into(),
            points,
            classifications: None,
            bounding_volume,
            embedded_crs: None,
        }
    }

    pub fn with_embedded_crs(mut self, definition: impl Into<String>) -> Self {
        self.embedded_crs = Some(definition.into());
        self
    }

    pub fn with_classifications(mut self, classifications: Vec<u8>) -> Self {
        self.classifications = Some(classifications);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_extent() {
        let bv = BoundingVolume::new([0.0, 0.0, 0.0], [10.0, 4.0, 0.0]);
        assert_eq!(bv.extent(), [10.0, 4.0, 0.0]);
        assert_eq!(bv.center(), [5.0, 2.0, 0.0]);
    }

    #[test]
    fn scaled_scales_both_corners() {
        let bv = BoundingVolume::new([1.0, -2.0, 3.0], [2.0, 4.0, 6.0]).scaled(0.5);
        assert_eq!(bv.min, [0.5, -1.0, 1.5]);
        assert_eq!(bv.max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_points() {
        assert!(BoundingVolume::from_points(&[]).is_none());

        let bv =
            BoundingVolume::from_points(&[[1.0, 5.0, -1.0], [3.0, 2.0, 0.0], [2.0, 7.0, 4.0]])
                .unwrap();
        assert_eq!(bv.min, [1.0, 2.0, -1.0]);
        assert_eq!(bv.max, [3.0, 7.0, 4.0]);
    }
}
