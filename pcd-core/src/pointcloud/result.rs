use serde::Serialize;

use crate::pointcloud::point::{sub_coord, BoundingVolume, Coord};

/// Provenance the host stores alongside the imported object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportMetadata {
    pub used_fallback: bool,
    /// Name of the CRS the source coordinates were read in.
    pub source_crs: String,
    pub target_crs: String,
    pub scale: f64,
}

/// One imported file.
///
/// `points` are relative to `midpoint` when centering was applied, so
/// `point + midpoint` recovers the scaled, reprojected coordinate on every
/// axis with a nonzero extent.
#[derive(Debug, Clone, Serialize)]
pub struct ReprojectionResult {
    pub name: String,
    pub points: Vec<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<u8>>,
    /// Reprojected and scaled header bounds.
    pub bounding_volume: BoundingVolume,
    pub midpoint: Coord,
    pub metadata: ImportMetadata,
}

impl ReprojectionResult {
    pub fn used_fallback(&self) -> bool {
        self.metadata.used_fallback
    }

    pub fn source_crs(&self) -> &str {
        &self.metadata.source_crs
    }

    pub fn scale(&self) -> f64 {
        self.metadata.scale
    }
}

/// Every file of a batch plus the shared anchor they are parented to.
#[derive(Debug, Clone, Serialize)]
pub struct BatchImport {
    pub files: Vec<ReprojectionResult>,
    /// Mean of the per-file midpoints.
    pub anchor: Coord,
}

impl BatchImport {
    /// `midpoint - anchor` for each file, in input order.
    pub fn offsets(&self) -> impl Iterator<Item = Coord> + '_ {
        self.files
            .iter()
            .map(move |file| sub_coord(file.midpoint, self.anchor))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, midpoint: Coord) -> ReprojectionResult {
        ReprojectionResult {
            name: name.to_string(),
            points: vec![],
            classifications: None,
            bounding_volume: BoundingVolume::new(midpoint, midpoint),
            midpoint,
            metadata: ImportMetadata {
                used_fallback: false,
                source_crs: "WGS 84".to_string(),
                target_crs: "WGS 84 / Pseudo-Mercator".to_string(),
                scale: 1.0,
            },
        }
    }

    #[test]
    fn offsets_follow_input_order() {
        let batch = BatchImport {
            files: vec![result("a", [5.0, 5.0, 0.0]), result("b", [15.0, 5.0, 0.0])],
            anchor: [10.0, 5.0, 0.0],
        };
        let offsets: Vec<Coord> = batch.offsets().collect();
        assert_eq!(offsets, vec![[-5.0, 0.0, 0.0], [5.0, 0.0, 0.0]]);
    }

    #[test]
    fn serializes_provenance() {
        let json = serde_json::to_value(result("tile", [1.0, 2.0, 3.0])).unwrap();
        assert_eq!(json["metadata"]["used_fallback"], false);
        assert_eq!(json["metadata"]["scale"], 1.0);
        assert!(json.get("classifications").is_none());
    }
}
