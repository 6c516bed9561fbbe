use serde::Serialize;

use pcd_core::pointcloud::{
    point::{sub_coord, BoundingVolume, Coord},
    result::{ImportMetadata, ReprojectionResult},
};
use pcd_transformer::SceneSink;

#[derive(Debug, Serialize)]
pub struct SceneDocument {
    /// Location of the shared parent object.
    pub anchor: Coord,
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Serialize)]
pub struct SceneObject {
    pub name: String,
    /// Location relative to the anchor.
    pub location: Coord,
    pub point_count: usize,
    pub bounding_volume: BoundingVolume,
    pub metadata: ImportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Coord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<u8>>,
}

/// Collects a batch into a [`SceneDocument`].
pub struct JsonSceneSink {
    origin: Coord,
    with_points: bool,
    document: SceneDocument,
}

impl JsonSceneSink {
    /// `origin` is the scene origin in the target CRS; the anchor is placed
    /// relative to it.
    pub fn new(origin: Coord, with_points: bool) -> Self {
        Self {
            origin,
            with_points,
            document: SceneDocument {
                anchor: [0.0; 3],
                objects: Vec::new(),
            },
        }
    }

    pub fn into_document(self) -> SceneDocument {
        self.document
    }
}

impl SceneSink for JsonSceneSink {
    type Error = std::convert::Infallible;

    fn place_anchor(&mut self, anchor: Coord) -> Result<(), Self::Error> {
        self.document.anchor = sub_coord(anchor, self.origin);
        Ok(())
    }

    fn place_file(&mut self, file: &ReprojectionResult, offset: Coord) -> Result<(), Self::Error> {
        self.document.objects.push(SceneObject {
            name: file.name.clone(),
            location: offset,
            point_count: file.points.len(),
            bounding_volume: file.bounding_volume,
            metadata: file.metadata.clone(),
            points: self.with_points.then(|| file.points.clone()),
            classifications: if self.with_points {
                file.classifications.clone()
            } else {
                None
            },
        });
        Ok(())
    }
}
