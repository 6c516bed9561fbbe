use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use coordinate_transformer::{
    CoordinateTransform, Crs, CrsBackend, PointTransformer, ProjectionError,
};
use pcd_core::pointcloud::point::{Coord, PointCloudSource};
use pcd_parser::parsers::{ParseError, Parser, ParserProvider};

/// Accepts `EPSG:<n>` only. Between different codes x and y are shifted by
/// a fixed offset, which makes transformed values easy to predict.
#[derive(Default)]
pub struct ShiftBackend {
    pub transformers_built: AtomicUsize,
}

pub const SHIFT: [f64; 2] = [1000.0, -500.0];

struct Shift;

impl CoordinateTransform for Shift {
    fn transform_xy_in_place(&mut self, coords: &mut [Coord]) -> Result<(), ProjectionError> {
        for coord in coords {
            coord[0] += SHIFT[0];
            coord[1] += SHIFT[1];
        }
        Ok(())
    }
}

impl CrsBackend for ShiftBackend {
    fn parse(&self, definition: &str) -> Result<Crs, ProjectionError> {
        definition
            .strip_prefix("EPSG:")
            .and_then(|code| code.parse::<u16>().ok())
            .map(|code| Crs::from_epsg(code, format!("epsg {code}")))
            .ok_or_else(|| ProjectionError::InvalidCrs {
                definition: definition.to_string(),
                reason: "not an EPSG code".to_string(),
            })
    }

    fn transformer(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Box<dyn CoordinateTransform>, ProjectionError> {
        self.transformers_built.fetch_add(1, Ordering::SeqCst);
        if source == target {
            Ok(Box::new(PointTransformer::Identity))
        } else {
            Ok(Box::new(Shift))
        }
    }
}

/// Serves prepared sources by path. Unknown paths fail like an unreadable file.
#[derive(Default)]
pub struct MemoryProvider {
    pub sources: HashMap<PathBuf, PointCloudSource>,
    pub parsed: AtomicUsize,
}

impl MemoryProvider {
    pub fn with(mut self, path: &str, source: PointCloudSource) -> Self {
        self.sources.insert(PathBuf::from(path), source);
        self
    }
}

struct MemoryParser {
    path: PathBuf,
    source: Option<PointCloudSource>,
}

impl Parser for MemoryParser {
    fn parse(&self) -> Result<PointCloudSource, ParseError> {
        self.source.clone().ok_or_else(|| ParseError::Open {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into(),
        })
    }
}

impl ParserProvider for MemoryProvider {
    fn get_parser(&self, path: &Path) -> Result<Box<dyn Parser>, ParseError> {
        self.parsed.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryParser {
            path: path.to_path_buf(),
            source: self.sources.get(path).cloned(),
        }))
    }
}
