use std::path::{Path, PathBuf};

use las::Reader;
use log::info;

use pcd_core::pointcloud::point::{BoundingVolume, PointCloudSource};

use super::{get_extension, ParseError, Parser, ParserProvider};

pub mod crs;

/// Point format 0, the smallest record a LAS file can hold.
const MIN_POINT_RECORD_LENGTH: u64 = 20;

/// Hands out a [`LasParser`] for `.las` and `.laz` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LasParserProvider;

impl ParserProvider for LasParserProvider {
    fn get_parser(&self, path: &Path) -> Result<Box<dyn Parser>, ParseError> {
        if get_extension(path).is_none() {
            return Err(ParseError::UnsupportedExtension(path.to_path_buf()));
        }
        Ok(Box::new(LasParser {
            filename: path.to_path_buf(),
        }))
    }
}

pub struct LasParser {
    pub filename: PathBuf,
}

impl Parser for LasParser {
    fn parse(&self) -> Result<PointCloudSource, ParseError> {
        let start = std::time::Instant::now();
        let mut reader = Reader::from_path(&self.filename).map_err(|source| ParseError::Open {
            path: self.filename.clone(),
            source,
        })?;

        let header = reader.header();
        let bounds = header.bounds();
        let bounding_volume = BoundingVolume::new(
            [bounds.min.x, bounds.min.y, bounds.min.z],
            [bounds.max.x, bounds.max.y, bounds.max.z],
        );
        let embedded_crs = crs::embedded_crs(header);
        // The header count may be corrupt, so never reserve more than the
        // file could hold.
        let file_len = std::fs::metadata(&self.filename)
            .map(|metadata| metadata.len())
            .unwrap_or(0);
        let point_count = header
            .number_of_points()
            .min(file_len / MIN_POINT_RECORD_LENGTH) as usize;

        let mut points = Vec::with_capacity(point_count);
        let mut classifications = Vec::with_capacity(point_count);
        for las_point in reader.points() {
            let las_point = las_point.map_err(|source| ParseError::Read {
                path: self.filename.clone(),
                source,
            })?;
            points.push([las_point.x, las_point.y, las_point.z]);
            classifications.push(u8::from(las_point.classification));
        }
        info!(
            "read {} points from {:?} in {:?}",
            points.len(),
            self.filename,
            start.elapsed()
        );

        let name = self
            .filename
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut source = PointCloudSource::new(name, points, bounding_volume)
            .with_classifications(classifications);
        source.embedded_crs = embedded_crs;
        Ok(source)
    }
}
