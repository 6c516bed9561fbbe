pub mod aggregate;
pub mod builder;
pub mod error;
pub mod options;
pub mod runner;
pub mod sink;
pub mod transform;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

use coordinate_transformer::ProjBackend;
use pcd_core::pointcloud::result::{BatchImport, ReprojectionResult};
use pcd_parser::parsers::las::LasParserProvider;

pub use aggregate::aggregate_midpoints;
pub use builder::{PipelineBuilder, TransformBuilder};
pub use error::ImportError;
pub use options::ImportOptions;
pub use runner::Importer;
pub use sink::{commit, SceneSink};
pub use transform::{
    center::center_points, projection::reproject, scale::scale_points, scale_and_center,
};

/// Imports one LAS/LAZ file with PROJ as the CRS library.
pub fn import_file(
    path: &Path,
    options: &ImportOptions,
) -> Result<ReprojectionResult, ImportError> {
    let backend = ProjBackend::new();
    Importer::new(&backend, &LasParserProvider, options.clone()).import_file(path)
}

/// Imports every file and computes their shared anchor. The first failing
/// file in input order aborts the batch.
pub fn import_batch(
    paths: &[PathBuf],
    options: &ImportOptions,
) -> Result<BatchImport, ImportError> {
    let backend = ProjBackend::new();
    Importer::new(&backend, &LasParserProvider, options.clone()).import_batch(paths)
}
