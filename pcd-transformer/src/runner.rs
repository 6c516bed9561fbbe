use std::path::{Path, PathBuf};

use coordinate_transformer::{resolve_source_crs, Crs, CrsBackend};
use log::info;
use pcd_core::pointcloud::{
    point::PointCloudSource,
    result::{BatchImport, ReprojectionResult},
};
use pcd_parser::parsers::ParserProvider;
use rayon::prelude::*;

use crate::{
    aggregate::aggregate_midpoints,
    builder::{PipelineBuilder, TransformBuilder as _},
    error::ImportError,
    options::ImportOptions,
    transform::{Transform as _, WorkingCloud},
};

/// Runs the import pipeline against a CRS library and a file parser.
pub struct Importer<'a> {
    backend: &'a dyn CrsBackend,
    provider: &'a dyn ParserProvider,
    options: ImportOptions,
}

impl<'a> Importer<'a> {
    pub fn new(
        backend: &'a dyn CrsBackend,
        provider: &'a dyn ParserProvider,
        options: ImportOptions,
    ) -> Self {
        Self {
            backend,
            provider,
            options,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn import_file(&self, path: &Path) -> Result<ReprojectionResult, ImportError> {
        self.options.validate()?;
        let target = self.target_crs()?;
        self.import_with_target(path, &target)
    }

    /// Imports every file, then anchors them at the mean of their midpoints.
    ///
    /// Nothing is returned unless every file succeeds. When several fail, the
    /// error of the first one in input order is reported.
    pub fn import_batch(&self, paths: &[PathBuf]) -> Result<BatchImport, ImportError> {
        self.options.validate()?;
        if paths.is_empty() {
            return Err(ImportError::EmptyBatch);
        }
        let target = self.target_crs()?;
        let start = std::time::Instant::now();

        let files = if self.options.parallel {
            paths
                .par_iter()
                .map(|path| self.import_with_target(path, &target))
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
        } else {
            paths
                .iter()
                .map(|path| self.import_with_target(path, &target))
                .collect::<Result<Vec<_>, _>>()?
        };

        let midpoints: Vec<_> = files.iter().map(|file| file.midpoint).collect();
        let anchor = aggregate_midpoints(&midpoints)?;
        info!(
            "imported {} files in {:?}, anchor at {:?}",
            files.len(),
            start.elapsed(),
            anchor
        );

        Ok(BatchImport { files, anchor })
    }

    /// Runs the pipeline on an already parsed source. Errors name the source
    /// by its `name`.
    pub fn import_source(
        &self,
        source: PointCloudSource,
    ) -> Result<ReprojectionResult, ImportError> {
        self.options.validate()?;
        let target = self.target_crs()?;
        let path = PathBuf::from(&source.name);
        self.transform_source(source, &path, &target)
    }

    fn target_crs(&self) -> Result<Crs, ImportError> {
        let definition = self.options.target_crs_definition();
        self.backend
            .parse(definition)
            .map_err(|source| ImportError::TargetCrs {
                definition: definition.to_string(),
                source,
            })
    }

    fn import_with_target(
        &self,
        path: &Path,
        target: &Crs,
    ) -> Result<ReprojectionResult, ImportError> {
        let start = std::time::Instant::now();
        let parser = self.provider.get_parser(path)?;
        let source = parser.parse()?;
        let result = self.transform_source(source, path, target)?;
        info!(
            "imported {:?} ({} points, source CRS {}{}) in {:?}",
            path,
            result.points.len(),
            result.source_crs(),
            if result.used_fallback() { ", fallback" } else { "" },
            start.elapsed()
        );
        Ok(result)
    }

    fn transform_source(
        &self,
        source: PointCloudSource,
        path: &Path,
        target: &Crs,
    ) -> Result<ReprojectionResult, ImportError> {
        let resolved = resolve_source_crs(
            self.backend,
            source.embedded_crs.as_deref(),
            &self.options.fallback_crs,
        )
        .map_err(|source| ImportError::CrsResolution {
            path: path.to_path_buf(),
            source,
        })?;

        let pipeline = PipelineBuilder::new(self.backend, target.clone())
            .scale(self.options.scale)
            .centering(self.options.centering);
        let transform = pipeline.build();

        let mut cloud = WorkingCloud::new(source, resolved.crs, resolved.used_fallback);
        transform.transform(&mut cloud)?;
        Ok(cloud.into_result())
    }
}
