use coordinate_transformer::DEFAULT_TARGET_CRS;

use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Used for files without a usable embedded CRS.
    pub fallback_crs: String,
    /// `None` means [`DEFAULT_TARGET_CRS`].
    pub target_crs: Option<String>,
    pub scale: f64,
    /// Make points relative to their bounding box center.
    pub centering: bool,
    /// Import the files of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            fallback_crs: String::new(),
            target_crs: None,
            scale: 1.0,
            centering: true,
            parallel: false,
        }
    }
}

impl ImportOptions {
    pub fn new(fallback_crs: impl Into<String>) -> Self {
        Self {
            fallback_crs: fallback_crs.into(),
            ..Default::default()
        }
    }

    pub fn target_crs_definition(&self) -> &str {
        self.target_crs.as_deref().unwrap_or(DEFAULT_TARGET_CRS)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ImportError::InvalidScale(self.scale));
        }
        Ok(())
    }
}
