use std::path::PathBuf;

use coordinate_transformer::{CrsResolutionError, ProjectionError};
use pcd_parser::parsers::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unable to open {path:?}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("unsupported file {0:?}, expected .las or .laz")]
    UnsupportedExtension(PathBuf),
    #[error("no usable source CRS for {path:?}")]
    CrsResolution {
        path: PathBuf,
        #[source]
        source: CrsResolutionError,
    },
    #[error("invalid target CRS {definition:?}")]
    TargetCrs {
        definition: String,
        #[source]
        source: ProjectionError,
    },
    #[error("failed to reproject {name}")]
    Projection {
        name: String,
        #[source]
        source: ProjectionError,
    },
    #[error("cannot compute an anchor for an empty batch")]
    EmptyBatch,
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
}

impl From<ParseError> for ImportError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnsupportedExtension(path) => Self::UnsupportedExtension(path),
            e => Self::FileOpen {
                path: e.path().to_path_buf(),
                source: e,
            },
        }
    }
}
