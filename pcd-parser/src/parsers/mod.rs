use std::path::{Path, PathBuf};

use pcd_core::pointcloud::point::PointCloudSource;

pub mod las;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: ::las::Error,
    },
    #[error("failed to read point records from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ::las::Error,
    },
    #[error("unsupported file extension for {0:?}")]
    UnsupportedExtension(PathBuf),
}

impl ParseError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
            Self::UnsupportedExtension(path) => path,
        }
    }
}

pub trait ParserProvider: Send + Sync {
    fn get_parser(&self, path: &Path) -> Result<Box<dyn Parser>, ParseError>;
}

pub trait Parser {
    fn parse(&self) -> Result<PointCloudSource, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Las,
    Laz,
}

pub fn get_extension(path: &Path) -> Option<Extension> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "las" => Some(Extension::Las),
        "laz" => Some(Extension::Laz),
        _ => None,
    }
}
