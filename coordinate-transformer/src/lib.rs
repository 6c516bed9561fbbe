mod crs;
mod error;
mod resolve;
mod transformer;

pub use crs::{
    Crs, CrsBackend, EpsgCode, ProjBackend, DEFAULT_TARGET_CRS, EPSG_WEB_MERCATOR,
    EPSG_WGS84_GEOGRAPHIC,
};
pub use error::{CrsResolutionError, ProjectionError};
pub use resolve::{resolve_source_crs, ResolutionState, ResolvedCrs};
pub use transformer::{CoordinateTransform, PointTransformer};
