use proj_sys_transformer::ProjError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Proj(#[from] ProjError),
    #[error("invalid CRS definition {definition:?}: {reason}")]
    InvalidCrs { definition: String, reason: String },
}

/// The fallback CRS could not be parsed, so no source CRS is available.
#[derive(Debug, thiserror::Error)]
#[error("fallback CRS {fallback:?} is not a valid CRS")]
pub struct CrsResolutionError {
    pub fallback: String,
    #[source]
    pub source: ProjectionError,
}
