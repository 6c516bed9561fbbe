use log::{debug, warn};

use crate::{
    crs::{Crs, CrsBackend},
    error::CrsResolutionError,
};

/// Source CRS chosen for a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCrs {
    pub crs: Crs,
    /// True iff the embedded CRS was missing or invalid.
    pub used_fallback: bool,
}

/// Steps of source CRS resolution.
///
/// `Unresolved -> EmbeddedFound`, or
/// `Unresolved -> EmbeddedMissing -> FallbackApplied | Failed`.
#[derive(Debug)]
pub enum ResolutionState {
    Unresolved,
    EmbeddedFound(Crs),
    /// No embedded CRS, or one the backend could not parse.
    EmbeddedMissing,
    FallbackApplied(Crs),
    Failed(CrsResolutionError),
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::EmbeddedFound(_) | Self::FallbackApplied(_) | Self::Failed(_)
        )
    }

    /// Moves one step forward. Terminal states are returned unchanged.
    pub fn advance(self, backend: &dyn CrsBackend, embedded: Option<&str>, fallback: &str) -> Self {
        match self {
            Self::Unresolved => match embedded {
                Some(definition) => match backend.parse(definition) {
                    Ok(crs) => Self::EmbeddedFound(crs),
                    Err(e) => {
                        debug!("embedded CRS could not be parsed: {e}");
                        Self::EmbeddedMissing
                    }
                },
                None => Self::EmbeddedMissing,
            },
            Self::EmbeddedMissing => match backend.parse(fallback) {
                Ok(crs) => {
                    warn!("Source CRS was not detected, assigning fallback CRS {crs}");
                    Self::FallbackApplied(crs)
                }
                Err(source) => Self::Failed(CrsResolutionError {
                    fallback: fallback.to_string(),
                    source,
                }),
            },
            terminal => terminal,
        }
    }
}

/// Picks the embedded CRS when it parses, otherwise `fallback`.
///
/// `fallback` is only parsed when it is needed.
pub fn resolve_source_crs(
    backend: &dyn CrsBackend,
    embedded: Option<&str>,
    fallback: &str,
) -> Result<ResolvedCrs, CrsResolutionError> {
    let mut state = ResolutionState::Unresolved;
    loop {
        state = match state {
            ResolutionState::EmbeddedFound(crs) => {
                return Ok(ResolvedCrs {
                    crs,
                    used_fallback: false,
                })
            }
            ResolutionState::FallbackApplied(crs) => {
                return Ok(ResolvedCrs {
                    crs,
                    used_fallback: true,
                })
            }
            ResolutionState::Failed(e) => return Err(e),
            pending => pending.advance(backend, embedded, fallback),
        };
    }
}
