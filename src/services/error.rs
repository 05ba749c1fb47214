//! Error type for engine operations.
//!
//! Engine operations mostly pass registry errors through unchanged; the
//! one thing they add is `PartialSwap`, raised when a multi-write swap is
//! interrupted after the external state has already been disturbed.

use crate::api::ContestantId;
use crate::registry::RegistryError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A registry call failed before any state was disturbed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A bib swap was interrupted between its writes. The named bib has no
    /// holder and the named contestant has no bib until an operator (or a
    /// retry) reassigns it.
    #[error(
        "Bib swap interrupted: bib {bib_left_unassigned} is left unassigned \
         on contestant {contestant_id}: {source}"
    )]
    PartialSwap {
        bib_left_unassigned: i32,
        contestant_id: ContestantId,
        source: RegistryError,
    },
}

impl EngineError {
    /// Check if this error means the caller's token was rejected.
    ///
    /// Batch operations abort on the first unauthorized response; the check
    /// reaches through `PartialSwap` so an expiry mid-swap still stops the
    /// batch.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Registry(err) => err.is_unauthorized(),
            Self::PartialSwap { source, .. } => source.is_unauthorized(),
        }
    }

    /// Check if this error is a missing-record response.
    ///
    /// Batch loops skip the current item on `NotFound` and continue with the
    /// next one instead of aborting.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(RegistryError::NotFound { .. }))
    }
}
