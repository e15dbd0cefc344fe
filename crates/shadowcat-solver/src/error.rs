//! Errors raised at the optimizer boundary.

use shadowcat_core::ShadowCatError;
use thiserror::Error;

/// Failure of one solve round trip.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The optimizer itself reported a failure.
    #[error("solver failed: {0}")]
    Solver(String),

    /// Step state could not be flattened into a solve input.
    #[error("invalid solve input: {0}")]
    Input(ShadowCatError),

    /// The raw result could not be decoded into an outcome.
    #[error("invalid solver result: {0}")]
    Decode(#[from] ShadowCatError),

    #[error("wire version mismatch: expected {expected}, found {found}")]
    WireVersion { expected: u32, found: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
