//! Recompute failure taxonomy.
//!
//! Every failure mode that can abort a recompute run has a named variant.
//! Failures here never reach RankCache readers: the scheduler logs them and
//! keeps serving the last good snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecomputeError {
    /// The scoring backend could not produce scores for the batch.
    #[error("scoring backend unavailable: {0}")]
    ScoringUnavailable(String),

    /// The scoring call exceeded its deadline.
    #[error("scoring call timed out after {0} ms")]
    ScoringTimeout(u64),

    /// The scorer answered, but the response cannot be trusted
    /// (e.g. batch length mismatch).
    #[error("scorer response invalid: {0}")]
    ScorerResponseInvalid(String),
}

/// Result alias for recompute-path operations.
pub type RecomputeResult<T> = Result<T, RecomputeError>;
