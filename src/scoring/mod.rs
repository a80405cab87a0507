//! Scoring Module
//!
//! The desirability scorer behind the ranking engine. The model itself is a
//! black box behind the [`Scorer`] trait: the engine hands it a batch of
//! feature vectors and gets one raw score per vector back, or a
//! `ScoringUnavailable` failure. The trait object is owned by the scheduler
//! and injected at wiring time; there is no process-wide model state.
//!
//! ## Submodules
//! - **`weighted`**: Deterministic in-process linear model (the default backend).
//! - **`remote`**: HTTP client for an external scoring service, with bounded retries.

pub mod remote;
pub mod weighted;


use async_trait::async_trait;

use crate::catalog::features::FeatureVector;
use crate::error::RecomputeResult;

/// A pluggable batch scorer. Implementations must be pure with respect to the
/// batch: same vectors in, same scores out, one score per input vector, no
/// side effects on the catalog.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Human-readable backend name for logs and health output.
    fn name(&self) -> &str;

    /// Scores the whole batch. The returned vector must be aligned with the
    /// input slice.
    async fn score(&self, batch: &[FeatureVector]) -> RecomputeResult<Vec<f64>>;
}
