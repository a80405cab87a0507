//! In-Process Linear Scorer
//!
//! The default scoring backend: a fixed-weight linear model over the feature
//! vector. It stands in for a trained ranker behind the same interface, which
//! keeps the rest of the system honest about consuming scores as an opaque
//! signal.

use async_trait::async_trait;

use crate::catalog::features::FeatureVector;
use crate::error::RecomputeResult;

use super::Scorer;

/// Weights applied to the transformed feature vector.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub rating: f64,
    pub popularity: f64,
    pub price: f64,
    pub stock: f64,
    pub freshness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 0.30,
            popularity: 0.28,
            price: 0.22,
            stock: 0.10,
            freshness: 0.10,
        }
    }
}

pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores a single vector. Each signal is squashed into roughly [0, 1]
    /// before weighting so no raw magnitude dominates.
    fn score_one(&self, features: &FeatureVector) -> f64 {
        let w = &self.weights;

        let rating_signal = features.avg_rating / 5.0;
        let popularity_signal =
            (1.0 + features.rating_count + features.helpful_votes).ln() / 10.0;
        // Cheaper items score higher, flattening out toward zero for premium prices
        let price_signal = 1.0 / (1.0 + features.price / 500.0);
        let stock_signal = (1.0 + features.stock).ln() / 8.0;
        let freshness_signal = 1.0 / (1.0 + features.staleness_days / 7.0);

        w.rating * rating_signal
            + w.popularity * popularity_signal
            + w.price * price_signal
            + w.stock * stock_signal
            + w.freshness * freshness_signal
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

#[async_trait]
impl Scorer for WeightedScorer {
    fn name(&self) -> &str {
        "weighted"
    }

    async fn score(&self, batch: &[FeatureVector]) -> RecomputeResult<Vec<f64>> {
        Ok(batch.iter().map(|f| self.score_one(f)).collect())
    }
}
