//! Remote Scoring Client
//!
//! Delegates scoring to an external HTTP service (`POST {base}/score` with the
//! feature batch, JSON back). Transient network failures are retried with
//! exponential backoff and jitter; anything that survives the retries, or a
//! response that does not line up with the batch, is reported as
//! `ScoringUnavailable` so the scheduler can abort the run cleanly.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::features::FeatureVector;
use crate::error::{RecomputeError, RecomputeResult};

use super::Scorer;

const RETRY_ATTEMPTS: usize = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_millis(2500);

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    items: &'a [FeatureVector],
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    scores: Vec<f64>,
}

pub struct RemoteScorer {
    endpoint: String,
    http_client: reqwest::Client,
}

impl RemoteScorer {
    /// `base_url` without a trailing slash, e.g. `http://scorer:9000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/score", base_url.trim_end_matches('/')),
            http_client: reqwest::Client::new(),
        }
    }

    async fn post_with_retry(
        &self,
        payload: &ScoreRequest<'_>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut delay_ms = 150u64;
        let mut last_err = None;

        for attempt in 0..RETRY_ATTEMPTS {
            let response = self
                .http_client
                .post(&self.endpoint)
                .json(payload)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == RETRY_ATTEMPTS {
                        return Err(e);
                    }
                    tracing::warn!("Scorer request failed (attempt {}): {}", attempt + 1, e);
                    last_err = Some(e);
                    // Simple jitter to prevent thundering herd
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(last_err.expect("retry loop ran at least once"))
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn score(&self, batch: &[FeatureVector]) -> RecomputeResult<Vec<f64>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .post_with_retry(&ScoreRequest { items: batch })
            .await
            .map_err(|e| RecomputeError::ScoringUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecomputeError::ScoringUnavailable(format!(
                "scorer returned {}",
                response.status()
            )));
        }

        let parsed: ScoreResponse = response
            .json()
            .await
            .map_err(|e| RecomputeError::ScoringUnavailable(e.to_string()))?;

        if parsed.scores.len() != batch.len() {
            return Err(RecomputeError::ScorerResponseInvalid(format!(
                "expected {} scores, got {}",
                batch.len(),
                parsed.scores.len()
            )));
        }

        Ok(parsed.scores)
    }
}
