use axum::{Json, extract::Extension, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::broadcast::hub::BroadcastHub;
use crate::catalog::store::CatalogStore;
use crate::catalog::types::now_ms;
use crate::ranking::cache::RankCache;
use crate::rules::store::RuleStore;

use super::service::Scheduler;
use super::types::TriggerReason;

#[derive(Debug, Default, Deserialize)]
pub struct RecomputeRequest {
    /// One of the known trigger reasons; anything else counts as manual.
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecomputeResponse {
    pub accepted: bool,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub scorer: String,
    pub snapshot_ready: bool,
    /// Seconds since the last successful recompute; the staleness signal.
    pub staleness_secs: Option<u64>,
    pub running: bool,
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub last_error: Option<String>,
    pub active_items: usize,
    pub active_rules: usize,
    pub subscribers: usize,
}

/// Fire-and-forget trigger endpoint. Returns 202 immediately; the actual run
/// is coalesced with whatever else is pending.
pub async fn handle_request_recompute(
    Extension(scheduler): Extension<Arc<Scheduler>>,
    payload: Option<Json<RecomputeRequest>>,
) -> (StatusCode, Json<RecomputeResponse>) {
    let reason = payload
        .and_then(|Json(req)| req.reason)
        .as_deref()
        .and_then(TriggerReason::parse)
        .unwrap_or(TriggerReason::Manual);

    scheduler.request_recompute(reason);

    (
        StatusCode::ACCEPTED,
        Json(RecomputeResponse {
            accepted: true,
            reason: reason.as_str().to_string(),
        }),
    )
}

pub async fn handle_health(
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(cache): Extension<Arc<RankCache>>,
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(hub): Extension<Arc<BroadcastHub>>,
) -> Json<HealthResponse> {
    let stats = scheduler.stats();

    Json(HealthResponse {
        status: "ok".to_string(),
        service: "shelfrank".to_string(),
        scorer: scheduler.scorer_name().to_string(),
        snapshot_ready: cache.is_ready().await,
        staleness_secs: scheduler.staleness_secs(),
        running: stats.running,
        runs_completed: stats.runs_completed,
        runs_failed: stats.runs_failed,
        last_error: stats.last_error,
        active_items: catalog.active_count(),
        active_rules: rules.list_active(now_ms()).len(),
        subscribers: hub.subscriber_count(),
    })
}
