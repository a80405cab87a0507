use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::features::extract_features;
use crate::catalog::store::CatalogStore;
use crate::catalog::types::{now_ms, rfc3339};
use crate::rules::store::RuleStore;
use crate::scheduler::service::Scheduler;
use crate::scheduler::types::TriggerReason;
use crate::scoring::Scorer;

use super::cache::RankCache;
use super::engine;
use super::types::ScoredItem;

#[derive(Debug, Deserialize)]
pub struct RankingsParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One row of the ranked list as consumers see it.
#[derive(Debug, Serialize)]
pub struct RankedEntry {
    pub item_id: String,
    pub score: f64,
    pub rank: u32,
    pub rank_change: i64,
    pub pinned: bool,
}

impl From<&ScoredItem> for RankedEntry {
    fn from(item: &ScoredItem) -> Self {
        Self {
            item_id: item.item_id.clone(),
            score: item.adjusted_score,
            rank: item.rank,
            rank_change: item.rank_change(),
            pinned: item.pinned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub status: String,
    pub computed_at: Option<String>,
    pub total_count: usize,
    pub count: usize,
    pub results: Vec<RankedEntry>,
}

#[derive(Debug, Serialize)]
pub struct GetRankResponse {
    pub entry: Option<RankedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SimulatePriceRequest {
    pub item_id: String,
    pub new_price: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulatePriceResponse {
    pub success: bool,
    pub old_rank: Option<u32>,
    pub new_rank: Option<u32>,
    pub rank_change: i64,
}

pub async fn handle_rankings(
    Extension(cache): Extension<Arc<RankCache>>,
    Query(params): Query<RankingsParams>,
) -> (StatusCode, Json<RankingsResponse>) {
    let Some(snapshot) = cache.read().await else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(RankingsResponse {
                status: "not_ready".to_string(),
                computed_at: None,
                total_count: 0,
                count: 0,
                results: Vec::new(),
            }),
        );
    };

    let limit = params.limit.unwrap_or(100);
    let offset = params.offset.unwrap_or(0);

    let results: Vec<RankedEntry> = snapshot
        .items
        .iter()
        .skip(offset)
        .take(limit)
        .map(RankedEntry::from)
        .collect();

    (
        StatusCode::OK,
        Json(RankingsResponse {
            status: "ok".to_string(),
            computed_at: Some(rfc3339(snapshot.computed_at)),
            total_count: snapshot.items.len(),
            count: results.len(),
            results,
        }),
    )
}

pub async fn handle_item_rank(
    Extension(cache): Extension<Arc<RankCache>>,
    Path(item_id): Path<String>,
) -> (StatusCode, Json<GetRankResponse>) {
    if !cache.is_ready().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(GetRankResponse { entry: None }),
        );
    }

    match cache.get_item(&item_id).await {
        Some(item) => (
            StatusCode::OK,
            Json(GetRankResponse {
                entry: Some(RankedEntry::from(&item)),
            }),
        ),
        None => (StatusCode::NOT_FOUND, Json(GetRankResponse { entry: None })),
    }
}

/// Price what-if: re-scores the catalog with one item's price overridden and
/// reports where the item would land. Nothing is published; the hypothetical
/// list is discarded. The simulation still files a recompute trigger, like
/// any other qualifying business event.
pub async fn handle_simulate_price(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(scorer): Extension<Arc<dyn Scorer>>,
    Extension(cache): Extension<Arc<RankCache>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Json(req): Json<SimulatePriceRequest>,
) -> (StatusCode, Json<SimulatePriceResponse>) {
    let failure = |status: StatusCode| {
        (
            status,
            Json(SimulatePriceResponse {
                success: false,
                old_rank: None,
                new_rank: None,
                rank_change: 0,
            }),
        )
    };

    if !req.new_price.is_finite() || req.new_price < 0.0 {
        return failure(StatusCode::BAD_REQUEST);
    }
    if catalog.get(&req.item_id).is_none() {
        return failure(StatusCode::NOT_FOUND);
    }

    let now = now_ms();
    let mut items = catalog.list_active_items();
    for item in items.iter_mut() {
        if item.item_id == req.item_id {
            item.price = req.new_price;
        }
    }

    let features: Vec<_> = items
        .iter()
        .map(|item| extract_features(item, now))
        .collect();

    let scores = match scorer.score(&features).await {
        Ok(scores) => scores,
        Err(e) => {
            tracing::error!("What-if scoring failed: {}", e);
            return failure(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let raw_scores: HashMap<String, f64> = items
        .iter()
        .zip(scores)
        .map(|(item, score)| (item.item_id.clone(), score))
        .collect();

    let active_rules = rules.list_active(now);
    let outcome = engine::recompute(&items, &raw_scores, &active_rules, &HashMap::new(), now);

    let old_rank = cache.get_item(&req.item_id).await.map(|item| item.rank);
    let new_rank = outcome
        .snapshot
        .items
        .iter()
        .find(|item| item.item_id == req.item_id)
        .map(|item| item.rank);

    let rank_change = match (old_rank, new_rank) {
        (Some(old), Some(new)) => old as i64 - new as i64,
        _ => 0,
    };

    scheduler.request_recompute(TriggerReason::PriceSimulation);

    (
        StatusCode::OK,
        Json(SimulatePriceResponse {
            success: true,
            old_rank,
            new_rank,
            rank_change,
        }),
    )
}
