use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audit::sink::{AuditRecord, AuditSink};
use crate::ranking::cache::RankCache;
use crate::scheduler::service::Scheduler;
use crate::scheduler::types::TriggerReason;

use super::store::{CatalogStore, ItemUpsert};
use super::types::{EventKind, GlobalKpis, Item, ItemMetrics, now_ms};

#[derive(Debug, Deserialize)]
pub struct UpsertItemRequest {
    pub item_id: String,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub avg_rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub helpful_votes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UpsertItemResponse {
    pub item_id: String,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub item_id: String,
    pub kind: EventKind,
    pub quantity: Option<u32>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordEventResponse {
    pub success: bool,
    /// Stock level after the event was applied, if the item exists.
    pub stock: Option<u32>,
}

/// Item attributes joined with the cached ranking view and trailing metrics.
#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub score: Option<f64>,
    pub rank: Option<u32>,
    pub rank_change: i64,
    pub pinned: bool,
    pub metrics: ItemMetrics,
}

#[derive(Debug, Serialize)]
pub struct GetItemResponse {
    pub item: Option<ItemDetail>,
}

pub async fn handle_upsert_item(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(audit): Extension<Arc<dyn AuditSink>>,
    Json(req): Json<UpsertItemRequest>,
) -> (StatusCode, Json<UpsertItemResponse>) {
    if req.price < 0.0 || !req.price.is_finite() {
        tracing::warn!("Rejected upsert for {}: bad price {}", req.item_id, req.price);
        return (
            StatusCode::BAD_REQUEST,
            Json(UpsertItemResponse {
                item_id: req.item_id,
                success: false,
            }),
        );
    }

    let item = catalog.upsert(ItemUpsert {
        item_id: req.item_id,
        title: req.title,
        category: req.category,
        price: req.price,
        stock: req.stock,
        avg_rating: req.avg_rating,
        rating_count: req.rating_count,
        helpful_votes: req.helpful_votes,
    });

    audit.record(AuditRecord::new(
        "item_upserted",
        "item",
        Some(item.item_id.clone()),
        format!("price={} stock={}", item.price, item.stock),
        "catalog_api",
    ));

    scheduler.request_recompute(TriggerReason::CatalogSync);

    (
        StatusCode::OK,
        Json(UpsertItemResponse {
            item_id: item.item_id,
            success: true,
        }),
    )
}

pub async fn handle_record_event(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Json(req): Json<RecordEventRequest>,
) -> (StatusCode, Json<RecordEventResponse>) {
    let quantity = req.quantity.unwrap_or(1).max(1);

    match catalog.record_event(&req.item_id, req.kind, quantity, req.user_id) {
        Some(_) => {
            scheduler.request_recompute(TriggerReason::InventoryChange);
            let stock = catalog.get(&req.item_id).map(|item| item.stock);
            (
                StatusCode::OK,
                Json(RecordEventResponse {
                    success: true,
                    stock,
                }),
            )
        }
        None => {
            tracing::warn!("Event for unknown item {}", req.item_id);
            (
                StatusCode::NOT_FOUND,
                Json(RecordEventResponse {
                    success: false,
                    stock: None,
                }),
            )
        }
    }
}

pub async fn handle_get_item(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(cache): Extension<Arc<RankCache>>,
    Path(item_id): Path<String>,
) -> (StatusCode, Json<GetItemResponse>) {
    let Some(item) = catalog.get(&item_id) else {
        return (StatusCode::NOT_FOUND, Json(GetItemResponse { item: None }));
    };

    let ranked = cache.get_item(&item_id).await;
    let metrics = catalog.item_metrics(&item_id, now_ms());

    let detail = ItemDetail {
        item,
        score: ranked.as_ref().map(|s| s.adjusted_score),
        rank: ranked.as_ref().map(|s| s.rank),
        rank_change: ranked.as_ref().map(|s| s.rank_change()).unwrap_or(0),
        pinned: ranked.map(|s| s.pinned).unwrap_or(false),
        metrics,
    };

    (
        StatusCode::OK,
        Json(GetItemResponse { item: Some(detail) }),
    )
}

pub async fn handle_metrics(
    Extension(catalog): Extension<Arc<CatalogStore>>,
) -> Json<GlobalKpis> {
    Json(catalog.global_kpis(now_ms()))
}
