//! In-Memory Catalog Store
//!
//! Concurrent item + event storage backing the ranking engine and the metrics
//! API. A single `DashMap` holds items keyed by SKU; events are kept per item
//! and pruned to the aggregation window on insert.
//!
//! ## Responsibilities
//! - **Item lifecycle**: upsert from operator/API input, stock mutation on purchase.
//! - **Read snapshot**: `list_active_items` hands the recompute path a stable,
//!   deterministically ordered copy of the active catalog.
//! - **Aggregation**: per-item metrics and global KPIs over a trailing window.

use dashmap::DashMap;

use super::types::{CatalogEvent, EventKind, GlobalKpis, Item, ItemMetrics, now_ms};

/// Trailing window used for metric and KPI aggregation (30 days).
pub const METRICS_WINDOW_MS: u64 = 30 * 24 * 60 * 60 * 1000;

pub struct CatalogStore {
    items: DashMap<String, Item>,
    events: DashMap<String, Vec<CatalogEvent>>,
}

/// Attribute payload for item upserts. Missing optional fields keep their
/// previous value on update and default on insert.
#[derive(Debug, Clone)]
pub struct ItemUpsert {
    pub item_id: String,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub avg_rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub helpful_votes: Option<u32>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            events: DashMap::new(),
        }
    }

    /// Creates or updates an item. Returns the stored state after the write.
    pub fn upsert(&self, input: ItemUpsert) -> Item {
        let now = now_ms();
        let mut entry = self
            .items
            .entry(input.item_id.clone())
            .or_insert_with(|| Item {
                item_id: input.item_id.clone(),
                title: input.title.clone(),
                category: input.category.clone(),
                price: input.price,
                stock: input.stock,
                avg_rating: 0.0,
                rating_count: 0,
                helpful_votes: 0,
                created_at: now,
                updated_at: now,
            });

        entry.title = input.title;
        entry.category = input.category;
        entry.price = input.price;
        entry.stock = input.stock;
        if let Some(rating) = input.avg_rating {
            entry.avg_rating = rating;
        }
        if let Some(count) = input.rating_count {
            entry.rating_count = count;
        }
        if let Some(votes) = input.helpful_votes {
            entry.helpful_votes = votes;
        }
        entry.updated_at = now;

        entry.clone()
    }

    pub fn get(&self, item_id: &str) -> Option<Item> {
        self.items.get(item_id).map(|entry| entry.clone())
    }

    /// Active items (stock > 0), ordered by SKU so every recompute sees the
    /// catalog in the same order.
    pub fn list_active_items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| entry.value().is_active())
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn active_count(&self) -> usize {
        self.items
            .iter()
            .filter(|entry| entry.value().is_active())
            .count()
    }

    /// Records an interaction event against an item.
    ///
    /// Purchases decrement stock (floor 0) and derive revenue from the item's
    /// current price when the event carries none. Returns `None` if the item
    /// is unknown.
    pub fn record_event(
        &self,
        item_id: &str,
        kind: EventKind,
        quantity: u32,
        user_id: Option<String>,
    ) -> Option<CatalogEvent> {
        let now = now_ms();
        let mut revenue = 0.0;

        {
            let mut item = self.items.get_mut(item_id)?;
            if kind == EventKind::Purchase {
                revenue = item.price * quantity as f64;
                item.stock = item.stock.saturating_sub(quantity);
                item.updated_at = now;
            }
        }

        let event = CatalogEvent {
            item_id: item_id.to_string(),
            kind,
            quantity,
            revenue,
            user_id,
            timestamp: now,
        };

        let mut events = self.events.entry(item_id.to_string()).or_default();
        events.push(event.clone());
        // Drop anything older than the aggregation window while we hold the entry
        let cutoff = now.saturating_sub(METRICS_WINDOW_MS);
        events.retain(|e| e.timestamp >= cutoff);

        Some(event)
    }

    /// Aggregated metrics for one item over the trailing window.
    pub fn item_metrics(&self, item_id: &str, now: u64) -> ItemMetrics {
        let cutoff = now.saturating_sub(METRICS_WINDOW_MS);
        let mut metrics = ItemMetrics::default();

        if let Some(events) = self.events.get(item_id) {
            for event in events.iter().filter(|e| e.timestamp >= cutoff) {
                match event.kind {
                    EventKind::View => metrics.views += 1,
                    EventKind::Click => metrics.clicks += 1,
                    EventKind::Purchase => {
                        metrics.purchases += 1;
                        metrics.revenue += event.revenue;
                    }
                    EventKind::CartAdd | EventKind::WishlistAdd => {}
                }
            }
        }

        if metrics.views > 0 {
            metrics.ctr = metrics.clicks as f64 / metrics.views as f64 * 100.0;
        }
        if metrics.clicks > 0 {
            metrics.conversion_rate = metrics.purchases as f64 / metrics.clicks as f64 * 100.0;
        }

        metrics
    }

    /// Store-wide KPIs over the trailing window.
    pub fn global_kpis(&self, now: u64) -> GlobalKpis {
        let cutoff = now.saturating_sub(METRICS_WINDOW_MS);
        let mut kpis = GlobalKpis::default();

        for entry in self.events.iter() {
            for event in entry.value().iter().filter(|e| e.timestamp >= cutoff) {
                match event.kind {
                    EventKind::View => kpis.views += 1,
                    EventKind::Click => kpis.clicks += 1,
                    EventKind::Purchase => {
                        kpis.purchases += 1;
                        kpis.revenue += event.revenue;
                    }
                    EventKind::CartAdd | EventKind::WishlistAdd => {}
                }
            }
        }

        kpis.active_items = self.active_count() as u64;
        if kpis.purchases > 0 {
            kpis.avg_order_value = kpis.revenue / kpis.purchases as f64;
        }

        kpis
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
