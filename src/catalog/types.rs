use serde::{Deserialize, Serialize};

/// A catalog product. `stock > 0` means the item is active and eligible for
/// ranking; everything else about activity is derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable marketplace SKU. The identity used everywhere else in the system.
    pub item_id: String,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub avg_rating: f64,
    pub rating_count: u32,
    pub helpful_votes: u32,
    /// Timestamp (ms) when the item first entered the catalog.
    pub created_at: u64,
    /// Timestamp (ms) of the last attribute change.
    pub updated_at: u64,
}

impl Item {
    pub fn is_active(&self) -> bool {
        self.stock > 0
    }
}

/// Kinds of shopper interaction the catalog records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    View,
    Click,
    Purchase,
    CartAdd,
    WishlistAdd,
}

/// A single recorded interaction. Purchases carry revenue and decrement stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub item_id: String,
    pub kind: EventKind,
    pub quantity: u32,
    pub revenue: f64,
    pub user_id: Option<String>,
    /// Timestamp (ms) the event was recorded.
    pub timestamp: u64,
}

/// Aggregated interaction metrics for one item over a trailing window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemMetrics {
    pub views: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub revenue: f64,
    /// Click-through rate in percent.
    pub ctr: f64,
    /// Purchases per click in percent.
    pub conversion_rate: f64,
}

/// Store-wide KPI aggregate broadcast with every snapshot and served on /metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalKpis {
    pub revenue: f64,
    pub views: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub active_items: u64,
    pub avg_order_value: f64,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Renders a millisecond epoch timestamp as RFC 3339 for wire payloads.
pub fn rfc3339(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}
