//! Feature Extraction
//!
//! One pure step from catalog item to scorer input. Handlers and background
//! jobs all go through this function, so the feature definition lives in
//! exactly one place.

use serde::{Deserialize, Serialize};

use super::types::Item;

/// The numeric view of an item consumed by the Scorer.
///
/// Serialized as-is when scoring is delegated to a remote backend, so field
/// names are part of the scoring wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    pub item_id: String,
    pub price: f64,
    pub stock: f64,
    pub avg_rating: f64,
    pub rating_count: f64,
    pub helpful_votes: f64,
    /// Days since the item's attributes last changed.
    pub staleness_days: f64,
    pub hour_of_day: f64,
    pub day_of_week: f64,
}

/// Builds the feature vector for one item at a given instant.
pub fn extract_features(item: &Item, now: u64) -> FeatureVector {
    let age_ms = now.saturating_sub(item.updated_at);
    let staleness_days = age_ms as f64 / (24.0 * 60.0 * 60.0 * 1000.0);

    // Wall-clock seasonality features, derived from the same `now` the
    // recompute stamps on the snapshot.
    let hours_since_epoch = now / (60 * 60 * 1000);
    let hour_of_day = (hours_since_epoch % 24) as f64;
    // The epoch fell on a Thursday
    let day_of_week = ((hours_since_epoch / 24 + 4) % 7) as f64;

    FeatureVector {
        item_id: item.item_id.clone(),
        price: item.price,
        stock: item.stock as f64,
        avg_rating: item.avg_rating,
        rating_count: item.rating_count as f64,
        helpful_votes: item.helpful_votes as f64,
        staleness_days,
        hour_of_day,
        day_of_week,
    }
}
