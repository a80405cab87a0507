//! Catalog Module Tests
//!
//! ## Test Scopes
//! - **Store**: Upsert semantics, active filtering, purchase stock mutation.
//! - **Aggregation**: Per-item metrics and global KPIs over the trailing window.
//! - **Features**: The pure extraction step feeding the scorer.
//! - **Seeding**: Demo catalog bootstrap.

#[cfg(test)]
mod tests {
    use crate::catalog::features::extract_features;
    use crate::catalog::generator::seed_catalog;
    use crate::catalog::store::{CatalogStore, ItemUpsert};
    use crate::catalog::types::{EventKind, now_ms};

    fn upsert(item_id: &str, price: f64, stock: u32) -> ItemUpsert {
        ItemUpsert {
            item_id: item_id.to_string(),
            title: format!("Item {}", item_id),
            category: "test".to_string(),
            price,
            stock,
            avg_rating: None,
            rating_count: None,
            helpful_votes: None,
        }
    }

    // ============================================================
    // TEST 1: Upsert semantics
    // ============================================================

    #[test]
    fn test_upsert_inserts_then_updates() {
        let store = CatalogStore::new();

        let created = store.upsert(ItemUpsert {
            avg_rating: Some(4.2),
            rating_count: Some(120),
            ..upsert("a", 100.0, 5)
        });
        assert_eq!(created.avg_rating, 4.2);
        assert_eq!(store.item_count(), 1);

        // Price changes, rating fields absent from the payload stay put
        let updated = store.upsert(upsert("a", 80.0, 7));
        assert_eq!(store.item_count(), 1);
        assert_eq!(updated.price, 80.0);
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.avg_rating, 4.2);
        assert_eq!(updated.rating_count, 120);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_list_active_excludes_out_of_stock_and_sorts_by_sku() {
        let store = CatalogStore::new();
        store.upsert(upsert("zz", 10.0, 3));
        store.upsert(upsert("aa", 10.0, 1));
        store.upsert(upsert("mm", 10.0, 0));

        let active = store.list_active_items();

        let ids: Vec<&str> = active.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["aa", "zz"]);
        assert_eq!(store.active_count(), 2);
        assert_eq!(store.item_count(), 3);
    }

    // ============================================================
    // TEST 2: Events and stock
    // ============================================================

    #[test]
    fn test_purchase_decrements_stock_and_derives_revenue() {
        let store = CatalogStore::new();
        store.upsert(upsert("a", 50.0, 10));

        let event = store
            .record_event("a", EventKind::Purchase, 3, None)
            .unwrap();

        assert_eq!(event.revenue, 150.0);
        assert_eq!(store.get("a").unwrap().stock, 7);
    }

    #[test]
    fn test_purchase_stock_floors_at_zero() {
        let store = CatalogStore::new();
        store.upsert(upsert("a", 50.0, 2));

        store.record_event("a", EventKind::Purchase, 5, None).unwrap();

        let item = store.get("a").unwrap();
        assert_eq!(item.stock, 0);
        assert!(!item.is_active());
        assert!(store.list_active_items().is_empty());
    }

    #[test]
    fn test_view_does_not_touch_stock_or_revenue() {
        let store = CatalogStore::new();
        store.upsert(upsert("a", 50.0, 10));

        let event = store.record_event("a", EventKind::View, 1, None).unwrap();

        assert_eq!(event.revenue, 0.0);
        assert_eq!(store.get("a").unwrap().stock, 10);
    }

    #[test]
    fn test_event_for_unknown_item_is_rejected() {
        let store = CatalogStore::new();
        assert!(store
            .record_event("ghost", EventKind::View, 1, None)
            .is_none());
    }

    // ============================================================
    // TEST 3: Metric aggregation
    // ============================================================

    #[test]
    fn test_item_metrics_aggregate_rates() {
        let store = CatalogStore::new();
        store.upsert(upsert("a", 100.0, 50));

        for _ in 0..10 {
            store.record_event("a", EventKind::View, 1, None);
        }
        for _ in 0..4 {
            store.record_event("a", EventKind::Click, 1, None);
        }
        store.record_event("a", EventKind::Purchase, 2, None);

        let metrics = store.item_metrics("a", now_ms());

        assert_eq!(metrics.views, 10);
        assert_eq!(metrics.clicks, 4);
        assert_eq!(metrics.purchases, 1);
        assert_eq!(metrics.revenue, 200.0);
        assert_eq!(metrics.ctr, 40.0);
        assert_eq!(metrics.conversion_rate, 25.0);
    }

    #[test]
    fn test_metrics_for_unknown_item_are_zero() {
        let store = CatalogStore::new();
        let metrics = store.item_metrics("ghost", now_ms());

        assert_eq!(metrics.views, 0);
        assert_eq!(metrics.ctr, 0.0);
    }

    #[test]
    fn test_global_kpis_cover_all_items() {
        let store = CatalogStore::new();
        store.upsert(upsert("a", 100.0, 10));
        store.upsert(upsert("b", 200.0, 10));
        store.upsert(upsert("empty", 10.0, 0));

        store.record_event("a", EventKind::View, 1, None);
        store.record_event("b", EventKind::View, 1, None);
        store.record_event("a", EventKind::Purchase, 1, None);
        store.record_event("b", EventKind::Purchase, 1, None);

        let kpis = store.global_kpis(now_ms());

        assert_eq!(kpis.views, 2);
        assert_eq!(kpis.purchases, 2);
        assert_eq!(kpis.revenue, 300.0);
        assert_eq!(kpis.avg_order_value, 150.0);
        assert_eq!(kpis.active_items, 2);
    }

    // ============================================================
    // TEST 4: Feature extraction
    // ============================================================

    #[test]
    fn test_feature_extraction_is_deterministic() {
        let store = CatalogStore::new();
        let item = store.upsert(ItemUpsert {
            avg_rating: Some(4.5),
            rating_count: Some(321),
            helpful_votes: Some(12),
            ..upsert("a", 199.0, 42)
        });

        let now = now_ms();
        let first = extract_features(&item, now);
        let second = extract_features(&item, now);

        assert_eq!(first.item_id, "a");
        assert_eq!(first.price, second.price);
        assert_eq!(first.stock, 42.0);
        assert_eq!(first.avg_rating, 4.5);
        assert_eq!(first.rating_count, 321.0);
        assert_eq!(first.staleness_days, second.staleness_days);
        assert!(first.hour_of_day < 24.0);
        assert!(first.day_of_week < 7.0);
    }

    #[test]
    fn test_freshly_updated_item_has_no_staleness() {
        let store = CatalogStore::new();
        let item = store.upsert(upsert("a", 10.0, 1));

        let features = extract_features(&item, item.updated_at);
        assert_eq!(features.staleness_days, 0.0);
    }

    // ============================================================
    // TEST 5: Demo seeding
    // ============================================================

    #[test]
    fn test_seed_catalog_creates_active_items() {
        let store = CatalogStore::new();
        seed_catalog(&store, 25);

        assert_eq!(store.item_count(), 25);
        assert_eq!(store.active_count(), 25);
        for item in store.list_active_items() {
            assert!(item.price > 0.0);
            assert!(!item.category.is_empty());
        }
    }
}
