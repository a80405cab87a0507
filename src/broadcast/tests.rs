//! Broadcast Module Tests
//!
//! ## Test Scopes
//! - **Hub**: Publish-order delivery, non-blocking notify, lag detection for slow subscribers.
//! - **Payload**: Summary derivation (movers, pinned count) from a snapshot.

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::RecvError;

    use crate::broadcast::hub::{BroadcastHub, SUBSCRIBER_BUFFER};
    use crate::broadcast::types::{RankingUpdate, TOP_MOVERS};
    use crate::catalog::types::GlobalKpis;
    use crate::ranking::types::{ScoredItem, Snapshot};

    fn update(computed_at: u64) -> RankingUpdate {
        RankingUpdate {
            computed_at,
            item_count: 0,
            pinned_count: 0,
            kpis: GlobalKpis::default(),
            top_movers: Vec::new(),
        }
    }

    fn scored(item_id: &str, rank: u32, previous_rank: Option<u32>, pinned: bool) -> ScoredItem {
        ScoredItem {
            item_id: item_id.to_string(),
            raw_score: 1.0,
            adjusted_score: 1.0,
            rank,
            previous_rank,
            pinned,
            computed_at: 1000,
        }
    }

    // ============================================================
    // TEST 1: Delivery in publish order
    // ============================================================

    #[tokio::test]
    async fn test_subscriber_receives_updates_in_publish_order() {
        let hub = BroadcastHub::new();
        let mut rx = hub.subscribe();

        assert_eq!(hub.notify(update(1)), 1);
        assert_eq!(hub.notify(update(2)), 1);
        assert_eq!(hub.notify(update(3)), 1);

        assert_eq!(rx.recv().await.unwrap().computed_at, 1);
        assert_eq!(rx.recv().await.unwrap().computed_at, 2);
        assert_eq!(rx.recv().await.unwrap().computed_at, 3);
    }

    // ============================================================
    // TEST 2: Notify never depends on subscribers
    // ============================================================

    #[tokio::test]
    async fn test_notify_without_subscribers_is_not_an_error() {
        let hub = BroadcastHub::new();

        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.notify(update(1)), 0);
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_receivers() {
        let hub = BroadcastHub::new();

        let rx1 = hub.subscribe();
        let rx2 = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(rx1);
        drop(rx2);
        assert_eq!(hub.subscriber_count(), 0);
    }

    // ============================================================
    // TEST 3: Slow subscribers observe lag, publisher never blocks
    // ============================================================

    #[tokio::test]
    async fn test_slow_subscriber_observes_lag() {
        let hub = BroadcastHub::new();
        let mut rx = hub.subscribe();

        // Overflow the per-subscriber buffer without draining anything
        for i in 0..(SUBSCRIBER_BUFFER as u64 + 10) {
            hub.notify(update(i));
        }

        match rx.recv().await {
            Err(RecvError::Lagged(skipped)) => assert!(skipped >= 10),
            other => panic!("expected lag, got {:?}", other.map(|u| u.computed_at)),
        }
    }

    // ============================================================
    // TEST 4: Summary derivation
    // ============================================================

    #[test]
    fn test_update_from_snapshot_picks_largest_movers() {
        let snapshot = Snapshot {
            items: vec![
                scored("steady", 1, Some(1), true),
                scored("up-small", 2, Some(3), false),
                scored("up-big", 3, Some(9), false),
                scored("down", 4, Some(2), false),
                scored("new", 5, None, false),
            ],
            computed_at: 1000,
        };

        let update = RankingUpdate::from_snapshot(&snapshot, GlobalKpis::default());

        assert_eq!(update.computed_at, 1000);
        assert_eq!(update.item_count, 5);
        assert_eq!(update.pinned_count, 1);

        // steady (delta 0) and new (no prior rank) are not movers
        assert_eq!(update.top_movers.len(), 3);
        assert_eq!(update.top_movers[0].item_id, "up-big");
        assert_eq!(update.top_movers[0].rank_change, 6);
    }

    #[test]
    fn test_update_caps_mover_list() {
        let items: Vec<ScoredItem> = (0..20u32)
            .map(|i| scored(&format!("i{}", i), i + 1, Some(i + 2 + (i % 7)), false))
            .collect();
        let snapshot = Snapshot {
            items,
            computed_at: 2000,
        };

        let update = RankingUpdate::from_snapshot(&snapshot, GlobalKpis::default());
        assert!(update.top_movers.len() <= TOP_MOVERS);
    }
}
