//! Ranking Module Tests
//!
//! Validates the rule-overlay algorithm and the snapshot cache.
//!
//! ## Test Scopes
//! - **Engine ordering**: Descending adjusted score, deterministic tie-breaks, dense ranks.
//! - **Rule overlay**: Pin/boost/demote/remove semantics, scoping, expiry, composition order.
//! - **Deltas**: previous_rank stamping across consecutive recomputes.
//! - **Cache**: Atomic publish/read, not-ready state, prior-rank retention.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::catalog::types::Item;
    use crate::ranking::cache::RankCache;
    use crate::ranking::engine::recompute;
    use crate::ranking::types::Snapshot;
    use crate::rules::types::{Rule, RuleId, RuleKind, RuleScope};

    const NOW: u64 = 1_700_000_000_000;

    fn item(item_id: &str, category: &str) -> Item {
        Item {
            item_id: item_id.to_string(),
            title: format!("Item {}", item_id),
            category: category.to_string(),
            price: 100.0,
            stock: 10,
            avg_rating: 4.0,
            rating_count: 10,
            helpful_votes: 5,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(id, score)| (id.to_string(), *score))
            .collect()
    }

    fn item_rule(kind: RuleKind, item_id: &str, strength: f64) -> Rule {
        Rule {
            id: RuleId::new(),
            scope: RuleScope::Item {
                item_id: item_id.to_string(),
            },
            kind,
            strength,
            expires_at: None,
            created_at: NOW,
            created_by: "tests".to_string(),
        }
    }

    fn category_rule(kind: RuleKind, category: &str, strength: f64) -> Rule {
        Rule {
            id: RuleId::new(),
            scope: RuleScope::Category {
                category: category.to_string(),
            },
            kind,
            strength,
            expires_at: None,
            created_at: NOW,
            created_by: "tests".to_string(),
        }
    }

    fn order(snapshot: &Snapshot) -> Vec<&str> {
        snapshot
            .items
            .iter()
            .map(|s| s.item_id.as_str())
            .collect()
    }

    // ============================================================
    // TEST 1: Ordering without rules
    // ============================================================

    #[test]
    fn test_descending_order_without_rules() {
        let items = vec![item("a", "x"), item("b", "x"), item("c", "x")];
        let raw = scores(&[("a", 5.0), ("b", 8.0), ("c", 6.5)]);

        let outcome = recompute(&items, &raw, &[], &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["b", "c", "a"]);
        for (idx, scored) in outcome.snapshot.items.iter().enumerate() {
            assert_eq!(scored.rank, idx as u32 + 1);
            assert_eq!(scored.raw_score, scored.adjusted_score);
        }
    }

    #[test]
    fn test_equal_scores_tie_break_by_item_id() {
        let items = vec![item("zeta", "x"), item("alpha", "x"), item("mid", "x")];
        let raw = scores(&[("zeta", 3.0), ("alpha", 3.0), ("mid", 3.0)]);

        let outcome = recompute(&items, &raw, &[], &HashMap::new(), NOW);

        // Deterministic: equal scores fall back to id ascending
        assert_eq!(order(&outcome.snapshot), vec!["alpha", "mid", "zeta"]);
    }

    // ============================================================
    // TEST 2: Pin semantics
    // ============================================================

    #[test]
    fn test_pinned_item_ranks_first_despite_lowest_score() {
        let items = vec![item("a", "x"), item("b", "x"), item("c", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0), ("c", 5.0)]);
        let rules = vec![item_rule(RuleKind::Pin, "c", 1.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["c", "a", "b"]);
        assert_eq!(outcome.snapshot.items[0].rank, 1);
        assert!(outcome.snapshot.items[0].pinned);
        assert!(!outcome.snapshot.items[1].pinned);
        assert_eq!(outcome.snapshot.items[2].rank, 3);
    }

    #[test]
    fn test_multiple_pinned_sorted_by_score_among_themselves() {
        let items = vec![
            item("a", "x"),
            item("b", "x"),
            item("c", "x"),
            item("d", "x"),
        ];
        let raw = scores(&[("a", 10.0), ("b", 8.0), ("c", 5.0), ("d", 7.0)]);
        let rules = vec![
            item_rule(RuleKind::Pin, "c", 1.0),
            item_rule(RuleKind::Pin, "d", 1.0),
        ];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        // Both pinned above everything, higher-scored pin first
        assert_eq!(order(&outcome.snapshot), vec!["d", "c", "a", "b"]);
    }

    // ============================================================
    // TEST 3: Boost / demote
    // ============================================================

    #[test]
    fn test_boost_multiplies_score() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0)]);
        let rules = vec![item_rule(RuleKind::Boost, "b", 2.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["b", "a"]);
        let b = &outcome.snapshot.items[0];
        assert_eq!(b.raw_score, 8.0);
        assert_eq!(b.adjusted_score, 16.0);
    }

    #[test]
    fn test_demote_divides_score() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0)]);
        let rules = vec![item_rule(RuleKind::Demote, "a", 4.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["b", "a"]);
        assert_eq!(outcome.snapshot.items[1].adjusted_score, 2.5);
    }

    #[test]
    fn test_boost_and_demote_compose_in_rule_list_order() {
        let items = vec![item("a", "x")];
        let raw = scores(&[("a", 10.0)]);
        let rules = vec![
            item_rule(RuleKind::Boost, "a", 3.0),
            item_rule(RuleKind::Demote, "a", 2.0),
            item_rule(RuleKind::Boost, "a", 4.0),
        ];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        // 10 * 3 / 2 * 4
        assert_eq!(outcome.snapshot.items[0].adjusted_score, 60.0);
    }

    #[test]
    fn test_boost_applies_to_pinned_items_too() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0)]);
        let rules = vec![
            item_rule(RuleKind::Pin, "a", 1.0),
            item_rule(RuleKind::Pin, "b", 1.0),
            item_rule(RuleKind::Boost, "b", 2.0),
        ];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        // b's boost (16.0) outranks a (10.0) inside the pinned partition
        assert_eq!(order(&outcome.snapshot), vec!["b", "a"]);
    }

    // ============================================================
    // TEST 4: Remove
    // ============================================================

    #[test]
    fn test_removed_item_absent_from_output() {
        let items = vec![item("a", "x"), item("b", "x"), item("c", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0), ("c", 5.0)]);
        let rules = vec![item_rule(RuleKind::Remove, "b", 1.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["a", "c"]);
        // Ranks stay dense after the removal
        assert_eq!(outcome.snapshot.items[0].rank, 1);
        assert_eq!(outcome.snapshot.items[1].rank, 2);
    }

    #[test]
    fn test_remove_wins_over_pin_and_boost() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0)]);
        let rules = vec![
            item_rule(RuleKind::Pin, "b", 1.0),
            item_rule(RuleKind::Boost, "b", 9.0),
            item_rule(RuleKind::Remove, "b", 1.0),
        ];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["a"]);
    }

    // ============================================================
    // TEST 5: Category scope
    // ============================================================

    #[test]
    fn test_category_boost_applies_to_every_item_in_category() {
        let items = vec![
            item("a", "toys"),
            item("b", "toys"),
            item("c", "apparel"),
        ];
        let raw = scores(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let rules = vec![category_rule(RuleKind::Boost, "toys", 10.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["b", "a", "c"]);
        assert_eq!(outcome.snapshot.items[0].adjusted_score, 20.0);
        assert_eq!(outcome.snapshot.items[2].adjusted_score, 3.0);
    }

    #[test]
    fn test_category_remove_excludes_whole_category() {
        let items = vec![
            item("a", "toys"),
            item("b", "toys"),
            item("c", "apparel"),
        ];
        let raw = scores(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let rules = vec![category_rule(RuleKind::Remove, "toys", 1.0)];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["c"]);
    }

    // ============================================================
    // TEST 6: Expiry
    // ============================================================

    #[test]
    fn test_expired_rule_treated_as_absent() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", 8.0)]);

        let mut expired = item_rule(RuleKind::Pin, "b", 1.0);
        expired.expires_at = Some(NOW - 1);
        let mut live = item_rule(RuleKind::Boost, "b", 2.0);
        live.expires_at = Some(NOW + 60_000);

        let outcome = recompute(&items, &raw, &[expired, live], &HashMap::new(), NOW);

        // Pin expired, boost still live
        assert_eq!(order(&outcome.snapshot), vec!["b", "a"]);
        assert!(!outcome.snapshot.items[0].pinned);
        assert_eq!(outcome.snapshot.items[0].adjusted_score, 16.0);
    }

    // ============================================================
    // TEST 7: Missing / unusable scores
    // ============================================================

    #[test]
    fn test_missing_score_excludes_item_and_reports_it() {
        let items = vec![item("a", "x"), item("b", "x"), item("c", "x")];
        let raw = scores(&[("a", 10.0), ("c", 5.0)]);

        let outcome = recompute(&items, &raw, &[], &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["a", "c"]);
        assert_eq!(outcome.missing_scores, vec!["b".to_string()]);
    }

    #[test]
    fn test_non_finite_score_counts_as_missing() {
        let items = vec![item("a", "x"), item("b", "x")];
        let raw = scores(&[("a", 10.0), ("b", f64::NAN)]);

        let outcome = recompute(&items, &raw, &[], &HashMap::new(), NOW);

        assert_eq!(order(&outcome.snapshot), vec!["a"]);
        assert_eq!(outcome.missing_scores, vec!["b".to_string()]);
    }

    // ============================================================
    // TEST 8: Empty catalog
    // ============================================================

    #[test]
    fn test_empty_catalog_yields_empty_snapshot() {
        let outcome = recompute(&[], &HashMap::new(), &[], &HashMap::new(), NOW);

        assert!(outcome.snapshot.items.is_empty());
        assert!(outcome.missing_scores.is_empty());
        assert_eq!(outcome.snapshot.computed_at, NOW);
    }

    // ============================================================
    // TEST 9: Rank deltas across consecutive recomputes
    // ============================================================

    #[test]
    fn test_previous_rank_stamped_from_prior_snapshot() {
        let items = vec![item("a", "x"), item("b", "x"), item("c", "x")];

        let first = recompute(
            &items,
            &scores(&[("a", 10.0), ("b", 8.0), ("c", 5.0)]),
            &[],
            &HashMap::new(),
            NOW,
        );
        assert_eq!(order(&first.snapshot), vec!["a", "b", "c"]);

        let prior_ranks: HashMap<String, u32> = first
            .snapshot
            .items
            .iter()
            .map(|s| (s.item_id.clone(), s.rank))
            .collect();

        // c overtakes everyone in the second run
        let second = recompute(
            &items,
            &scores(&[("a", 10.0), ("b", 8.0), ("c", 20.0)]),
            &[],
            &prior_ranks,
            NOW + 1000,
        );

        assert_eq!(order(&second.snapshot), vec!["c", "a", "b"]);

        let c = &second.snapshot.items[0];
        assert_eq!(c.previous_rank, Some(3));
        assert_eq!(c.rank_change(), 2);

        let a = &second.snapshot.items[1];
        assert_eq!(a.previous_rank, Some(1));
        assert_eq!(a.rank_change(), -1);
    }

    #[test]
    fn test_new_item_has_no_previous_rank_and_zero_delta() {
        let items = vec![item("a", "x"), item("fresh", "x")];
        let prior_ranks: HashMap<String, u32> = [("a".to_string(), 1)].into_iter().collect();

        let outcome = recompute(
            &items,
            &scores(&[("a", 5.0), ("fresh", 9.0)]),
            &[],
            &prior_ranks,
            NOW,
        );

        let fresh = outcome
            .snapshot
            .items
            .iter()
            .find(|s| s.item_id == "fresh")
            .unwrap();
        assert_eq!(fresh.previous_rank, None);
        assert_eq!(fresh.rank_change(), 0);
    }

    // ============================================================
    // TEST 10: Dense ranks under combined rules
    // ============================================================

    #[test]
    fn test_ranks_dense_with_pins_removes_and_missing_scores() {
        let items: Vec<Item> = (0..8)
            .map(|i| item(&format!("i{}", i), "x"))
            .collect();
        let mut raw = HashMap::new();
        for (idx, it) in items.iter().enumerate() {
            // i5 gets no score at all
            if it.item_id != "i5" {
                raw.insert(it.item_id.clone(), idx as f64);
            }
        }
        let rules = vec![
            item_rule(RuleKind::Pin, "i2", 1.0),
            item_rule(RuleKind::Remove, "i7", 1.0),
            item_rule(RuleKind::Boost, "i0", 100.0),
        ];

        let outcome = recompute(&items, &raw, &rules, &HashMap::new(), NOW);

        // 8 items - 1 removed - 1 unscored
        assert_eq!(outcome.snapshot.items.len(), 6);
        for (idx, scored) in outcome.snapshot.items.iter().enumerate() {
            assert_eq!(scored.rank, idx as u32 + 1);
        }
        assert_eq!(outcome.snapshot.items[0].item_id, "i2");
    }

    // ============================================================
    // TEST 11: RankCache
    // ============================================================

    #[tokio::test]
    async fn test_cache_empty_until_first_publish() {
        let cache = RankCache::new();

        assert!(!cache.is_ready().await);
        assert!(cache.read().await.is_none());
        assert!(cache.latest_ranks().await.is_empty());
        assert!(cache.get_item("a").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_publish_replaces_snapshot_wholesale() {
        let cache = RankCache::new();
        let items = vec![item("a", "x"), item("b", "x")];

        let first = recompute(
            &items,
            &scores(&[("a", 2.0), ("b", 1.0)]),
            &[],
            &HashMap::new(),
            NOW,
        );
        cache.publish(first.snapshot).await;

        let ranks = cache.latest_ranks().await;
        assert_eq!(ranks.get("a"), Some(&1));
        assert_eq!(ranks.get("b"), Some(&2));
        assert!(cache.previous_ranks().await.is_empty());

        let second = recompute(
            &items,
            &scores(&[("a", 1.0), ("b", 2.0)]),
            &[],
            &ranks,
            NOW + 1000,
        );
        cache.publish(second.snapshot).await;

        let current = cache.read().await.unwrap();
        assert_eq!(current.computed_at, NOW + 1000);
        assert_eq!(current.items[0].item_id, "b");

        // The retained map is exactly what the current snapshot deltas against
        let previous = cache.previous_ranks().await;
        assert_eq!(previous.get("a"), Some(&1));
        for scored in &current.items {
            assert_eq!(
                scored.previous_rank,
                previous.get(&scored.item_id).copied()
            );
        }
    }

    #[tokio::test]
    async fn test_cache_reader_keeps_consistent_view_across_publish() {
        let cache = RankCache::new();
        let items = vec![item("a", "x")];

        let first = recompute(&items, &scores(&[("a", 1.0)]), &[], &HashMap::new(), NOW);
        cache.publish(first.snapshot).await;

        let held = cache.read().await.unwrap();

        let second = recompute(
            &items,
            &scores(&[("a", 9.0)]),
            &[],
            &HashMap::new(),
            NOW + 1000,
        );
        cache.publish(second.snapshot).await;

        // The Arc handed out earlier still points at the old snapshot
        assert_eq!(held.computed_at, NOW);
        assert_eq!(cache.read().await.unwrap().computed_at, NOW + 1000);
    }
}
