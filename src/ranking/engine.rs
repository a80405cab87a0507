//! Rule Overlay & Ranking Algorithm
//!
//! Pure function from (items, raw scores, rules, prior ranks) to a new
//! snapshot. The step order is a correctness requirement, not an
//! implementation detail:
//!
//! 1. Remove-filtered items never appear, regardless of other rules.
//! 2. Boost/demote compose multiplicatively in rule-list order.
//! 3. Pinned items are partitioned out and always rank above the rest.
//! 4. Within each partition: adjusted score descending, ties broken by
//!    item id ascending, so equal-score orderings are reproducible.
//! 5. Ranks are dense 1..N over pinned ++ unpinned.
//! 6. `previous_rank` is stamped from the prior snapshot's ranks.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::types::Item;
use crate::rules::types::{Rule, RuleKind};

use super::types::{RecomputeOutcome, ScoredItem, Snapshot};

pub fn recompute(
    items: &[Item],
    raw_scores: &HashMap<String, f64>,
    rules: &[Rule],
    previous_ranks: &HashMap<String, u32>,
    now: u64,
) -> RecomputeOutcome {
    let active: Vec<&Rule> = rules.iter().filter(|rule| rule.is_active(now)).collect();

    let mut pinned: Vec<ScoredItem> = Vec::new();
    let mut unpinned: Vec<ScoredItem> = Vec::new();
    let mut missing_scores: Vec<String> = Vec::new();

    for item in items {
        // An item the scorer could not score cannot be ranked
        let raw_score = match raw_scores.get(&item.item_id) {
            Some(score) if score.is_finite() => *score,
            _ => {
                missing_scores.push(item.item_id.clone());
                continue;
            }
        };

        if active
            .iter()
            .any(|rule| rule.kind == RuleKind::Remove && rule.matches(item))
        {
            continue;
        }

        let mut adjusted_score = raw_score;
        for rule in &active {
            if !rule.matches(item) {
                continue;
            }
            match rule.kind {
                RuleKind::Boost => adjusted_score *= rule.strength,
                RuleKind::Demote => adjusted_score /= rule.strength,
                RuleKind::Pin | RuleKind::Remove => {}
            }
        }

        let is_pinned = active
            .iter()
            .any(|rule| rule.kind == RuleKind::Pin && rule.matches(item));

        let scored = ScoredItem {
            item_id: item.item_id.clone(),
            raw_score,
            adjusted_score,
            rank: 0,
            previous_rank: previous_ranks.get(&item.item_id).copied(),
            pinned: is_pinned,
            computed_at: now,
        };

        if is_pinned {
            pinned.push(scored);
        } else {
            unpinned.push(scored);
        }
    }

    pinned.sort_by(compare_scored);
    unpinned.sort_by(compare_scored);

    let mut ordered = pinned;
    ordered.append(&mut unpinned);

    for (index, item) in ordered.iter_mut().enumerate() {
        item.rank = index as u32 + 1;
    }

    RecomputeOutcome {
        snapshot: Snapshot {
            items: ordered,
            computed_at: now,
        },
        missing_scores,
    }
}

/// Adjusted score descending, item id ascending on ties. Scores are checked
/// finite before they get here, so `partial_cmp` cannot actually fail.
fn compare_scored(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.adjusted_score
        .partial_cmp(&a.adjusted_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.item_id.cmp(&b.item_id))
}
