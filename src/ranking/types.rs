use serde::{Deserialize, Serialize};

/// One item's position in a published snapshot. Produced fresh each recompute
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item_id: String,
    /// Score as returned by the scorer, before any rule overlay.
    pub raw_score: f64,
    /// Score after boost/demote composition. Ordering key within a partition.
    pub adjusted_score: f64,
    /// Dense 1-based rank in the final order.
    pub rank: u32,
    /// Rank in the immediately preceding snapshot, if the item was in it.
    pub previous_rank: Option<u32>,
    /// Whether a pin rule put this item in the top partition.
    pub pinned: bool,
    /// Timestamp (ms) of the recompute that produced this entry.
    pub computed_at: u64,
}

impl ScoredItem {
    /// Positive when the item moved up. 0 for items new to the list.
    pub fn rank_change(&self) -> i64 {
        match self.previous_rank {
            Some(previous) => previous as i64 - self.rank as i64,
            None => 0,
        }
    }
}

/// One complete, immutable ranked output of a single recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<ScoredItem>,
    /// Timestamp (ms) the recompute ran. Strictly increasing across publishes.
    pub computed_at: u64,
}

impl Snapshot {
    pub fn empty(computed_at: u64) -> Self {
        Self {
            items: Vec::new(),
            computed_at,
        }
    }

    pub fn pinned_count(&self) -> usize {
        self.items.iter().filter(|item| item.pinned).count()
    }
}

/// Result of one engine run: the snapshot plus non-fatal diagnostics.
#[derive(Debug)]
pub struct RecomputeOutcome {
    pub snapshot: Snapshot,
    /// Items excluded because the scorer produced no usable score for them.
    pub missing_scores: Vec<String>,
}
