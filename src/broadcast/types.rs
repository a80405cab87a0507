use serde::{Deserialize, Serialize};

use crate::catalog::types::GlobalKpis;
use crate::ranking::types::Snapshot;

/// An item that moved noticeably between two consecutive snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankMove {
    pub item_id: String,
    pub rank: u32,
    pub rank_change: i64,
}

/// Compact snapshot-changed notification pushed to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingUpdate {
    /// Timestamp (ms) of the snapshot this update announces.
    pub computed_at: u64,
    pub item_count: usize,
    pub pinned_count: usize,
    pub kpis: GlobalKpis,
    /// Largest absolute rank moves, at most [`TOP_MOVERS`] entries.
    pub top_movers: Vec<RankMove>,
}

/// How many movers a single update carries.
pub const TOP_MOVERS: usize = 5;

impl RankingUpdate {
    /// Derives the notification for a freshly published snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, kpis: GlobalKpis) -> Self {
        let mut movers: Vec<RankMove> = snapshot
            .items
            .iter()
            .filter(|item| item.rank_change() != 0)
            .map(|item| RankMove {
                item_id: item.item_id.clone(),
                rank: item.rank,
                rank_change: item.rank_change(),
            })
            .collect();
        movers.sort_by(|a, b| b.rank_change.abs().cmp(&a.rank_change.abs()));
        movers.truncate(TOP_MOVERS);

        Self {
            computed_at: snapshot.computed_at,
            item_count: snapshot.items.len(),
            pinned_count: snapshot.pinned_count(),
            kpis,
            top_movers: movers,
        }
    }
}
