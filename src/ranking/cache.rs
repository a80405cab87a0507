//! Rank Cache
//!
//! Holds the last-published snapshot behind a single `RwLock`, so a publish is
//! all-or-nothing: readers see the old snapshot until the swap completes and
//! the new one from then on, never a partially-applied overlay. Snapshots are
//! handed out as `Arc`s; a reader keeps a consistent view even while the next
//! publish lands.
//!
//! Only the scheduler publishes (single-writer discipline), which is what
//! makes `computed_at` monotonic across publishes without cache-side version
//! checks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::{ScoredItem, Snapshot};

#[derive(Default)]
struct CacheInner {
    current: Option<Arc<Snapshot>>,
    previous_ranks: HashMap<String, u32>,
}

pub struct RankCache {
    inner: RwLock<CacheInner>,
}

impl RankCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Atomically replaces the current snapshot, retaining the replaced
    /// snapshot's ranks for delta lookups.
    pub async fn publish(&self, snapshot: Snapshot) {
        let mut inner = self.inner.write().await;
        if let Some(old) = inner.current.take() {
            inner.previous_ranks = old
                .items
                .iter()
                .map(|item| (item.item_id.clone(), item.rank))
                .collect();
        }
        inner.current = Some(Arc::new(snapshot));
    }

    /// The current snapshot, or `None` before the first successful recompute.
    pub async fn read(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().await.current.clone()
    }

    /// One item's entry in the current snapshot.
    pub async fn get_item(&self, item_id: &str) -> Option<ScoredItem> {
        let inner = self.inner.read().await;
        inner
            .current
            .as_ref()?
            .items
            .iter()
            .find(|item| item.item_id == item_id)
            .cloned()
    }

    /// Ranks of the current snapshot. This is the map the *next* recompute
    /// stamps as `previous_rank`, so consecutive snapshots always delta
    /// against each other.
    pub async fn latest_ranks(&self) -> HashMap<String, u32> {
        let inner = self.inner.read().await;
        match &inner.current {
            Some(snapshot) => snapshot
                .items
                .iter()
                .map(|item| (item.item_id.clone(), item.rank))
                .collect(),
            None => HashMap::new(),
        }
    }

    /// Ranks of the snapshot immediately prior to the current one. Always
    /// equals the map the current snapshot's `previous_rank`s were stamped
    /// from.
    pub async fn previous_ranks(&self) -> HashMap<String, u32> {
        self.inner.read().await.previous_ranks.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.inner.read().await.current.is_some()
    }
}

impl Default for RankCache {
    fn default() -> Self {
        Self::new()
    }
}
