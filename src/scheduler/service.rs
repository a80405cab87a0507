//! Scheduler Service
//!
//! One background loop owns the entire recompute lifecycle. The loop is the
//! only writer to the RankCache, which is what makes the at-most-one-
//! concurrent-recompute invariant hold system-wide.
//!
//! ## Coalescing
//! `request_recompute` pushes the trigger reason into a pending list and
//! stores a single wakeup permit. The loop drains the whole list before each
//! run, so a burst of N triggers that lands while a run is in flight becomes
//! exactly one follow-up run carrying all N reasons. The periodic timer feeds
//! the same list; there is no separate queue.
//!
//! ## Snapshot-at-start semantics
//! Catalog, rules and prior ranks are read once at the top of a run. Rule or
//! catalog mutations that land mid-run are picked up by the next run, never
//! by the one already in flight.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::audit::sink::{AuditRecord, AuditSink};
use crate::broadcast::hub::BroadcastHub;
use crate::broadcast::types::RankingUpdate;
use crate::catalog::features::extract_features;
use crate::catalog::store::CatalogStore;
use crate::catalog::types::now_ms;
use crate::error::{RecomputeError, RecomputeResult};
use crate::ranking::cache::RankCache;
use crate::ranking::engine;
use crate::rules::store::RuleStore;
use crate::scoring::Scorer;

use super::types::{SchedulerConfig, SchedulerStats, TriggerReason};

pub struct Scheduler {
    catalog: Arc<CatalogStore>,
    rules: Arc<RuleStore>,
    scorer: Arc<dyn Scorer>,
    cache: Arc<RankCache>,
    hub: Arc<BroadcastHub>,
    audit: Arc<dyn AuditSink>,
    config: SchedulerConfig,

    /// Triggers accumulated since the last run started.
    pending: Mutex<Vec<TriggerReason>>,
    /// Single-permit wakeup for the run loop.
    wakeup: Notify,

    running: AtomicBool,
    runs_completed: AtomicU64,
    runs_failed: AtomicU64,
    /// 0 means no successful run yet.
    last_success_ms: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl Scheduler {
    pub fn new(
        catalog: Arc<CatalogStore>,
        rules: Arc<RuleStore>,
        scorer: Arc<dyn Scorer>,
        cache: Arc<RankCache>,
        hub: Arc<BroadcastHub>,
        audit: Arc<dyn AuditSink>,
        config: SchedulerConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            rules,
            scorer,
            cache,
            hub,
            audit,
            config,
            pending: Mutex::new(Vec::new()),
            wakeup: Notify::new(),
            running: AtomicBool::new(false),
            runs_completed: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            last_success_ms: AtomicU64::new(0),
            last_error: Mutex::new(None),
        })
    }

    /// Spawns the run loop and returns immediately. The first recompute runs
    /// right away (the interval's first tick is immediate), so a snapshot is
    /// available shortly after startup.
    pub fn start(self: Arc<Self>) {
        tracing::info!(
            "Starting scheduler (interval {:?}, scorer '{}')",
            self.config.interval,
            self.scorer.name()
        );

        tokio::spawn(async move {
            self.run_loop().await;
        });
    }

    /// Fire-and-forget recompute request. Coalesced: if a run is in flight,
    /// all requests received before it finishes fold into one follow-up run.
    pub fn request_recompute(&self, reason: TriggerReason) {
        self.lock_pending().push(reason);
        self.wakeup.notify_one();
        tracing::debug!("Recompute requested ({})", reason.as_str());
    }

    pub fn stats(&self) -> SchedulerStats {
        let last_success = self.last_success_ms.load(Ordering::SeqCst);
        SchedulerStats {
            runs_completed: self.runs_completed.load(Ordering::SeqCst),
            runs_failed: self.runs_failed.load(Ordering::SeqCst),
            last_success_at: (last_success > 0).then_some(last_success),
            running: self.running.load(Ordering::SeqCst),
            last_error: self.lock_last_error().clone(),
        }
    }

    /// Seconds since the last successful recompute. `None` until one succeeds.
    pub fn staleness_secs(&self) -> Option<u64> {
        let last_success = self.last_success_ms.load(Ordering::SeqCst);
        (last_success > 0).then(|| now_ms().saturating_sub(last_success) / 1000)
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    async fn run_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.lock_pending().push(TriggerReason::Periodic);
                }
                _ = self.wakeup.notified() => {}
            }

            let reasons = self.take_pending();
            if reasons.is_empty() {
                continue;
            }

            self.running.store(true, Ordering::SeqCst);
            match self.run_once(&reasons).await {
                Ok(item_count) => {
                    self.runs_completed.fetch_add(1, Ordering::SeqCst);
                    self.last_success_ms.store(now_ms(), Ordering::SeqCst);
                    *self.lock_last_error() = None;
                    tracing::debug!("Recompute published {} items", item_count);
                }
                Err(e) => {
                    self.runs_failed.fetch_add(1, Ordering::SeqCst);
                    *self.lock_last_error() = Some(e.to_string());
                    tracing::error!("Recompute failed, keeping last snapshot: {}", e);
                }
            }
            self.running.store(false, Ordering::SeqCst);
        }
    }

    /// Drains everything queued so far. Called exactly once per run, which is
    /// where the burst-of-N-becomes-one-run behavior comes from.
    fn take_pending(&self) -> Vec<TriggerReason> {
        std::mem::take(&mut *self.lock_pending())
    }

    /// One full recompute: read inputs, score, overlay rules, publish, notify.
    async fn run_once(&self, reasons: &[TriggerReason]) -> RecomputeResult<usize> {
        let started = Instant::now();
        let now = now_ms();

        let items = self.catalog.list_active_items();
        let rules = self.rules.list_active(now);
        let previous_ranks = self.cache.latest_ranks().await;

        let raw_scores: HashMap<String, f64> = if items.is_empty() {
            // Empty catalog yields an empty snapshot, not an error
            HashMap::new()
        } else {
            let features: Vec<_> = items
                .iter()
                .map(|item| extract_features(item, now))
                .collect();

            let scores = tokio::time::timeout(
                self.config.scorer_timeout,
                self.scorer.score(&features),
            )
            .await
            .map_err(|_| {
                RecomputeError::ScoringTimeout(self.config.scorer_timeout.as_millis() as u64)
            })??;

            if scores.len() != items.len() {
                return Err(RecomputeError::ScorerResponseInvalid(format!(
                    "expected {} scores, got {}",
                    items.len(),
                    scores.len()
                )));
            }

            items
                .iter()
                .zip(scores)
                .map(|(item, score)| (item.item_id.clone(), score))
                .collect()
        };

        let outcome = engine::recompute(&items, &raw_scores, &rules, &previous_ranks, now);

        if !outcome.missing_scores.is_empty() {
            tracing::warn!(
                "{} items excluded from snapshot, no usable raw score: {:?}",
                outcome.missing_scores.len(),
                outcome.missing_scores
            );
        }

        let item_count = outcome.snapshot.items.len();
        let update = RankingUpdate::from_snapshot(&outcome.snapshot, self.catalog.global_kpis(now));

        self.cache.publish(outcome.snapshot).await;
        let reached = self.hub.notify(update);

        let trigger_label = trigger_label(reasons);
        self.audit.record(AuditRecord::new(
            "recompute_completed",
            "snapshot",
            None,
            format!(
                "{} items ranked, {} missing scores, trigger: {}",
                item_count,
                outcome.missing_scores.len(),
                trigger_label
            ),
            "scheduler",
        ));

        tracing::info!(
            "Recompute complete: {} items in {:?}, trigger: {}, {} subscribers notified",
            item_count,
            started.elapsed(),
            trigger_label,
            reached
        );

        Ok(item_count)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<TriggerReason>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_last_error(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.last_error.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Deduplicated, order-preserving label like "manual+inventory_change".
fn trigger_label(reasons: &[TriggerReason]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for reason in reasons {
        let label = reason.as_str();
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen.join("+")
}
