//! Demo Catalog Seeding & Synthetic Traffic
//!
//! When no real storefront is wired up, the service can seed a plausible
//! catalog at startup and emit a steady trickle of view/click/purchase events
//! against it, so rankings move and the dashboard has something to show.
//! Enabled with `--demo`; never started otherwise.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::audit::sink::{AuditRecord, AuditSink};
use crate::scheduler::service::Scheduler;
use crate::scheduler::types::TriggerReason;

use super::store::{CatalogStore, ItemUpsert};
use super::types::EventKind;

const EVENT_INTERVAL: Duration = Duration::from_secs(5);

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Apparel",
    "Home & Kitchen",
    "Beauty",
    "Sports",
    "Toys",
];

/// Seeds `count` synthetic items into the catalog. Idempotent per SKU.
pub fn seed_catalog(catalog: &CatalogStore, count: usize) {
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let category = CATEGORIES[i % CATEGORIES.len()];
        catalog.upsert(ItemUpsert {
            item_id: format!("sku-{:04}", i + 1),
            title: format!("Demo {} Product {}", category, i + 1),
            category: category.to_string(),
            price: rng.gen_range(99.0..4999.0_f64).round(),
            stock: rng.gen_range(5..200),
            avg_rating: Some((rng.gen_range(2.5..5.0_f64) * 10.0).round() / 10.0),
            rating_count: Some(rng.gen_range(0..2000)),
            helpful_votes: Some(rng.gen_range(0..500)),
        });
    }

    tracing::info!("Seeded {} demo items into the catalog", count);
}

/// Background service generating weighted random interaction events.
pub struct TrafficGenerator {
    catalog: Arc<CatalogStore>,
    scheduler: Arc<Scheduler>,
    audit: Arc<dyn AuditSink>,
}

impl TrafficGenerator {
    pub fn new(
        catalog: Arc<CatalogStore>,
        scheduler: Arc<Scheduler>,
        audit: Arc<dyn AuditSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            scheduler,
            audit,
        })
    }

    /// Spawns the generator loop and returns immediately.
    pub fn start(self: Arc<Self>) {
        tracing::info!("Starting synthetic traffic generator");

        tokio::spawn(async move {
            self.generator_loop().await;
        });
    }

    async fn generator_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(EVENT_INTERVAL);

        loop {
            interval.tick().await;

            let items = self.catalog.list_active_items();
            if items.is_empty() {
                tracing::warn!("No active items for synthetic traffic");
                continue;
            }

            // Views are more common than clicks, clicks than purchases
            let (item, kind, quantity) = {
                let mut rng = rand::thread_rng();
                let item = items[rng.gen_range(0..items.len())].clone();
                let kind = match rng.gen_range(0..6) {
                    0..=2 => EventKind::View,
                    3..=4 => EventKind::Click,
                    _ => EventKind::Purchase,
                };
                let quantity = if kind == EventKind::Purchase {
                    rng.gen_range(1..=3)
                } else {
                    1
                };
                (item, kind, quantity)
            };

            if self
                .catalog
                .record_event(&item.item_id, kind, quantity, None)
                .is_none()
            {
                continue;
            }

            self.scheduler
                .request_recompute(TriggerReason::SyntheticEvent);

            self.audit.record(AuditRecord::new(
                "synthetic_event",
                "event",
                Some(item.item_id.clone()),
                format!("Generated {:?} x{} for {}", kind, quantity, item.item_id),
                "traffic_generator",
            ));

            tracing::debug!("Generated {:?} event for {}", kind, item.item_id);
        }
    }
}
