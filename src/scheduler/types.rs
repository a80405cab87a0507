use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a recompute was requested. Carried through to logs and the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// The fixed-cadence timer fired.
    Periodic,
    /// Operator hit the trigger endpoint.
    Manual,
    /// Stock moved (purchase or other inventory event).
    InventoryChange,
    /// A rule was created or deleted.
    RuleChange,
    /// A price what-if ran.
    PriceSimulation,
    /// An item was created or updated.
    CatalogSync,
    /// The demo traffic generator produced an event.
    SyntheticEvent,
}

impl TriggerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerReason::Periodic => "periodic",
            TriggerReason::Manual => "manual",
            TriggerReason::InventoryChange => "inventory_change",
            TriggerReason::RuleChange => "rule_change",
            TriggerReason::PriceSimulation => "price_simulation",
            TriggerReason::CatalogSync => "catalog_sync",
            TriggerReason::SyntheticEvent => "synthetic_event",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "periodic" => Some(TriggerReason::Periodic),
            "manual" => Some(TriggerReason::Manual),
            "inventory_change" => Some(TriggerReason::InventoryChange),
            "rule_change" => Some(TriggerReason::RuleChange),
            "price_simulation" => Some(TriggerReason::PriceSimulation),
            "catalog_sync" => Some(TriggerReason::CatalogSync),
            "synthetic_event" => Some(TriggerReason::SyntheticEvent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Fixed recompute cadence.
    pub interval: Duration,
    /// Deadline for one scorer batch call; exceeding it fails the run.
    pub scorer_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            scorer_timeout: Duration::from_secs(5),
        }
    }
}

/// Point-in-time scheduler counters for the health endpoint and tests.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStats {
    pub runs_completed: u64,
    pub runs_failed: u64,
    /// Timestamp (ms) of the last successful recompute, if any.
    pub last_success_at: Option<u64>,
    /// Whether a recompute is in flight right now.
    pub running: bool,
    pub last_error: Option<String>,
}
