use serde::Serialize;
use std::collections::VecDeque;
use std::sync::RwLock;

use crate::catalog::types::{now_ms, rfc3339};

/// One audited action.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Timestamp (ms) the record was created.
    pub timestamp: u64,
    /// RFC 3339 rendering of `timestamp` for consumers.
    pub recorded_at: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: String,
    pub actor: String,
}

impl AuditRecord {
    pub fn new(
        action: &str,
        entity_type: &str,
        entity_id: Option<String>,
        details: String,
        actor: &str,
    ) -> Self {
        let timestamp = now_ms();
        Self {
            timestamp,
            recorded_at: rfc3339(timestamp),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            details,
            actor: actor.to_string(),
        }
    }
}

/// Destination for audit records. Implementations must not block the caller;
/// the recompute path records inline.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// Bounded in-memory audit trail, newest records first on read.
pub struct MemoryAuditSink {
    records: RwLock<VecDeque<AuditRecord>>,
    capacity: usize,
}

impl MemoryAuditSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<AuditRecord> {
        let records = self.records.read().unwrap();
        records.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: AuditRecord) {
        let mut records = self.records.write().unwrap();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}
