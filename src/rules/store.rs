//! Rule Storage
//!
//! Concurrent in-memory rule store. The backing structure is an unordered
//! `DashMap`, but `list_active` always returns rules in `(created_at, id)`
//! order so boost/demote composition is deterministic run to run.

use dashmap::DashMap;

use super::types::{Rule, RuleId, RuleKind, RuleScope};
use crate::catalog::types::now_ms;

pub struct RuleStore {
    rules: DashMap<RuleId, Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
        }
    }

    /// Creates and stores a new rule, returning the stored copy.
    ///
    /// `strength` is normalized to 1.0 for kinds that ignore it.
    pub fn create(
        &self,
        scope: RuleScope,
        kind: RuleKind,
        strength: f64,
        expires_at: Option<u64>,
        created_by: &str,
    ) -> Rule {
        let strength = match kind {
            RuleKind::Boost | RuleKind::Demote => strength,
            RuleKind::Pin | RuleKind::Remove => 1.0,
        };

        let rule = Rule {
            id: RuleId::new(),
            scope,
            kind,
            strength,
            expires_at,
            created_at: now_ms(),
            created_by: created_by.to_string(),
        };

        self.rules.insert(rule.id.clone(), rule.clone());
        tracing::info!("Created {:?} rule {} on {:?}", rule.kind, rule.id.0, rule.scope);

        rule
    }

    pub fn get(&self, id: &RuleId) -> Option<Rule> {
        self.rules.get(id).map(|entry| entry.clone())
    }

    /// Deletes a rule. Returns the removed rule if it existed.
    pub fn delete(&self, id: &RuleId) -> Option<Rule> {
        let removed = self.rules.remove(id).map(|(_, rule)| rule);
        if removed.is_some() {
            tracing::info!("Deleted rule {}", id.0);
        }
        removed
    }

    /// Active (non-expired) rules in rule-list order: `(created_at, id)`
    /// ascending. This is the order the engine composes boosts/demotes in.
    pub fn list_active(&self, now: u64) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self
            .rules
            .iter()
            .filter(|entry| entry.value().is_active(now))
            .map(|entry| entry.value().clone())
            .collect();
        rules.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        rules
    }

    /// Total stored rules, expired ones included.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
