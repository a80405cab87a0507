use serde::{Deserialize, Serialize};

use crate::catalog::types::Item;

/// Unique identifier for a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a rule does to the items it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Rank the item above every non-pinned item.
    Pin,
    /// Multiply the adjusted score by `strength`.
    Boost,
    /// Divide the adjusted score by `strength`.
    Demote,
    /// Exclude the item from the ranked list entirely.
    Remove,
}

/// What a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleScope {
    Item { item_id: String },
    Category { category: String },
}

/// A single operator override.
///
/// `strength` is only meaningful for `Boost`/`Demote`; it is stored as 1.0
/// for `Pin`/`Remove`. `expires_at == None` means the rule never expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub scope: RuleScope,
    pub kind: RuleKind,
    pub strength: f64,
    pub expires_at: Option<u64>,
    pub created_at: u64,
    pub created_by: String,
}

impl Rule {
    /// An expired rule is treated as absent without requiring deletion.
    pub fn is_active(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match &self.scope {
            RuleScope::Item { item_id } => *item_id == item.item_id,
            RuleScope::Category { category } => *category == item.category,
        }
    }
}
