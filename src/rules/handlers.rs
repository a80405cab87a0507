use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audit::sink::{AuditRecord, AuditSink};
use crate::catalog::store::CatalogStore;
use crate::catalog::types::now_ms;
use crate::scheduler::service::Scheduler;
use crate::scheduler::types::TriggerReason;

use super::store::RuleStore;
use super::types::{Rule, RuleId, RuleKind, RuleScope};

#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub scope: RuleScope,
    pub kind: RuleKind,
    pub strength: Option<f64>,
    /// Seconds until the rule expires; omitted means it never does.
    pub ttl_secs: Option<u64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRuleResponse {
    pub rule: Option<Rule>,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteRuleResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ListRulesResponse {
    pub count: usize,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
pub struct PinItemRequest {
    pub item_id: String,
    pub ttl_secs: Option<u64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BoostCategoryRequest {
    pub category: String,
    pub strength: Option<f64>,
    pub ttl_secs: Option<u64>,
    pub created_by: Option<String>,
}

fn expiry_from_ttl(ttl_secs: Option<u64>) -> Option<u64> {
    ttl_secs.map(|secs| now_ms() + secs * 1000)
}

fn scope_label(scope: &RuleScope) -> String {
    match scope {
        RuleScope::Item { item_id } => format!("item {}", item_id),
        RuleScope::Category { category } => format!("category {}", category),
    }
}

fn create_and_audit(
    rules: &RuleStore,
    audit: &dyn AuditSink,
    scheduler: &Scheduler,
    scope: RuleScope,
    kind: RuleKind,
    strength: f64,
    expires_at: Option<u64>,
    created_by: &str,
) -> Rule {
    let rule = rules.create(scope, kind, strength, expires_at, created_by);

    audit.record(AuditRecord::new(
        "rule_created",
        "rule",
        Some(rule.id.0.clone()),
        format!("{:?} on {}", rule.kind, scope_label(&rule.scope)),
        created_by,
    ));

    scheduler.request_recompute(TriggerReason::RuleChange);
    rule
}

pub async fn handle_create_rule(
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(audit): Extension<Arc<dyn AuditSink>>,
    Json(req): Json<CreateRuleRequest>,
) -> (StatusCode, Json<CreateRuleResponse>) {
    let strength = req.strength.unwrap_or(1.0);

    // Boost multiplies and demote divides, so anything non-positive is nonsense
    if matches!(req.kind, RuleKind::Boost | RuleKind::Demote)
        && (!strength.is_finite() || strength <= 0.0)
    {
        tracing::warn!("Rejected {:?} rule with strength {}", req.kind, strength);
        return (
            StatusCode::BAD_REQUEST,
            Json(CreateRuleResponse {
                rule: None,
                success: false,
            }),
        );
    }

    let rule = create_and_audit(
        &rules,
        audit.as_ref(),
        &scheduler,
        req.scope,
        req.kind,
        strength,
        expiry_from_ttl(req.ttl_secs),
        req.created_by.as_deref().unwrap_or("operator"),
    );

    (
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            rule: Some(rule),
            success: true,
        }),
    )
}

pub async fn handle_delete_rule(
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(audit): Extension<Arc<dyn AuditSink>>,
    Path(rule_id): Path<String>,
) -> (StatusCode, Json<DeleteRuleResponse>) {
    match rules.delete(&RuleId(rule_id.clone())) {
        Some(rule) => {
            audit.record(AuditRecord::new(
                "rule_deleted",
                "rule",
                Some(rule.id.0.clone()),
                format!("{:?} on {}", rule.kind, scope_label(&rule.scope)),
                "operator",
            ));
            scheduler.request_recompute(TriggerReason::RuleChange);
            (StatusCode::OK, Json(DeleteRuleResponse { success: true }))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(DeleteRuleResponse { success: false }),
        ),
    }
}

pub async fn handle_list_rules(
    Extension(rules): Extension<Arc<RuleStore>>,
) -> Json<ListRulesResponse> {
    let rules = rules.list_active(now_ms());
    Json(ListRulesResponse {
        count: rules.len(),
        rules,
    })
}

/// Shortcut: pin one item to the top of the list.
pub async fn handle_pin_item(
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(audit): Extension<Arc<dyn AuditSink>>,
    Json(req): Json<PinItemRequest>,
) -> (StatusCode, Json<CreateRuleResponse>) {
    if catalog.get(&req.item_id).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(CreateRuleResponse {
                rule: None,
                success: false,
            }),
        );
    }

    let rule = create_and_audit(
        &rules,
        audit.as_ref(),
        &scheduler,
        RuleScope::Item {
            item_id: req.item_id,
        },
        RuleKind::Pin,
        1.0,
        expiry_from_ttl(req.ttl_secs),
        req.created_by.as_deref().unwrap_or("operator"),
    );

    (
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            rule: Some(rule),
            success: true,
        }),
    )
}

/// Shortcut: boost every item in a category with a single category-scoped rule.
pub async fn handle_boost_category(
    Extension(rules): Extension<Arc<RuleStore>>,
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Extension(audit): Extension<Arc<dyn AuditSink>>,
    Json(req): Json<BoostCategoryRequest>,
) -> (StatusCode, Json<CreateRuleResponse>) {
    let strength = req.strength.unwrap_or(1.5);
    if !strength.is_finite() || strength <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(CreateRuleResponse {
                rule: None,
                success: false,
            }),
        );
    }

    let rule = create_and_audit(
        &rules,
        audit.as_ref(),
        &scheduler,
        RuleScope::Category {
            category: req.category,
        },
        RuleKind::Boost,
        strength,
        expiry_from_ttl(req.ttl_secs),
        req.created_by.as_deref().unwrap_or("operator"),
    );

    (
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            rule: Some(rule),
            success: true,
        }),
    )
}
