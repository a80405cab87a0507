use axum::{
    Json,
    extract::{Extension, Query},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::sink::{AuditRecord, MemoryAuditSink};

#[derive(Debug, Deserialize)]
pub struct AuditParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub count: usize,
    pub records: Vec<AuditRecord>,
}

pub async fn handle_audit_log(
    Extension(audit): Extension<Arc<MemoryAuditSink>>,
    Query(params): Query<AuditParams>,
) -> Json<AuditResponse> {
    let records = audit.recent(params.limit.unwrap_or(100));
    Json(AuditResponse {
        count: records.len(),
        records,
    })
}
