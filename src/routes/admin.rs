// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Admin routes (require session auth + ADMIN role).

use crate::db::SystemStats;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// Admin routes. Both auth layers are applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/system-stats", get(system_stats))
        .route("/admin/audit-logs", get(audit_logs))
}

/// System statistics response.
#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: SystemStats,
    pub timestamp: String,
}

/// Row counts across the main tables.
async fn system_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let stats = state.db.system_stats().await?;

    // Audit after the primary read has succeeded; recording can never
    // fail this request.
    state.audit.record(
        &user,
        "system_stats_viewed",
        "Viewed system statistics",
        None,
    );

    Ok(Json(StatsResponse {
        success: true,
        data: stats,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Audit trail response.
#[derive(Serialize)]
pub struct AuditLogsResponse {
    pub success: bool,
    pub data: Vec<crate::models::AuditLog>,
}

const AUDIT_LOG_PAGE: i64 = 100;

/// Most recent audit rows, newest first.
async fn audit_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AuditLogsResponse>> {
    let logs = state.db.recent_audit_logs(AUDIT_LOG_PAGE).await?;

    state
        .audit
        .record(&user, "audit_logs_viewed", "Viewed audit trail", None);

    Ok(Json(AuditLogsResponse {
        success: true,
        data: logs,
    }))
}
