// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Append-only audit trail of privileged administrative actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable audit row. Never updated or deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: String,
    pub details: String,
    pub entity_id: Option<String>,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}
