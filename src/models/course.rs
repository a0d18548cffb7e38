// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Course catalog and per-user subscriptions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry. Seeded once; read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// Join row linking a user to a course they selected during onboarding.
///
/// Created by the onboarding flow, deleted en masse by the onboarding
/// reset, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseSubscription {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub add_to_calendar: bool,
    pub notifications_enabled: bool,
}
