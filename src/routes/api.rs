// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! API routes for session-authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// User routes (require session authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/courses", get(list_courses))
        .route("/api/n8n/trigger", get(trigger_calendar_sync))
        .route("/api/reset-onboarding", post(reset_onboarding))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub onboarding_completed: bool,
    pub program_group: Option<String>,
    pub anatomy_group: Option<String>,
    pub include_cafeteria: bool,
    pub class_year: Option<i32>,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state.db.get_user(user.user_id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("User {} not found", user.user_id))
    })?;

    Ok(Json(UserResponse {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        role: profile.role.as_str().to_string(),
        onboarding_completed: profile.onboarding_completed,
        program_group: profile.program_group,
        anatomy_group: profile.anatomy_group,
        include_cafeteria: profile.include_cafeteria,
        class_year: profile.class_year,
    }))
}

// ─── Course Catalog ──────────────────────────────────────────

/// Course catalog for the onboarding picker.
async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<crate::models::Course>>> {
    Ok(Json(state.db.list_courses().await?))
}

// ─── Calendar Sync Trigger ───────────────────────────────────

/// Response for the calendar-sync trigger.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub user_email: String,
    pub has_refresh_token: bool,
}

/// Ask the workflow engine to synchronize this user's calendar.
///
/// The engine later calls back on `/internal/get-token` with the shared
/// API key to obtain the decrypted refresh token it needs.
async fn trigger_calendar_sync(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TriggerResponse>> {
    let profile = state.db.get_user(user.user_id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("User {} not found", user.user_id))
    })?;

    let has_refresh_token = state.credentials.has_refresh_token(profile.id).await?;

    let notified = state
        .workflow
        .notify_calendar_sync(profile.id, &profile.email)
        .await?;

    tracing::info!(
        user_id = %profile.id,
        has_refresh_token,
        notified,
        "Calendar sync trigger requested"
    );

    Ok(Json(TriggerResponse {
        success: true,
        user_id: profile.id,
        user_email: profile.email,
        has_refresh_token,
    }))
}

// ─── Onboarding Reset ────────────────────────────────────────

/// Response for the onboarding reset.
#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
}

/// Reset the calling user's onboarding state.
///
/// Subscriptions are deleted and the profile fields cleared in a single
/// transaction; the caller only ever observes both effects or neither.
async fn reset_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ResetResponse>> {
    state.db.reset_onboarding(user.user_id).await?;

    Ok(Json(ResetResponse { success: true }))
}
