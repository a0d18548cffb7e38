// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Internal routes for the external workflow engine.
//!
//! These endpoints are called machine-to-machine with the shared API key,
//! never by browsers. The bearer check is applied in routes/mod.rs.

use crate::config::Environment;
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Internal machine-to-machine routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/internal/anatomi-json", get(anatomi_json))
        .route("/internal/data-file", get(data_file))
        .route("/internal/get-token", post(get_token))
        .route("/internal/random-quote", get(random_quote))
}

// ─── Anatomy Groups File ─────────────────────────────────────

/// Serve the fixed anatomy-groups file as parsed JSON.
async fn anatomi_json(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let file = state.data_files.load_fixed("anatomi.json")?;
    Ok(Json(file.value))
}

// ─── Term Data Files ─────────────────────────────────────────

#[derive(Deserialize)]
struct DataFileQuery {
    grade: Option<String>,
    #[serde(rename = "type")]
    file_type: Option<String>,
}

#[derive(Serialize)]
struct DataFileMetadata {
    grade: String,
    #[serde(rename = "type")]
    file_type: String,
    path: String,
}

#[derive(Serialize)]
struct DataFileResponse {
    success: bool,
    data: serde_json::Value,
    metadata: DataFileMetadata,
}

/// Serve a per-term data file selected by validated query parameters.
async fn data_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataFileQuery>,
) -> Result<Json<DataFileResponse>> {
    let grade = query
        .grade
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: grade".to_string()))?;
    let file_type = query
        .file_type
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: type".to_string()))?;

    let file = state.data_files.load(&grade, &file_type)?;

    Ok(Json(DataFileResponse {
        success: true,
        data: file.value,
        metadata: DataFileMetadata {
            grade,
            file_type,
            path: file.logical_path,
        },
    }))
}

// ─── Refresh Token Handout ───────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTokenRequest {
    user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetTokenResponse {
    decrypted_token: String,
}

/// Decrypt and hand out a user's Google refresh token.
///
/// Only the workflow engine reaches this handler (bearer gate in
/// routes/mod.rs). The plaintext goes into the response body and nowhere
/// else; logs carry at most a short preview, and only in development.
async fn get_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetTokenRequest>,
) -> Result<Json<GetTokenResponse>> {
    let raw_id = request
        .user_id
        .ok_or_else(|| AppError::BadRequest("Missing required field: userId".to_string()))?;

    let user_id: Uuid = raw_id
        .parse()
        .map_err(|_| AppError::BadRequest("userId must be a UUID".to_string()))?;

    let token = state.credentials.fetch_refresh_token(user_id).await?;

    if state.config.environment == Environment::Development {
        let preview: String = token.chars().take(8).collect();
        tracing::debug!(user_id = %user_id, token_preview = %preview, "Issued decrypted refresh token");
    } else {
        tracing::info!(user_id = %user_id, "Issued decrypted refresh token");
    }

    Ok(Json(GetTokenResponse {
        decrypted_token: token,
    }))
}

// ─── Random Quote ────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    id: u32,
    text: String,
    category: String,
    total: usize,
    index: usize,
    generated_at: String,
}

/// Serve a random motivational quote for workflow notifications.
async fn random_quote(State(state): State<Arc<AppState>>) -> Result<Json<QuoteResponse>> {
    let pick = state.quotes.pick()?;

    Ok(Json(QuoteResponse {
        id: pick.quote.id,
        text: pick.quote.text,
        category: pick.quote.category,
        total: pick.total,
        index: pick.index,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }))
}
