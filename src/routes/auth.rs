// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Google OAuth authentication routes.
//!
//! The callback is also the credential-write side of the token store: a
//! granted refresh token is encrypted and stored on the user's google
//! account row before the session is issued.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::create_session_jwt;
use crate::AppState;

use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Calendar scope is requested up front so the stored refresh token can
/// drive the sync workflow later.
const OAUTH_SCOPE: &str = "openid email profile https://www.googleapis.com/auth/calendar";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Google authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    // Get the frontend URL from query param or fall back to config
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    // Encode frontend URL + timestamp in state
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Create the data payload: "frontend_url|timestamp_hex"
    let state_payload = format!("{}|{:x}", frontend_url, timestamp);

    // Sign the payload
    let mut mac = HmacSha256::new_from_slice(&state.config.oauth_state_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // Combine payload + signature: "payload|signature_hex", then base64
    // encode the whole thing for the URL
    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));
    let oauth_state = URL_SAFE_NO_PAD.encode(signed_state.as_bytes());

    let callback_url = format!("{}/auth/google/callback", service_url(&headers));

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
        GOOGLE_AUTH_URL,
        state.config.google_client_id,
        urlencoding::encode(&callback_url),
        urlencoding::encode(OAUTH_SCOPE),
        oauth_state
    );

    tracing::info!(
        client_id = %state.config.google_client_id,
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    code: String,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, store credentials, create session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    // Decode and verify frontend URL from state parameter
    let frontend_url = verify_and_decode_state(&params.state, &state.config.oauth_state_key)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Check for OAuth errors
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        let redirect = format!("{}?error={}", frontend_url, error);
        return Ok(Redirect::temporary(&redirect));
    }

    tracing::info!("Exchanging authorization code for tokens");

    let callback_url = format!("{}/auth/google/callback", service_url(&headers));
    let tokens = state.google.exchange_code(&params.code, &callback_url).await?;
    let userinfo = state.google.fetch_userinfo(&tokens.access_token).await?;

    let user = state
        .db
        .upsert_login_user(&userinfo.email, userinfo.name.as_deref())
        .await?;

    // Store the refresh token encrypted. Google only returns one on the
    // consent grant; a re-login without a new grant keeps the stored one.
    if let Some(refresh_token) = &tokens.refresh_token {
        state
            .credentials
            .store_refresh_token(user.id, refresh_token)
            .await?;
    } else {
        tracing::debug!(user_id = %user.id, "No refresh token in token response, keeping stored one");
    }

    tracing::info!(user_id = %user.id, "OAuth successful, user and credentials stored");

    // Create JWT session token
    let jwt = create_session_jwt(&user, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    // Redirect to frontend with token
    let redirect_url = format!("{}/callback?token={}", frontend_url, jwt);

    Ok(Redirect::temporary(&redirect_url))
}

/// Reconstruct this service's externally visible base URL from the Host header.
fn service_url(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}", scheme, host)
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

/// Logout - just a placeholder that clears client-side token.
async fn logout() -> Redirect {
    // The actual logout happens on client side by clearing the stored token
    Redirect::temporary("/")
}
