// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Google OAuth client for the login flow.
//!
//! Handles:
//! - Authorization-code exchange
//! - Userinfo lookup for the signed-in account

use crate::error::AppError;
use serde::Deserialize;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth API client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
    /// Present only when the user granted offline access (first consent
    /// or `prompt=consent`).
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Userinfo endpoint response (OpenID Connect).
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
}

impl GoogleClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokens, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token exchange request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Fetch the signed-in user's profile.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Userinfo request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("JSON parse error: {}", e)))
    }
}
