// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Client for the external workflow engine (n8n) that performs the
//! Google Calendar synchronization.

use crate::error::AppError;
use uuid::Uuid;

/// Notifies the workflow engine's webhook when a user requests a sync.
#[derive(Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl WorkflowClient {
    /// Create a client. `webhook_url` is optional: local setups without
    /// the workflow engine skip the notification.
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Tell the workflow engine to start a calendar sync for a user.
    ///
    /// Returns `true` when a webhook was actually called. The engine calls
    /// back on /internal/* with the shared API key to fetch what it needs.
    pub async fn notify_calendar_sync(&self, user_id: Uuid, email: &str) -> Result<bool, AppError> {
        let Some(url) = &self.webhook_url else {
            tracing::debug!(user_id = %user_id, "No workflow webhook configured, skipping");
            return Ok(false);
        };

        let body = serde_json::json!({
            "userId": user_id,
            "userEmail": email,
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Workflow(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Workflow(format!(
                "Webhook returned HTTP {}",
                response.status()
            )));
        }

        tracing::info!(user_id = %user_id, "Workflow engine notified");
        Ok(true)
    }
}
