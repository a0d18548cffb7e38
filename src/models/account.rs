// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Linked OAuth provider account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credential record for one (user, provider) pair.
///
/// The refresh token is stored only in encrypted form; plaintext exists
/// transiently in memory after decryption and is never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub user_id: Uuid,
    pub provider: String,
    /// base64(nonce || ciphertext || tag), AES-256-GCM
    pub refresh_token_encrypted: Option<String>,
    pub created_at: DateTime<Utc>,
}
