// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Credential store access: provider-qualified lookup of the encrypted
//! Google refresh token plus on-demand decryption.

use crate::db::{providers, Db};
use crate::error::AppError;
use crate::services::token_crypto::TokenCipher;
use uuid::Uuid;

/// Service mediating all access to stored OAuth refresh tokens.
#[derive(Clone)]
pub struct CredentialService {
    db: Db,
    cipher: TokenCipher,
}

impl CredentialService {
    pub fn new(db: Db, cipher: TokenCipher) -> Self {
        Self { db, cipher }
    }

    /// Fetch and decrypt the Google refresh token for a user.
    ///
    /// The lookup is always qualified by provider; a user with several
    /// linked providers never gets an arbitrary first match. The decrypted
    /// value is returned to the caller and nowhere else — it is never
    /// logged here.
    pub async fn fetch_refresh_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let account = self
            .db
            .get_account(user_id, providers::GOOGLE)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No google account linked for user {}", user_id))
            })?;

        let encrypted = account.refresh_token_encrypted.ok_or_else(|| {
            AppError::NotFound(format!("No refresh token stored for user {}", user_id))
        })?;

        let aad = TokenCipher::user_aad(user_id);
        Ok(self.cipher.decrypt(&encrypted, aad.as_bytes())?)
    }

    /// Encrypt and store a refresh token obtained from the OAuth callback.
    pub async fn store_refresh_token(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        let aad = TokenCipher::user_aad(user_id);
        let encrypted = self.cipher.encrypt(refresh_token, aad.as_bytes())?;
        self.db
            .upsert_account(user_id, providers::GOOGLE, &encrypted)
            .await?;

        tracing::info!(user_id = %user_id, "Stored encrypted refresh token");
        Ok(())
    }

    /// Whether a stored refresh token exists, without decrypting it.
    pub async fn has_refresh_token(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .db
            .get_account(user_id, providers::GOOGLE)
            .await?
            .map(|a| a.refresh_token_encrypted.is_some())
            .unwrap_or(false))
    }
}
