//! Application configuration loaded once at startup from environment variables.
//!
//! Handlers and services receive this struct through `AppState`; nothing in
//! business logic reads the process environment directly.

use std::env;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Deployment mode. Controls only diagnostic verbosity (token previews in
/// debug logs); it never relaxes an auth check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment variables (non-sensitive) ---
    /// Server port
    pub port: u16,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// Deployment mode (APP_ENV)
    pub environment: Environment,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Base directory for the static data files (donem-*/..., anatomi.json, quotes.json)
    pub data_dir: String,
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Webhook of the external workflow engine that performs calendar sync.
    /// Optional: local setups without n8n skip the notification.
    pub n8n_webhook_url: Option<String>,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Shared secret authenticating machine-to-machine calls on /internal/*
    pub internal_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// AES-256-GCM key for refresh tokens at rest (exactly 32 bytes)
    pub token_encryption_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment,
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            n8n_webhook_url: env::var("N8N_WEBHOOK_URL").ok().map(|v| v.trim().to_string()),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            internal_api_key: env::var("INTERNAL_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("INTERNAL_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            token_encryption_key: decode_aes_key(
                &env::var("TOKEN_ENCRYPTION_KEY")
                    .map_err(|_| ConfigError::Missing("TOKEN_ENCRYPTION_KEY"))?,
            )?,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            environment: Environment::Development,
            database_url: "postgres://localhost/medsched_test".to_string(),
            data_dir: "data".to_string(),
            google_client_id: "test_client_id".to_string(),
            n8n_webhook_url: None,
            google_client_secret: "test_client_secret".to_string(),
            internal_api_key: "test_internal_api_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
            token_encryption_key: vec![0x42; 32],
        }
    }
}

/// Decode the base64 AES key and insist on exactly 32 bytes.
fn decode_aes_key(raw: &str) -> Result<Vec<u8>, ConfigError> {
    let key = BASE64
        .decode(raw.trim())
        .map_err(|e| ConfigError::Invalid("TOKEN_ENCRYPTION_KEY", e.to_string()))?;
    if key.len() != 32 {
        return Err(ConfigError::Invalid(
            "TOKEN_ENCRYPTION_KEY",
            format!("expected 32 bytes after base64 decode, got {}", key.len()),
        ));
    }
    Ok(key)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("DATABASE_URL", "postgres://localhost/medsched");
        env::set_var("GOOGLE_CLIENT_ID", "test_id");
        env::set_var("GOOGLE_CLIENT_SECRET", "test_secret");
        env::set_var("INTERNAL_API_KEY", "test_internal");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("OAUTH_STATE_KEY", "test_state_key");
        env::set_var(
            "TOKEN_ENCRYPTION_KEY",
            BASE64.encode([0x42u8; 32]),
        );

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.google_client_id, "test_id");
        assert_eq!(config.internal_api_key, "test_internal");
        assert_eq!(config.token_encryption_key.len(), 32);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_aes_key_length_enforced() {
        let short = BASE64.encode([0u8; 16]);
        assert!(matches!(
            decode_aes_key(&short),
            Err(ConfigError::Invalid("TOKEN_ENCRYPTION_KEY", _))
        ));

        let not_base64 = "!!!not-base64!!!";
        assert!(decode_aes_key(not_base64).is_err());
    }
}
