// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

use medsched::config::Config;
use medsched::db::Db;
use medsched::routes::create_router;
use medsched::services::{
    AuditRecorder, CredentialService, DataFileService, GoogleClient, QuoteService, TokenCipher,
    WorkflowClient,
};
use medsched::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Db {
    Db::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let data_files = DataFileService::new(config.data_dir.clone());
    let quotes = QuoteService::load_from_file("data/quotes.json").expect("sample quotes");

    let cipher = TokenCipher::new(&config.token_encryption_key).expect("test cipher");
    let credentials = CredentialService::new(db.clone(), cipher);

    let google = GoogleClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );
    let workflow = WorkflowClient::new(None);

    let (audit, _audit_rx) = AuditRecorder::new();

    let state = Arc::new(AppState {
        config,
        db,
        data_files,
        quotes,
        credentials,
        google,
        workflow,
        audit,
    });

    (create_router(state.clone()), state)
}

/// Create a session JWT signed with the test config's key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: uuid::Uuid, role: &str, signing_key: &[u8]) -> String {
    create_test_jwt_with_exp(user_id, role, signing_key, 86400)
}

/// Create a session JWT with an expiry offset (may be negative for an
/// already-expired token).
#[allow(dead_code)]
pub fn create_test_jwt_with_exp(
    user_id: uuid::Uuid,
    role: &str,
    signing_key: &[u8],
    exp_offset_secs: i64,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        role: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (now + exp_offset_secs).max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}
