// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Medsched API Server
//!
//! Stores course selections and onboarding preferences for
//! medical-faculty students and feeds the external workflow engine that
//! synchronizes them to Google Calendar.

use medsched::{
    config::Config,
    db::Db,
    services::{
        spawn_audit_writer, AuditRecorder, CredentialService, DataFileService, GoogleClient,
        QuoteService, TokenCipher, WorkflowClient,
    },
    AppState,
};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Medsched API");

    // Initialize PostgreSQL and apply pending migrations
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    db.run_migrations()
        .await
        .expect("Failed to apply database migrations");

    // Static data files (term schedules, anatomy groups, quotes)
    let data_dir = Path::new(&config.data_dir);
    let data_files = DataFileService::new(data_dir);
    tracing::info!(path = %data_dir.display(), "Data file service initialized");

    let quotes_path = data_dir.join("quotes.json");
    let quotes = if quotes_path.is_file() {
        QuoteService::load_from_file(&quotes_path).expect("Failed to load quotes file")
    } else {
        tracing::warn!(path = %quotes_path.display(), "Quotes file missing, endpoint will 404");
        QuoteService::default()
    };

    // Credential store access (encrypted refresh tokens)
    let cipher = TokenCipher::new(&config.token_encryption_key)
        .expect("Failed to initialize token cipher");
    let credentials = CredentialService::new(db.clone(), cipher);
    tracing::info!("Credential service initialized");

    // External collaborators
    let google = GoogleClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );
    let workflow = WorkflowClient::new(config.n8n_webhook_url.clone());

    // Audit recorder and its background writer
    let (audit, audit_rx) = AuditRecorder::new();
    let _audit_task = spawn_audit_writer(db.clone(), audit_rx);
    tracing::info!("Audit writer started");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        data_files,
        quotes,
        credentials,
        google,
        workflow,
        audit,
    });

    // Build router
    let app = medsched::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medsched=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
