// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Medsched: course-schedule sync backend for medical-faculty students.
//!
//! This crate provides the API that stores course selections and
//! onboarding preferences and hands encrypted Google credentials to the
//! external workflow engine that performs the calendar synchronization.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{
    AuditRecorder, CredentialService, DataFileService, GoogleClient, QuoteService, WorkflowClient,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub data_files: DataFileService,
    pub quotes: QuoteService,
    pub credentials: CredentialService,
    pub google: GoogleClient,
    pub workflow: WorkflowClient,
    pub audit: AuditRecorder,
}
