// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Middleware modules (authentication, security, etc.).

pub mod auth;
pub mod internal_auth;
pub mod security;

pub use auth::{require_admin, require_auth};
pub use internal_auth::require_internal_auth;
