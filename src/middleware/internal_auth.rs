// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Shared-secret authentication middleware for machine-to-machine calls.
//!
//! The external workflow engine authenticates to `/internal/*` with a
//! static bearer secret. Comparison is constant-time; the check is binary
//! pass/fail with no partial trust level.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Require the internal API key on `/internal/*` routes.
pub async fn require_internal_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(provided) = provided else {
        tracing::warn!(path = %request.uri().path(), "Blocked internal request without bearer token");
        return Err(AppError::Unauthorized);
    };

    if !key_matches(provided.as_bytes(), state.config.internal_api_key.as_bytes()) {
        tracing::warn!(path = %request.uri().path(), "Blocked internal request with invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Constant-time equality with a guard against an empty configured key.
fn key_matches(provided: &[u8], expected: &[u8]) -> bool {
    if expected.is_empty() {
        return false;
    }
    bool::from(provided.ct_eq(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_exact_only() {
        assert!(key_matches(b"secret", b"secret"));
        assert!(!key_matches(b"secret ", b"secret"));
        assert!(!key_matches(b"Secret", b"secret"));
        assert!(!key_matches(b"", b"secret"));
        assert!(!key_matches(b"secre", b"secret"));
    }

    #[test]
    fn test_empty_configured_key_rejects_everything() {
        assert!(!key_matches(b"", b""));
        assert!(!key_matches(b"anything", b""));
    }
}
