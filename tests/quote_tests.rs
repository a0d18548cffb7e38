// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Random-quote endpoint tests.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_quote_index_always_within_bounds() {
    let (_, state) = common::create_test_app();
    let auth = format!("Bearer {}", state.config.internal_api_key);

    for _ in 0..25 {
        // Router is consumed by oneshot; rebuild per request.
        let (app, _) = common::create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/internal/random-quote")
                    .header(header::AUTHORIZATION, &auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let total = body["total"].as_u64().unwrap();
        let index = body["index"].as_u64().unwrap();

        assert_eq!(total, 3, "sample quotes.json has three entries");
        assert!(index < total);
        assert!(body["text"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["generatedAt"].as_str().is_some());
    }
}
