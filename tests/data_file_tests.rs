// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Data file server tests against the bundled sample data directory.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn get_with_secret(uri: &str) -> axum::http::Response<axum::body::Body> {
    let (app, state) = common::create_test_app();
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", state.config.internal_api_key),
            )
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: axum::http::Response<axum::body::Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_existing_file_returns_content_and_path() {
    let response = get_with_secret("/internal/data-file?grade=1&type=schedule").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["path"], "donem-1/schedule.json");
    assert_eq!(body["metadata"]["grade"], "1");
    assert_eq!(body["metadata"]["type"], "schedule");
    assert_eq!(body["data"]["term"], "donem-1");
}

#[tokio::test]
async fn test_missing_file_returns_404_with_attempted_path() {
    // Grade 6 is valid but has no published files in the sample data.
    let response = get_with_secret("/internal/data-file?grade=6&type=schedule").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"], "not_found");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("donem-6/schedule.json"));
}

#[tokio::test]
async fn test_missing_grade_parameter() {
    let response = get_with_secret("/internal/data-file?type=schedule").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_type_parameter() {
    let response = get_with_secret("/internal/data-file?grade=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_type_rejected() {
    let response = get_with_secret("/internal/data-file?grade=1&type=menu").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_traversal_shaped_grade_rejected() {
    // Percent-encoded "../" — must be refused by the allow-list, never
    // composed into a path.
    let response = get_with_secret("/internal/data-file?grade=..%2F..%2Fetc&type=schedule").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_anatomi_json_served() {
    let response = get_with_secret("/internal/anatomi-json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["groups"].is_array());
}

#[tokio::test]
async fn test_anatomi_json_requires_secret() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/internal/anatomi-json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
