// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Shared-secret gate tests for the /internal/* machine-to-machine routes.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_internal_route_without_bearer() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get("/internal/random-quote", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_internal_route_with_wrong_secret() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get("/internal/random-quote", Some("Bearer wrong_secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_jwt_does_not_open_internal_routes() {
    let (app, state) = common::create_test_app();
    let jwt = common::create_test_jwt(Uuid::new_v4(), "ADMIN", &state.config.jwt_signing_key);

    // A session token, even an admin's, is not the machine secret.
    let response = app
        .oneshot(get(
            "/internal/random-quote",
            Some(&format!("Bearer {}", jwt)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_internal_route_with_correct_secret() {
    let (app, state) = common::create_test_app();
    let auth = format!("Bearer {}", state.config.internal_api_key);

    let response = app
        .oneshot(get("/internal/random-quote", Some(&auth)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_token_missing_user_id() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/internal/get-token")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", state.config.internal_api_key),
                )
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_token_invalid_user_id() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/internal/get-token")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", state.config.internal_api_key),
                )
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"userId": "not-a-uuid"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_get_token_rejected_without_secret_before_lookup() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/internal/get-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"userId": "{}"}}"#,
                    Uuid::new_v4()
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    // 401, not 500: the gate fired before the credential lookup, which
    // would have errored against the offline mock database.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
