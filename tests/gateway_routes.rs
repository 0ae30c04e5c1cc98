//! Gateway Route Tests
//!
//! Router-level checks that need no database: health, method dispatch,
//! and batch-validation responses that reject before execution.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use sqlgate::http_server::{GatewayState, HttpServer, HttpServerConfig};

fn test_router() -> axum::Router {
    let pool = PgPool::connect_lazy("postgres://postgres@localhost/postgres")
        .expect("lazy pool never connects eagerly");
    let state = Arc::new(GatewayState::new(pool));
    HttpServer::with_config(HttpServerConfig::default(), state).router()
}

#[tokio::test]
async fn test_health_returns_ok() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_empty_batch_is_a_client_error() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("[]"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_of_invalid_entries_is_a_client_error() {
    // table_name missing in every entry: rejected before any execution
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"[{"columns": ["name"], "params": ["x"]}]"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("table_name is required"));
}

#[tokio::test]
async fn test_malformed_json_body_is_rejected() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/read")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
