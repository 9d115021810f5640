//! Shared helpers for canvass-api integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use canvass_api::channels::DeliveryChannel;
use canvass_api::{build_router, AppState};
use canvass_common::config::Config;
use canvass_common::events::EventBus;
use canvass_common::models::{Question, QuestionKind};

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Test configuration: admin auth on, no delivery credentials
pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        database_path: ":memory:".into(),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        telegram: None,
    }
}

/// In-memory database with the schema applied
///
/// Single connection: each pooled connection would otherwise get its own
/// private in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    canvass_common::db::create_tables(&pool).await.unwrap();
    pool
}

/// Build the real router over the given pool, bus, and delivery channel
pub fn test_app_with(
    pool: SqlitePool,
    events: EventBus,
    delivery: Option<Arc<dyn DeliveryChannel>>,
) -> Router {
    build_router(AppState::new(pool, Arc::new(test_config()), events, delivery))
}

/// Router plus pool with default bus and no delivery channel
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = memory_pool().await;
    let app = test_app_with(pool.clone(), EventBus::default(), None);
    (app, pool)
}

/// Two-question survey used across tests
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            text: "Q1".to_string(),
            kind: QuestionKind::Text,
            options: vec![],
        },
        Question {
            text: "Q2".to_string(),
            kind: QuestionKind::Choice,
            options: vec!["yes".to_string(), "no".to_string()],
        },
    ]
}

/// JSON request without credentials
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// JSON request with the admin bearer token
pub fn admin_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Bodyless request with the admin bearer token
pub fn admin_request_empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Error code from the standard error envelope
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("")
}
