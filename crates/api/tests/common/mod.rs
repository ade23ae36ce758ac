#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderName, Method, Request};
use axum::response::Response;
use axum::Router;
use dialplan_api::config::{ApiKeyConfig, DatabaseConfig, LogFormat, MiConfig, ServerConfig};
use dialplan_api::router::build_app_router;
use dialplan_api::state::AppState;
use dialplan_mi::{MiExecutor, MiResponse};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgConnectOptions;
use sqlx::PgPool;
use tower::ServiceExt;

/// API key accepted by [`test_config`].
pub const API_KEY: &str = "test-api-key";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        app_name: "custom-dialplan".to_string(),
        environment: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        api_prefix: "/api/v1".to_string(),
        log_level: "debug".to_string(),
        log_format: LogFormat::Text,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        auth: ApiKeyConfig {
            api_key: API_KEY.to_string(),
            header_name: HeaderName::from_static("x-api-key"),
            protect_health: false,
        },
        database: DatabaseConfig {
            options: PgConnectOptions::new_without_pgpass(),
            pool_size: 5,
        },
        mi: MiConfig {
            host: "127.0.0.1".to_string(),
            port: 8989,
            timeout: Duration::from_secs(5),
        },
    }
}

/// MI double that records every command and answers with a fixed success
/// envelope.
#[derive(Default)]
pub struct RecordingMi {
    calls: Mutex<Vec<String>>,
}

impl RecordingMi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MiExecutor for RecordingMi {
    async fn execute(&self, command: &str) -> MiResponse {
        self.calls.lock().unwrap().push(command.to_string());
        serde_json::from_value(json!({"jsonrpc": "2.0", "result": "OK", "id": "1"})).unwrap()
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool, mi: Arc<RecordingMi>) -> Router {
    build_test_app_with(pool, mi, test_config())
}

pub fn build_test_app_with(pool: PgPool, mi: Arc<RecordingMi>, config: ServerConfig) -> Router {
    let config = Arc::new(config);
    let state = AppState::new(pool, Arc::clone(&config), mi);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers (all carry the test API key)
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-api-key", API_KEY)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete, valid rule entry as the API expects it.
pub fn entry_json(dpid: i32, pr: i32, match_exp: &str) -> Value {
    json!({
        "dpid": dpid,
        "pr": pr,
        "match_op": 0,
        "match_exp": match_exp,
    })
}
