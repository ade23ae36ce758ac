//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, send, RecordingMi};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /healthz returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/schema")]
async fn healthz_returns_ok_with_service_and_version(pool: PgPool) {
    let app = common::build_test_app(pool, RecordingMi::new());
    let response = get(&app, "/api/v1/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "custom-dialplan");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// ---------------------------------------------------------------------------
// Test: health is public by default, protected when configured
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/schema")]
async fn healthz_is_public_by_default(pool: PgPool) {
    let app = common::build_test_app(pool, RecordingMi::new());
    let request = Request::builder()
        .uri("/api/v1/healthz")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn healthz_requires_key_when_configured(pool: PgPool) {
    let mut config = common::test_config();
    config.auth.protect_health = true;
    let app = common::build_test_app_with(pool, RecordingMi::new(), config);

    let request = Request::builder()
        .uri("/api/v1/healthz")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing API key");

    let response = get(&app, "/api/v1/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: Unknown route and unprefixed route return 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/schema")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool, RecordingMi::new());

    let response = get(&app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/healthz").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/schema")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool, RecordingMi::new());
    let response = get(&app, "/api/v1/healthz").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a UUID string (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight allows the API key header
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/schema")]
async fn cors_preflight_allows_api_key_header(pool: PgPool) {
    let app = common::build_test_app(pool, RecordingMi::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/dialplan/add")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "x-api-key")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header"),
        "*"
    );
    let allow_headers = headers
        .get("access-control-allow-headers")
        .expect("Missing Access-Control-Allow-Headers header")
        .to_str()
        .unwrap();
    assert!(
        allow_headers.contains("x-api-key"),
        "Allow-Headers should contain x-api-key, got: {allow_headers}"
    );
}
