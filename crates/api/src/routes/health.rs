use axum::extract::State;
use axum::http::HeaderMap;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::api_key::verify_api_key;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Configured service name (`APP_NAME`).
    pub service: String,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /healthz -- liveness probe.
///
/// Requires the API key only when `HEALTH_REQUIRES_AUTH` is enabled.
async fn healthz(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<HealthResponse>> {
    if state.config.auth.protect_health {
        verify_api_key(&headers, &state.config.auth)?;
    }

    Ok(Json(HealthResponse {
        status: "ok",
        service: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}
