//! Shared-secret API key extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use dialplan_core::error::CoreError;

use crate::config::ApiKeyConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured API key.
///
/// Add it as the first extractor of any handler that requires
/// authentication so the key is checked before the body is read:
///
/// ```ignore
/// async fn my_handler(_key: RequireApiKey, State(state): State<AppState>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify_api_key(&parts.headers, &state.config.auth)?;
        Ok(RequireApiKey)
    }
}

/// Check the configured header against the shared secret.
///
/// An absent or empty header is "missing"; any other value that is not an
/// exact match is "invalid".
pub fn verify_api_key(headers: &HeaderMap, auth: &ApiKeyConfig) -> Result<(), CoreError> {
    let value = match headers.get(&auth.header_name) {
        None => return Err(CoreError::Unauthorized("Missing API key".into())),
        Some(v) if v.is_empty() => return Err(CoreError::Unauthorized("Missing API key".into())),
        Some(v) => v,
    };

    if value.as_bytes() != auth.api_key.as_bytes() {
        tracing::warn!(header = %auth.header_name, "Rejected request with invalid API key");
        return Err(CoreError::Unauthorized("Invalid API key".into()));
    }

    Ok(())
}
