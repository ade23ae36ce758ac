//! Request extractors shared by handlers.

use axum::extract::{FromRequest, Request};
use axum::Json;
use dialplan_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been deserialized and then checked with
/// [`Validate`].
///
/// Deserialization failures keep axum's status (422 for type/field errors,
/// 400 for malformed JSON, 415 for a missing content type). Validation
/// failures are reported as 422 with the offending fields.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;
        Ok(Self(value))
    }
}
