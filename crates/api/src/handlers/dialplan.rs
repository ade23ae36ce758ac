//! Handlers for dial-plan management.
//!
//! Every endpoint requires the shared API key via [`RequireApiKey`]. Switch
//! reload failures never turn into HTTP errors; they are reported in the
//! `mi` field of the response body.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dialplan_core::dialplan::{AddEntriesRequest, CheckDidRequest};
use dialplan_core::error::CoreError;
use dialplan_core::types::DbId;
use dialplan_mi::MiResponse;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::api_key::RequireApiKey;
use crate::state::AppState;

/// Response for `POST /dialplan/checkdids`.
#[derive(Debug, Serialize)]
pub struct CheckDidResponse {
    pub did: String,
    pub special_did: bool,
}

/// Response for `POST /dialplan/add`.
#[derive(Debug, Serialize)]
pub struct AddEntriesResponse {
    pub status: &'static str,
    pub inserted: usize,
    pub skipped: usize,
    pub mi: Option<MiResponse>,
}

/// Response for `DELETE /dialplan/delete/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteRuleResponse {
    pub status: &'static str,
    pub deleted: u64,
    pub mi: Option<MiResponse>,
}

/// POST /api/v1/dialplan/checkdids
///
/// Report whether the DID is itself a `match_exp` of some rule.
pub async fn check_dids(
    _key: RequireApiKey,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CheckDidRequest>,
) -> AppResult<impl IntoResponse> {
    let special_did = state.sync.check_special_did(&input.did).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckDidResponse {
            did: input.did,
            special_did,
        }),
    ))
}

/// POST /api/v1/dialplan/add
///
/// Insert new rules and reload the switch if anything was written.
pub async fn add_entries(
    _key: RequireApiKey,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AddEntriesRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.sync.insert_entries(&input.entries).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddEntriesResponse {
            status: "ok",
            inserted: outcome.inserted,
            skipped: outcome.skipped,
            mi: outcome.mi,
        }),
    ))
}

/// GET /api/v1/dialplan/fetchall
pub async fn fetch_all(
    _key: RequireApiKey,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rules = state.sync.fetch_all().await?;

    Ok(Json(rules))
}

/// DELETE /api/v1/dialplan/delete/{id}
///
/// Delete a rule and reload the switch. 404 if no rule has this id.
pub async fn delete_rule(
    _key: RequireApiKey,
    State(state): State<AppState>,
    Path(rule_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.sync.delete_rule(rule_id).await?;

    if outcome.deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Dialplan rule",
            id: rule_id,
        }));
    }

    Ok(Json(DeleteRuleResponse {
        status: "ok",
        deleted: outcome.deleted,
        mi: outcome.mi,
    }))
}
