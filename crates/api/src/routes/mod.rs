pub mod dialplan;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the versioned route tree (mounted under `API_PREFIX`).
///
/// Route hierarchy:
///
/// ```text
/// /healthz                                  health check (API key optional)
///
/// /dialplan/checkdids                       is DID special (POST)
/// /dialplan/add                             insert entries + reload (POST)
/// /dialplan/fetchall                        list rules (GET)
/// /dialplan/delete/{id}                     delete rule + reload (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/dialplan", dialplan::router())
}
