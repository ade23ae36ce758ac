//! Route definitions for dial-plan management.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::dialplan;
use crate::state::AppState;

/// Dial-plan routes mounted at `/dialplan`.
///
/// ```text
/// POST   /checkdids         -> check_dids
/// POST   /add               -> add_entries
/// GET    /fetchall          -> fetch_all
/// DELETE /delete/{id}       -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkdids", post(dialplan::check_dids))
        .route("/add", post(dialplan::add_entries))
        .route("/fetchall", get(dialplan::fetch_all))
        .route("/delete/{id}", delete(dialplan::delete_rule))
}
