//! Row model for the `dialplan` table.

use dialplan_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A persisted dial-plan rule.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DialplanRule {
    pub id: DbId,
    pub dpid: i32,
    pub pr: i32,
    pub match_op: i32,
    pub match_exp: String,
    pub match_flags: i32,
    pub subst_exp: Option<String>,
    pub repl_exp: Option<String>,
    pub timerec: Option<String>,
    pub disabled: bool,
    pub attrs: Option<String>,
}
