//! Keeps the `dialplan` table and the switch's in-memory copy in step.

use std::sync::Arc;

use dialplan_core::dialplan::{
    dedup_by_key, plan_insert, referenced_dpids, DialplanEntry, RELOAD_COMMAND,
};
use dialplan_core::types::DbId;
use dialplan_db::models::dialplan::DialplanRule;
use dialplan_db::repositories::DialplanRepo;
use dialplan_mi::{MiExecutor, MiResponse};
use sqlx::PgPool;

use crate::error::AppResult;

/// Result of [`DialplanSync::insert_entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub inserted: usize,
    /// Submitted entries that were not written: in-request duplicates plus
    /// keys that already exist.
    pub skipped: usize,
    /// Reload response; `None` when nothing was written.
    pub mi: Option<MiResponse>,
}

/// Result of [`DialplanSync::delete_rule`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub deleted: u64,
    /// Reload response; `None` when no row matched.
    pub mi: Option<MiResponse>,
}

/// Coordinates dial-plan reads and writes with the switch reload.
///
/// The switch is asked to reload at most once per call, and only after the
/// table actually changed. A failed reload never fails the call: its error
/// envelope is returned alongside the successful write.
pub struct DialplanSync {
    pool: PgPool,
    mi: Arc<dyn MiExecutor>,
}

impl DialplanSync {
    pub fn new(pool: PgPool, mi: Arc<dyn MiExecutor>) -> Self {
        Self { pool, mi }
    }

    /// Whether `did` exactly equals the `match_exp` of any persisted rule.
    pub async fn check_special_did(&self, did: &str) -> AppResult<bool> {
        Ok(DialplanRepo::match_exp_exists(&self.pool, did).await?)
    }

    /// Insert the entries whose `(dpid, match_exp)` is not yet persisted and
    /// reload the switch if anything was written.
    ///
    /// 1. Empty input returns immediately.
    /// 2. Deduplicate by key, first occurrence wins.
    /// 3. Look up the persisted keys of every referenced `dpid`.
    /// 4. Keep only candidates whose key is not persisted.
    /// 5. Write them in one transaction and trigger `dp_reload`.
    ///
    /// `skipped` is always `entries.len() - inserted`.
    pub async fn insert_entries(&self, entries: &[DialplanEntry]) -> AppResult<InsertOutcome> {
        if entries.is_empty() {
            return Ok(InsertOutcome {
                inserted: 0,
                skipped: 0,
                mi: None,
            });
        }

        let candidates = dedup_by_key(entries);
        let dpids = referenced_dpids(&candidates);
        let existing = DialplanRepo::existing_keys(&self.pool, &dpids).await?;
        let plan = plan_insert(entries.len(), candidates, &existing);

        if plan.is_noop() {
            tracing::info!(
                submitted = entries.len(),
                skipped = plan.skipped,
                "No new dialplan entries, skipping reload",
            );
            return Ok(InsertOutcome {
                inserted: 0,
                skipped: plan.skipped,
                mi: None,
            });
        }

        DialplanRepo::insert_many(&self.pool, &plan.new_entries).await?;
        tracing::info!(
            inserted = plan.inserted(),
            skipped = plan.skipped,
            "Dialplan entries inserted",
        );

        let mi = self.mi.execute(RELOAD_COMMAND).await;

        Ok(InsertOutcome {
            inserted: plan.inserted(),
            skipped: plan.skipped,
            mi: Some(mi),
        })
    }

    /// All rules ordered by `(dpid, pr, id)`.
    pub async fn fetch_all(&self) -> AppResult<Vec<DialplanRule>> {
        Ok(DialplanRepo::list_all(&self.pool).await?)
    }

    /// Delete a rule by primary key, reloading the switch only if a row was
    /// removed.
    pub async fn delete_rule(&self, id: DbId) -> AppResult<DeleteOutcome> {
        if !DialplanRepo::delete(&self.pool, id).await? {
            return Ok(DeleteOutcome {
                deleted: 0,
                mi: None,
            });
        }

        tracing::info!(rule_id = id, "Dialplan rule deleted");
        let mi = self.mi.execute(RELOAD_COMMAND).await;

        Ok(DeleteOutcome {
            deleted: 1,
            mi: Some(mi),
        })
    }
}
