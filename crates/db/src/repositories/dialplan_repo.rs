//! Repository for the `dialplan` table.

use std::collections::HashSet;

use dialplan_core::dialplan::{DialplanEntry, RuleKey};
use dialplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::dialplan::DialplanRule;

/// Column list for `dialplan` queries.
const COLUMNS: &str = "\
    id, dpid, pr, match_op, match_exp, match_flags, \
    subst_exp, repl_exp, timerec, disabled, attrs";

/// Provides the queries the dial-plan synchronizer needs.
pub struct DialplanRepo;

impl DialplanRepo {
    /// Whether any rule has `match_exp` exactly equal to `match_exp`.
    pub async fn match_exp_exists(pool: &PgPool, match_exp: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM dialplan WHERE match_exp = $1)")
                .bind(match_exp)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// All persisted `(dpid, match_exp)` keys within the given groups.
    pub async fn existing_keys(
        pool: &PgPool,
        dpids: &[i32],
    ) -> Result<HashSet<RuleKey>, sqlx::Error> {
        if dpids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT dpid, match_exp FROM dialplan WHERE dpid = ANY($1)")
                .bind(dpids)
                .fetch_all(pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(dpid, match_exp)| RuleKey { dpid, match_exp })
            .collect())
    }

    /// Insert `entries` in a single transaction.
    ///
    /// Either every row is written or none is. Returns the number of rows
    /// inserted.
    pub async fn insert_many(pool: &PgPool, entries: &[&DialplanEntry]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for e in entries {
            let result = sqlx::query(
                "INSERT INTO dialplan \
                     (dpid, pr, match_op, match_exp, match_flags, \
                      subst_exp, repl_exp, timerec, disabled, attrs) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(e.dpid)
            .bind(e.pr)
            .bind(e.match_op)
            .bind(e.match_exp.as_str())
            .bind(e.match_flags)
            .bind(e.subst_exp.as_deref())
            .bind(e.repl_exp.as_deref())
            .bind(e.timerec.as_deref())
            .bind(e.disabled)
            .bind(e.attrs.as_deref())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(inserted, "Dialplan rows written");
        Ok(inserted)
    }

    /// List every rule ordered by `(dpid, pr, id)`.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DialplanRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dialplan ORDER BY dpid, pr, id");
        sqlx::query_as::<_, DialplanRule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a rule by primary key.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("DELETE FROM dialplan WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
