//! Dial-plan rule entries and the insert planning rules.
//!
//! A submitted batch is planned in three steps before anything touches the
//! store:
//!
//! 1. [`dedup_by_key`] keeps the first occurrence of every [`RuleKey`].
//! 2. [`referenced_dpids`] collects the groups whose persisted keys must be
//!    looked up.
//! 3. [`plan_insert`] splits the candidates into new and already-persisted
//!    entries and computes the reported skip count.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// MI command that makes the switch re-read the `dialplan` table.
pub const RELOAD_COMMAND: &str = "dp_reload";

/// Natural key of a dial-plan rule: `(dpid, match_exp)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub dpid: i32,
    pub match_exp: String,
}

impl RuleKey {
    pub fn new(dpid: i32, match_exp: impl Into<String>) -> Self {
        Self {
            dpid,
            match_exp: match_exp.into(),
        }
    }
}

/// A candidate dial-plan rule as submitted by a client.
///
/// Beyond the field types, validation requires a non-empty `match_exp`: an
/// empty expression is rejected with 422 instead of being stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DialplanEntry {
    /// Dial-plan group id.
    pub dpid: i32,
    /// Priority within the group.
    pub pr: i32,
    /// OpenSIPS match operator (0 = equal, 1 = regex, 2 = fnmatch).
    pub match_op: i32,
    /// Expression matched against the incoming identifier.
    #[validate(length(min = 1, message = "match_exp must not be empty"))]
    pub match_exp: String,
    /// Flags for the match operation; `null` and absent both mean `0`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_flags: i32,
    #[serde(default)]
    pub subst_exp: Option<String>,
    #[serde(default)]
    pub repl_exp: Option<String>,
    /// Time recurrence string restricting when the rule applies.
    #[serde(default)]
    pub timerec: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Free-form attributes as stored in `dialplan.attrs`.
    #[serde(default)]
    pub attrs: Option<String>,
}

impl DialplanEntry {
    pub fn key(&self) -> RuleKey {
        RuleKey::new(self.dpid, self.match_exp.as_str())
    }
}

/// Body of `POST /dialplan/add`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddEntriesRequest {
    #[validate(nested)]
    pub entries: Vec<DialplanEntry>,
}

/// Body of `POST /dialplan/checkdids`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckDidRequest {
    #[validate(length(min = 1, message = "did must not be empty"))]
    pub did: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep the first entry for each distinct [`RuleKey`], preserving input order.
pub fn dedup_by_key(entries: &[DialplanEntry]) -> Vec<&DialplanEntry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .filter(|e| seen.insert((e.dpid, e.match_exp.as_str())))
        .collect()
}

/// Distinct group ids referenced by `entries`, ascending.
pub fn referenced_dpids(entries: &[&DialplanEntry]) -> Vec<i32> {
    entries
        .iter()
        .map(|e| e.dpid)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Outcome of planning an insert batch against the persisted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan<'a> {
    /// Deduplicated entries whose key is not yet persisted.
    pub new_entries: Vec<&'a DialplanEntry>,
    /// `input_len - new_entries.len()`. Counts both in-request duplicates
    /// and keys that already exist.
    pub skipped: usize,
}

impl InsertPlan<'_> {
    pub fn inserted(&self) -> usize {
        self.new_entries.len()
    }

    /// `true` when nothing would be written and no reload is needed.
    pub fn is_noop(&self) -> bool {
        self.new_entries.is_empty()
    }
}

/// Split deduplicated `candidates` into new entries and compute the skip
/// count relative to the original (pre-dedup) `input_len`.
pub fn plan_insert<'a>(
    input_len: usize,
    candidates: Vec<&'a DialplanEntry>,
    existing: &HashSet<RuleKey>,
) -> InsertPlan<'a> {
    let new_entries: Vec<&DialplanEntry> = candidates
        .into_iter()
        .filter(|e| !existing.contains(&e.key()))
        .collect();
    let skipped = input_len.saturating_sub(new_entries.len());

    InsertPlan {
        new_entries,
        skipped,
    }
}
