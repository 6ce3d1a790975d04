//! Duplicate Candidate Detector — flags a recent submission with the same
//! email, role, and exact requested-skill set.
//!
//! Read-only: the detector queries the record store and never writes.
//! Skill-set matching is exact (same size, same members, order-independent);
//! subset or similarity matching is intentionally not performed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::candidate::CandidateRow;
use crate::store::CandidateStore;

/// How far back a prior submission counts as a duplicate, measured from
/// invocation time.
pub const DUPLICATE_WINDOW_DAYS: i64 = 30;

/// Result of a duplicate query. The referenced record belongs to the store;
/// the pipeline only branches on it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResult {
    pub exists: bool,
    pub is_within_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateRow>,
}

/// Queries the store for a matching submission inside the duplicate window.
pub async fn check_duplicate(
    store: &dyn CandidateStore,
    email: &str,
    role: &str,
    requested_skills: &[String],
) -> anyhow::Result<DuplicateCheckResult> {
    let since = window_start(Utc::now());
    let candidate = store
        .find_recent(email, role, requested_skills, since)
        .await?;

    debug!(
        "Duplicate check for '{}' / '{}': exists={}",
        email,
        role,
        candidate.is_some()
    );

    Ok(DuplicateCheckResult {
        exists: candidate.is_some(),
        is_within_window: candidate.is_some(),
        candidate,
    })
}

/// Start of the duplicate window relative to `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(DUPLICATE_WINDOW_DAYS)
}

/// Exact skill-set equality: same size and same members, order-independent.
pub fn same_skill_set(a: &[String], b: &[String]) -> bool {
    use std::collections::HashSet;

    if a.len() != b.len() {
        return false;
    }
    let a_set: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b.iter().map(String::as_str).collect();
    a_set == b_set
}
