//! Observed-state types written by the reconciler.
//!
//! This module holds the status side of a session resource: per-repository
//! reconcile records, the active-workflow record, and the condition list.
//! The reconciler overwrites the whole status on each pass except the
//! condition list, which is upserted by condition type. Clients read these
//! values and never write them.

use serde::{Deserialize, Serialize};

use crate::repo::SimpleRepo;

// ── Conditions ───────────────────────────────────────────────

/// One entry in a session's condition list.
///
/// A given `condition_type` has at most one current entry; see
/// [`upsert_condition`]. Timestamps are RFC 3339 strings supplied by the
/// reconciler, which owns the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition kind (e.g. "Ready"). Serialized as `type`.
    #[serde(rename = "type")]
    pub condition_type: String,

    /// Current value, conventionally "True", "False", or "Unknown".
    pub status: String,

    /// Machine-readable reason for the current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When `status` last changed, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,

    /// Spec generation this condition was observed against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// Insert or update a condition in place, keyed by `condition_type`.
///
/// A new type is appended. An existing entry of the same type is replaced,
/// but its `last_transition_time` is carried over when `status` did not
/// change, so the transition timestamp only moves on an actual transition.
/// The order of unaffected entries is preserved.
///
/// Returns `true` if the status transitioned (or the type is new).
///
/// # Examples
///
/// ```
/// use sesh_core::{Condition, upsert_condition};
///
/// let mut conditions = Vec::new();
/// let ready = Condition {
///     condition_type: "Ready".to_owned(),
///     status: "True".to_owned(),
///     last_transition_time: Some("2025-01-01T00:00:00Z".to_owned()),
///     ..Condition::default()
/// };
///
/// assert!(upsert_condition(&mut conditions, ready.clone()));
///
/// // Same status again: entry replaced, transition time untouched.
/// let later = Condition {
///     last_transition_time: Some("2025-01-02T00:00:00Z".to_owned()),
///     ..ready
/// };
/// assert!(!upsert_condition(&mut conditions, later));
/// assert_eq!(
///     conditions[0].last_transition_time.as_deref(),
///     Some("2025-01-01T00:00:00Z")
/// );
/// ```
pub fn upsert_condition(conditions: &mut Vec<Condition>, mut new: Condition) -> bool {
    let Some(index) = conditions
        .iter()
        .position(|c| c.condition_type == new.condition_type)
    else {
        conditions.push(new);
        return true;
    };

    let existing = &mut conditions[index];
    let transitioned = existing.status != new.status;
    if !transitioned {
        new.last_transition_time = existing.last_transition_time.clone();
    }
    *existing = new;
    transitioned
}

// ── Reconcile records ────────────────────────────────────────

/// Reconciliation outcome for one repository.
///
/// Positional companion of the spec's repo sequence: entry `i` describes
/// `spec.repos[i]`. The reconciler replaces the whole sequence each pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledRepo {
    /// Repository URL that was reconciled.
    #[serde(default)]
    pub url: String,

    /// Branch that was checked out. Always serialized, even when empty.
    #[serde(default)]
    pub branch: String,

    /// Directory name the repository was cloned under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Reconciler-owned outcome string (e.g. "cloned", "failed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// When the clone completed, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloned_at: Option<String>,
}

/// Reconciliation outcome for the session's active workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledWorkflow {
    /// Workflow repository URL.
    #[serde(default)]
    pub git_url: String,

    /// Branch the workflow was loaded from. Always serialized.
    #[serde(default)]
    pub branch: String,

    /// Path within the workflow repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Reconciler-owned outcome string (e.g. "applied", "failed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// When the workflow was applied, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<String>,
}

// ── Session Status ───────────────────────────────────────────

/// Observed state of a session resource.
///
/// Reconciler-owned. Every field is optional on the wire; a freshly created
/// session has no status at all and an empty status serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Spec generation the reconciler last acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Lifecycle phase (e.g. "Pending", "Running", "Completed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// When the session started, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// When the session finished, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<String>,

    /// Per-repository reconcile records, same order as `spec.repos`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reconciled_repos: Vec<ReconciledRepo>,

    /// Reconcile record for the active workflow, if one was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconciled_workflow: Option<ReconciledWorkflow>,

    /// Identifier of the agent SDK session backing this resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_session_id: Option<String>,

    /// How many times the SDK session was restarted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_restart_count: Option<u32>,

    /// Current conditions, at most one entry per condition type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl SessionStatus {
    /// Insert or update a condition; see [`upsert_condition`].
    ///
    /// Returns `true` if the status transitioned (or the type is new).
    pub fn upsert_condition(&mut self, condition: Condition) -> bool {
        upsert_condition(&mut self.conditions, condition)
    }

    /// Look up the current condition of the given type.
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    /// Whether the reconciled-repo records cover the spec's repo list.
    ///
    /// The records are positional, so a reconcile pass that recorded a
    /// different number of entries than the spec declares is stale or
    /// partial.
    pub fn repos_consistent(&self, repos: &[SimpleRepo]) -> bool {
        self.reconciled_repos.len() == repos.len()
    }
}
