//! Client request shapes for the session API surface.
//!
//! These are the bodies the transport layer accepts for create, update, and
//! clone operations. They pass through this crate unexamined except for the
//! repo list, which goes through the admission validation of
//! [`validate_repos`] before anything is persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::repo::{SimpleRepo, validate_repos};
use crate::session::{LlmSettings, UserContext};

// ── Create ───────────────────────────────────────────────────

/// Request body for creating a session.
///
/// Every field is optional on the wire; absent fields take the spec-side
/// defaults. `parent_session_id` keeps its historical snake_case wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Prompt the agent session starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_prompt: Option<String>,

    /// Human-readable session name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Model configuration override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_settings: Option<LlmSettings>,

    /// Session timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Whether the session accepts follow-up messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,

    /// Session this one was spawned from.
    #[serde(
        rename = "parent_session_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_session_id: Option<String>,

    /// Repositories the session clones from and pushes to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<SimpleRepo>,

    /// Push all outputs when the session completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_push_on_complete: Option<bool>,

    /// Identity of the requesting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<UserContext>,

    /// Extra environment variables for the runner.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,

    /// Labels to stamp onto the created resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations to stamp onto the created resource.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl CreateSessionRequest {
    /// Run admission validation on the request's repo list.
    ///
    /// All-or-nothing over the list; no other field is checked here.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRepo` with the index of the first invalid
    /// entry.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_repos(&self.repos)
    }
}

// ── Update ───────────────────────────────────────────────────

/// Request body for updating a session.
///
/// Only set fields are applied; building the replacement spec is the
/// caller's job, since spec updates are wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    /// New starting prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_prompt: Option<String>,

    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// New timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// New model configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_settings: Option<LlmSettings>,
}

// ── Clone ────────────────────────────────────────────────────

/// Request body for cloning a session into another project.
///
/// Both fields are required; a body missing either fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneSessionRequest {
    /// Project the clone is created in.
    pub target_project: String,

    /// Name of the cloned session.
    pub new_session_name: String,
}
