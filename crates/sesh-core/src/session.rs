//! Session resource envelope, desired-state aggregates, and manifest loading.
//!
//! A [`Session`] is the full resource record: the `apiVersion`/`kind`
//! envelope, untyped metadata, the client-authored [`SessionSpec`], and the
//! reconciler-owned status. The spec is validated once at admission time and
//! replaced wholesale on update, never patched field by field.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

use crate::error::CoreError;
use crate::repo::SimpleRepo;
use crate::status::SessionStatus;

/// API version written into every session resource.
pub const API_VERSION: &str = "sesh.dev/v1alpha1";

/// Resource kind written into every session resource.
pub const KIND: &str = "AgentSession";

// ── Session envelope ─────────────────────────────────────────

/// A complete session resource.
///
/// # Examples
///
/// ```
/// use sesh_core::{API_VERSION, RepoLocation, Session, SessionSpec, SimpleRepo};
///
/// let session = Session::builder()
///     .spec(
///         SessionSpec::builder()
///             .display_name("Fix the flaky test")
///             .repos(vec![
///                 SimpleRepo::builder()
///                     .input(RepoLocation::builder().url("https://github.com/user/repo").build())
///                     .build(),
///             ])
///             .build(),
///     )
///     .build();
///
/// assert_eq!(session.api_version, API_VERSION);
/// assert!(session.status.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Resource API version, normally [`API_VERSION`].
    #[builder(default = API_VERSION.to_owned())]
    #[serde(default)]
    pub api_version: String,

    /// Resource kind, normally [`KIND`].
    #[builder(default = KIND.to_owned())]
    #[serde(default)]
    pub kind: String,

    /// Untyped resource metadata (name, namespace, labels and so on).
    /// Owned by the resource store, passed through unexamined.
    #[builder(default)]
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Desired state, client-authored.
    pub spec: SessionSpec,

    /// Observed state, reconciler-owned. Absent on a fresh resource.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

// ── Session Spec ─────────────────────────────────────────────

/// Desired state of a session.
///
/// Immutable once validated; updates replace the whole spec. The repo list
/// is the input to the validation and codec pipeline, everything else is
/// pass-through configuration for the reconciler and runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpec {
    /// Prompt the agent session starts from.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_prompt: Option<String>,

    /// Whether the session accepts follow-up messages. Omitted when false.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub interactive: bool,

    /// Human-readable session name. Always serialized.
    #[builder(setter(into))]
    #[serde(default)]
    pub display_name: String,

    /// Model configuration, defaults filled per field.
    #[builder(default)]
    #[serde(default)]
    pub llm_settings: LlmSettings,

    /// Session timeout in seconds.
    #[builder(default = default_timeout())]
    #[serde(default = "default_timeout")]
    pub timeout: u32,

    /// Identity of the requesting user.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<UserContext>,

    /// Extra environment variables for the runner.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,

    /// Project the session belongs to.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Repositories the session clones from and pushes to.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<SimpleRepo>,

    /// Workflow to load into the session.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_workflow: Option<WorkflowSelection>,
}

/// Model configuration for the agent session.
///
/// Every field has a default so partial objects deserialize sensibly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmSettings {
    /// Model identifier (e.g. "claude-sonnet-4-20250514").
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens per agent response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Identity of the user a session runs on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Stable user identifier.
    #[serde(default)]
    pub user_id: String,

    /// Display name of the user.
    #[serde(default)]
    pub display_name: String,

    /// Groups the user belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

/// A workflow to load into the session from an external repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSelection {
    /// Workflow repository URL.
    #[serde(default)]
    pub git_url: String,

    /// Branch to load the workflow from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Path within the workflow repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ── Default/skip helpers for serde ───────────────────────────

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_owned()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_timeout() -> u32 {
    300
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ── Manifest loading ─────────────────────────────────────────

/// Load a [`Session`] manifest from disk.
///
/// A `.json` extension selects JSON parsing; any other extension parses as
/// YAML.
///
/// # Errors
///
/// Returns `CoreError::ManifestNotFound` if the file does not exist.
/// Returns `CoreError::InvalidManifest` if the content cannot be parsed;
/// the message carries the path.
/// Returns `CoreError::Io` if the file cannot be read.
#[instrument]
pub fn load_session(path: &Path) -> Result<Session, CoreError> {
    if !path.exists() {
        return Err(CoreError::ManifestNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;

    let session: Session = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .map_err(|e| CoreError::InvalidManifest(format!("{}: {e}", path.display())))?
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| CoreError::InvalidManifest(format!("{}: {e}", path.display())))?
    };
    debug!(path = %path.display(), repos = session.spec.repos.len(), "loaded session manifest");
    Ok(session)
}
