//! Persisted-map codec for repository configurations.
//!
//! A [`SimpleRepo`] crosses the persistence boundary as an untyped key-value
//! map embedded in the resource spec's `repos` sequence. Both directions of
//! the conversion go through the one serde schema declared on the structs,
//! so encode and decode cannot drift apart: a key added to the schema is
//! picked up by both sides at once, and `decode(encode(r)) == r` holds for
//! every value that passes validation.
//!
//! The untyped form stays at this boundary. Internal logic always works on
//! the typed [`SimpleRepo`]; callers that need validated data re-run
//! [`validate`](SimpleRepo::validate) after decoding, because decode checks
//! structure only, never business rules.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::repo::{SimpleRepo, validate_repos};

impl SimpleRepo {
    /// Encode into the untyped map stored in the persisted spec.
    ///
    /// Key presence follows the schema on the struct: `branch` appears only
    /// when set (an unset branch is an absent key, never an empty string),
    /// `output` only when present, and `autoPush` only when set, whether
    /// `true` or `false`.
    ///
    /// Call this only on values that already passed
    /// [`validate`](SimpleRepo::validate); no validation happens here.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Json` if serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sesh_core::{RepoLocation, SimpleRepo};
    ///
    /// let repo = SimpleRepo::builder()
    ///     .input(RepoLocation::builder().url("https://github.com/user/repo").build())
    ///     .auto_push(true)
    ///     .build();
    ///
    /// let map = repo.to_cr_map().expect("should encode");
    /// assert_eq!(map["autoPush"], serde_json::json!(true));
    ///
    /// let decoded = SimpleRepo::from_cr_map(&map).expect("should decode");
    /// assert_eq!(decoded, repo);
    /// ```
    pub fn to_cr_map(&self) -> Result<Map<String, Value>, CoreError> {
        // A struct with named fields always serializes to a JSON object,
        // so the non-object arm is unreachable in practice.
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::MalformedEncodedRepo(
                "repo serialized to a non-object value".to_owned(),
            )),
        }
    }

    /// Decode a persisted map back into a typed repo configuration.
    ///
    /// Exact structural inverse of [`to_cr_map`](SimpleRepo::to_cr_map):
    /// missing optional keys and unknown extra keys are tolerated, but an
    /// absent `input` or `input.url` is an error, never a silent default.
    /// An encoded repo without them cannot represent a value that passed
    /// validation, so the stored data is corrupt or written against a
    /// different schema.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedEncodedRepo` if `input` is missing or
    /// not a map, if `input.url` is missing, or if any present key has the
    /// wrong type.
    pub fn from_cr_map(map: &Map<String, Value>) -> Result<Self, CoreError> {
        // Plain deserialization would default an absent input to None;
        // the missing-key cases must fail loudly instead.
        let Some(input) = map.get("input") else {
            return Err(CoreError::MalformedEncodedRepo("missing input".to_owned()));
        };
        if !input.is_object() {
            return Err(CoreError::MalformedEncodedRepo(
                "input is not a map".to_owned(),
            ));
        }
        if input.get("url").is_none() {
            return Err(CoreError::MalformedEncodedRepo(
                "missing input.url".to_owned(),
            ));
        }

        serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| CoreError::MalformedEncodedRepo(e.to_string()))
    }
}

// ── List-level operations ────────────────────────────────────

/// Validate and encode a session's whole repo list.
///
/// Every entry is validated before anything is encoded, so a list with one
/// bad entry produces no output at all.
///
/// # Errors
///
/// Returns `CoreError::InvalidRepo` with the index of the first invalid
/// entry.
/// Returns `CoreError::Json` if an entry fails to serialize.
pub fn encode_repos(repos: &[SimpleRepo]) -> Result<Vec<Map<String, Value>>, CoreError> {
    validate_repos(repos)?;

    let mut maps = Vec::with_capacity(repos.len());
    for repo in repos {
        maps.push(repo.to_cr_map()?);
    }
    debug!(count = maps.len(), "encoded repo list");
    Ok(maps)
}

/// Decode a persisted `repos` sequence back into typed configurations.
///
/// Fails on the first malformed entry with its index attached. Decoded
/// entries are structurally sound but not validated; reconcilers that need
/// the business rules re-run [`validate_repos`].
///
/// # Errors
///
/// Returns `CoreError::MalformedEncodedRepo` naming the offending index if
/// an entry is not a map or cannot be decoded.
pub fn decode_repos(values: &[Value]) -> Result<Vec<SimpleRepo>, CoreError> {
    let mut repos = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let Some(map) = value.as_object() else {
            return Err(CoreError::MalformedEncodedRepo(format!(
                "repos[{index}] is not a map"
            )));
        };
        let repo = SimpleRepo::from_cr_map(map).map_err(|e| match e {
            CoreError::MalformedEncodedRepo(reason) => {
                CoreError::MalformedEncodedRepo(format!("repos[{index}]: {reason}"))
            }
            other => other,
        })?;
        repos.push(repo);
    }
    debug!(count = repos.len(), "decoded repo list");
    Ok(repos)
}
