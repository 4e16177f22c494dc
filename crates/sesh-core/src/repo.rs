//! Repository reference types and admission validation.
//!
//! This module defines [`RepoLocation`] and [`SimpleRepo`], the value types
//! describing which repositories a session clones from and pushes to, and the
//! validation rules a repo entry must pass before it may be persisted. The
//! request layer validates at admission time; the reconciler consumes the
//! entries read-only afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::{CoreError, ValidationError};

// ── Repo Location ────────────────────────────────────────────

/// A git repository location: URL plus optional branch.
///
/// One `RepoLocation` names either the source (`input`) or destination
/// (`output`) side of a [`SimpleRepo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct RepoLocation {
    /// Repository URL (e.g. "https://github.com/user/repo").
    #[builder(setter(into))]
    pub url: String,

    /// Branch name. `None` leaves the choice to the reconciler.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl RepoLocation {
    /// URL with surrounding whitespace removed, used for comparison.
    fn trimmed_url(&self) -> &str {
        self.url.trim()
    }

    /// Branch normalized for comparison: a missing branch and a blank
    /// branch are both the empty string. Encoding is not affected, only
    /// the input/output distinctness check.
    fn normalized_branch(&self) -> &str {
        self.branch.as_deref().map(str::trim).unwrap_or("")
    }

    /// Whether both locations refer to the same place after trimming
    /// URLs and normalizing branches.
    fn same_location(&self, other: &RepoLocation) -> bool {
        self.trimmed_url() == other.trimmed_url()
            && self.normalized_branch() == other.normalized_branch()
    }
}

// ── Simple Repo ──────────────────────────────────────────────

/// Repository configuration for one entry in a session's repo list.
///
/// Composes a required `input` location, an optional `output` location that
/// must differ from the input, and an optional auto-push flag. All three
/// fields are optional at the type level so that arbitrary client JSON
/// deserializes; [`validate`](SimpleRepo::validate) decides what is accepted.
///
/// # Examples
///
/// ```
/// use sesh_core::{RepoLocation, SimpleRepo};
///
/// let repo = SimpleRepo::builder()
///     .input(
///         RepoLocation::builder()
///             .url("https://github.com/user/repo")
///             .branch("main")
///             .build(),
///     )
///     .build();
///
/// assert!(repo.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRepo {
    /// Where the reconciler clones from. Required for a valid entry.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<RepoLocation>,

    /// Where results are pushed. Must differ from `input` when present.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<RepoLocation>,

    /// Push output changes without a separate confirmation step.
    /// `None` means the session-level default applies.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_push: Option<bool>,
}

impl SimpleRepo {
    /// Validate this repository configuration.
    ///
    /// Pure function, no network or state access. Checks run in a fixed
    /// order so the reported error is deterministic: missing input first,
    /// then a blank input URL, then an output identical to the input.
    /// Branch equality treats missing and blank branches as the same value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingInput` if `input` is absent.
    /// Returns `ValidationError::MissingInputUrl` if the trimmed input URL
    /// is empty.
    /// Returns `ValidationError::IdenticalInputOutput` if `output` equals
    /// `input` after trimming and branch normalization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(input) = &self.input else {
            return Err(ValidationError::MissingInput);
        };

        if input.trimmed_url().is_empty() {
            return Err(ValidationError::MissingInputUrl);
        }

        // Output must differ from input in either URL or branch.
        if let Some(output) = &self.output
            && input.same_location(output)
        {
            return Err(ValidationError::IdenticalInputOutput);
        }

        Ok(())
    }
}

// ── List-level validation ────────────────────────────────────

/// Validate every entry of a session's repo list.
///
/// All-or-nothing: the first invalid entry aborts with its index attached,
/// and the caller must not persist any entry from the list.
///
/// # Errors
///
/// Returns `CoreError::InvalidRepo` carrying the index and the first
/// violated rule of the offending entry.
pub fn validate_repos(repos: &[SimpleRepo]) -> Result<(), CoreError> {
    for (index, repo) in repos.iter().enumerate() {
        repo.validate()
            .map_err(|source| CoreError::InvalidRepo { index, source })?;
    }
    debug!(count = repos.len(), "validated repo list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(url: &str, branch: Option<&str>) -> RepoLocation {
        RepoLocation {
            url: url.to_owned(),
            branch: branch.map(str::to_owned),
        }
    }

    #[test]
    fn test_should_validate_repo_with_input_only() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_validate_repo_with_input_only_no_branch() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", None))
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_validate_repo_with_different_output_url() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/fork", Some("feature")))
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_validate_repo_with_same_url_different_branch() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/repo", Some("feature")))
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_validate_repo_with_different_url_same_branch() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/fork", Some("main")))
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_validate_repo_with_auto_push() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/fork", Some("feature")))
            .auto_push(true)
            .build();
        assert!(repo.validate().is_ok());
    }

    #[test]
    fn test_should_reject_missing_input() {
        let repo = SimpleRepo::default();
        let err = repo.validate().expect_err("should reject missing input");
        assert_eq!(err, ValidationError::MissingInput);
        assert_eq!(err.to_string(), "input is required");
    }

    #[test]
    fn test_should_reject_missing_input_even_with_output_present() {
        // Check order is fixed: missing input wins over any later rule.
        let repo = SimpleRepo::builder()
            .output(location("https://github.com/user/fork", None))
            .build();
        assert_eq!(
            repo.validate().expect_err("should reject"),
            ValidationError::MissingInput
        );
    }

    #[test]
    fn test_should_reject_empty_input_url() {
        let repo = SimpleRepo::builder()
            .input(location("", Some("main")))
            .build();
        let err = repo.validate().expect_err("should reject empty url");
        assert_eq!(err, ValidationError::MissingInputUrl);
        assert_eq!(err.to_string(), "input.url is required");
    }

    #[test]
    fn test_should_reject_whitespace_input_url() {
        let repo = SimpleRepo::builder()
            .input(location("   ", Some("main")))
            .build();
        assert_eq!(
            repo.validate().expect_err("should reject"),
            ValidationError::MissingInputUrl
        );
    }

    #[test]
    fn test_should_reject_identical_input_output() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/repo", Some("main")))
            .build();
        let err = repo.validate().expect_err("should reject identical");
        assert_eq!(err, ValidationError::IdenticalInputOutput);
        assert_eq!(
            err.to_string(),
            "output repository must differ from input (different URL or branch required)"
        );
    }

    #[test]
    fn test_should_reject_identical_with_no_branches() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", None))
            .output(location("https://github.com/user/repo", None))
            .build();
        assert_eq!(
            repo.validate().expect_err("should reject"),
            ValidationError::IdenticalInputOutput
        );
    }

    #[test]
    fn test_should_treat_missing_and_blank_branches_as_equal() {
        // None, Some("") and Some("   ") all normalize to the same value.
        for (input_branch, output_branch) in [
            (None, Some("")),
            (None, Some("   ")),
            (Some(""), Some("   ")),
            (Some(""), Some("")),
            (Some("  "), Some("  ")),
        ] {
            let repo = SimpleRepo::builder()
                .input(location("https://github.com/user/repo", input_branch))
                .output(location("https://github.com/user/repo", output_branch))
                .build();
            assert_eq!(
                repo.validate().expect_err("should reject"),
                ValidationError::IdenticalInputOutput,
                "branches {input_branch:?} / {output_branch:?} should compare equal"
            );
        }
    }

    #[test]
    fn test_should_compare_urls_after_trimming() {
        let repo = SimpleRepo::builder()
            .input(location("  https://github.com/user/repo  ", Some("main")))
            .output(location("https://github.com/user/repo", Some("main")))
            .build();
        assert_eq!(
            repo.validate().expect_err("should reject"),
            ValidationError::IdenticalInputOutput
        );
    }

    #[test]
    fn test_should_accept_blank_branch_when_other_side_has_one() {
        let repo = SimpleRepo::builder()
            .input(location("https://github.com/user/repo", Some("main")))
            .output(location("https://github.com/user/repo", Some("  ")))
            .build();
        assert!(repo.validate().is_ok(), "main vs blank branch differs");
    }

    #[test]
    fn test_should_validate_empty_repo_list() {
        assert!(validate_repos(&[]).is_ok());
    }

    #[test]
    fn test_should_validate_list_of_valid_repos() {
        let repos = vec![
            SimpleRepo::builder()
                .input(location("https://github.com/user/one", None))
                .build(),
            SimpleRepo::builder()
                .input(location("https://github.com/user/two", Some("main")))
                .build(),
        ];
        assert!(validate_repos(&repos).is_ok());
    }

    #[test]
    fn test_should_attach_index_of_first_invalid_entry() {
        let repos = vec![
            SimpleRepo::builder()
                .input(location("https://github.com/user/one", None))
                .build(),
            SimpleRepo::default(),
        ];
        let err = validate_repos(&repos).expect_err("should reject list");
        match err {
            CoreError::InvalidRepo { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source, ValidationError::MissingInput);
            }
            other => panic!("expected InvalidRepo, got {other:?}"),
        }
    }

    #[test]
    fn test_should_format_list_error_with_index() {
        let repos = vec![SimpleRepo::builder().input(location("", None)).build()];
        let err = validate_repos(&repos).expect_err("should reject list");
        assert_eq!(err.to_string(), "repos[0]: input.url is required");
    }
}
