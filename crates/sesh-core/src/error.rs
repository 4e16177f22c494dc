use thiserror::Error;

/// Client-correctable failures from repo admission validation.
///
/// The request layer returns these messages verbatim, so the wording is part
/// of the API contract and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The repo entry has no `input` location.
    #[error("input is required")]
    MissingInput,

    /// The `input` location has an empty or whitespace-only URL.
    #[error("input.url is required")]
    MissingInputUrl,

    /// `output` matches `input` after trimming and branch normalization.
    #[error("output repository must differ from input (different URL or branch required)")]
    IdenticalInputOutput,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("repos[{index}]: {source}")]
    InvalidRepo {
        index: usize,
        source: ValidationError,
    },

    #[error("malformed encoded repo: {0}")]
    MalformedEncodedRepo(String),

    #[error("session manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("invalid session manifest: {0}")]
    InvalidManifest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
