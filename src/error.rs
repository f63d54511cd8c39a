//! Document error taxonomy

use thiserror::Error;

/// Errors raised while parsing or validating a single document.
///
/// None of these abort a batch: the loader records them next to the
/// offending path and moves on to the next document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed front-matter: {0}")]
    MalformedFrontMatter(String),

    #[error("invalid status `{0}` (expected `draft` or `published`)")]
    InvalidStatus(String),

    #[error("unparsable timestamp `{0}`")]
    UnparsableTimestamp(String),

    #[error("document body is empty")]
    EmptyBody,

    #[error("failed to serialize front-matter: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl DocumentError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFrontMatter(reason.into())
    }
}
