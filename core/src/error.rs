use std::path::PathBuf;

use thiserror::Error;

/// Errors from the pure core: payload parsing, configuration, local reads.
///
/// All variants are fatal (process exits non-zero). Conditions that end a run
/// cleanly are not errors; they are represented by
/// [`SkipReason`](crate::SkipReason).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The event payload is missing a field the trigger requires.
    #[error("malformed event payload: {0}")]
    MalformedEvent(String),

    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    /// `GITHUB_REPOSITORY` is not of the form `owner/name`.
    #[error("invalid GITHUB_REPOSITORY value: {0:?}")]
    InvalidRepository(String),

    /// A local file read failed (event payload or documentation snippet).
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
