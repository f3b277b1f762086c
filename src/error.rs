use std::path::PathBuf;
use thiserror::Error;

/// Failures reading people or configuration from disk.
///
/// The layout engine itself is total and never produces these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid people document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("people document must be an array of people or an object with a `people` array, found {found}")]
    Shape { found: &'static str },

    #[error("invalid config ({origin}): {message}")]
    Config { origin: String, message: String },
}
