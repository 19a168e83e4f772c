//! Error types for `jest-mongodb-settings`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `jest-mongodb-settings` pipeline.
///
/// Configuration problems never appear here: the resolver turns them into
/// defaults and logs them.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `--dir` does not name a directory.
    #[error("project directory {0} does not exist or is not a directory")]
    NotADirectory(Utf8PathBuf),

    /// The settings could not be encoded.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to the output stream failed.
    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),
}
