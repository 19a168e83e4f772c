//! Error types produced while loading a configuration file.
//!
//! None of these reach callers of the public accessors; the resolver collapses
//! every failure into "no configuration" and reports it through
//! [`crate::LoadFailure`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Result alias used by configuration loading strategies.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failures a [`crate::ConfigLoader`] strategy can report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// No file exists at the located path.
    #[error("configuration file '{}' does not exist", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file is a script module and cannot be loaded in-process.
    #[error("configuration file '{}' requires a JavaScript runtime to evaluate", path.display())]
    RequiresEvaluation {
        /// Path of the script module.
        path: PathBuf,
    },

    /// Reading the file failed.
    #[error("failed to read configuration file '{}': {source}", path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents could not be parsed into a configuration.
    #[error("failed to parse configuration file '{}': {source}", path.display())]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The path cannot be handed to the import script.
    #[error("configuration path '{}' is not valid UTF-8", path.display())]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },

    /// The import subprocess could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Runtime program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Polling the import subprocess failed.
    #[error("failed to wait for the import of '{}': {source}", path.display())]
    Wait {
        /// Configuration path being imported.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The import subprocess did not finish in time and was killed.
    #[error("importing '{}' timed out after {timeout:?}", path.display())]
    Timeout {
        /// Configuration path being imported.
        path: PathBuf,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// The import subprocess exited unsuccessfully.
    #[error("importing '{}' failed (status {status}): {stderr}", path.display())]
    ExitStatus {
        /// Configuration path being imported.
        path: PathBuf,
        /// Exit code, or `-1` when the child was terminated by a signal.
        status: i32,
        /// Trimmed standard error of the child.
        stderr: String,
    },

    /// The import subprocess succeeded without printing a payload.
    #[error("importing '{}' produced no output", path.display())]
    EmptyOutput {
        /// Configuration path being imported.
        path: PathBuf,
    },

    /// The import subprocess printed something that is not a configuration.
    #[error("importing '{}' produced an invalid payload: {source}", path.display())]
    Payload {
        /// Configuration path being imported.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns `true` when the failure means the file simply does not exist.
    ///
    /// Every other variant indicates a file that was found but failed to
    /// evaluate.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(path: &Path) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn parse(path: &Path, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Tests for error classification.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_file_is_not_found() {
        let err = LoadError::not_found(Path::new("/tmp/jest-mongodb-config.js"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("does not exist"));
    }

    #[rstest]
    #[case(LoadError::RequiresEvaluation { path: PathBuf::from("cfg.mjs") })]
    #[case(LoadError::EmptyOutput { path: PathBuf::from("cfg.mjs") })]
    #[case(LoadError::ExitStatus { path: PathBuf::from("cfg.mjs"), status: 1, stderr: String::from("boom") })]
    #[case(LoadError::parse(Path::new("cfg.json"), "unexpected token"))]
    fn evaluation_failures_are_not_missing_files(#[case] err: LoadError) {
        assert!(!err.is_not_found());
    }
}
