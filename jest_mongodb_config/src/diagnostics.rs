//! Reporting for strategy failures the resolver swallows.
//!
//! A malformed configuration file and a missing one both resolve to the
//! defaults. Failures are logged through `tracing` and optionally handed to a
//! callback so operators can tell the two apart.

use std::path::Path;
use std::sync::Arc;

use crate::LoadError;

/// A strategy failure observed while resolving a configuration.
#[derive(Debug, Clone, Copy)]
pub struct LoadFailure<'a> {
    /// Path the strategy attempted to load.
    pub path: &'a Path,
    /// Name of the strategy, as reported by [`crate::ConfigLoader::name`].
    pub loader: &'static str,
    /// Error returned by the strategy.
    pub error: &'a LoadError,
}

impl LoadFailure<'_> {
    /// Returns `true` when the failure only means the file is absent.
    #[must_use]
    pub const fn is_missing_file(&self) -> bool {
        self.error.is_not_found()
    }
}

/// Callback invoked for every swallowed strategy failure.
pub type FailureHook = Arc<dyn Fn(&LoadFailure<'_>) + Send + Sync>;

pub(crate) fn report(failure: &LoadFailure<'_>, hook: Option<&FailureHook>) {
    if failure.is_missing_file() {
        tracing::debug!(
            path = %failure.path.display(),
            loader = failure.loader,
            "no configuration file found"
        );
    } else {
        tracing::warn!(
            path = %failure.path.display(),
            loader = failure.loader,
            error = %failure.error,
            "configuration file could not be loaded"
        );
    }
    if let Some(callback) = hook {
        callback(failure);
    }
}
