//! Strategies that turn a configuration path into a [`Configuration`].
//!
//! The resolver runs a fast in-process strategy first and only falls back to
//! the out-of-process importer when that fails.

use std::fmt;
use std::path::Path;

use crate::{Configuration, LoadResult};

mod subprocess;
mod sync;

pub use subprocess::{DEFAULT_IMPORT_TIMEOUT, DEFAULT_RUNTIME, SubprocessImporter};
pub use sync::SynchronousLoader;

/// A single way of loading a configuration file.
pub trait ConfigLoader: fmt::Debug + Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    /// Loads the configuration stored at `path`.
    ///
    /// `Ok(None)` means the file was evaluated and deliberately exports
    /// nothing; the resolver caches that outcome without trying another
    /// strategy.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::LoadError`] when the file is missing or cannot be
    /// evaluated by this strategy.
    fn load(&self, path: &Path) -> LoadResult<Option<Configuration>>;
}
