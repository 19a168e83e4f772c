//! Per-directory cache of resolved configurations.
//!
//! Entries are append-only: once a directory has been resolved, whether to a
//! configuration or to nothing, it is never resolved again for the lifetime
//! of the cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::Configuration;

/// Outcome of resolving one base directory.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedEntry {
    /// A configuration was loaded.
    Config(Arc<Configuration>),
    /// Nothing could be loaded, or the file exported nothing.
    Nothing,
}

impl ResolvedEntry {
    /// Borrows the configuration, if any.
    #[must_use]
    pub fn config(&self) -> Option<&Arc<Configuration>> {
        match self {
            Self::Config(config) => Some(config),
            Self::Nothing => None,
        }
    }

    /// Converts the entry into the configuration, if any.
    #[must_use]
    pub fn into_config(self) -> Option<Arc<Configuration>> {
        match self {
            Self::Config(config) => Some(config),
            Self::Nothing => None,
        }
    }
}

impl From<Option<Configuration>> for ResolvedEntry {
    fn from(config: Option<Configuration>) -> Self {
        config.map_or(Self::Nothing, |value| Self::Config(Arc::new(value)))
    }
}

type Slot = Arc<OnceLock<ResolvedEntry>>;

/// Thread-safe map from absolute base directory to [`ResolvedEntry`].
///
/// Callers resolving the same directory concurrently block on a single
/// resolution; different directories resolve independently.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::{ConfigCache, ResolvedEntry};
/// use std::path::Path;
///
/// let cache = ConfigCache::new();
/// let dir = Path::new("/srv/app");
/// assert_eq!(cache.get_or_resolve(dir, || ResolvedEntry::Nothing), ResolvedEntry::Nothing);
/// // The marker is cached, so the second closure never runs.
/// let entry = cache.get_or_resolve(dir, || unreachable!("already resolved"));
/// assert_eq!(entry, ResolvedEntry::Nothing);
/// ```
#[derive(Debug, Default)]
pub struct ConfigCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl ConfigCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry for `base_dir` without resolving it.
    #[must_use]
    pub fn get(&self, base_dir: &Path) -> Option<ResolvedEntry> {
        let slot = self.slots.lock().get(base_dir).cloned()?;
        slot.get().cloned()
    }

    /// Returns `true` when `base_dir` has been resolved.
    #[must_use]
    pub fn contains(&self, base_dir: &Path) -> bool {
        self.get(base_dir).is_some()
    }

    /// Returns the number of resolved directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Returns `true` when no directory has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry for `base_dir`, running `resolve` only if the
    /// directory has never been resolved.
    pub fn get_or_resolve<F>(&self, base_dir: &Path, resolve: F) -> ResolvedEntry
    where
        F: FnOnce() -> ResolvedEntry,
    {
        let slot = Arc::clone(
            self.slots
                .lock()
                .entry(base_dir.to_path_buf())
                .or_default(),
        );
        slot.get_or_init(resolve).clone()
    }
}
