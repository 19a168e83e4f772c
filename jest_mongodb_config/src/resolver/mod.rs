//! Resolution pipeline and the derived fixture settings.
//!
//! [`ConfigResolver`] ties the locator, both loading strategies, and the cache
//! together. Its accessors never fail: when nothing can be loaded they return
//! the documented defaults.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::diagnostics::{self, FailureHook, LoadFailure};
use crate::{
    ConfigCache, ConfigLoader, ConfigLocator, Configuration, FixtureSettings, MemoryServerOptions,
    ResolvedEntry,
};

mod builder;

pub use builder::ConfigResolverBuilder;

/// Environment variable name used when the configuration names none.
pub const DEFAULT_MONGO_URL_ENV_NAME: &str = "MONGO_URL";

/// Resolves configuration files and derives fixture settings from them.
///
/// Each resolver owns (or shares, see [`ConfigResolverBuilder::cache`]) a
/// [`ConfigCache`], so a directory is loaded at most once per resolver.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::{ConfigLocator, ConfigResolver};
///
/// let dir = tempfile::tempdir()?;
/// std::fs::write(
///     dir.path().join("jest-mongodb-config.json"),
///     r#"{"mongoURLEnvName": "DATABASE_URL"}"#,
/// )?;
/// let resolver = ConfigResolver::builder()
///     .locator(ConfigLocator::new().without_env_override().file_name("jest-mongodb-config.json"))
///     .build();
///
/// assert_eq!(resolver.mongo_url_env_name(Some(dir.path())), "DATABASE_URL");
/// assert!(resolver.should_use_shared_db_for_all_jest_workers(Some(dir.path())));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ConfigResolver {
    locator: ConfigLocator,
    primary: Box<dyn ConfigLoader>,
    fallback: Box<dyn ConfigLoader>,
    cache: Arc<ConfigCache>,
    on_failure: Option<FailureHook>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigResolver {
    /// Creates a resolver with the default locator and strategies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for customising the resolver.
    #[must_use]
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// Returns the cache backing this resolver.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ConfigCache> {
        &self.cache
    }

    /// Returns the locator used to find configuration files.
    #[must_use]
    pub const fn locator(&self) -> &ConfigLocator {
        &self.locator
    }

    /// Returns the configuration for `base_dir`, loading it on first use.
    ///
    /// `None` means the current working directory. Repeated calls for the
    /// same directory return the same [`Arc`] without touching the file
    /// system again.
    #[must_use]
    pub fn resolve(&self, base_dir: Option<&Path>) -> Option<Arc<Configuration>> {
        let key = ConfigLocator::base_dir(base_dir);
        self.cache
            .get_or_resolve(&key, || self.load_entry(&key))
            .into_config()
    }

    /// Returns the memory-server options for `base_dir`.
    ///
    /// Falls back to a single instance with checksum verification disabled.
    #[must_use]
    pub fn mongodb_memory_options(&self, base_dir: Option<&Path>) -> MemoryServerOptions {
        memory_options_from(self.resolve(base_dir).as_deref())
    }

    /// Returns the name of the environment variable that receives the
    /// connection URL, defaulting to [`DEFAULT_MONGO_URL_ENV_NAME`].
    #[must_use]
    pub fn mongo_url_env_name(&self, base_dir: Option<&Path>) -> String {
        mongo_url_env_name_from(self.resolve(base_dir).as_deref())
    }

    /// Returns whether all workers share one database, defaulting to `true`.
    #[must_use]
    pub fn should_use_shared_db_for_all_jest_workers(&self, base_dir: Option<&Path>) -> bool {
        shared_db_from(self.resolve(base_dir).as_deref())
    }

    /// Returns all three derived settings from a single resolution.
    #[must_use]
    pub fn settings(&self, base_dir: Option<&Path>) -> FixtureSettings {
        let resolved = self.resolve(base_dir);
        let config = resolved.as_deref();
        FixtureSettings {
            mongodb_memory_server_options: memory_options_from(config),
            mongo_url_env_name: mongo_url_env_name_from(config),
            use_shared_db_for_all_jest_workers: shared_db_from(config),
        }
    }

    fn load_entry(&self, base_dir: &Path) -> ResolvedEntry {
        let path = self.locator.locate(Some(base_dir));
        let span = tracing::debug_span!("resolve_config", path = %path.display());
        let _entered = span.enter();

        for loader in [&self.primary, &self.fallback] {
            match loader.load(&path) {
                Ok(config) => {
                    tracing::debug!(
                        loader = loader.name(),
                        found = config.is_some(),
                        "configuration resolved"
                    );
                    return ResolvedEntry::from(config);
                }
                Err(error) => diagnostics::report(
                    &LoadFailure {
                        path: &path,
                        loader: loader.name(),
                        error: &error,
                    },
                    self.on_failure.as_ref(),
                ),
            }
        }
        ResolvedEntry::Nothing
    }
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("locator", &self.locator)
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .field("cached_dirs", &self.cache.len())
            .finish_non_exhaustive()
    }
}

fn memory_options_from(config: Option<&Configuration>) -> MemoryServerOptions {
    config
        .and_then(|c| c.mongodb_memory_server_options.as_ref())
        .filter(|options| options.is_truthy())
        .cloned()
        .unwrap_or_default()
}

fn mongo_url_env_name_from(config: Option<&Configuration>) -> String {
    config
        .and_then(|c| c.mongo_url_env_name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_MONGO_URL_ENV_NAME)
        .to_owned()
}

// An explicit `false` must survive; only absence falls back to sharing.
fn shared_db_from(config: Option<&Configuration>) -> bool {
    config
        .and_then(|c| c.use_shared_db_for_all_jest_workers)
        .unwrap_or(true)
}

#[cfg(test)]
mod tests;
