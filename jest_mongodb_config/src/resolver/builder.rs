//! Builder for [`ConfigResolver`].

use std::fmt;
use std::sync::Arc;

use super::ConfigResolver;
use crate::{
    ConfigCache, ConfigLoader, ConfigLocator, FailureHook, LoadFailure, SubprocessImporter,
    SynchronousLoader,
};

/// Builder for [`ConfigResolver`].
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::{ConfigLocator, ConfigResolver, SubprocessImporter};
/// use std::time::Duration;
///
/// let resolver = ConfigResolver::builder()
///     .locator(ConfigLocator::new().file_name("jest-mongodb-config.json"))
///     .fallback(SubprocessImporter::new().timeout(Duration::from_secs(5)))
///     .on_failure(|failure| {
///         if !failure.is_missing_file() {
///             eprintln!("ignoring broken config: {}", failure.error);
///         }
///     })
///     .build();
/// assert!(resolver.cache().is_empty());
/// ```
#[derive(Default)]
pub struct ConfigResolverBuilder {
    locator: ConfigLocator,
    primary: Option<Box<dyn ConfigLoader>>,
    fallback: Option<Box<dyn ConfigLoader>>,
    cache: Option<Arc<ConfigCache>>,
    on_failure: Option<FailureHook>,
}

impl ConfigResolverBuilder {
    /// Creates a builder with the default locator and strategies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the locator.
    #[must_use]
    pub fn locator(mut self, locator: ConfigLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Replaces the in-process strategy (default: [`SynchronousLoader`]).
    #[must_use]
    pub fn primary(mut self, loader: impl ConfigLoader + 'static) -> Self {
        self.primary = Some(Box::new(loader));
        self
    }

    /// Replaces the fallback strategy (default: [`SubprocessImporter`]).
    #[must_use]
    pub fn fallback(mut self, loader: impl ConfigLoader + 'static) -> Self {
        self.fallback = Some(Box::new(loader));
        self
    }

    /// Uses `cache` instead of a fresh, private cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<ConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers a callback for failures the resolver swallows.
    #[must_use]
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoadFailure<'_>) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(callback));
        self
    }

    /// Builds the resolver.
    #[must_use]
    pub fn build(self) -> ConfigResolver {
        ConfigResolver {
            locator: self.locator,
            primary: self
                .primary
                .unwrap_or_else(|| Box::new(SynchronousLoader::new())),
            fallback: self
                .fallback
                .unwrap_or_else(|| Box::new(SubprocessImporter::new())),
            cache: self.cache.unwrap_or_default(),
            on_failure: self.on_failure,
        }
    }
}

impl fmt::Debug for ConfigResolverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolverBuilder")
            .field("locator", &self.locator)
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .field("has_failure_hook", &self.on_failure.is_some())
            .finish_non_exhaustive()
    }
}
