//! Configuration resolution for the jest-mongodb test fixture.
//!
//! A project describes its database fixture in a `jest-mongodb-config` file.
//! This crate finds that file, loads it once per working directory, and
//! derives the three settings the fixture bootstrapper needs:
//!
//! - the memory-server options ([`mongodb_memory_options`]),
//! - the environment variable receiving the connection URL
//!   ([`mongo_url_env_name`]),
//! - whether all workers share one database
//!   ([`should_use_shared_db_for_all_jest_workers`]).
//!
//! Declarative files (JSON, TOML, and JSON5 with the `json5` feature) are
//! loaded in-process by [`SynchronousLoader`]. Script modules are imported by
//! a child `node` process through [`SubprocessImporter`], whose wait is
//! bounded by a timeout. Accessors never fail: anything that cannot be loaded
//! yields the documented defaults, and the swallowed failures are reported
//! through `tracing` and [`ConfigResolverBuilder::on_failure`].
//!
//! The free functions share one process-wide [`ConfigResolver`]. Build your
//! own resolver when you need an isolated cache or custom strategies.

use std::path::Path;
use std::sync::LazyLock;

mod cache;
mod diagnostics;
mod error;
mod loader;
mod locator;
mod options;
mod resolver;

pub use cache::{ConfigCache, ResolvedEntry};
pub use diagnostics::{FailureHook, LoadFailure};
pub use error::{LoadError, LoadResult};
pub use loader::{
    ConfigLoader, DEFAULT_IMPORT_TIMEOUT, DEFAULT_RUNTIME, SubprocessImporter, SynchronousLoader,
};
pub use locator::{CONFIG_FILE_ENV_VAR, ConfigLocator, DEFAULT_CONFIG_FILE_NAME};
pub use options::{
    Configuration, FixtureSettings, MemoryServerOptions, OptionsShape,
    is_mongo_memory_repl_set_options,
};
pub use resolver::{ConfigResolver, ConfigResolverBuilder, DEFAULT_MONGO_URL_ENV_NAME};

static DEFAULT_RESOLVER: LazyLock<ConfigResolver> = LazyLock::new(ConfigResolver::new);

/// Returns the process-wide resolver behind the free functions.
#[must_use]
pub fn default_resolver() -> &'static ConfigResolver {
    &DEFAULT_RESOLVER
}

/// Returns the memory-server options for `base_dir` (default: the current
/// directory) using the process-wide resolver.
///
/// See [`ConfigResolver::mongodb_memory_options`].
#[must_use]
pub fn mongodb_memory_options(base_dir: Option<&Path>) -> MemoryServerOptions {
    default_resolver().mongodb_memory_options(base_dir)
}

/// Returns the connection URL environment variable name for `base_dir`
/// using the process-wide resolver.
///
/// See [`ConfigResolver::mongo_url_env_name`].
#[must_use]
pub fn mongo_url_env_name(base_dir: Option<&Path>) -> String {
    default_resolver().mongo_url_env_name(base_dir)
}

/// Returns whether all workers share one database for `base_dir` using the
/// process-wide resolver.
///
/// See [`ConfigResolver::should_use_shared_db_for_all_jest_workers`].
#[must_use]
pub fn should_use_shared_db_for_all_jest_workers(base_dir: Option<&Path>) -> bool {
    default_resolver().should_use_shared_db_for_all_jest_workers(base_dir)
}
