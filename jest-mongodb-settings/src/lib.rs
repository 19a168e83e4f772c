//! Library interface for the `jest-mongodb-settings` command.
//!
//! The binary resolves a project's jest-mongodb configuration and prints the
//! three derived fixture settings. [`run`] holds that pipeline so it can be
//! driven without a process boundary.

use std::io::Write;
use std::time::Duration;

use jest_mongodb_config::{ConfigLocator, ConfigResolver, SubprocessImporter};

pub mod cli;
pub mod error;
pub mod output;

use crate::cli::Args;
use crate::error::SettingsError;

/// Builds the resolver described by `args`.
#[must_use]
pub fn build_resolver(args: &Args) -> ConfigResolver {
    let locator = args.config_file.as_deref().map_or_else(ConfigLocator::new, |name| {
        ConfigLocator::new().without_env_override().file_name(name)
    });
    let importer = SubprocessImporter::new()
        .runtime(args.runtime.as_str())
        .timeout(Duration::from_millis(args.timeout_ms));
    ConfigResolver::builder()
        .locator(locator)
        .fallback(importer)
        .build()
}

/// Resolves the settings for `args` and writes them to `out`.
///
/// # Errors
///
/// Returns [`SettingsError::NotADirectory`] when `--dir` is not a directory,
/// and encoding or write failures. Unreadable configuration files are not
/// errors; they resolve to the defaults.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), SettingsError> {
    if let Some(dir) = &args.dir
        && !dir.is_dir()
    {
        return Err(SettingsError::NotADirectory(dir.clone()));
    }

    let resolver = build_resolver(args);
    let settings = resolver.settings(args.dir.as_ref().map(|dir| dir.as_std_path()));
    tracing::debug!(
        format = args.format.as_str(),
        env_name = %settings.mongo_url_env_name,
        shared = settings.use_shared_db_for_all_jest_workers,
        "settings resolved"
    );

    let text = output::render(&settings, args.format)?;
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(SettingsError::Write)
}
