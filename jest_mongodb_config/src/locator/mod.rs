//! Computes where the configuration file lives.
//!
//! The locator performs no I/O beyond reading the process environment and,
//! for relative or omitted base directories, the current working directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configuration file name.
pub const CONFIG_FILE_ENV_VAR: &str = "MONGO_MEMORY_SERVER_FILE";

/// File name used when no override is present.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "jest-mongodb-config.js";

/// Resolves the absolute configuration path for a base directory.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::ConfigLocator;
/// use std::path::Path;
///
/// let locator = ConfigLocator::new()
///     .without_env_override()
///     .file_name("jest-mongodb-config.json");
/// assert_eq!(
///     locator.locate(Some(Path::new("/srv/app"))),
///     Path::new("/srv/app/jest-mongodb-config.json"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    env_var: Option<String>,
    file_name: String,
}

impl Default for ConfigLocator {
    fn default() -> Self {
        Self {
            env_var: Some(String::from(CONFIG_FILE_ENV_VAR)),
            file_name: String::from(DEFAULT_CONFIG_FILE_NAME),
        }
    }
}

impl ConfigLocator {
    /// Creates a locator honouring [`CONFIG_FILE_ENV_VAR`] and falling back to
    /// [`DEFAULT_CONFIG_FILE_NAME`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment variable consulted for an override.
    #[must_use]
    pub fn env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    /// Ignores the environment entirely.
    #[must_use]
    pub fn without_env_override(mut self) -> Self {
        self.env_var = None;
        self
    }

    /// Sets the file name used when no override is present.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Returns the configured file name, preferring a non-empty override.
    #[must_use]
    pub fn config_file(&self) -> OsString {
        self.env_var
            .as_ref()
            .and_then(|key| std::env::var_os(key).filter(|value| !value.is_empty()))
            .unwrap_or_else(|| OsString::from(&self.file_name))
    }

    /// Returns the absolute base directory for `base_dir`.
    ///
    /// `None` and the empty path both mean the current working directory.
    /// This value keys the resolver cache.
    #[must_use]
    pub fn base_dir(base_dir: Option<&Path>) -> PathBuf {
        match base_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf()),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Returns the absolute configuration path under `base_dir`.
    ///
    /// An absolute override replaces the base directory.
    #[must_use]
    pub fn locate(&self, base_dir: Option<&Path>) -> PathBuf {
        Self::base_dir(base_dir).join(self.config_file())
    }
}
