//! Throwaway project directories holding configuration files.

use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary project directory, removed on drop.
///
/// # Examples
///
/// ```
/// use jest_mongodb_config_test_helpers::fixture::ProjectDir;
///
/// let project = ProjectDir::new()?;
/// let path = project.write("jest-mongodb-config.json", r#"{"mongoURLEnvName":"DB_URL"}"#)?;
/// assert!(path.starts_with(project.path()));
/// assert!(path.as_std_path().is_file());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct ProjectDir {
    dir: TempDir,
    path: Utf8PathBuf,
}

impl ProjectDir {
    /// Creates an empty project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create project dir")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|raw| anyhow!("temp dir is not valid UTF-8: {}", raw.display()))?;
        Ok(Self { dir, path })
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the directory as a standard path, for APIs taking `&Path`.
    #[must_use]
    pub fn std_path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Writes `contents` to `name` inside the directory, creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or a parent directory cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let target = self.path.join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&target, contents).with_context(|| format!("write {target}"))?;
        Ok(target)
    }
}
