//! Scoped working directory changes.
//!
//! Resolution without an explicit base directory reads the process working
//! directory, which every test in a binary shares. [`set_dir`] takes a global
//! mutex, records where the process was, and moves back on drop.
//!
//! # Examples
//!
//! ```no_run
//! use jest_mongodb_config_test_helpers::cwd;
//!
//! let guard = cwd::set_dir("/tmp/project").expect("enter project dir");
//! // Relative lookups now start from `/tmp/project`.
//! guard.restore().expect("leave project dir");
//! ```

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use parking_lot::{Mutex, MutexGuard};

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// Restores the working directory on drop.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Returns the directory that will be restored.
    #[must_use]
    pub const fn original(&self) -> &Utf8PathBuf {
        &self.original
    }

    /// Moves back to the original directory now, surfacing any error.
    ///
    /// # Errors
    ///
    /// Returns an error if `set_current_dir` fails.
    pub fn restore(&self) -> std::io::Result<()> {
        std::env::set_current_dir(&self.original)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        // Best effort; call `restore` to observe failures.
        let _ignored = std::env::set_current_dir(&self.original);
    }
}

/// Changes the working directory to `path` until the guard is dropped.
///
/// The original directory is captured and checked for UTF-8 before moving,
/// so a failure leaves the process where it was.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or is not UTF-8,
/// or if `path` cannot be entered.
pub fn set_dir(path: impl AsRef<Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let current = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(current)
        .map_err(|raw| anyhow!("cwd is not valid UTF-8: {}", raw.display()))?;
    std::env::set_current_dir(path.as_ref())
        .with_context(|| format!("enter {}", path.as_ref().display()))?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
