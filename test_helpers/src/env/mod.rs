//! Scoped environment variable mutation for tests.
//!
//! The resolver reads `MONGO_MEMORY_SERVER_FILE` from the process
//! environment, so tests that set or clear it must not race each other.
//! Every mutation here takes one process-wide re-entrant lock and hands back a
//! guard that puts the previous value back when dropped. Guards for the same
//! key unwind in LIFO order.
//!
//! Use [`scope_with`] when a test needs the lock for its whole body, for
//! example while it resolves a configuration that depends on the variable.
//!
//! # Examples
//!
//! ```
//! use jest_mongodb_config_test_helpers::env;
//!
//! let _scope = env::scope_with(|lock| {
//!     vec![lock.set_var("MONGO_MEMORY_SERVER_FILE", "fixture.json")]
//! });
//! assert_eq!(
//!     std::env::var("MONGO_MEMORY_SERVER_FILE").as_deref(),
//!     Ok("fixture.json"),
//! );
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

fn mutate_locked<F>(key: String, mutator: F, _held: &ReentrantMutexGuard<'static, ()>) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Restores one environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

/// Holds the environment lock; mutations made through it stay serialised.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets `key` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        // SAFETY: `self.guard` holds `ENV_MUTEX`.
        mutate_locked(key.into(), |k| unsafe { env_set_var(k, value.as_ref()) }, &self.guard)
    }

    /// Removes `key` while the lock is held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        // SAFETY: `self.guard` holds `ENV_MUTEX`.
        mutate_locked(key.into(), |k| unsafe { env_remove_var(k) }, &self.guard)
    }
}

/// Keeps the lock and a set of guards alive together.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    _lock: EnvVarLock,
    guards: Vec<EnvVarGuard>,
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        drop(std::mem::take(&mut self.guards));
    }
}

/// Sets `key` to `value` until the returned guard is dropped.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let held = ENV_MUTEX.lock();
    // SAFETY: `held` holds `ENV_MUTEX`.
    mutate_locked(key.into(), |k| unsafe { env_set_var(k, value.as_ref()) }, &held)
}

/// Removes `key` until the returned guard is dropped.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    let held = ENV_MUTEX.lock();
    // SAFETY: `held` holds `ENV_MUTEX`.
    mutate_locked(key.into(), |k| unsafe { env_remove_var(k) }, &held)
}

/// Acquires the environment lock for the lifetime of the returned value.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Runs `builder` under the lock and keeps both the lock and the guards it
/// returns until the scope is dropped.
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    let lock = lock();
    let guards = builder(&lock);
    EnvScope {
        _lock: lock,
        guards,
    }
}

/// Runs `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _held = ENV_MUTEX.lock();
    f()
}
