//! Availability checks for external programs used by importer tests.
//!
//! Tests that need a real JavaScript runtime call [`node_available`] first
//! and return early when it is absent, so the suite stays green on machines
//! without Node.js.

use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Returns `true` when `program --version` runs and exits successfully.
#[must_use]
pub fn program_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Returns `true` when `node` is on `PATH`. The check runs once per process.
#[must_use]
pub fn node_available() -> bool {
    static NODE: OnceLock<bool> = OnceLock::new();
    *NODE.get_or_init(|| program_available("node"))
}
