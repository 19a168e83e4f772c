//! Out-of-process import of script-module configuration files.
//!
//! Script modules can only be evaluated by a JavaScript runtime, and ES
//! modules only through an asynchronous `import()`. The importer runs that
//! import in a short-lived child process which prints the selected export as
//! JSON, and blocks the calling thread until the child finishes or the
//! timeout elapses.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::ConfigLoader;
use crate::{Configuration, LoadError, LoadResult};

mod wait;

/// Runtime program used when none is configured.
pub const DEFAULT_RUNTIME: &str = "node";

/// Upper bound on how long a single import may block the caller.
pub const DEFAULT_IMPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Imports a configuration module in a child runtime process.
///
/// The child is launched as
/// `<runtime> [runtime args...] --input-type=module --eval <script>`, where
/// the script imports the configuration path, prefers its default export, and
/// writes `JSON.stringify` of the result to standard output.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::SubprocessImporter;
/// use std::time::Duration;
///
/// let importer = SubprocessImporter::new()
///     .runtime("/usr/local/bin/node")
///     .runtime_args(["--no-warnings"])
///     .timeout(Duration::from_secs(5));
/// assert_eq!(importer.timeout_duration(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct SubprocessImporter {
    runtime: OsString,
    runtime_args: Vec<OsString>,
    timeout: Duration,
}

impl Default for SubprocessImporter {
    fn default() -> Self {
        Self {
            runtime: OsString::from(DEFAULT_RUNTIME),
            runtime_args: Vec::new(),
            timeout: DEFAULT_IMPORT_TIMEOUT,
        }
    }
}

impl SubprocessImporter {
    /// Creates an importer that runs `node` with a 30 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime program.
    #[must_use]
    pub fn runtime(mut self, program: impl Into<OsString>) -> Self {
        self.runtime = program.into();
        self
    }

    /// Sets arguments passed to the runtime ahead of the evaluation flags.
    #[must_use]
    pub fn runtime_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.runtime_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how long the caller may block on a single import.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    fn command(&self, script: String) -> Command {
        let mut command = Command::new(&self.runtime);
        command
            .args(&self.runtime_args)
            .arg("--input-type=module")
            .arg("--eval")
            .arg(script);
        command
    }
}

/// Builds the module script that imports `path` and prints its payload.
fn import_script(path: &Path) -> LoadResult<String> {
    let text = path.to_str().ok_or_else(|| LoadError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    // A JSON string literal is a valid JavaScript string literal.
    let literal = serde_json::to_string(text).map_err(|source| LoadError::Payload {
        path: path.to_path_buf(),
        source,
    })?;
    Ok([
        String::from("import {pathToFileURL} from \"node:url\";"),
        format!("const mod = await import(pathToFileURL({literal}).href);"),
        String::from("const exported = mod.default ?? mod;"),
        // A CommonJS module surfaces `module.exports` as `default`, so a
        // compiled `exports.default` sits one level further down.
        String::from(
            "const payload = exported !== null && typeof exported === \"object\" && exported.default !== undefined ? exported.default : exported;",
        ),
        String::from("console.log(JSON.stringify(payload));"),
    ]
    .join("\n"))
}

impl ConfigLoader for SubprocessImporter {
    fn name(&self) -> &'static str {
        "subprocess"
    }

    fn load(&self, path: &Path) -> LoadResult<Option<Configuration>> {
        if !path.is_file() {
            return Err(LoadError::not_found(path));
        }
        let script = import_script(path)?;
        tracing::debug!(
            path = %path.display(),
            runtime = %self.runtime.to_string_lossy(),
            "importing configuration in a child process"
        );

        let output = wait::output_with_timeout(self.command(script), self.timeout, path)?;
        if !output.status.success() {
            return Err(LoadError::ExitStatus {
                path: path.to_path_buf(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload = stdout.trim();
        if payload.is_empty() {
            return Err(LoadError::EmptyOutput {
                path: path.to_path_buf(),
            });
        }
        serde_json::from_str::<Option<Configuration>>(payload).map_err(|source| {
            LoadError::Payload {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
