//! Command-line interface definitions for `jest-mongodb-settings`.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use jest_mongodb_config::DEFAULT_RUNTIME;

/// Output formats supported by `jest-mongodb-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON object.
    Json,
    /// Shell-quoted `KEY='value'` lines suitable for `eval` or `.env` files.
    Env,
}

impl OutputFormat {
    /// Returns the CLI-friendly string for this output format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Env => "env",
        }
    }
}

/// Parsed CLI arguments for `jest-mongodb-settings`.
#[derive(Debug, Parser)]
#[command(name = "jest-mongodb-settings")]
#[command(about = "Print the database fixture settings for a project")]
#[command(version)]
pub struct Args {
    /// Project directory to resolve from (defaults to the current directory).
    #[arg(long, value_name = "path")]
    pub dir: Option<Utf8PathBuf>,
    /// Configuration file name; disables the `MONGO_MEMORY_SERVER_FILE` override.
    #[arg(long, value_name = "name")]
    pub config_file: Option<String>,
    /// Program used to evaluate script configuration modules.
    #[arg(long, value_name = "program", default_value = DEFAULT_RUNTIME)]
    pub runtime: String,
    /// Upper bound on a script import, in milliseconds.
    #[arg(long, value_name = "ms", default_value_t = 30_000)]
    pub timeout_ms: u64,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}
