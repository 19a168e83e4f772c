//! CLI entrypoint for `jest-mongodb-settings`.

use clap::Parser;
use jest_mongodb_settings::cli::Args;
use jest_mongodb_settings::error::SettingsError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SettingsError> {
    init_logging();
    let args = Args::parse();
    let stdout = std::io::stdout();
    jest_mongodb_settings::run(&args, &mut stdout.lock())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
