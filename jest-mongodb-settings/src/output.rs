//! Rendering of resolved settings.

use std::fmt::Write as _;

use jest_mongodb_config::{FixtureSettings, is_mongo_memory_repl_set_options};

use crate::cli::OutputFormat;
use crate::error::SettingsError;

/// Renders `settings` in `format`, newline-terminated.
///
/// # Errors
///
/// Returns [`SettingsError::Encode`] if the options cannot be serialized.
pub fn render(settings: &FixtureSettings, format: OutputFormat) -> Result<String, SettingsError> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(settings)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Env => render_env(settings),
    }
}

fn render_env(settings: &FixtureSettings) -> Result<String, SettingsError> {
    let options = serde_json::to_string(settings.mongodb_memory_server_options.as_value())?;
    let repl_set = is_mongo_memory_repl_set_options(Some(&settings.mongodb_memory_server_options));
    let entries = [
        ("MONGODB_MEMORY_SERVER_OPTIONS", options),
        ("MONGO_URL_ENV_NAME", settings.mongo_url_env_name.clone()),
        (
            "USE_SHARED_DB_FOR_ALL_JEST_WORKERS",
            settings.use_shared_db_for_all_jest_workers.to_string(),
        ),
        ("IS_REPLICA_SET", repl_set.to_string()),
    ];

    let mut text = String::new();
    for (key, value) in entries {
        // Writing to a `String` cannot fail.
        let _ignored = writeln!(text, "{key}={}", shell_quote(&value));
    }
    Ok(text)
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
