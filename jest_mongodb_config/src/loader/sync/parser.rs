//! Format-specific parsing for declarative configuration files.

use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
#[cfg(feature = "json5")]
use figment_json5::Json5;
use serde_json::Value as JsonValue;

use std::path::Path;

use crate::{LoadError, LoadResult};

/// File formats that can be loaded without a JavaScript runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeclarativeFormat {
    Json,
    Json5,
    Toml,
}

impl DeclarativeFormat {
    /// Selects a format from the file extension, case-insensitively.
    pub(super) fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Some(Self::Json),
            Some("json5") => Some(Self::Json5),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse configuration data in `format`.
///
/// Returns `Ok(None)` for a JSON document that is exactly `null`.
///
/// # Errors
///
/// Returns a [`LoadError::Parse`] if the contents fail to parse or if the
/// `json5` feature is required but disabled.
pub(super) fn parse_config_by_format(
    path: &Path,
    format: DeclarativeFormat,
    data: &str,
) -> LoadResult<Option<Figment>> {
    let figment = match format {
        DeclarativeFormat::Json => {
            // Validate with serde_json first so errors carry this file's
            // context and a bare `null` can be told apart from a document.
            let value: JsonValue =
                serde_json::from_str(data).map_err(|e| LoadError::parse(path, e))?;
            if value.is_null() {
                return Ok(None);
            }
            Figment::from(Json::string(data))
        }
        DeclarativeFormat::Json5 => {
            #[cfg(feature = "json5")]
            {
                Figment::from(Json5::string(data))
            }
            #[cfg(not(feature = "json5"))]
            {
                return Err(LoadError::parse(
                    path,
                    "json5 feature disabled: enable the 'json5' feature to support this file format",
                ));
            }
        }
        DeclarativeFormat::Toml => {
            toml::from_str::<toml::Table>(data).map_err(|e| LoadError::parse(path, e))?;
            Figment::from(Toml::string(data))
        }
    };

    Ok(Some(figment))
}
