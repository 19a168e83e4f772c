//! In-process loading of declarative configuration files.

use figment::Figment;
use figment::value::Value as FigmentValue;

use std::path::Path;

use super::ConfigLoader;
use crate::{Configuration, LoadError, LoadResult};

mod parser;

use parser::{DeclarativeFormat, parse_config_by_format};

/// Key whose value replaces the whole document when present.
const DEFAULT_EXPORT_KEY: &str = "default";

/// Loads JSON, TOML, and (with the `json5` feature) JSON5 files on the
/// calling thread.
///
/// A document of the form `{"default": {...}}` is unwrapped, mirroring a
/// module whose default export holds the configuration. Script modules are
/// rejected with [`LoadError::RequiresEvaluation`] so the resolver can hand
/// them to the [`crate::SubprocessImporter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SynchronousLoader;

impl SynchronousLoader {
    /// Creates the loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfigLoader for SynchronousLoader {
    fn name(&self) -> &'static str {
        "synchronous"
    }

    fn load(&self, path: &Path) -> LoadResult<Option<Configuration>> {
        if !path.is_file() {
            return Err(LoadError::not_found(path));
        }
        let Some(format) = DeclarativeFormat::from_path(path) else {
            return Err(LoadError::RequiresEvaluation {
                path: path.to_path_buf(),
            });
        };
        let data = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(document) = parse_config_by_format(path, format, &data)? else {
            return Ok(None);
        };
        let Some(export) = select_default_export(path, document)? else {
            return Ok(None);
        };
        export
            .extract::<Configuration>()
            .map(Some)
            .map_err(|e| LoadError::parse(path, e))
    }
}

/// Narrow `document` to its `default` table when one is defined.
///
/// A `default` that is present but `null` is the export, and it exports
/// nothing.
fn select_default_export(path: &Path, document: Figment) -> LoadResult<Option<Figment>> {
    match document.find_value(DEFAULT_EXPORT_KEY) {
        Ok(FigmentValue::Dict(..)) => Ok(Some(document.focus(DEFAULT_EXPORT_KEY))),
        Ok(FigmentValue::Empty(..)) => Ok(None),
        Ok(_) => Err(LoadError::parse(
            path,
            "'default' must hold a table of configuration values",
        )),
        Err(e) if e.missing() => Ok(Some(document)),
        Err(e) => Err(LoadError::parse(path, e)),
    }
}
