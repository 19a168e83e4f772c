//! Configuration record and the memory-server options payload.
//!
//! The options payload is forwarded verbatim to the fixture bootstrapper, so
//! it is kept as an opaque JSON value. Only its shape (replica set or single
//! instance) is ever inspected here.

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

mod lenient;

/// Contents of a `jest-mongodb-config` file.
///
/// Every field is optional. A missing field means "use the default", which is
/// why `use_shared_db_for_all_jest_workers` stays an `Option<bool>` rather
/// than collapsing to `false`.
///
/// A field holding a value of the wrong type is dropped with a warning; its
/// well-typed siblings still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Options handed to the memory server or replica set.
    #[serde(
        rename = "mongodbMemoryServerOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mongodb_memory_server_options: Option<MemoryServerOptions>,

    /// Environment variable that receives the connection URL.
    #[serde(
        rename = "mongoURLEnvName",
        default,
        deserialize_with = "lenient::mongo_url_env_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub mongo_url_env_name: Option<String>,

    /// Whether every worker shares a single database.
    #[serde(
        rename = "useSharedDBForAllJestWorkers",
        default,
        deserialize_with = "lenient::shared_db",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_shared_db_for_all_jest_workers: Option<bool>,
}

/// Structural classification of [`MemoryServerOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsShape {
    /// Options carrying a truthy `replSet` descriptor.
    ReplicaSet,
    /// Options for a standalone instance (`binary`/`instance` descriptors).
    SingleInstance,
}

/// Opaque options payload for the memory server.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::{MemoryServerOptions, OptionsShape};
/// use serde_json::json;
///
/// let options = MemoryServerOptions::new(json!({"replSet": {"count": 3}}));
/// assert_eq!(options.shape(), OptionsShape::ReplicaSet);
/// assert_eq!(MemoryServerOptions::default().shape(), OptionsShape::SingleInstance);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryServerOptions(JsonValue);

impl MemoryServerOptions {
    /// Wraps a raw JSON payload.
    #[must_use]
    pub const fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Borrows the raw JSON payload.
    #[must_use]
    pub const fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Consumes the wrapper and returns the raw JSON payload.
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// Returns the shape of these options.
    #[must_use]
    pub fn shape(&self) -> OptionsShape {
        if self.0.get("replSet").is_some_and(is_truthy) {
            OptionsShape::ReplicaSet
        } else {
            OptionsShape::SingleInstance
        }
    }

    pub(crate) fn is_truthy(&self) -> bool {
        is_truthy(&self.0)
    }
}

impl Default for MemoryServerOptions {
    /// Single instance with binary checksum verification disabled.
    fn default() -> Self {
        Self(json!({
            "binary": { "checkMD5": false },
            "instance": {},
        }))
    }
}

impl From<JsonValue> for MemoryServerOptions {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Returns `true` when `options` exist and describe a replica set.
///
/// # Examples
///
/// ```rust
/// use jest_mongodb_config::{MemoryServerOptions, is_mongo_memory_repl_set_options};
/// use serde_json::json;
///
/// assert!(!is_mongo_memory_repl_set_options(None));
/// let repl = MemoryServerOptions::new(json!({"replSet": {"count": 1}}));
/// assert!(is_mongo_memory_repl_set_options(Some(&repl)));
/// ```
#[must_use]
pub fn is_mongo_memory_repl_set_options(options: Option<&MemoryServerOptions>) -> bool {
    options.is_some_and(|opts| opts.shape() == OptionsShape::ReplicaSet)
}

/// JavaScript truthiness for a JSON value.
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(flag) => *flag,
        JsonValue::Number(number) => number
            .as_f64()
            .is_some_and(|n| n.is_normal() || n.is_subnormal()),
        JsonValue::String(text) => !text.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// The three settings consumed by the fixture bootstrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureSettings {
    /// Options for the memory server or replica set.
    #[serde(rename = "mongodbMemoryServerOptions")]
    pub mongodb_memory_server_options: MemoryServerOptions,
    /// Environment variable that receives the connection URL.
    #[serde(rename = "mongoURLEnvName")]
    pub mongo_url_env_name: String,
    /// Whether every worker shares a single database.
    #[serde(rename = "useSharedDBForAllJestWorkers")]
    pub use_shared_db_for_all_jest_workers: bool,
}
