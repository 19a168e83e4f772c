//! Field decoders that drop a mistyped value instead of failing the file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

fn field<'de, D, T>(deserializer: D, name: &'static str) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<JsonValue>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(field = name, error = %err, "ignoring mistyped configuration field");
            Ok(None)
        }
    }
}

pub(super) fn mongo_url_env_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    field(deserializer, "mongoURLEnvName")
}

pub(super) fn shared_db<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    field(deserializer, "useSharedDBForAllJestWorkers")
}
