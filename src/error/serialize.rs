//! Structured serialization of error chains
//!
//! Every error becomes a map with `name`, `message` and `stack`, plus `cause`
//! when one is present. Error causes nest as maps, value causes are written
//! verbatim. Extra fields follow, except ones that would shadow those keys.

use std::error::Error as StdError;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::types::{Cause, ChainError, DEFAULT_NAME};

const RESERVED_KEYS: [&str; 4] = ["name", "message", "stack", "cause"];

impl Serialize for ChainError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(foreign) = self.foreign() {
            return ForeignNode(foreign).serialize(serializer);
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", self.name())?;
        map.serialize_entry("message", &self.message())?;
        map.serialize_entry("stack", &self.stack())?;
        match self.raw_cause() {
            Some(Cause::Error(cause)) => map.serialize_entry("cause", cause)?,
            Some(Cause::Value(value)) => map.serialize_entry("cause", value)?,
            None => {}
        }
        for (key, value) in self.fields() {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// An error this crate did not create, serialized from its `Display` and
/// `source()` alone.
struct ForeignNode<'a>(&'a (dyn StdError + 'static));

impl Serialize for ForeignNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(chain) = self.0.downcast_ref::<ChainError>() {
            return chain.serialize(serializer);
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", DEFAULT_NAME)?;
        map.serialize_entry("message", &self.0.to_string())?;
        map.serialize_entry("stack", &None::<String>)?;
        if let Some(source) = self.0.source() {
            map.serialize_entry("cause", &ForeignNode(source))?;
        }
        map.end()
    }
}

impl ChainError {
    /// Serialize this error and its causes into a JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
