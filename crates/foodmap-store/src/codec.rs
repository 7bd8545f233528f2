//! Text form of the experience store.
//!
//! The wire shape is a JSON object keyed by place id, each value an array
//! of records oldest first:
//!
//! ```json
//! { "Cafe Kitsune": [ { "food": "Latte", "rating": "liked", "notes": "", "date": "2024-01-01" } ] }
//! ```
//!
//! Exports from older versions use the same shape and decode unchanged.
//! Decoding goes through an untyped
//! [`serde_json::Value`] first so every structural fault can be reported
//! with the place and record it occurred in. `Value` keeps only the last
//! of repeated object keys, so the top level is scanned separately and a
//! place id that appears twice is rejected.

use std::collections::BTreeSet;
use std::fmt;

use foodmap_types::{ExperienceMap, ExperienceRecord, PlaceId};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;

use crate::error::{CodecError, ParseError};

/// Encode a store compactly. Keys come out sorted.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails, which cannot happen for
/// maps built from validated records.
pub fn encode(map: &ExperienceMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string(map)?)
}

/// Encode a store with indentation, for files a person may open.
///
/// # Errors
///
/// Same as [`encode`].
pub fn encode_pretty(map: &ExperienceMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(map)?)
}

/// Decode text into a store mapping.
///
/// A JSON `null` decodes to an empty map. Places whose record list is
/// empty are dropped. On any error no map is produced.
///
/// # Errors
///
/// Returns [`ParseError`] describing the first structural problem found.
pub fn decode(text: &str) -> Result<ExperienceMap, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        ParseError::new(format!(
            "invalid JSON at line {} column {}: {e}",
            e.line(),
            e.column()
        ))
    })?;

    let entries = match value {
        Value::Null => return Ok(ExperienceMap::new()),
        Value::Object(entries) => entries,
        other => {
            return Err(ParseError::new(format!(
                "expected an object keyed by place id, found {}",
                kind_of(&other)
            )));
        }
    };

    serde_json::from_str::<UniqueKeys>(text).map_err(|e| ParseError::new(e.to_string()))?;

    let mut map = ExperienceMap::new();
    for (place, records) in entries {
        let Value::Array(items) = records else {
            return Err(ParseError::new(format!(
                "experiences for place {place:?} must be a list, found {}",
                kind_of(&records)
            )));
        };
        if items.is_empty() {
            continue;
        }

        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let record: ExperienceRecord = serde_json::from_value(item).map_err(|e| {
                ParseError::new(format!("record {index} for place {place:?}: {e}"))
            })?;
            if record.food.trim().is_empty() {
                return Err(ParseError::new(format!(
                    "record {index} for place {place:?}: food must not be empty"
                )));
            }
            decoded.push(record);
        }
        map.insert(PlaceId::new(place), decoded);
    }
    Ok(map)
}

/// Marker deserialized from the top-level object; fails on a repeated key.
struct UniqueKeys;

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UniqueKeysVisitor)
    }
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = UniqueKeys;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by place id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut seen = BTreeSet::new();
        while let Some(key) = map.next_key::<String>()? {
            map.next_value::<IgnoredAny>()?;
            if seen.contains(&key) {
                return Err(de::Error::custom(format!(
                    "place {key:?} appears more than once"
                )));
            }
            seen.insert(key);
        }
        Ok(UniqueKeys)
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
