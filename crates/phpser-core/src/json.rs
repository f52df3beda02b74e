//! JSON and serde bridges.
//!
//! `serde_json::Value` is the intermediate representation between Rust types,
//! JSON text and PHP values. Conversions follow what PHP itself does when it
//! round-trips `json_decode($s, true)` through `serialize()`:
//!
//! - JSON objects become mappings; keys holding canonical decimal integers
//!   (`"5"`, `"-3"`) become integer keys.
//! - Integers that do not fit in `i64` become floats.
//! - On the way back, list-shaped arrays become JSON arrays, every other array
//!   or object becomes a JSON object with string keys, and enum cases become
//!   `"Class::Case"` strings.

use crate::decoder::decode_with;
use crate::encoder::encode;
use crate::error::{PhpError, Result};
use crate::options::DecodeOptions;
use crate::types::{Key, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number};

impl Value {
    /// Convert a JSON value into a PHP value. Never fails.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => number_to_value(n),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (Key::normalized(k.as_str()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a PHP value into JSON.
    ///
    /// Fails with [`PhpError::Encode`] for `NAN`/`INF`, which JSON cannot
    /// represent, and when two keys map to the same JSON key: `Key::Int(1)`
    /// next to `Key::Str("1")`, or a private and a public property of the
    /// same name.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    PhpError::encode(format!("float {f} has no JSON representation"))
                })?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_>>()?,
            ),
            Value::Mapping(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    if map.insert(key.to_string(), value.to_json()?).is_some() {
                        return Err(PhpError::encode(format!(
                            "keys collide on {:?} in JSON",
                            key.to_string()
                        )));
                    }
                }
                serde_json::Value::Object(map)
            }
            Value::Object(obj) => {
                let mut map = Map::new();
                for (name, _, value) in obj.properties_demangled() {
                    if map.insert(name.to_string(), value.to_json()?).is_some() {
                        return Err(PhpError::encode(format!(
                            "properties of {} collide on {name:?} once demangled",
                            obj.class
                        )));
                    }
                }
                serde_json::Value::Object(map)
            }
            Value::Enum { class, case } => serde_json::Value::String(format!("{class}::{case}")),
        })
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Int(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::Float(u as f64);
    }
    Value::Float(n.as_f64().unwrap_or(f64::NAN))
}

/// Encode a JSON string as PHP serialized text.
///
/// ```
/// let php = phpser_core::encode_json(r#"{"a":1,"b":[1,2]}"#).unwrap();
/// assert_eq!(php, r#"a:2:{s:1:"a";i:1;s:1:"b";a:2:{i:0;i:1;i:1;i:2;}}"#);
/// ```
pub fn encode_json(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    encode(&Value::from_json(&value))
}

/// Decode PHP serialized text into compact JSON.
///
/// The output is minified — use `serde_json::to_string_pretty` on the parsed
/// result if human-readable JSON is needed.
pub fn decode_json(php: &str) -> Result<String> {
    decode_json_with(php, &DecodeOptions::default())
}

/// [`decode_json`] with explicit decoder options.
pub fn decode_json_with(php: &str, options: &DecodeOptions) -> Result<String> {
    let json = decode_with(php, options)?.to_json()?;
    Ok(serde_json::to_string(&json)?)
}

/// Serialize any `Serialize` type as PHP serialized text.
///
/// Types serde_json cannot express (e.g., maps with non-string keys) fail
/// with [`PhpError::Encode`].
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value).map_err(|e| PhpError::encode(e.to_string()))?;
    encode(&Value::from_json(&json))
}

/// Deserialize a `DeserializeOwned` type from PHP serialized text.
pub fn from_str<T: DeserializeOwned>(php: &str) -> Result<T> {
    from_str_with(php, &DecodeOptions::default())
}

/// [`from_str`] with explicit decoder options.
pub fn from_str_with<T: DeserializeOwned>(php: &str, options: &DecodeOptions) -> Result<T> {
    let json = decode_with(php, options)?.to_json()?;
    Ok(serde_json::from_value(json)?)
}
