//! # phpser-core
//!
//! Pure-Rust encoder and decoder for **PHP's serialization format** — the text
//! produced by PHP's `serialize()` and read by `unserialize()`.
//!
//! Values are modelled by the closed [`Value`] enum (null, bool, int, float,
//! string, sequence, mapping, object, enum). Both directions are pure
//! functions; the [`PhpCodec`] trait packages them as a service that can be
//! passed to whatever needs it.
//!
//! ## Quick start
//!
//! ```rust
//! use phpser_core::{decode, encode, Value};
//!
//! let php = encode(&Value::from("hi")).unwrap();
//! assert_eq!(php, r#"s:2:"hi";"#);
//!
//! let back = decode(&php).unwrap();
//! assert_eq!(back, Value::from("hi"));
//!
//! // Malformed input is rejected with a byte offset.
//! let err = decode(r#"s:5:"hi";"#).unwrap_err();
//! assert!(err.is_decode());
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — `Value` → PHP serialized text
//! - [`decoder`] — PHP serialized text → `Value`
//! - [`json`] — JSON and serde bridges (`encode_json`, `to_string`, ...)
//! - [`service`] — `PhpCodec` trait and the `PhpSerializer` service
//! - [`options`] — decoder configuration
//! - [`error`] — error types
//! - [`types`] — the `Value` model

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod options;
pub mod service;
pub mod types;

pub use decoder::{decode, decode_with};
pub use encoder::encode;
pub use error::{PhpError, Result};
pub use json::{decode_json, decode_json_with, encode_json, from_str, from_str_with, to_string};
pub use options::{DecodeOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_REFERENCE_NODES};
pub use service::{PhpCodec, PhpSerializer};
pub use types::{demangle_property, mangle_property, Key, Object, Value, Visibility};
