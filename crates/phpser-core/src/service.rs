//! The serialization capability as an injectable service.
//!
//! Code that needs PHP serialization takes a [`PhpCodec`] (usually as
//! `&dyn PhpCodec` or `Arc<dyn PhpCodec>`) instead of reaching for a global.
//! [`PhpSerializer`] is the stock implementation; tests can substitute their
//! own.
//!
//! ```
//! use std::sync::Arc;
//! use phpser_core::{PhpCodec, PhpSerializer, Value};
//!
//! struct SessionStore {
//!     php: Arc<dyn PhpCodec>,
//! }
//!
//! impl SessionStore {
//!     fn dump(&self, v: &Value) -> String {
//!         self.php.serialize(v).unwrap()
//!     }
//! }
//!
//! let store = SessionStore { php: Arc::new(PhpSerializer::new()) };
//! assert_eq!(store.dump(&Value::Int(42)), "i:42;");
//! ```

use crate::decoder::decode_with;
use crate::encoder::encode;
use crate::error::Result;
use crate::json::{decode_json_with, encode_json};
use crate::options::DecodeOptions;
use crate::types::Value;
use std::sync::Arc;

/// Encode values to, and decode values from, PHP serialized text.
pub trait PhpCodec: Send + Sync {
    fn serialize(&self, data: &Value) -> Result<String>;
    fn unserialize(&self, data: &str) -> Result<Value>;
}

/// The default [`PhpCodec`]: stateless apart from its decoder options.
#[derive(Debug, Clone, Default)]
pub struct PhpSerializer {
    options: DecodeOptions,
}

impl PhpSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// JSON text in, PHP serialized text out.
    pub fn serialize_json(&self, json: &str) -> Result<String> {
        encode_json(json)
    }

    /// PHP serialized text in, compact JSON out.
    pub fn unserialize_json(&self, data: &str) -> Result<String> {
        decode_json_with(data, &self.options)
    }
}

impl PhpCodec for PhpSerializer {
    fn serialize(&self, data: &Value) -> Result<String> {
        encode(data).inspect_err(|e| tracing::debug!(error = %e, "serialize failed"))
    }

    fn unserialize(&self, data: &str) -> Result<Value> {
        decode_with(data, &self.options)
    }
}

impl<T: PhpCodec + ?Sized> PhpCodec for &T {
    fn serialize(&self, data: &Value) -> Result<String> {
        (**self).serialize(data)
    }

    fn unserialize(&self, data: &str) -> Result<Value> {
        (**self).unserialize(data)
    }
}

impl<T: PhpCodec + ?Sized> PhpCodec for Box<T> {
    fn serialize(&self, data: &Value) -> Result<String> {
        (**self).serialize(data)
    }

    fn unserialize(&self, data: &str) -> Result<Value> {
        (**self).unserialize(data)
    }
}

impl<T: PhpCodec + ?Sized> PhpCodec for Arc<T> {
    fn serialize(&self, data: &Value) -> Result<String> {
        (**self).serialize(data)
    }

    fn unserialize(&self, data: &str) -> Result<Value> {
        (**self).unserialize(data)
    }
}
