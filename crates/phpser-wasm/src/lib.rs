//! WASM bindings for phpser-core.
//!
//! Browser code gets the serialization capability as an object it constructs
//! and passes around, rather than a `window.php` global:
//!
//! ```js
//! import { Php } from "./phpser_wasm.js";
//! const php = new Php();            // or new Php(64) to cap nesting depth
//! const text = php.serialize(JSON.stringify({ a: 1, b: [1, 2] }));
//! const data = JSON.parse(php.unserialize(text));
//! ```
//!
//! Values cross the boundary as JSON strings. The free functions `serialize`
//! and `unserialize` use default options.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p phpser-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/phpser_wasm.wasm
//! ```

use phpser_core::{DecodeOptions, PhpSerializer};
use wasm_bindgen::prelude::*;

/// Encode a JSON string as PHP serialized text.
///
/// Throws a JS error if the input is not valid JSON.
#[wasm_bindgen]
pub fn serialize(json: &str) -> std::result::Result<String, JsValue> {
    phpser_core::encode_json(json).map_err(to_js)
}

/// Decode PHP serialized text into a compact JSON string.
///
/// Throws a JS error if the input is malformed.
#[wasm_bindgen]
pub fn unserialize(data: &str) -> std::result::Result<String, JsValue> {
    phpser_core::decode_json(data).map_err(to_js)
}

/// The serialization service as a JS class.
#[wasm_bindgen]
pub struct Php {
    inner: PhpSerializer,
}

#[wasm_bindgen]
impl Php {
    /// Create a codec. `max_depth` caps array/object nesting when decoding
    /// (`DEFAULT_MAX_DEPTH` when omitted, 0 for unlimited).
    #[wasm_bindgen(constructor)]
    pub fn new(max_depth: Option<usize>) -> Php {
        let mut options = DecodeOptions::default();
        if let Some(depth) = max_depth {
            options = options.max_depth(depth);
        }
        Php {
            inner: PhpSerializer::with_options(options),
        }
    }

    #[wasm_bindgen(getter, js_name = maxDepth)]
    pub fn max_depth(&self) -> usize {
        self.inner.options().max_depth
    }

    pub fn serialize(&self, json: &str) -> std::result::Result<String, JsValue> {
        self.inner.serialize_json(json).map_err(to_js)
    }

    pub fn unserialize(&self, data: &str) -> std::result::Result<String, JsValue> {
        self.inner.unserialize_json(data).map_err(to_js)
    }
}

fn to_js(e: phpser_core::PhpError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
