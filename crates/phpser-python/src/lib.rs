//! # phpser-python
//!
//! Python bindings for phpser-core, built with PyO3.
//!
//! Exposes the following functions to Python as the `phpser` module:
//!
//! - `serialize(json)` -- JSON string -> PHP serialized string
//! - `unserialize(data, max_depth=128, allow_trailing=False)` -- PHP
//!   serialized string -> JSON string

use phpser_core::{DecodeOptions, DEFAULT_MAX_DEPTH};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Encode a JSON string as PHP serialized text.
///
/// Args:
///     json: A valid JSON string.
///
/// Returns:
///     The PHP serialized string.
///
/// Raises:
///     ValueError: If the input is not valid JSON.
#[pyfunction]
fn serialize(json: &str) -> PyResult<String> {
    phpser_core::encode_json(json).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Decode PHP serialized text into a compact JSON string.
///
/// Args:
///     data: PHP serialized text, as produced by PHP's `serialize()`.
///     max_depth: Maximum array/object nesting (0 for unlimited).
///     allow_trailing: Ignore bytes after the serialized value.
///
/// Returns:
///     The JSON string.
///
/// Raises:
///     ValueError: If the input is malformed or holds INF/NAN floats.
#[pyfunction]
#[pyo3(signature = (data, max_depth=DEFAULT_MAX_DEPTH, allow_trailing=false))]
fn unserialize(data: &str, max_depth: usize, allow_trailing: bool) -> PyResult<String> {
    let options = DecodeOptions::default()
        .max_depth(max_depth)
        .allow_trailing_data(allow_trailing);
    phpser_core::decode_json_with(data, &options).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The `phpser` Python module, implemented in Rust via PyO3.
#[pymodule]
fn phpser(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(serialize, m)?)?;
    m.add_function(wrap_pyfunction!(unserialize, m)?)?;
    Ok(())
}
