//! PHP serialize encoder — converts a [`Value`] into PHP serialized text.
//!
//! The output matches what PHP's own `serialize()` produces for the same data
//! with the default `serialize_precision = -1`:
//!
//! - **Scalars**: `N;`, `b:1;`, `i:42;`, `d:0.5;`, `s:2:"hi";`
//! - **Arrays**: `a:<count>:{<key><value>...}` — sequences get keys `0..n-1`
//! - **Objects**: `O:<len>:"<class>":<count>:{<name><value>...}`
//! - **Enums**: `E:<len>:"<class>:<case>";`
//!
//! String lengths are byte lengths, so `"café"` encodes as `s:5:"café";`.
//!
//! # Example
//! ```
//! use phpser_core::{encode, Key, Value};
//! let value = Value::Mapping(vec![
//!     (Key::from("a"), Value::Int(1)),
//!     (Key::from("b"), Value::Sequence(vec![Value::Int(1), Value::Int(2)])),
//! ]);
//! let php = encode(&value).unwrap();
//! assert_eq!(php, r#"a:2:{s:1:"a";i:1;s:1:"b";a:2:{i:0;i:1;i:1;i:2;}}"#);
//! ```

use crate::error::{PhpError, Result};
use crate::types::{Key, Object, Value};
use std::collections::HashSet;
use std::fmt::Write;

/// Encode a value into PHP serialized text.
///
/// Fails with [`PhpError::Encode`] if the value contains an object or enum
/// whose class or case name PHP would refuse to unserialize, or a mapping or
/// object that repeats a key. The decoder would collapse a repeated key, so
/// such a value has no faithful serialized form.
pub fn encode(value: &Value) -> Result<String> {
    let mut out = String::new();
    encode_value(value, &mut out)?;
    Ok(out)
}

/// Dispatch on the value's variant and append its serialized form to `out`.
fn encode_value(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        Value::Int(n) => {
            let _ = write!(out, "i:{};", n);
        }
        Value::Float(f) => {
            out.push_str("d:");
            out.push_str(&format_float(*f));
            out.push(';');
        }
        Value::String(s) => encode_string(s, out),
        Value::Sequence(items) => {
            let _ = write!(out, "a:{}:{{", items.len());
            for (i, item) in items.iter().enumerate() {
                let _ = write!(out, "i:{};", i);
                encode_value(item, out)?;
            }
            out.push('}');
        }
        Value::Mapping(entries) => {
            let _ = write!(out, "a:{}:{{", entries.len());
            let mut seen: HashSet<&Key> = HashSet::with_capacity(entries.len());
            for (key, item) in entries {
                if !seen.insert(key) {
                    return Err(PhpError::encode(format!("duplicate array key {key}")));
                }
                encode_key(key, out);
                encode_value(item, out)?;
            }
            out.push('}');
        }
        Value::Object(obj) => encode_object(obj, out)?,
        Value::Enum { class, case } => {
            check_class_name(class).map_err(PhpError::encode)?;
            check_identifier(case)
                .map_err(|msg| PhpError::encode(format!("enum case: {msg}")))?;
            let _ = write!(out, "E:{}:\"{}:{}\";", class.len() + 1 + case.len(), class, case);
        }
    }
    Ok(())
}

/// Emit `s:<bytes>:"<content>";`. No escaping: the length prefix delimits
/// the content, so quotes and semicolons inside it are literal.
fn encode_string(s: &str, out: &mut String) {
    let _ = write!(out, "s:{}:\"", s.len());
    out.push_str(s);
    out.push_str("\";");
}

fn encode_key(key: &Key, out: &mut String) {
    match key {
        Key::Int(n) => {
            let _ = write!(out, "i:{};", n);
        }
        Key::Str(s) => encode_string(s, out),
    }
}

/// Emit `O:<len>:"<class>":<count>:{...}`. Property names are written as
/// stored, so mangled protected/private names survive unchanged.
fn encode_object(obj: &Object, out: &mut String) -> Result<()> {
    check_class_name(&obj.class).map_err(PhpError::encode)?;
    let _ = write!(
        out,
        "O:{}:\"{}\":{}:{{",
        obj.class.len(),
        obj.class,
        obj.properties.len()
    );
    let mut seen: HashSet<&str> = HashSet::with_capacity(obj.properties.len());
    for (name, value) in &obj.properties {
        if !seen.insert(name.as_str()) {
            return Err(PhpError::encode(format!(
                "duplicate property {name:?} on {}",
                obj.class
            )));
        }
        encode_string(name, out);
        encode_value(value, out)?;
    }
    out.push('}');
    Ok(())
}

/// Format a float the way PHP does with `serialize_precision = -1`:
///
/// - shortest digits that round-trip, no trailing `.0` (`1.0` → `1`)
/// - exponent form `1.0E+25` once the integer part would exceed 17 digits,
///   or when the magnitude is below `1e-4` (`1.0E-5`)
/// - `INF`, `-INF`, `NAN`
/// - negative zero keeps its sign (`-0`)
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let sign = if f.is_sign_negative() { "-" } else { "" };
    if f == 0.0 {
        return format!("{sign}0");
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.5e25" or "1e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    // Position of the decimal point relative to the first digit.
    let decpt = exp + 1;

    let mut out = String::from(sign);
    if !(-3..=17).contains(&decpt) {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        let _ = write!(out, "E{}{}", if exp < 0 { '-' } else { '+' }, exp.abs());
    } else if decpt <= 0 {
        out.push_str("0.");
        for _ in 0..(-decpt) {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let decpt = decpt as usize;
        if decpt >= digits.len() {
            out.push_str(&digits);
            for _ in digits.len()..decpt {
                out.push('0');
            }
        } else {
            out.push_str(&digits[..decpt]);
            out.push('.');
            out.push_str(&digits[decpt..]);
        }
    }
    out
}

/// Validate a class name: non-empty, no leading digit, and only ASCII
/// alphanumerics, `_`, `\` (namespace separator) or non-ASCII characters.
pub(crate) fn check_class_name(name: &str) -> std::result::Result<(), String> {
    let first = name
        .chars()
        .next()
        .ok_or_else(|| "empty class name".to_string())?;
    if first.is_ascii_digit() {
        return Err(format!("class name {name:?} starts with a digit"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '\\' || !c.is_ascii()))
    {
        return Err(format!("class name {name:?} contains {bad:?}"));
    }
    Ok(())
}

/// Validate a bare identifier (enum case name): like a class name but
/// without namespace separators.
pub(crate) fn check_identifier(name: &str) -> std::result::Result<(), String> {
    if name.contains('\\') {
        return Err(format!("identifier {name:?} contains '\\\\'"));
    }
    check_class_name(name).map_err(|_| format!("invalid identifier {name:?}"))
}
