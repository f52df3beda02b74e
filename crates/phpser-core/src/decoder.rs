//! PHP unserialize decoder — parses PHP serialized text into a [`Value`].
//!
//! The decoder is a single forward pass over the input bytes. Every construct
//! is length- or count-prefixed, so no backtracking is needed:
//!
//! - Scalars: `N;`, `b:0;`, `i:-5;`, `d:1.5;`, `d:INF;`, `s:3:"abc";`
//! - Arrays: `a:2:{i:0;s:1:"x";s:1:"k";N;}`
//! - Objects: `O:8:"stdClass":1:{s:1:"a";i:1;}`
//! - Enums: `E:11:"Suit:Hearts";`
//! - Back references: `r:1;` / `R:2;`
//!
//! # Key design decisions
//!
//! - **Sequence detection**: an array whose keys are exactly `0..n-1` in order
//!   becomes `Value::Sequence`; any other key layout becomes `Value::Mapping`.
//! - **Duplicate keys**: a repeated key overwrites the earlier value in place,
//!   as PHP does when it rebuilds the hash table.
//! - **Slots**: PHP numbers every decoded value except array keys and `R:`
//!   entries, starting at 1. Back references copy the value in the named slot.
//!   Slots are only tracked when the input could contain a reference at all.
//!   The total number of copied values is capped by
//!   [`DecodeOptions::max_reference_nodes`], since chained references double
//!   the output per link.
//! - **Strictness**: string lengths must land exactly on the closing `";`, array
//!   counts must match the entries, and trailing bytes are an error unless
//!   [`DecodeOptions::allow_trailing_data`] is set.

use crate::encoder::{check_class_name, check_identifier};
use crate::error::{PhpError, Result};
use crate::options::DecodeOptions;
use crate::types::{Key, Object, Value};
use std::collections::HashMap;

/// Decode PHP serialized text with the default [`DecodeOptions`].
pub fn decode(text: &str) -> Result<Value> {
    decode_with(text, &DecodeOptions::default())
}

/// Decode PHP serialized text with explicit options.
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Value> {
    let mut parser = Parser::new(text, options);
    let result = parser.parse_value(0).and_then(|value| {
        if parser.pos < parser.bytes.len() && !options.allow_trailing_data {
            return Err(parser.err(format!(
                "unexpected trailing data ({} bytes) after value",
                parser.bytes.len() - parser.pos
            )));
        }
        Ok(value)
    });
    if let Err(PhpError::Decode { offset, message }) = &result {
        tracing::debug!(offset, %message, input_len = text.len(), "rejected PHP serialized input");
    }
    result
}

/// Render a byte for an error message. Non-printable and non-ASCII bytes
/// are shown in hex, since a lone byte of a multi-byte character is not a char.
fn show_byte(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("{b:#04x}")
    }
}

/// Cursor over the input plus the slot table used for back references.
struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    options: &'a DecodeOptions,
    /// Each filled slot holds the value and its node count. `None` while the
    /// slot's value is still being decoded.
    slots: Vec<Option<(Value, usize)>>,
    track_slots: bool,
    /// Nodes produced so far, including reference copies.
    nodes: usize,
    /// Nodes produced by reference copies alone.
    copied: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &'a DecodeOptions) -> Self {
        let track_slots =
            options.allow_references && (text.contains("r:") || text.contains("R:"));
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            options,
            slots: Vec::new(),
            track_slots,
            nodes: 0,
            copied: 0,
        }
    }

    fn err(&self, message: impl Into<String>) -> PhpError {
        PhpError::decode(self.pos, message)
    }

    fn err_at(&self, offset: usize, message: impl Into<String>) -> PhpError {
        PhpError::decode(offset, message)
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn next_byte(&mut self) -> Result<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| self.err("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        let at = self.pos;
        match self.bytes.get(at) {
            Some(&b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(&b) => Err(self.err_at(
                at,
                format!("expected '{}', found {}", expected as char, show_byte(b)),
            )),
            None => Err(self.err_at(
                at,
                format!("expected '{}', found end of input", expected as char),
            )),
        }
    }

    /// Reserve the next slot for a value that is about to be decoded.
    fn reserve_slot(&mut self) -> Option<usize> {
        if !self.track_slots {
            return None;
        }
        self.slots.push(None);
        Some(self.slots.len() - 1)
    }

    fn fill_slot(&mut self, slot: Option<usize>, value: &Value, nodes: usize) {
        if let Some(i) = slot {
            self.slots[i] = Some((value.clone(), nodes));
        }
    }

    /// Parse one value. `depth` counts the arrays/objects enclosing it.
    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        let start = self.pos;
        let tag = self.next_byte()?;

        if tag == b'R' {
            return self.parse_reference(start);
        }

        let slot = self.reserve_slot();
        let before = self.nodes;
        if tag == b'r' {
            let value = self.parse_reference(start)?;
            self.fill_slot(slot, &value, self.nodes - before);
            return Ok(value);
        }
        self.nodes += 1;
        let value = match tag {
            b'N' => {
                self.expect(b';')?;
                Value::Null
            }
            b'b' => {
                self.expect(b':')?;
                let at = self.pos;
                let v = match self.next_byte()? {
                    b'0' => false,
                    b'1' => true,
                    other => {
                        return Err(self.err_at(
                            at,
                            format!("boolean must be 0 or 1, found {}", show_byte(other)),
                        ))
                    }
                };
                self.expect(b';')?;
                Value::Bool(v)
            }
            b'i' => {
                self.expect(b':')?;
                Value::Int(self.parse_int(b';')?)
            }
            b'd' => {
                self.expect(b':')?;
                Value::Float(self.parse_float()?)
            }
            b's' => {
                self.expect(b':')?;
                Value::String(self.parse_string_body()?.to_string())
            }
            b'a' => {
                self.expect(b':')?;
                self.parse_array(start, depth)?
            }
            b'O' => {
                self.expect(b':')?;
                self.parse_object(start, depth)?
            }
            b'E' => {
                self.expect(b':')?;
                self.parse_enum()?
            }
            b'C' => {
                return Err(self.err_at(
                    start,
                    "custom-serialized objects (C:) are not supported",
                ))
            }
            other => {
                return Err(self.err_at(
                    start,
                    format!("unknown type tag {}", show_byte(other)),
                ))
            }
        };
        self.fill_slot(slot, &value, self.nodes - before);
        Ok(value)
    }

    /// Parse the rest of `r:<n>;` / `R:<n>;` after the tag byte.
    fn parse_reference(&mut self, start: usize) -> Result<Value> {
        self.expect(b':')?;
        if !self.options.allow_references {
            return Err(self.err_at(start, "back references are disabled"));
        }
        let n = self.parse_uint(b';')?;
        let (value, nodes) = match n.checked_sub(1).and_then(|i| self.slots.get(i)) {
            Some(Some((v, nodes))) => {
                self.check_copy_budget(start, *nodes)?;
                (v.clone(), *nodes)
            }
            Some(None) => {
                return Err(self.err_at(
                    start,
                    format!("recursive reference to slot {n} cannot be represented"),
                ))
            }
            None => return Err(self.err_at(start, format!("reference to unknown slot {n}"))),
        };
        self.nodes += nodes;
        self.copied += nodes;
        tracing::trace!(slot = n, nodes, "resolved back reference");
        Ok(value)
    }

    /// Fail if copying `nodes` more values would exceed the reference budget.
    fn check_copy_budget(&self, start: usize, nodes: usize) -> Result<()> {
        let max = self.options.max_reference_nodes;
        if max != 0 && self.copied.saturating_add(nodes) > max {
            return Err(self.err_at(
                start,
                format!("back references would copy more than {max} values"),
            ));
        }
        Ok(())
    }

    /// Parse a signed decimal integer terminated by `end`.
    fn parse_int(&mut self, end: u8) -> Result<i64> {
        let start = self.pos;
        let token = self.take_until(end)?;
        let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.err_at(start, format!("invalid integer {token:?}")));
        }
        let token = token.strip_prefix('+').unwrap_or(token);
        token
            .parse::<i64>()
            .map_err(|_| self.err_at(start, format!("integer {token} out of range")))
    }

    /// Parse an unsigned length/count/slot terminated by `end`.
    fn parse_uint(&mut self, end: u8) -> Result<usize> {
        let start = self.pos;
        let token = self.take_until(end)?;
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.err_at(start, format!("invalid length {token:?}")));
        }
        token
            .parse::<usize>()
            .map_err(|_| self.err_at(start, format!("length {token} out of range")))
    }

    /// Parse a float terminated by `;`. Accepts plain decimals, exponent
    /// forms (`1.0E+25`) and the exact spellings `INF`, `-INF`, `NAN`.
    fn parse_float(&mut self) -> Result<f64> {
        let start = self.pos;
        let token = self.take_until(b';')?;
        match token {
            "INF" => return Ok(f64::INFINITY),
            "-INF" => return Ok(f64::NEG_INFINITY),
            "NAN" => return Ok(f64::NAN),
            _ => {}
        }
        let well_formed = token.bytes().any(|b| b.is_ascii_digit())
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
        if !well_formed {
            return Err(self.err_at(start, format!("invalid float {token:?}")));
        }
        token
            .parse::<f64>()
            .map_err(|_| self.err_at(start, format!("invalid float {token:?}")))
    }

    /// Return the text up to (not including) `end` and step past `end`.
    fn take_until(&mut self, end: u8) -> Result<&'a str> {
        let start = self.pos;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == end)
            .ok_or_else(|| {
                self.err_at(
                    start,
                    format!("missing '{}' terminator", end as char),
                )
            })?;
        self.pos = start + len + 1;
        let text: &'a str = self.text;
        Ok(&text[start..start + len])
    }

    /// Parse `<len>:"<bytes>"` and return the content slice. The caller
    /// decides what follows the closing quote.
    fn parse_quoted(&mut self) -> Result<&'a str> {
        let len_at = self.pos;
        let len = self.parse_uint(b':')?;
        self.expect(b'"')?;
        let start = self.pos;
        if len > self.remaining() {
            return Err(self.err_at(
                len_at,
                format!(
                    "declared string length {len} exceeds the {} remaining bytes",
                    self.remaining()
                ),
            ));
        }
        let end = start + len;
        // A '"' byte is always a char boundary, so this also rules out
        // lengths that would split a multi-byte character.
        if self.bytes.get(end) != Some(&b'"') {
            return Err(self.err_at(
                len_at,
                format!("declared string length {len} does not match the content"),
            ));
        }
        self.pos = end + 1;
        let text: &'a str = self.text;
        Ok(&text[start..end])
    }

    /// Parse the body of `s:<len>:"<bytes>";` after the `s:` prefix.
    fn parse_string_body(&mut self) -> Result<&'a str> {
        let content = self.parse_quoted()?;
        self.expect(b';')?;
        Ok(content)
    }

    /// Parse an array key: only `i:` and `s:` are valid.
    fn parse_key(&mut self) -> Result<Key> {
        let at = self.pos;
        match self.next_byte()? {
            b'i' => {
                self.expect(b':')?;
                Ok(Key::Int(self.parse_int(b';')?))
            }
            b's' => {
                self.expect(b':')?;
                Ok(Key::Str(self.parse_string_body()?.to_string()))
            }
            other => Err(self.err_at(
                at,
                format!("invalid array key type {}", show_byte(other)),
            )),
        }
    }

    fn enter(&self, start: usize, depth: usize) -> Result<()> {
        let max = self.options.max_depth;
        if max != 0 && depth >= max {
            return Err(self.err_at(
                start,
                format!("maximum nesting depth of {max} exceeded"),
            ));
        }
        Ok(())
    }

    /// Parse `<count>:{<key><value>...}` — shared by arrays and objects.
    /// Repeated keys overwrite the earlier entry in place.
    fn parse_entries(&mut self, depth: usize) -> Result<Vec<(Key, Value)>> {
        let count = self.parse_uint(b':')?;
        self.expect(b'{')?;
        // Every entry takes at least 4 bytes ("i:0;" alone), so the input
        // length bounds how much is worth preallocating.
        let mut entries: Vec<(Key, Value)> = Vec::with_capacity(count.min(self.remaining() / 4));
        let mut index: HashMap<Key, usize> = HashMap::new();
        for _ in 0..count {
            if self.bytes.get(self.pos) == Some(&b'}') {
                return Err(self.err(format!(
                    "collection declares {count} entries but has only {}",
                    entries.len()
                )));
            }
            let key = self.parse_key()?;
            let value = self.parse_value(depth + 1)?;
            match index.get(&key) {
                Some(&i) => entries[i].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        match self.bytes.get(self.pos) {
            Some(b'}') => {
                self.pos += 1;
                Ok(entries)
            }
            Some(_) => Err(self.err(format!(
                "collection has more entries than the declared {count}"
            ))),
            None => Err(self.err("unterminated collection")),
        }
    }

    fn parse_array(&mut self, start: usize, depth: usize) -> Result<Value> {
        self.enter(start, depth)?;
        let entries = self.parse_entries(depth)?;
        let is_list = entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == Key::Int(i as i64));
        if is_list {
            Ok(Value::Sequence(entries.into_iter().map(|(_, v)| v).collect()))
        } else {
            Ok(Value::Mapping(entries))
        }
    }

    fn parse_object(&mut self, start: usize, depth: usize) -> Result<Value> {
        self.enter(start, depth)?;
        let class_at = self.pos;
        let class = self.parse_quoted()?;
        check_class_name(class).map_err(|msg| self.err_at(class_at, msg))?;
        self.expect(b':')?;
        // `i:1` and `s:1:"1"` are distinct array keys but name the same property.
        let mut properties: Vec<(String, Value)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (key, value) in self.parse_entries(depth)? {
            let name = key.to_string();
            match index.get(&name) {
                Some(&i) => properties[i].1 = value,
                None => {
                    index.insert(name.clone(), properties.len());
                    properties.push((name, value));
                }
            }
        }
        Ok(Value::Object(Object {
            class: class.to_string(),
            properties,
        }))
    }

    fn parse_enum(&mut self) -> Result<Value> {
        let at = self.pos;
        let content = self.parse_quoted()?;
        self.expect(b';')?;
        let (class, case) = content
            .split_once(':')
            .ok_or_else(|| self.err_at(at, format!("enum {content:?} lacks a ':' separator")))?;
        check_class_name(class).map_err(|msg| self.err_at(at, msg))?;
        check_identifier(case).map_err(|msg| self.err_at(at, format!("enum case: {msg}")))?;
        Ok(Value::Enum {
            class: class.to_string(),
            case: case.to_string(),
        })
    }
}
