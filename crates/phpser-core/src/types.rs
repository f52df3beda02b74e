//! The PHP value model.
//!
//! `Value` is a closed variant type covering everything the PHP serialization
//! grammar can carry. PHP has a single array type that doubles as list and
//! hash map; here the two shapes are separate variants so callers can match on
//! them. The decoder picks `Sequence` for arrays whose keys are exactly
//! `0..n-1` in order and `Mapping` for everything else.

use std::fmt;

/// A PHP value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A list-shaped PHP array (keys `0..n-1`).
    Sequence(Vec<Value>),
    /// Key-value pairs in insertion order.
    Mapping(Vec<(Key, Value)>),
    Object(Object),
    /// A PHP 8.1 enum case, serialized as `E:<len>:"Class:Case";`.
    Enum { class: String, case: String },
}

/// A PHP array key. PHP arrays only accept integer and string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

/// A PHP object: a class name plus its properties in declaration order.
///
/// Property names are stored as they appear on the wire, so protected and
/// private properties keep PHP's `\0*\0name` / `\0Class\0name` mangling.
/// Use [`Object::properties_demangled`] to read them without the prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class: String,
    pub properties: Vec<(String, Value)>,
}

/// Property visibility recovered from a mangled property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    /// Private to the named class.
    Private(String),
}

impl Value {
    /// Short PHP-flavored type name (`"int"`, `"array"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) | Value::Mapping(_) => "array",
            Value::Object(_) => "object",
            Value::Enum { .. } => "enum",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up an entry by key in a mapping, a sequence (integer keys only)
    /// or an object (string keys, matched against demangled property names).
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        let key = key.into();
        match self {
            Value::Mapping(entries) => entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v),
            Value::Sequence(items) => match key {
                Key::Int(i) => usize::try_from(i).ok().and_then(|i| items.get(i)),
                Key::Str(_) => None,
            },
            Value::Object(obj) => match key {
                Key::Str(name) => obj.property(&name),
                Key::Int(i) => obj.property(&i.to_string()),
            },
            _ => None,
        }
    }

    /// Number of entries in an array or object; `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Sequence(items) => Some(items.len()),
            Value::Mapping(entries) => Some(entries.len()),
            Value::Object(obj) => Some(obj.properties.len()),
            _ => None,
        }
    }

    /// Total number of values in the tree, including this one.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Value::Sequence(items) => items.iter().map(Value::node_count).sum(),
            Value::Mapping(entries) => entries.iter().map(|(_, v)| v.node_count()).sum(),
            Value::Object(obj) => obj.properties.iter().map(|(_, v)| v.node_count()).sum(),
            _ => 0,
        }
    }

    /// Nesting depth: 0 for scalars, 1 for a flat array, and so on.
    pub fn depth(&self) -> usize {
        let children = match self {
            Value::Sequence(items) => items.iter().map(Value::depth).max(),
            Value::Mapping(entries) => entries.iter().map(|(_, v)| v.depth()).max(),
            Value::Object(obj) => obj.properties.iter().map(|(_, v)| v.depth()).max(),
            _ => return 0,
        };
        1 + children.unwrap_or(0)
    }
}

impl Key {
    /// Build a key the way PHP stores array keys: strings holding a canonical
    /// decimal integer (`"5"`, `"-3"`, but not `"05"`, `"-0"` or `"+1"`) become
    /// integer keys; everything else stays a string.
    pub fn normalized(s: impl Into<String>) -> Key {
        let s = s.into();
        match canonical_int(&s) {
            Some(n) => Key::Int(n),
            None => Key::Str(s),
        }
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// Builder-style helper that appends a public property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Find a property by its demangled name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(raw, _)| demangle_property(raw).0 == name)
            .map(|(_, v)| v)
    }

    /// Iterate over properties with visibility prefixes stripped.
    pub fn properties_demangled(&self) -> impl Iterator<Item = (&str, Visibility, &Value)> {
        self.properties.iter().map(|(raw, v)| {
            let (name, vis) = demangle_property(raw);
            (name, vis, v)
        })
    }
}

/// Split a wire property name into its bare name and visibility.
///
/// `"\0*\0name"` is protected, `"\0Class\0name"` is private to `Class`;
/// anything else (including malformed prefixes) is public.
pub fn demangle_property(raw: &str) -> (&str, Visibility) {
    if let Some(rest) = raw.strip_prefix('\0') {
        if let Some(end) = rest.find('\0') {
            let scope = &rest[..end];
            let name = &rest[end + 1..];
            if scope == "*" {
                return (name, Visibility::Protected);
            }
            return (name, Visibility::Private(scope.to_string()));
        }
    }
    (raw, Visibility::Public)
}

/// Mangle a property name for the given visibility.
pub fn mangle_property(name: &str, visibility: &Visibility) -> String {
    match visibility {
        Visibility::Public => name.to_string(),
        Visibility::Protected => format!("\0*\0{name}"),
        Visibility::Private(class) => format!("\0{class}\0{name}"),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}
