use phpser_core::{decode, encode, Key, Object, Value};

/// Assert that encode → decode reproduces the value and that re-encoding the
/// decoded value yields the same text.
fn assert_roundtrip(value: Value) {
    let php = encode(&value).unwrap();
    let back = decode(&php).unwrap_or_else(|e| panic!("decode of {php:?} failed: {e}"));
    assert_eq!(back, value, "roundtrip mismatch for {php:?}");
    assert_eq!(encode(&back).unwrap(), php);
}

fn map(entries: Vec<(&str, Value)>) -> Value {
    Value::Mapping(entries.into_iter().map(|(k, v)| (Key::from(k), v)).collect())
}

// ============================================================================
// Scalar Roundtrips
// ============================================================================

#[test]
fn roundtrip_null() {
    assert_roundtrip(Value::Null);
}

#[test]
fn roundtrip_bools() {
    assert_roundtrip(Value::Bool(true));
    assert_roundtrip(Value::Bool(false));
}

#[test]
fn roundtrip_integers() {
    for n in [0, 1, -1, 42, i64::MAX, i64::MIN] {
        assert_roundtrip(Value::Int(n));
    }
}

#[test]
fn roundtrip_floats() {
    for f in [0.0, -0.0, 0.1, -2.5, 1e25, 1.5e-7, 1.0 / 3.0, f64::MAX, f64::INFINITY] {
        assert_roundtrip(Value::Float(f));
    }
}

#[test]
fn roundtrip_nan_stays_nan() {
    let php = encode(&Value::Float(f64::NAN)).unwrap();
    assert!(matches!(decode(&php).unwrap(), Value::Float(f) if f.is_nan()));
}

#[test]
fn roundtrip_strings() {
    for s in ["", "hi", "with \"quotes\"", "semi;colon}", "line1\nline2", "tab\t", "café", "\u{1f600}", "\0nul"] {
        assert_roundtrip(Value::from(s));
    }
}

// ============================================================================
// Collection Roundtrips
// ============================================================================

#[test]
fn roundtrip_sequence() {
    assert_roundtrip(Value::Sequence(vec![
        Value::Int(1),
        Value::from("two"),
        Value::Null,
        Value::Bool(false),
    ]));
}

#[test]
fn roundtrip_empty_sequence() {
    assert_roundtrip(Value::Sequence(vec![]));
}

#[test]
fn roundtrip_mapping_from_overview_example() {
    assert_roundtrip(map(vec![
        ("a", Value::Int(1)),
        ("b", Value::Sequence(vec![Value::Int(1), Value::Int(2)])),
    ]));
}

#[test]
fn roundtrip_sparse_int_keys() {
    assert_roundtrip(Value::Mapping(vec![
        (Key::Int(3), Value::from("c")),
        (Key::Int(7), Value::from("g")),
    ]));
}

#[test]
fn roundtrip_mixed_keys() {
    assert_roundtrip(Value::Mapping(vec![
        (Key::Int(0), Value::from("zero")),
        (Key::from("name"), Value::from("x")),
        (Key::Int(1), Value::from("one")),
    ]));
}

#[test]
fn roundtrip_deeply_nested() {
    let mut v = Value::from("leaf");
    for i in 0..20 {
        v = if i % 2 == 0 {
            Value::Sequence(vec![v])
        } else {
            map(vec![("k", v)])
        };
    }
    assert_roundtrip(v);
}

#[test]
fn list_shaped_mapping_decodes_as_sequence() {
    let mapping = Value::Mapping(vec![
        (Key::Int(0), Value::from("a")),
        (Key::Int(1), Value::from("b")),
    ]);
    let php = encode(&mapping).unwrap();
    let back = decode(&php).unwrap();
    assert_eq!(
        back,
        Value::Sequence(vec![Value::from("a"), Value::from("b")])
    );
    // Same wire form either way.
    assert_eq!(encode(&back).unwrap(), php);
}

// ============================================================================
// Objects and Enums
// ============================================================================

#[test]
fn roundtrip_object() {
    let obj = Object::new("App\\Models\\User")
        .with_property("id", 7)
        .with_property("\0*\0email", "a@example.com")
        .with_property("\0App\\Models\\User\0password", Value::Null)
        .with_property(
            "roles",
            Value::Sequence(vec![Value::from("admin"), Value::from("dev")]),
        );
    assert_roundtrip(Value::Object(obj));
}

#[test]
fn roundtrip_enum_inside_array() {
    assert_roundtrip(map(vec![(
        "suit",
        Value::Enum {
            class: "Cards\\Suit".into(),
            case: "Spades".into(),
        },
    )]));
}
