//! Encode/decode throughput on a session-sized payload.

use criterion::{criterion_group, criterion_main, Criterion};
use phpser_core::{decode, encode, Key, Object, Value};
use std::hint::black_box;

fn sample_payload() -> Value {
    let items = (0..200)
        .map(|i| {
            Value::Mapping(vec![
                (Key::from("id"), Value::Int(i)),
                (Key::from("sku"), Value::String(format!("SKU-{i:05}"))),
                (Key::from("price"), Value::Float(i as f64 * 1.25)),
                (Key::from("tags"), Value::Sequence(vec!["a".into(), "b".into()])),
            ])
        })
        .collect();
    let user = Object::new("App\\User")
        .with_property("id", 42)
        .with_property("\0*\0email", "user@example.com");
    Value::Mapping(vec![
        (Key::from("user"), Value::Object(user)),
        (Key::from("cart"), Value::Sequence(items)),
    ])
}

fn bench_codec(c: &mut Criterion) {
    let value = sample_payload();
    let text = encode(&value).expect("sample payload encodes");

    c.bench_function("encode_session", |b| b.iter(|| encode(black_box(&value))));
    c.bench_function("decode_session", |b| b.iter(|| decode(black_box(&text))));
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
