use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use canopy_core::{parse, parse_with, FailureMode, ParseOptions};

fn small_document() -> &'static str {
    r#"{"name": "Ada", "scores": [95, 87, 92], "active": true, "ratio": 0.875}"#
}

fn wide_document() -> String {
    let mut text = String::from("{");
    for i in 0..500 {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&format!(r#""key{i:04}": {{"id": {i}, "tags": ["a", "b"]}}"#));
    }
    text.push('}');
    text
}

fn deep_document() -> String {
    let mut text = String::new();
    for _ in 0..64 {
        text.push_str(r#"{"child": "#);
    }
    text.push_str("null");
    for _ in 0..64 {
        text.push('}');
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let small = small_document();
    let wide = wide_document();
    let deep = deep_document();

    c.bench_function("parse_small", |b| b.iter(|| parse(black_box(small))));
    c.bench_function("parse_wide_object", |b| b.iter(|| parse(black_box(&wide))));
    c.bench_function("parse_deep_nesting", |b| b.iter(|| parse(black_box(&deep))));

    let options = ParseOptions::new().failure_mode(FailureMode::CollectAll);
    c.bench_function("parse_wide_collect_all", |b| {
        b.iter(|| parse_with(black_box(&wide), &options))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
