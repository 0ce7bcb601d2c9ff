//! Round trips between this crate's parser and an external serde writer.

use canopy_core::{parse, Value};

/// Parse, write through serde_json, parse again: both trees must be equal.
fn assert_roundtrip(text: &str) {
    let first = parse(text).unwrap_or_else(|err| panic!("parse failed for {text}: {err}"));
    let written = serde_json::to_string(&first).unwrap();
    let second = parse(&written)
        .unwrap_or_else(|err| panic!("re-parse failed for {written}: {err}"));
    assert_eq!(first, second, "roundtrip mismatch for {text} -> {written}");
}

#[test]
fn roundtrip_scalars() {
    assert_roundtrip("null");
    assert_roundtrip("true");
    assert_roundtrip("false");
    assert_roundtrip("42");
    assert_roundtrip("-7");
    assert_roundtrip("2.5");
    assert_roundtrip("-0.125");
    assert_roundtrip(r#""hello world""#);
    assert_roundtrip(r#""""#);
}

#[test]
fn roundtrip_strings_with_escapes() {
    assert_roundtrip(r#""line1\nline2""#);
    assert_roundtrip(r#""tab\there""#);
    assert_roundtrip(r#""quote \" backslash \\""#);
    assert_roundtrip(r#""café 😀""#);
    assert_roundtrip(r#""Aé""#);
}

#[test]
fn roundtrip_containers() {
    assert_roundtrip("[]");
    assert_roundtrip("{}");
    assert_roundtrip("[1, 2, 3]");
    assert_roundtrip(r#"["mixed", 1, 2.5, null, true]"#);
    assert_roundtrip(r#"{"a": 1, "b": [true, {"c": null}], "d": {"e": {}}}"#);
}

#[test]
fn written_objects_are_key_sorted() {
    let doc = parse(r#"{"zebra": 1, "apple": 2, "mango": 3}"#).unwrap();
    let written = serde_json::to_string(&doc).unwrap();
    assert_eq!(written, r#"{"apple":2,"mango":3,"zebra":1}"#);
}

#[test]
fn writing_is_deterministic_across_construction_orders() {
    let one = parse(r#"{"b": 1, "a": 2}"#).unwrap();
    let other = parse(r#"{"a": 2, "b": 1}"#).unwrap();
    assert_eq!(
        serde_json::to_string(&one).unwrap(),
        serde_json::to_string(&other).unwrap()
    );
}

#[test]
fn deserialize_value_from_external_json() {
    let value: Value = serde_json::from_str(r#"{"n": 3, "d": 2.5, "s": "x"}"#).unwrap();
    assert!(value["n"].is_integer());
    assert!(value["d"].is_decimal());
    assert!(value["s"].is_string());
}

#[test]
fn integer_and_decimal_tags_survive_the_trip() {
    let doc = parse(r#"{"int": 5, "dec": 5.0}"#).unwrap();
    let written = serde_json::to_string(&doc).unwrap();
    let back = parse(&written).unwrap();
    assert!(back["int"].is_integer());
    assert!(back["dec"].is_decimal());
}
