use canopy_core::{Object, Value};

// ============================================================================
// Construction and access
// ============================================================================

#[test]
fn build_and_read_members() {
    let mut doc = Value::Object(Object::new());
    doc["hi"] = Value::from(false);
    assert_eq!(doc["hi"].as_boolean().unwrap(), false);

    doc["yay"] = Value::from(
        ["Hello", "to", "the", "world"]
            .into_iter()
            .collect::<canopy_core::Array>(),
    );
    assert_eq!(doc["hi"].as_boolean().unwrap(), false);
    assert_eq!(doc["yay"].as_array().unwrap().len(), 4);
    assert_eq!(doc.as_object().unwrap().len(), 2);
}

#[test]
fn key_uniqueness_size_tracks_distinct_keys() {
    let mut object = Object::new();
    object.insert("a", 1);
    object.insert("b", 2);
    object.insert("a", 3);
    object.insert("c", 4);
    object.insert("b", 5);
    assert_eq!(object.len(), 3);
    assert_eq!(object.get("a"), Some(&Value::from(3)));
    assert_eq!(object.get("b"), Some(&Value::from(5)));
    assert_eq!(object.get("c"), Some(&Value::from(4)));
}

#[test]
fn iteration_order_is_sorted_not_insertion() {
    let from_one_order: Object = [("foo", 5), ("bar", 7), ("baz", 9)].into_iter().collect();
    let from_other_order: Object = [("baz", 9), ("foo", 5), ("bar", 7)].into_iter().collect();

    let keys_a: Vec<&str> = from_one_order.keys().collect();
    let keys_b: Vec<&str> = from_other_order.keys().collect();
    assert_eq!(keys_a, ["bar", "baz", "foo"]);
    assert_eq!(keys_a, keys_b);
    assert_eq!(from_one_order, from_other_order);
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn object_never_equals_another_kind() {
    let object = Value::Object(Object::new());
    let number = Value::from(5);
    assert_ne!(object, number);
    assert_ne!(number, object);
}

// ============================================================================
// Erase
// ============================================================================

#[test]
fn erase_by_key_reports_removal_once() {
    let mut object: Object = [("foo", Value::from(5)), ("bar", Value::from("wat"))]
        .into_iter()
        .collect();
    assert_eq!(object.len(), 2);
    assert_eq!(object.count("bar"), 1);
    assert_eq!(object.count("foo"), 1);

    assert!(object.remove("foo").is_some());
    assert_eq!(object.count("bar"), 1);
    assert_eq!(object.count("foo"), 0);
    assert!(object.remove("foo").is_none());
}

#[test]
fn erase_at_cursor_returns_next_live_entry() {
    let mut object: Object = [("foo", Value::from(5)), ("bar", Value::from("wat"))]
        .into_iter()
        .collect();
    let cursor = object.index_of("bar").unwrap();
    assert_eq!(object.get_index(cursor).unwrap().0, "bar");

    object.remove_at(cursor);
    assert_eq!(object.count("bar"), 0);
    assert_eq!(object.count("foo"), 1);
    assert!(object.remove("bar").is_none());
    assert_eq!(object.get_index(cursor).unwrap().0, "foo");
}

#[test]
fn erase_whole_range_leaves_empty_iteration() {
    let mut object: Object = [("foo", Value::from(5)), ("bar", Value::from("wat"))]
        .into_iter()
        .collect();
    object.remove_range(0..object.len());
    assert_eq!(object.len(), 0);
    assert_eq!(object.count("bar"), 0);
    assert_eq!(object.count("foo"), 0);
    assert!(object.remove("bar").is_none());
    assert!(object.iter().next().is_none());
}

#[test]
fn erase_last_entry_then_begin_equals_end() {
    let mut object: Object = [("solo", 1)].into_iter().collect();
    let (key, value) = object.remove_at(0);
    assert_eq!(key, "solo");
    assert_eq!(value, Value::from(1));
    assert!(object.is_empty());
    assert!(object.iter().next().is_none());
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn view_iterates_live_storage_without_copying() {
    let doc = Value::Object(
        [("foo", Value::from(5)), ("bar", Value::from("wat"))]
            .into_iter()
            .collect(),
    );
    let view = doc.as_object().unwrap();

    let mut rebuilt = Object::new();
    for (key, value) in view {
        rebuilt.insert(key, value.clone());
    }
    assert_eq!(Value::Object(rebuilt), doc);
}

#[test]
fn view_sees_every_key_exactly_once() {
    let object: Object = [("foo", 5), ("bar", 7)].into_iter().collect();
    let mut seen = vec![];
    for (key, _) in object.view() {
        seen.push(key.to_owned());
    }
    seen.sort();
    assert_eq!(seen, ["bar", "foo"]);
}

// ============================================================================
// Nested access and auto-vivification
// ============================================================================

#[test]
fn nested_assignment_reaches_each_level() {
    let mut doc = Value::Object([("x", 0)].into_iter().collect());
    doc["a"] = Value::Object([("x", 1)].into_iter().collect());
    doc["a"]["b"] = Value::Object([("x", 2)].into_iter().collect());
    doc["a"]["b"]["c"] = Value::Object([("x", 3)].into_iter().collect());
    doc["a"]["b"]["c"]["d"] = Value::Object([("x", 4)].into_iter().collect());

    assert_eq!(doc["x"], Value::from(0));
    assert_eq!(doc["a"]["x"], Value::from(1));
    assert_eq!(doc["a"]["b"]["x"], Value::from(2));
    assert_eq!(doc["a"]["b"]["c"]["x"], Value::from(3));
    assert_eq!(doc["a"]["b"]["c"]["d"]["x"], Value::from(4));
}

#[test]
fn assigning_through_absent_keys_vivifies_nested_objects() {
    let mut doc = Value::Object([("present", true)].into_iter().collect());
    doc["a"]["b"]["c"]["d"] = Value::from("deep");

    assert_eq!(doc.as_object().unwrap().len(), 2);
    assert_eq!(doc["a"].as_object().unwrap().len(), 1);
    assert_eq!(doc["a"]["b"].as_object().unwrap().len(), 1);
    assert_eq!(doc["a"]["b"]["c"].as_object().unwrap().len(), 1);
    assert_eq!(doc["a"]["b"]["c"]["d"], Value::from("deep"));

    // Sibling lookups stay distinct from the original key.
    assert!(doc["a"]["present"].is_null());
    assert!(doc["a"]["b"]["present"].is_null());
    assert_eq!(doc["present"], Value::from(true));
}

#[test]
fn entry_fails_on_non_object() {
    let mut doc = Value::from("scalar");
    assert!(doc.entry("key").is_err());
}

#[test]
#[should_panic(expected = "cannot index")]
fn index_mut_panics_on_non_object() {
    let mut doc = Value::from(3);
    doc["key"] = Value::Null;
}
