//! The `Value` tree — a tagged union over every JSON datum.
//!
//! A [`Value`] is exactly one of: null, boolean, integer, decimal, string,
//! array-of-values, or object-of-(string, value). It exclusively owns its
//! children; the grammar cannot produce sharing or cycles, and Rust ownership
//! keeps it that way. Equality is structural and tag-strict: comparing values
//! of different kinds is `false`, never an error, and `Integer(1)` is not
//! equal to `Decimal(1.0)`.
//!
//! # Access
//!
//! Kind-checked accessors (`as_boolean`, `as_integer`, ...) return
//! [`KindError`] on mismatch. For ergonomic reads, `value["key"]` and
//! `value[index]` follow the `serde_json::Value` convention: a missing key or
//! wrong kind yields a borrowed `Null` rather than panicking. Mutable
//! indexing auto-vivifies: assigning through a chain of absent keys creates
//! one empty object per absent link. [`Value::entry`] is the non-panicking
//! form of that same behavior.

use std::fmt;
use std::ops;

use crate::array::Array;
use crate::error::KindError;
use crate::object::{Object, ObjectView};

/// Discriminant of a [`Value`], used in diagnostics and kind checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Decimal,
    String,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Decimal => "decimal",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A JSON datum: the node type of a parsed document tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Array),
    Object(Object),
}

static NULL: Value = Value::Null;

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Decimal(_) => Kind::Decimal,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Value::Decimal(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    fn mismatch(&self, expected: Kind) -> KindError {
        KindError {
            expected,
            actual: self.kind(),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, KindError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(Kind::Boolean)),
        }
    }

    pub fn as_integer(&self) -> Result<i64, KindError> {
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(other.mismatch(Kind::Integer)),
        }
    }

    pub fn as_decimal(&self) -> Result<f64, KindError> {
        match self {
            Value::Decimal(d) => Ok(*d),
            other => Err(other.mismatch(Kind::Decimal)),
        }
    }

    pub fn as_string(&self) -> Result<&str, KindError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(Kind::String)),
        }
    }

    pub fn as_array(&self) -> Result<&Array, KindError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(other.mismatch(Kind::Array)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Array, KindError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(other.mismatch(Kind::Array)),
        }
    }

    /// Read-only view of this value's object storage. The view iterates the
    /// live entries without copying and offers no mutation surface.
    pub fn as_object(&self) -> Result<ObjectView<'_>, KindError> {
        match self {
            Value::Object(o) => Ok(o.view()),
            other => Err(other.mismatch(Kind::Object)),
        }
    }

    pub fn as_object_mut(&mut self) -> Result<&mut Object, KindError> {
        match self {
            Value::Object(o) => Ok(o),
            other => Err(other.mismatch(Kind::Object)),
        }
    }

    /// Member read: `Some` only when this is an object holding `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(o) => o.get(key),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(o) => o.get_mut(key),
            _ => None,
        }
    }

    /// Mutable member slot with auto-vivification.
    ///
    /// When this value is an object and `key` is absent, an empty object is
    /// inserted at `key` before the slot is returned, so assignment through a
    /// chain of N absent keys creates N nested empty objects. A non-object
    /// receiver fails with a kind mismatch.
    pub fn entry(&mut self, key: &str) -> Result<&mut Value, KindError> {
        match self {
            Value::Object(o) => Ok(o.entry(key)),
            other => Err(other.mismatch(Kind::Object)),
        }
    }
}

/// Shared key indexing. Missing keys and non-object receivers yield `Null`,
/// matching the `serde_json::Value` convention.
impl ops::Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Mutable key indexing with auto-vivification.
///
/// # Panics
///
/// Panics when the receiver is not an object. [`Value::entry`] is the
/// fallible form.
impl ops::IndexMut<&str> for Value {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        match self.entry(key) {
            Ok(slot) => slot,
            Err(err) => panic!("cannot index {} with key {:?}", err.actual, key),
        }
    }
}

/// Shared element indexing. Out-of-bounds indices and non-array receivers
/// yield `Null`.
impl ops::Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(a) => a.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

/// Mutable element indexing.
///
/// # Panics
///
/// Panics when the receiver is not an array or the index is out of bounds.
impl ops::IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        match self {
            Value::Array(a) => &mut a[index],
            other => panic!("cannot index {} with array index {}", other.kind(), index),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Decimal(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Array::from(value))
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}
