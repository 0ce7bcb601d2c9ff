//! # canopy-core
//!
//! JSON document trees with order-deterministic containers, recoverable
//! parsing, and adapter-based serialization.
//!
//! The crate parses JSON text into a [`Value`] tree whose objects iterate in
//! sorted key order regardless of construction sequence, so two documents
//! with the same content always walk the same way. The parser's recovery
//! policy is configurable: fail at the first problem, collect every problem
//! alongside a best-effort tree, or silently resolve what can be resolved.
//! Conversion between trees and application types goes through explicitly
//! registered adapters — a decode/encode function pair per type — with path
//! tracking for diagnostics like `orders[2].total`.
//!
//! ## Quick start
//!
//! ```rust
//! use canopy_core::{parse, Value};
//!
//! let doc = parse(r#"{"name": "Ada", "scores": [95, 87]}"#).unwrap();
//! assert_eq!(doc["name"], Value::from("Ada"));
//! assert_eq!(doc["scores"][1], Value::from(87));
//! ```
//!
//! Lenient ingestion keeps the usable part of a malformed document:
//!
//! ```rust
//! use canopy_core::{parse_with, FailureMode, ParseOptions, Value};
//!
//! let options = ParseOptions::new().failure_mode(FailureMode::CollectAll);
//! let err = parse_with(r#"{count: 3}"#, &options).unwrap_err();
//! assert_eq!(err.problems().len(), 1);
//! assert_eq!(err.partial_result().unwrap()["count"], Value::from(3));
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the [`Value`] tagged union and kind-checked access
//! - [`object`] — key-sorted associative container with read-only views
//! - [`array`] — insertion-ordered sequence container
//! - [`parse`] — recursive-descent parser with the recovery-policy modes
//! - [`serial`] — adapter registry, extraction/serialization contexts
//! - [`error`] — parse, extraction, and kind errors

pub mod array;
mod convert;
pub mod error;
pub mod object;
pub mod parse;
pub mod serial;
pub mod value;

pub use array::Array;
pub use error::{
    ExtractionError, ExtractionReason, KindError, ParseError, Path, PathElement, Position,
    Problem,
};
pub use object::{Object, ObjectView};
pub use parse::{parse, parse_with, FailureMode, ParseOptions};
pub use serial::{
    ExtractionContext, ExtractionMode, FnAdapter, Formats, IntoEncodeFn, IntoExtractFn,
    SerializationContext,
};
pub use value::{Kind, Value};
