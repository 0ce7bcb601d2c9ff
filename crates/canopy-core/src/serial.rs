//! Adapter-based conversion between [`Value`] trees and application types.
//!
//! A type participates in serialization by registering an **adapter** — a
//! decode function and an encode function — in a [`Formats`] registry. The
//! registry performs no reflection: every type is explicit, and nested
//! decoding/encoding goes back through the registry so adapters compose.
//!
//! # Call-shape normalization
//!
//! User-supplied functions come in several shapes: decode may or may not
//! accept an [`ExtractionContext`], and may return either `T` directly
//! (always succeeds) or `Result<T, ExtractionError>`; encode may or may not
//! accept a [`SerializationContext`]. Each shape is lifted into one canonical
//! closure form exactly once, at registration, by the marker-parameterized
//! [`IntoExtractFn`] / [`IntoEncodeFn`] traits. Every later invocation is a
//! single indirect call — there is no per-call shape probing.
//!
//! # Failure policy
//!
//! Extraction failures carry the path of the offending node. Under the
//! default [`ExtractionMode::FailFast`] the first failure propagates
//! immediately; under [`ExtractionMode::CollectAll`] the context records
//! every failure and [`ExtractionContext::run`] reports them as one aggregate
//! error. The extraction mode is configured on the context explicitly — it is
//! *not* inherited from the parser, though the context can carry a note of
//! the [`FailureMode`] the source tree was parsed under as a hint to lenient
//! decoders.

use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use std::mem;

use crate::error::{ExtractionError, ExtractionReason, KindError, Path, PathElement};
use crate::parse::FailureMode;
use crate::value::{Kind, Value};

/// How an [`ExtractionContext`] responds to decode failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// The first failure stops the extraction.
    #[default]
    FailFast,
    /// Record every failure and report them together.
    CollectAll,
}

/// Canonical decode closure: context and source in, result out.
pub type ExtractFn<T> =
    Box<dyn Fn(&mut ExtractionContext<'_>, &Value) -> Result<T, ExtractionError> + Send + Sync>;
/// Canonical encode closure: context and source in, [`Value`] out.
pub type EncodeFn<T> = Box<dyn Fn(&SerializationContext<'_>, &T) -> Value + Send + Sync>;

/// Call-shape markers for [`IntoExtractFn`] and [`IntoEncodeFn`].
///
/// These exist only to keep the blanket conversions coherent; user code never
/// names them — the compiler picks the one shape a given function satisfies.
pub mod shape {
    pub struct ContextFallible;
    pub struct ContextInfallible;
    pub struct SourceFallible;
    pub struct SourceInfallible;
    pub struct ContextEncode;
    pub struct SourceEncode;
}

/// Lift a decode callable of any accepted shape into the canonical
/// context-and-source, result-returning closure.
pub trait IntoExtractFn<T, M> {
    fn into_extract_fn(self) -> ExtractFn<T>;
}

impl<T, F> IntoExtractFn<T, shape::ContextFallible> for F
where
    F: Fn(&mut ExtractionContext<'_>, &Value) -> Result<T, ExtractionError>
        + Send
        + Sync
        + 'static,
{
    fn into_extract_fn(self) -> ExtractFn<T> {
        Box::new(self)
    }
}

impl<T, F> IntoExtractFn<T, shape::ContextInfallible> for F
where
    F: Fn(&mut ExtractionContext<'_>, &Value) -> T + Send + Sync + 'static,
{
    fn into_extract_fn(self) -> ExtractFn<T> {
        Box::new(move |context, from| Ok(self(context, from)))
    }
}

impl<T, F> IntoExtractFn<T, shape::SourceFallible> for F
where
    F: Fn(&Value) -> Result<T, ExtractionError> + Send + Sync + 'static,
{
    fn into_extract_fn(self) -> ExtractFn<T> {
        Box::new(move |_context, from| self(from))
    }
}

impl<T, F> IntoExtractFn<T, shape::SourceInfallible> for F
where
    F: Fn(&Value) -> T + Send + Sync + 'static,
{
    fn into_extract_fn(self) -> ExtractFn<T> {
        Box::new(move |_context, from| Ok(self(from)))
    }
}

/// Lift an encode callable of either accepted shape into the canonical
/// context-and-source closure.
pub trait IntoEncodeFn<T, M> {
    fn into_encode_fn(self) -> EncodeFn<T>;
}

impl<T, F> IntoEncodeFn<T, shape::ContextEncode> for F
where
    F: Fn(&SerializationContext<'_>, &T) -> Value + Send + Sync + 'static,
{
    fn into_encode_fn(self) -> EncodeFn<T> {
        Box::new(self)
    }
}

impl<T, F> IntoEncodeFn<T, shape::SourceEncode> for F
where
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    fn into_encode_fn(self) -> EncodeFn<T> {
        Box::new(move |_context, from| self(from))
    }
}

/// A decode/encode pair bound into a uniform codec for `T`.
///
/// Both halves are stored in canonical shape, so dispatching never inspects
/// how the user originally wrote them.
pub struct FnAdapter<T> {
    pub(crate) extract: ExtractFn<T>,
    pub(crate) encode: EncodeFn<T>,
}

impl<T: 'static> FnAdapter<T> {
    pub fn new<ME, MS>(
        extract: impl IntoExtractFn<T, ME>,
        encode: impl IntoEncodeFn<T, MS>,
    ) -> Self {
        FnAdapter {
            extract: extract.into_extract_fn(),
            encode: encode.into_encode_fn(),
        }
    }
}

/// Adapter registry: one codec per application type.
///
/// Populate the registry during setup, then share it immutably; `&Formats`
/// lookups are safe from any number of threads, and the borrow checker rules
/// out registration racing a lookup.
#[derive(Default)]
pub struct Formats {
    adapters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Formats {
    /// An empty registry.
    pub fn new() -> Self {
        Formats::default()
    }

    /// A registry pre-loaded with adapters for the scalar types: `bool`, the
    /// fixed-width integers up to `i64`, `f32`/`f64`, `String`, and `Value`
    /// itself (identity).
    pub fn with_defaults() -> Self {
        let mut formats = Formats::new();
        register_scalar_adapters(&mut formats);
        formats
    }

    /// Bind a decode/encode function pair as the codec for `T`, replacing any
    /// previous registration.
    pub fn register<T: 'static, ME, MS>(
        &mut self,
        extract: impl IntoExtractFn<T, ME>,
        encode: impl IntoEncodeFn<T, MS>,
    ) {
        self.register_adapter(FnAdapter::new(extract, encode));
    }

    pub fn register_adapter<T: 'static>(&mut self, adapter: FnAdapter<T>) {
        self.adapters.insert(TypeId::of::<T>(), Box::new(adapter));
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.adapters.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn adapter<T: 'static>(&self) -> Option<&FnAdapter<T>> {
        self.adapters
            .get(&TypeId::of::<T>())?
            .downcast_ref::<FnAdapter<T>>()
    }

    /// Decode `from` into a `T` under a fresh fail-fast context.
    pub fn extract<T: 'static>(&self, from: &Value) -> Result<T, ExtractionError> {
        ExtractionContext::new(self).run(from)
    }

    /// Encode `from` into a [`Value`] under a fresh context.
    ///
    /// # Panics
    ///
    /// Panics when no adapter is registered for `T`; registration is a setup
    /// phase concern, so a missing adapter here is a programming error.
    pub fn to_json<T: 'static>(&self, from: &T) -> Value {
        SerializationContext::new(self).to_json(from)
    }
}

/// Ambient state threaded through decode calls: adapter lookup, the path
/// accumulator for diagnostics, the failure policy, and an optional note of
/// the recovery mode the source tree was parsed under.
pub struct ExtractionContext<'f> {
    formats: &'f Formats,
    mode: ExtractionMode,
    source_mode: Option<FailureMode>,
    path: Path,
    recorded: Vec<ExtractionError>,
}

impl<'f> ExtractionContext<'f> {
    pub fn new(formats: &'f Formats) -> Self {
        ExtractionContext::with_mode(formats, ExtractionMode::FailFast)
    }

    pub fn with_mode(formats: &'f Formats, mode: ExtractionMode) -> Self {
        ExtractionContext {
            formats,
            mode,
            source_mode: None,
            path: Path::new(),
            recorded: Vec::new(),
        }
    }

    /// Note the recovery mode the source tree was parsed under, visible to
    /// adapters through [`ExtractionContext::source_mode`].
    pub fn with_source_mode(mut self, mode: FailureMode) -> Self {
        self.source_mode = Some(mode);
        self
    }

    pub fn formats(&self) -> &'f Formats {
        self.formats
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// The recovery mode the source tree was parsed under, when the caller
    /// said so. Adapters decoding lenient trees can use this to soften their
    /// own expectations.
    pub fn source_mode(&self) -> Option<FailureMode> {
        self.source_mode
    }

    /// Path from the document root to the value currently being decoded.
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    /// Top-level entry point: decode and, under collect-all, fold everything
    /// recorded into one aggregate failure.
    pub fn run<T: 'static>(&mut self, from: &Value) -> Result<T, ExtractionError> {
        let result = self.extract(from);
        if !self.recorded.is_empty() {
            let recorded = mem::take(&mut self.recorded);
            return Err(ExtractionError::aggregate(recorded));
        }
        result
    }

    /// Decode `from` into a `U` through its registered adapter. Failures are
    /// stamped with the current path, and recorded when collecting.
    pub fn extract<U: 'static>(&mut self, from: &Value) -> Result<U, ExtractionError> {
        let formats = self.formats;
        let adapter = match formats.adapter::<U>() {
            Some(adapter) => adapter,
            None => return self.fail(ExtractionReason::NoAdapter(any::type_name::<U>())),
        };
        match (adapter.extract)(self, from) {
            Ok(value) => Ok(value),
            Err(mut err) => {
                if err.path().is_empty() && !self.path.is_empty() {
                    err = err.with_path(self.path.clone());
                }
                if self.mode == ExtractionMode::CollectAll && !self.recorded.contains(&err) {
                    self.recorded.push(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Decode the member `key` of an object value, pushing the key onto the
    /// diagnostic path for the duration.
    pub fn extract_member<U: 'static>(
        &mut self,
        from: &Value,
        key: &str,
    ) -> Result<U, ExtractionError> {
        let object = match from {
            Value::Object(object) => object,
            other => {
                let actual = other.kind();
                return self.fail(ExtractionReason::Kind(KindError {
                    expected: Kind::Object,
                    actual,
                }));
            }
        };
        self.path.push(PathElement::Key(key.to_owned()));
        let result = match object.get(key) {
            Some(member) => self.extract(member),
            None => self.fail(ExtractionReason::MissingField(key.to_owned())),
        };
        self.path.pop();
        result
    }

    /// Decode element `index` of an array value, pushing the index onto the
    /// diagnostic path for the duration.
    pub fn extract_element<U: 'static>(
        &mut self,
        from: &Value,
        index: usize,
    ) -> Result<U, ExtractionError> {
        let array = match from {
            Value::Array(array) => array,
            other => {
                let actual = other.kind();
                return self.fail(ExtractionReason::Kind(KindError {
                    expected: Kind::Array,
                    actual,
                }));
            }
        };
        self.path.push(PathElement::Index(index));
        let result = match array.get(index) {
            Some(element) => self.extract(element),
            None => {
                let len = array.len();
                self.fail(ExtractionReason::Message(format!(
                    "no element at index {index} (array has {len})"
                )))
            }
        };
        self.path.pop();
        result
    }

    /// Mint a failure at the current path, recording it when collecting.
    pub fn fail<U>(&mut self, reason: ExtractionReason) -> Result<U, ExtractionError> {
        let err = ExtractionError::new(reason).with_path(self.path.clone());
        if self.mode == ExtractionMode::CollectAll {
            self.recorded.push(err.clone());
        }
        Err(err)
    }
}

/// Ambient state threaded through encode calls: adapter lookup for nested
/// fields.
pub struct SerializationContext<'f> {
    formats: &'f Formats,
}

impl<'f> SerializationContext<'f> {
    pub fn new(formats: &'f Formats) -> Self {
        SerializationContext { formats }
    }

    pub fn formats(&self) -> &'f Formats {
        self.formats
    }

    /// Encode `from` through its registered adapter.
    ///
    /// # Panics
    ///
    /// Panics when no adapter is registered for `U`.
    pub fn to_json<U: 'static>(&self, from: &U) -> Value {
        match self.formats.adapter::<U>() {
            Some(adapter) => (adapter.encode)(self, from),
            None => panic!("no adapter registered for {}", any::type_name::<U>()),
        }
    }
}

macro_rules! register_narrow_integer {
    ($formats:expr, $($int:ty),*) => {$(
        $formats.register(
            |from: &Value| {
                let wide = from.as_integer().map_err(ExtractionError::from)?;
                <$int>::try_from(wide).map_err(|_| {
                    ExtractionError::new(ExtractionReason::OutOfRange(format!(
                        concat!("{} does not fit in ", stringify!($int)),
                        wide
                    )))
                })
            },
            |from: &$int| Value::Integer(i64::from(*from)),
        );
    )*};
}

fn register_scalar_adapters(formats: &mut Formats) {
    formats.register(
        |from: &Value| from.as_boolean().map_err(ExtractionError::from),
        |from: &bool| Value::Bool(*from),
    );
    formats.register(
        |from: &Value| from.as_integer().map_err(ExtractionError::from),
        |from: &i64| Value::Integer(*from),
    );
    register_narrow_integer!(formats, i8, i16, i32, u8, u16, u32);
    // Numeric widening: extracting a decimal from an integer value succeeds,
    // since the grammar cannot say which one "1" was meant to be.
    formats.register(
        |from: &Value| match from {
            Value::Decimal(d) => Ok(*d),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(ExtractionError::from(KindError {
                expected: Kind::Decimal,
                actual: other.kind(),
            })),
        },
        |from: &f64| Value::Decimal(*from),
    );
    formats.register(
        |from: &Value| match from {
            Value::Decimal(d) => Ok(*d as f32),
            Value::Integer(i) => Ok(*i as f32),
            other => Err(ExtractionError::from(KindError {
                expected: Kind::Decimal,
                actual: other.kind(),
            })),
        },
        |from: &f32| Value::Decimal(f64::from(*from)),
    );
    formats.register(
        |from: &Value| {
            from.as_string()
                .map(str::to_owned)
                .map_err(ExtractionError::from)
        },
        |from: &String| Value::String(from.clone()),
    );
    formats.register(
        |from: &Value| -> Result<Value, ExtractionError> { Ok(from.clone()) },
        |from: &Value| from.clone(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adapters_cover_scalars() {
        let formats = Formats::with_defaults();
        assert!(formats.contains::<bool>());
        assert!(formats.contains::<i64>());
        assert!(formats.contains::<f64>());
        assert!(formats.contains::<String>());
        assert!(formats.contains::<Value>());
        assert!(!formats.contains::<char>());
    }

    #[test]
    fn narrow_integer_out_of_range() {
        let formats = Formats::with_defaults();
        let err = formats.extract::<i8>(&Value::from(4000)).unwrap_err();
        assert!(matches!(err.reason(), ExtractionReason::OutOfRange(_)));
    }

    #[test]
    fn decimal_widens_from_integer() {
        let formats = Formats::with_defaults();
        assert_eq!(formats.extract::<f64>(&Value::from(3)).unwrap(), 3.0);
    }

    #[test]
    fn missing_adapter_is_a_typed_failure() {
        let formats = Formats::new();
        let err = formats.extract::<bool>(&Value::Bool(true)).unwrap_err();
        assert!(matches!(err.reason(), ExtractionReason::NoAdapter(_)));
    }
}
