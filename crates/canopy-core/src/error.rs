//! Error types for parsing, extraction, and kind-checked access.
//!
//! Three failure families cover the whole crate:
//!
//! - [`ParseError`] — syntax-level; carries the source [`Position`] of the
//!   first reported problem, the full [`Problem`] list when the parse ran in
//!   collect-all mode, and the best-effort partial tree when one exists.
//! - [`ExtractionError`] — semantic mismatch while decoding a [`Value`] into
//!   an application type; carries the [`Path`] of the offending node.
//! - [`KindError`] — a kind-specific accessor was invoked on a [`Value`] of a
//!   different kind.

use std::fmt;

use thiserror::Error;

use crate::value::{Kind, Value};

/// Location of a token within parser input.
///
/// `offset` is a byte index into the source text; `line` and `column` are
/// 1-based and count characters, so they are safe to show to users even for
/// multi-byte input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single diagnostic produced during parsing.
///
/// Recoverable problems (bare keys, duplicate keys) accumulate under
/// collect-all mode; an unrecoverable problem terminates the parse and
/// becomes the head of the resulting [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub position: Position,
    pub message: String,
}

impl Problem {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Problem {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// Failure returned by [`parse`](crate::parse::parse).
///
/// Callers branch on the `Result` explicitly; there is no unwinding path that
/// smuggles a partial tree out of the parser. Under collect-all mode the
/// error holds every recorded [`Problem`] plus the best-effort tree built
/// before (and through) the recoverable ones.
#[derive(Error, Debug)]
#[error("{}", render_parse(.position, .message, .problems))]
pub struct ParseError {
    position: Position,
    message: String,
    problems: Vec<Problem>,
    partial: Option<Value>,
}

fn render_parse(position: &Position, message: &str, problems: &[Problem]) -> String {
    let mut out = format!("parse error at {position}: {message}");
    if problems.len() > 1 {
        out.push_str(&format!(" (and {} more problems)", problems.len() - 1));
    }
    out
}

impl ParseError {
    /// Build from an unrecoverable problem, attaching whatever recoverable
    /// problems had been collected before the parse died.
    pub(crate) fn fatal(head: Problem, mut collected: Vec<Problem>) -> Self {
        let position = head.position;
        let message = head.message.clone();
        collected.push(head);
        ParseError {
            position,
            message,
            problems: collected,
            partial: None,
        }
    }

    /// Build from recoverable problems only; the full tree survived.
    pub(crate) fn collected(problems: Vec<Problem>, partial: Value) -> Self {
        debug_assert!(!problems.is_empty());
        let head = &problems[0];
        ParseError {
            position: head.position,
            message: head.message.clone(),
            problems,
            partial: Some(partial),
        }
    }

    /// Position of the first unrecoverable or first-reported problem.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Human-readable message of the first-reported problem.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every individual problem encountered, in source order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// The best-effort tree, present only when every problem was recoverable
    /// (collect-all mode).
    pub fn partial_result(&self) -> Option<&Value> {
        self.partial.as_ref()
    }

    /// Consume the error, yielding the partial tree if one was built.
    pub fn into_partial_result(self) -> Option<Value> {
        self.partial
    }
}

/// A kind-specific accessor was used on a [`Value`] of a different kind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected}, found {actual}")]
pub struct KindError {
    pub expected: Kind,
    pub actual: Kind,
}

/// One step in the path from the document root to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElement {
    /// Object member access by key.
    Key(String),
    /// Array element access by index.
    Index(usize),
}

/// Accumulated location of a value within a document, e.g. `orders[2].total`.
///
/// Extraction contexts push an element before descending into a member and
/// pop it on the way out, so any error minted mid-descent carries the full
/// route from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Key(key) if i == 0 => write!(f, "{key}")?,
                PathElement::Key(key) => write!(f, ".{key}")?,
                PathElement::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Why a decode step failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionReason {
    #[error("missing field \"{0}\"")]
    MissingField(String),

    #[error(transparent)]
    Kind(#[from] KindError),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("no adapter registered for {0}")]
    NoAdapter(&'static str),

    #[error("{0}")]
    Message(String),
}

/// Semantic failure while decoding a [`Value`] into an application type.
///
/// Carries the field path within the source tree. When produced by a
/// collect-all extraction context, `sub_errors` lists every recorded failure
/// beyond the first.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", render_extraction(.path, .reason, .sub_errors))]
pub struct ExtractionError {
    path: Path,
    reason: ExtractionReason,
    sub_errors: Vec<ExtractionError>,
}

fn render_extraction(path: &Path, reason: &ExtractionReason, sub_errors: &[ExtractionError]) -> String {
    let mut out = if path.is_empty() {
        format!("extraction error at document root: {reason}")
    } else {
        format!("extraction error at {path}: {reason}")
    };
    if !sub_errors.is_empty() {
        out.push_str(&format!(" (and {} more failures)", sub_errors.len()));
    }
    out
}

impl ExtractionError {
    pub fn new(reason: ExtractionReason) -> Self {
        ExtractionError {
            path: Path::new(),
            reason,
            sub_errors: Vec::new(),
        }
    }

    /// Shorthand for an ad-hoc failure message, for use inside user-written
    /// decode functions.
    pub fn message(text: impl Into<String>) -> Self {
        ExtractionError::new(ExtractionReason::Message(text.into()))
    }

    pub(crate) fn with_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Fold several recorded failures into one aggregate error. The first
    /// failure supplies the headline path and reason; the rest become
    /// sub-errors.
    pub(crate) fn aggregate(mut errors: Vec<ExtractionError>) -> Self {
        debug_assert!(!errors.is_empty());
        let mut head = errors.remove(0);
        head.sub_errors.extend(errors);
        head
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reason(&self) -> &ExtractionReason {
        &self.reason
    }

    pub fn sub_errors(&self) -> &[ExtractionError] {
        &self.sub_errors
    }
}

impl From<KindError> for ExtractionError {
    fn from(err: KindError) -> Self {
        ExtractionError::new(ExtractionReason::Kind(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display_matches_diagnostic_style() {
        let mut path = Path::new();
        path.push(PathElement::Key("orders".into()));
        path.push(PathElement::Index(2));
        path.push(PathElement::Key("total".into()));
        assert_eq!(path.to_string(), "orders[2].total");
    }

    #[test]
    fn path_display_root_index() {
        let mut path = Path::new();
        path.push(PathElement::Index(0));
        path.push(PathElement::Key("id".into()));
        assert_eq!(path.to_string(), "[0].id");
    }

    #[test]
    fn kind_error_display() {
        let err = KindError {
            expected: Kind::Boolean,
            actual: Kind::String,
        };
        assert_eq!(err.to_string(), "expected boolean, found string");
    }
}
