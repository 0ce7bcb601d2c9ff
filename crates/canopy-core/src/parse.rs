//! Recursive-descent JSON parser with a configurable error-recovery policy.
//!
//! [`parse`] consumes its entire input and materializes a full [`Value`]
//! tree; there is no streaming mode. The recovery policy is selected through
//! [`ParseOptions`]:
//!
//! - [`FailureMode::FailFast`] (default) — stop at the first problem and
//!   report it with its source position.
//! - [`FailureMode::CollectAll`] — keep parsing past *recoverable* problems,
//!   record every one, and hand back the best-effort tree inside the error.
//! - [`FailureMode::Ignore`] — resolve recoverable problems silently and
//!   return the tree as a success.
//!
//! # Key design decisions
//!
//! - **Recoverable vs. unrecoverable**: a problem is recoverable when the
//!   text still determines a complete document — an unquoted object key
//!   (`{a: 3}`, accepted as if quoted) or a duplicate key (last value wins).
//!   Structurally incomplete input (unclosed container, dangling comma,
//!   unterminated string, trailing garbage) is fatal under *every* mode;
//!   no mode invents missing structure.
//! - **Byte offsets vs. character positions**: the scanner walks a char
//!   iterator but slices the source by byte index, so multi-byte input never
//!   lands mid-codepoint; the user-facing line/column pair counts characters.
//! - **Duplicate keys are flagged at the second key token**, before its value
//!   is parsed, so the fail-fast position points at the offending key rather
//!   than somewhere inside its value.

use std::iter::Peekable;
use std::str::Chars;

use crate::array::Array;
use crate::error::{ParseError, Position, Problem};
use crate::object::Object;
use crate::value::Value;

/// How the parser responds to recoverable syntax problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Stop at the first problem of any class.
    #[default]
    FailFast,
    /// Record recoverable problems, keep going, and report them all together
    /// with the best-effort tree.
    CollectAll,
    /// Resolve recoverable problems silently and succeed.
    Ignore,
}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    failure_mode: FailureMode,
    max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            failure_mode: FailureMode::FailFast,
            max_depth: 128,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        ParseOptions::default()
    }

    /// Select the recovery policy.
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Cap container nesting. Exceeding the cap is fatal under every mode.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Parse JSON text into a [`Value`] tree under the default (fail-fast)
/// options.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse JSON text into a [`Value`] tree under explicit options.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text, options);
    match parser.document() {
        Ok(value) => {
            if parser.problems.is_empty() {
                Ok(value)
            } else {
                Err(ParseError::collected(parser.problems, value))
            }
        }
        Err(fatal) => Err(ParseError::fatal(fatal, parser.problems)),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    True,
    False,
    Null,
    Integer(i64),
    Decimal(f64),
    String(String),
    /// A bare identifier that is not `true`/`false`/`null`. Only legal as an
    /// object key, and even there only under the lenient modes.
    Word(String),
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftBrace => f.write_str("'{'"),
            TokenKind::RightBrace => f.write_str("'}'"),
            TokenKind::LeftBracket => f.write_str("'['"),
            TokenKind::RightBracket => f.write_str("']'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::True | TokenKind::False => f.write_str("boolean"),
            TokenKind::Null => f.write_str("null"),
            TokenKind::Integer(_) | TokenKind::Decimal(_) => f.write_str("number"),
            TokenKind::String(_) => f.write_str("string"),
            TokenKind::Word(word) => write!(f, "'{word}'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: Position,
}

struct Scanner<'a> {
    // The original string, sliced by byte index for number parsing; the char
    // iterator guards against landing mid-codepoint in multi-byte input.
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    // Byte offsets: where the current token began, and one past the last
    // consumed character.
    start: usize,
    current: usize,
    // 1-based character position of the next character to consume.
    line: usize,
    column: usize,
    // Position of the current token's first character.
    token_start: Position,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.chars().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            token_start: Position::default(),
        }
    }

    fn next_token(&mut self) -> Result<Token, Problem> {
        self.skip_whitespace();
        self.start = self.current;
        self.token_start = self.position();

        if self.at_end() {
            return Ok(self.token(TokenKind::Eof));
        }

        match self.consume() {
            '{' => Ok(self.token(TokenKind::LeftBrace)),
            '}' => Ok(self.token(TokenKind::RightBrace)),
            '[' => Ok(self.token(TokenKind::LeftBracket)),
            ']' => Ok(self.token(TokenKind::RightBracket)),
            ',' => Ok(self.token(TokenKind::Comma)),
            ':' => Ok(self.token(TokenKind::Colon)),
            '"' => self.scan_string(),
            c if is_word_start(c) => Ok(self.scan_word()),
            c if c.is_ascii_digit() || c == '-' => self.scan_number(c),
            c => Err(self.problem_at_token(format!("unexpected character '{c}'"))),
        }
    }

    ///////////////////////////////////////////////////////////////////////
    // Strings

    fn scan_string(&mut self) -> Result<Token, Problem> {
        let mut text = String::new();
        loop {
            if self.at_end() {
                return Err(self.problem_at_token("unterminated string"));
            }
            match self.consume() {
                '"' => return Ok(self.token(TokenKind::String(text))),
                '\\' => text.push(self.scan_escape()?),
                c if (c as u32) < 0x20 => {
                    return Err(self.problem_here(format!(
                        "control character U+{:04X} must be escaped inside a string",
                        c as u32
                    )));
                }
                c => text.push(c),
            }
        }
    }

    fn scan_escape(&mut self) -> Result<char, Problem> {
        if self.at_end() {
            return Err(self.problem_at_token("unterminated string"));
        }
        match self.consume() {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\x08'),
            'f' => Ok('\x0C'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.scan_unicode_escape(),
            c => Err(self.problem_here(format!("invalid escape sequence \\{c}"))),
        }
    }

    fn scan_unicode_escape(&mut self) -> Result<char, Problem> {
        let high = self.scan_hex4()?;
        if is_high_surrogate(high) {
            // A high surrogate must be followed by a low surrogate escape.
            if !(self.matches('\\') && self.matches('u')) {
                return Err(self.problem_here(format!(
                    "the sequence \\u{high:04X} is an unfinished character and must be \
                     followed by a second \\u escape"
                )));
            }
            let low = self.scan_hex4()?;
            match char::decode_utf16([high, low]).next() {
                Some(Ok(c)) => Ok(c),
                _ => Err(self.problem_here(format!(
                    "invalid surrogate pair \\u{high:04X}\\u{low:04X}"
                ))),
            }
        } else {
            match char::from_u32(u32::from(high)) {
                Some(c) => Ok(c),
                None => Err(self.problem_here(format!("unpaired surrogate \\u{high:04X}"))),
            }
        }
    }

    fn scan_hex4(&mut self) -> Result<u16, Problem> {
        let mut code: u16 = 0;
        for _ in 0..4 {
            let digit = match self.peek().to_digit(16) {
                Some(d) => d as u16,
                None => {
                    return Err(self.problem_here(
                        "invalid \\u escape: expected 4 hexadecimal digits",
                    ));
                }
            };
            self.advance();
            code = (code << 4) | digit;
        }
        Ok(code)
    }

    ///////////////////////////////////////////////////////////////////////
    // Numbers

    fn scan_number(&mut self, first: char) -> Result<Token, Problem> {
        if first == '-' && !self.peek().is_ascii_digit() {
            return Err(self.problem_here("expected a digit after '-'"));
        }
        // Leading zeroes are tolerated here even though RFC 8259 forbids
        // them; rejecting "01" buys no safety and hurts lenient ingestion.
        self.skip_digits();

        let mut is_decimal = false;
        if self.peek() == '.' {
            self.advance();
            if !self.peek().is_ascii_digit() {
                return Err(self.problem_here("expected a digit after the decimal point"));
            }
            self.skip_digits();
            is_decimal = true;
        }
        if matches!(self.peek(), 'e' | 'E') {
            self.advance();
            if matches!(self.peek(), '+' | '-') {
                self.advance();
            }
            if !self.peek().is_ascii_digit() {
                return Err(self.problem_here("expected a digit in the exponent"));
            }
            self.skip_digits();
            is_decimal = true;
        }

        let text = &self.source[self.start..self.current];
        let kind = if is_decimal {
            match text.parse::<f64>() {
                Ok(d) => TokenKind::Decimal(d),
                Err(_) => return Err(self.problem_at_token(format!("invalid number '{text}'"))),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => TokenKind::Integer(i),
                // Magnitude beyond i64: keep the value as a decimal rather
                // than failing the parse.
                Err(_) => match text.parse::<f64>() {
                    Ok(d) => TokenKind::Decimal(d),
                    Err(_) => {
                        return Err(self.problem_at_token(format!("invalid number '{text}'")))
                    }
                },
            }
        };
        Ok(self.token(kind))
    }

    ///////////////////////////////////////////////////////////////////////
    // Keywords and bare words

    fn scan_word(&mut self) -> Token {
        while is_word_continue(self.peek()) {
            self.advance();
        }
        let kind = match &self.source[self.start..self.current] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            word => TokenKind::Word(word.to_owned()),
        };
        self.token(kind)
    }

    ///////////////////////////////////////////////////////////////////////
    // Scanning control

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            position: self.token_start,
        }
    }

    fn position(&self) -> Position {
        Position {
            offset: self.current,
            line: self.line,
            column: self.column,
        }
    }

    fn problem_here(&self, message: impl Into<String>) -> Problem {
        Problem::new(self.position(), message)
    }

    fn problem_at_token(&self, message: impl Into<String>) -> Problem {
        Problem::new(self.token_start, message)
    }

    fn advance(&mut self) {
        if let Some(c) = self.chars.next() {
            self.current += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn consume(&mut self) -> char {
        let c = self.peek();
        self.advance();
        c
    }

    fn peek(&mut self) -> char {
        self.chars.peek().copied().unwrap_or('\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        let matched = self.peek() == expected;
        if matched {
            self.advance();
        }
        matched
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_high_surrogate(code: u16) -> bool {
    (0xD800..=0xDBFF).contains(&code)
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    mode: FailureMode,
    max_depth: usize,
    depth: usize,
    problems: Vec<Problem>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &ParseOptions) -> Self {
        Parser {
            scanner: Scanner::new(text),
            current: Token {
                kind: TokenKind::Eof,
                position: Position::default(),
            },
            mode: options.failure_mode,
            max_depth: options.max_depth,
            depth: 0,
            problems: Vec::new(),
        }
    }

    fn document(&mut self) -> Result<Value, Problem> {
        self.advance()?;
        let value = self.value()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected(format!(
                "unexpected trailing content: found {}",
                self.current.kind
            )));
        }
        Ok(value)
    }

    fn advance(&mut self) -> Result<(), Problem> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }

    /// Route a recoverable problem through the active mode: fail-fast turns
    /// it fatal, collect-all records it, ignore drops it.
    fn recoverable(&mut self, problem: Problem) -> Result<(), Problem> {
        match self.mode {
            FailureMode::FailFast => Err(problem),
            FailureMode::CollectAll => {
                self.problems.push(problem);
                Ok(())
            }
            FailureMode::Ignore => Ok(()),
        }
    }

    fn unexpected(&self, message: String) -> Problem {
        Problem::new(self.current.position, message)
    }

    fn value(&mut self) -> Result<Value, Problem> {
        match &self.current.kind {
            TokenKind::Null => {
                self.advance()?;
                Ok(Value::Null)
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Value::Bool(false))
            }
            TokenKind::Integer(i) => {
                let value = Value::Integer(*i);
                self.advance()?;
                Ok(value)
            }
            TokenKind::Decimal(d) => {
                let value = Value::Decimal(*d);
                self.advance()?;
                Ok(value)
            }
            TokenKind::String(s) => {
                let value = Value::String(s.clone());
                self.advance()?;
                Ok(value)
            }
            TokenKind::LeftBrace => self.object(),
            TokenKind::LeftBracket => self.array(),
            TokenKind::Word(word) => {
                Err(self.unexpected(format!("unknown keyword '{word}'")))
            }
            TokenKind::Eof => {
                Err(self.unexpected("unexpected end of input, expected a value".into()))
            }
            other => Err(self.unexpected(format!("expected a value, found {other}"))),
        }
    }

    fn enter(&mut self) -> Result<(), Problem> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.unexpected(format!(
                "nesting exceeds the configured limit of {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn object(&mut self) -> Result<Value, Problem> {
        self.enter()?;
        self.advance()?;

        let mut object = Object::new();
        if self.current.kind == TokenKind::RightBrace {
            self.advance()?;
            self.depth -= 1;
            return Ok(Value::Object(object));
        }

        loop {
            let key_position = self.current.position;
            let key = match &self.current.kind {
                TokenKind::String(s) => s.clone(),
                TokenKind::Word(word) => {
                    let key = word.clone();
                    self.recoverable(Problem::new(
                        key_position,
                        format!("unquoted object key \"{key}\""),
                    ))?;
                    key
                }
                TokenKind::Eof => {
                    return Err(
                        self.unexpected("unexpected end of input, expected an object key".into())
                    );
                }
                other => {
                    return Err(self.unexpected(format!("expected an object key, found {other}")));
                }
            };
            if object.contains_key(&key) {
                self.recoverable(Problem::new(
                    key_position,
                    format!("duplicate object key \"{key}\""),
                ))?;
            }
            self.advance()?;

            if self.current.kind != TokenKind::Colon {
                return Err(self.unexpected(format!(
                    "expected ':' after object key, found {}",
                    self.current.kind
                )));
            }
            self.advance()?;

            let value = self.value()?;
            // Last write wins for duplicate keys under the lenient modes.
            object.insert(key, value);

            match &self.current.kind {
                TokenKind::Comma => self.advance()?,
                TokenKind::RightBrace => {
                    self.advance()?;
                    break;
                }
                TokenKind::Eof => {
                    return Err(
                        self.unexpected("unexpected end of input inside an object".into())
                    );
                }
                other => {
                    return Err(self.unexpected(format!(
                        "expected ',' or '}}' after object member, found {other}"
                    )));
                }
            }
        }

        self.depth -= 1;
        Ok(Value::Object(object))
    }

    fn array(&mut self) -> Result<Value, Problem> {
        self.enter()?;
        self.advance()?;

        let mut array = Array::new();
        if self.current.kind == TokenKind::RightBracket {
            self.advance()?;
            self.depth -= 1;
            return Ok(Value::Array(array));
        }

        loop {
            let value = self.value()?;
            array.push(value);

            match &self.current.kind {
                TokenKind::Comma => self.advance()?,
                TokenKind::RightBracket => {
                    self.advance()?;
                    break;
                }
                TokenKind::Eof => {
                    return Err(self.unexpected("unexpected end of input inside an array".into()));
                }
                other => {
                    return Err(self.unexpected(format!(
                        "expected ',' or ']' after array element, found {other}"
                    )));
                }
            }
        }

        self.depth -= 1;
        Ok(Value::Array(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_tracks_line_and_column() {
        let mut scanner = Scanner::new("{\n  \"a\": 1\n}");
        let token = scanner.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::LeftBrace);
        assert_eq!(token.position.line, 1);
        assert_eq!(token.position.column, 1);

        let token = scanner.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::String("a".into()));
        assert_eq!(token.position.line, 2);
        assert_eq!(token.position.column, 3);
        assert_eq!(token.position.offset, 4);
    }

    #[test]
    fn scanner_splits_integer_and_decimal_tokens() {
        let mut scanner = Scanner::new("42 -3 4.5 1e3 9007199254740993000000000");
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Integer(42));
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Integer(-3));
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Decimal(4.5));
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Decimal(1e3));
        assert!(matches!(
            scanner.next_token().unwrap().kind,
            TokenKind::Decimal(_)
        ));
    }

    #[test]
    fn scanner_decodes_surrogate_pairs() {
        let mut scanner = Scanner::new(r#""\ud83d\ude00""#);
        let token = scanner.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::String("\u{1F600}".into()));
    }

    #[test]
    fn scanner_rejects_lone_surrogate() {
        let mut scanner = Scanner::new(r#""\ud83d""#);
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn depth_limit_is_fatal_in_every_mode() {
        let text = "[[[[1]]]]";
        let options = ParseOptions::new()
            .failure_mode(FailureMode::Ignore)
            .max_depth(2);
        assert!(parse_with(text, &options).is_err());
        let options = ParseOptions::new().max_depth(4);
        assert!(parse_with(text, &options).is_ok());
    }
}
