// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::cursor::{Cursor, Position, Symbol};
use crate::error::ErrorCode;
use crate::escape;
use crate::navigate::SkipMode;
use crate::source::ByteSource;

/// Structural token the reader is currently positioned on.
///
/// This is the only state that persists between calls to
/// [`JsonReader::advance`]; it fully determines what the next step may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// The parse failed; see [`JsonReader::last_error`]. Terminal.
    Error,
    /// The document is exhausted. Terminal.
    EndDocument,
    /// Nothing has been read yet.
    Initial,
    /// A scalar value; classify it with [`JsonReader::value_kind`].
    Value,
    /// An object key, with its associated value up next.
    Key,
    /// The start of an array (`[`).
    StartArray,
    /// The end of an array (`]`).
    EndArray,
    /// The start of an object (`{`).
    StartObject,
    /// The end of an object (`}`).
    EndObject,
}

/// Classification of the captured scalar, derived from the lexeme's
/// leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A quote-delimited string literal.
    String,
    /// A numeric literal.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
}

/// Outcome of one dispatch step of [`JsonReader::advance`].
enum Step {
    /// A token (or terminal transition) was produced.
    Done(bool),
    /// A separator was consumed; dispatch again.
    Continue,
}

/// Pull-style JSON reader over a [`ByteSource`].
///
/// One [`JsonReader::advance`] call produces one structural token. The
/// reader owns a [`Cursor`] with a caller-provided capture buffer and never
/// allocates; a token whose raw text does not fit the buffer stops the
/// parse with [`ErrorCode::OutOfMemory`].
///
/// Failures are terminal: once in [`Node::Error`] every operation is a
/// no-op and the only way forward is [`JsonReader::begin`] with a fresh
/// source.
pub struct JsonReader<'buf, S> {
    pub(crate) cursor: Cursor<'buf, S>,
    pub(crate) node: Node,
    pub(crate) error: Option<ErrorCode>,
    pub(crate) mode: SkipMode,
}

impl<'buf, S: ByteSource> JsonReader<'buf, S> {
    /// Creates a reader with [`SkipMode::Canonical`] navigation.
    ///
    /// A capture buffer of capacity `S` bounds every token's raw text to
    /// `S - 1` bytes.
    pub fn new(capture: &'buf mut [u8]) -> Self {
        Self::with_mode(capture, SkipMode::Canonical)
    }

    /// Creates a reader with the given bulk-skip validation mode.
    pub fn with_mode(capture: &'buf mut [u8], mode: SkipMode) -> Self {
        JsonReader {
            cursor: Cursor::new(capture),
            node: Node::Initial,
            error: None,
            mode,
        }
    }

    /// Starts a parse over `source`, discarding any previous parse state.
    pub fn begin(&mut self, source: S) {
        debug!("begin: new parse");
        self.cursor.begin(source);
        self.node = Node::Initial;
        self.error = None;
    }

    /// The token the reader is currently positioned on.
    pub fn node(&self) -> Node {
        self.node
    }

    /// The code recorded when the reader entered [`Node::Error`].
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.error
    }

    /// Current source position.
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Current 1-based line number.
    pub fn line(&self) -> u32 {
        self.cursor.position().line
    }

    /// Current column.
    pub fn column(&self) -> u32 {
        self.cursor.position().column
    }

    pub(crate) fn fail(&mut self, code: ErrorCode) {
        if self.node != Node::Error {
            debug!("parse error: {:?} at {:?}", code, self.cursor.position());
            self.error = Some(code);
            self.node = Node::Error;
        }
    }

    /// Reads the next token.
    ///
    /// Returns true while tokens keep coming, including on the transition
    /// into [`Node::Error`]; returns false on reaching
    /// [`Node::EndDocument`] and on every call after a terminal state.
    /// Commas and colons are consumed silently and never surface as
    /// tokens.
    pub fn advance(&mut self) -> bool {
        if matches!(self.node, Node::Error | Node::EndDocument) {
            return false;
        }
        if self.node == Node::Initial {
            self.cursor.start();
            self.cursor.skip_whitespace();
        }
        self.node = Node::Value;
        loop {
            match self.step_value() {
                Step::Done(produced) => return produced,
                Step::Continue => {}
            }
        }
    }

    fn step_value(&mut self) -> Step {
        self.cursor.clear_capture();
        match self.cursor.current() {
            Symbol::EndOfInput => {
                self.node = Node::EndDocument;
                Step::Done(false)
            }
            Symbol::BeforeInput | Symbol::Closed => {
                self.fail(ErrorCode::UnknownState);
                Step::Done(true)
            }
            Symbol::Byte(b']') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                self.node = Node::EndArray;
                Step::Done(true)
            }
            Symbol::Byte(b'}') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                self.node = Node::EndObject;
                Step::Done(true)
            }
            Symbol::Byte(b',') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                if self.cursor.current() == Symbol::EndOfInput {
                    self.fail(ErrorCode::UnterminatedArray);
                    return Step::Done(true);
                }
                Step::Continue
            }
            Symbol::Byte(b'[') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                self.node = Node::StartArray;
                Step::Done(true)
            }
            Symbol::Byte(b'{') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                self.node = Node::StartObject;
                Step::Done(true)
            }
            Symbol::Byte(b'"') => Step::Done(self.read_string()),
            Symbol::Byte(b'0'..=b'9' | b'-' | b'.') => Step::Done(self.read_number()),
            Symbol::Byte(b't') => Step::Done(self.read_literal(b"rue")),
            Symbol::Byte(b'f') => Step::Done(self.read_literal(b"alse")),
            Symbol::Byte(b'n') => Step::Done(self.read_literal(b"ull")),
            Symbol::Byte(_) => {
                self.fail(ErrorCode::UnexpectedValue);
                Step::Done(true)
            }
        }
    }

    /// Captures a number run. The run is over at the first byte that
    /// cannot appear in a numeric literal; validating the shape of the
    /// literal is left to [`JsonReader::numeric_value`].
    fn read_number(&mut self) -> bool {
        if !self.cursor.capture() {
            self.fail(ErrorCode::OutOfMemory);
            return true;
        }
        loop {
            match self.cursor.advance() {
                Symbol::Byte(byte) if is_number_byte(byte) => {
                    if !self.cursor.capture() {
                        self.fail(ErrorCode::OutOfMemory);
                        return true;
                    }
                }
                _ => break,
            }
        }
        self.cursor.skip_whitespace();
        true
    }

    /// Captures a string literal with its quotes and escapes intact, then
    /// looks past it for a `:` to decide between `Value` and `Key`.
    fn read_string(&mut self) -> bool {
        if !self.cursor.capture() {
            self.fail(ErrorCode::OutOfMemory);
            return true;
        }
        self.cursor.advance();
        if !self.cursor.read_until(b'"', Some(b'\\'), true) {
            let code = if self.cursor.current() == Symbol::EndOfInput {
                ErrorCode::UnterminatedString
            } else {
                ErrorCode::OutOfMemory
            };
            self.fail(code);
            return true;
        }
        self.cursor.skip_whitespace();
        if self.cursor.current() == Symbol::Byte(b':') {
            self.cursor.advance();
            self.cursor.skip_whitespace();
            if self.cursor.current() == Symbol::EndOfInput {
                self.fail(ErrorCode::KeyHasNoValue);
                return true;
            }
            self.node = Node::Key;
        }
        true
    }

    /// Matches the tail of a `true`/`false`/`null` literal character by
    /// character, then checks the byte after it is a separator, a closer
    /// or end of input, so that spellings like `truee` are rejected.
    fn read_literal(&mut self, rest: &[u8]) -> bool {
        if !self.cursor.capture() {
            self.fail(ErrorCode::OutOfMemory);
            return true;
        }
        for &expected in rest {
            if self.cursor.advance() != Symbol::Byte(expected) {
                self.fail(ErrorCode::UnexpectedValue);
                return true;
            }
            if !self.cursor.capture() {
                self.fail(ErrorCode::OutOfMemory);
                return true;
            }
        }
        self.cursor.advance();
        self.cursor.skip_whitespace();
        match self.cursor.current() {
            Symbol::Byte(b',' | b']' | b'}') | Symbol::EndOfInput => {}
            _ => self.fail(ErrorCode::UnexpectedValue),
        }
        true
    }

    /// Classification of the captured scalar, while on `Value` or `Key`.
    pub fn value_kind(&self) -> Option<ValueKind> {
        if !matches!(self.node, Node::Value | Node::Key) {
            return None;
        }
        match *self.cursor.capture_buffer().first()? {
            b'"' => Some(ValueKind::String),
            b't' | b'f' => Some(ValueKind::Boolean),
            b'n' => Some(ValueKind::Null),
            _ => Some(ValueKind::Number),
        }
    }

    /// The captured boolean, while on a `true`/`false` value.
    pub fn boolean_value(&self) -> Option<bool> {
        match self.value_kind()? {
            ValueKind::Boolean => Some(self.cursor.capture_buffer().first() == Some(&b't')),
            _ => None,
        }
    }

    /// The captured number parsed as `f64`, while on a numeric value.
    /// `None` when the captured run is not a well-formed number.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value_kind()? {
            ValueKind::Number => self.raw_value()?.parse().ok(),
            _ => None,
        }
    }

    /// Raw text of the current token, escapes intact until
    /// [`JsonReader::undecorate`] runs.
    ///
    /// `None` unless positioned on `Value`, `Key` or `Error`, or when the
    /// capture is not valid UTF-8; [`JsonReader::raw_bytes`] has no such
    /// restriction.
    pub fn raw_value(&self) -> Option<&str> {
        core::str::from_utf8(self.raw_bytes()?).ok()
    }

    /// Raw bytes of the current token. A decoded string can contain
    /// non-UTF-8 bytes when the literal used `\uXXXX` escapes in the
    /// 0x80..=0xFF range.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self.node {
            Node::Value | Node::Key | Node::Error => Some(self.cursor.capture_buffer()),
            _ => None,
        }
    }

    /// Decodes a captured string literal in place: strips the quotes and
    /// resolves escapes. A no-op when the capture is not a raw string
    /// literal.
    pub fn undecorate(&mut self) {
        let len = self.cursor.capture_len();
        let decoded = escape::undecorate_in_place(self.cursor.capture_mut(), len);
        self.cursor.set_capture_len(decoded);
    }
}

fn is_number_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'.' | b'e' | b'E' | b'+' | b'-')
}
