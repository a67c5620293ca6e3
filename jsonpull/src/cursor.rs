// SPDX-License-Identifier: Apache-2.0

use crate::source::ByteSource;

/// Tab width used for column tracking.
const TAB_WIDTH: u32 = 4;

/// The most recently read character, or one of the stream sentinels.
///
/// Exactly one of these holds at any time; it is the sole input to every
/// lexing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// A byte read from the source.
    Byte(u8),
    /// The source is exhausted.
    EndOfInput,
    /// Nothing has been read yet.
    BeforeInput,
    /// No source is attached.
    Closed,
}

impl Symbol {
    /// The byte value, or `None` for a sentinel.
    pub fn byte(self) -> Option<u8> {
        match self {
            Symbol::Byte(byte) => Some(byte),
            _ => None,
        }
    }

    fn is_whitespace(self) -> bool {
        matches!(self, Symbol::Byte(b' ' | b'\t' | b'\n' | b'\r'))
    }
}

/// Line, column and byte offset of the cursor within the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// Column within the line; tabs advance by [`TAB_WIDTH`].
    pub column: u32,
    /// Bytes consumed from the source.
    pub offset: u64,
}

impl Position {
    fn start() -> Self {
        Position {
            line: 1,
            column: 0,
            offset: 0,
        }
    }

    fn update(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.line = self.line.saturating_add(1);
                self.column = 0;
            }
            b'\r' => self.column = 0,
            b'\t' => self.column = self.column.saturating_add(TAB_WIDTH),
            _ => self.column = self.column.saturating_add(1),
        }
        self.offset = self.offset.wrapping_add(1);
    }
}

/// Character-level cursor over a [`ByteSource`].
///
/// Owns the source and a bounded capture buffer, delivers one byte at a
/// time, tracks [`Position`] and accumulates the raw text of the current
/// lexeme on demand. Every scan the token machine performs is built from
/// the primitives here, so the machine never touches the source directly.
pub struct Cursor<'buf, S> {
    source: Option<S>,
    capture: &'buf mut [u8],
    count: usize,
    current: Symbol,
    position: Position,
}

impl<'buf, S: ByteSource> Cursor<'buf, S> {
    /// Creates a detached cursor using `capture` as its lexeme buffer.
    ///
    /// A buffer of capacity `S` stores at most `S - 1` bytes of lexeme; the
    /// final byte is reserved. The cursor reports [`Symbol::Closed`] until
    /// a source is attached with [`Cursor::begin`].
    pub fn new(capture: &'buf mut [u8]) -> Self {
        Cursor {
            source: None,
            capture,
            count: 0,
            current: Symbol::BeforeInput,
            position: Position::start(),
        }
    }

    /// Attaches a source, resetting position and capture state.
    pub fn begin(&mut self, source: S) {
        self.source = Some(source);
        self.count = 0;
        self.current = Symbol::BeforeInput;
        self.position = Position::start();
    }

    /// The current symbol.
    pub fn current(&self) -> Symbol {
        if self.source.is_none() {
            return Symbol::Closed;
        }
        self.current
    }

    /// The current source position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Overrides the tracked position, for sources that resume mid-stream.
    pub fn set_location(&mut self, line: u32, column: u32, offset: u64) {
        self.position = Position {
            line,
            column,
            offset,
        };
    }

    /// Begins consuming the source if nothing has been read yet.
    /// Idempotent.
    pub fn start(&mut self) {
        if self.source.is_some() && self.current == Symbol::BeforeInput {
            self.advance();
        }
    }

    /// Consumes and returns the next symbol, updating the position.
    ///
    /// Returns [`Symbol::EndOfInput`] once the source is exhausted and
    /// [`Symbol::Closed`] when no source is attached; both are sticky.
    pub fn advance(&mut self) -> Symbol {
        if self.current == Symbol::EndOfInput {
            return Symbol::EndOfInput;
        }
        let next = match self.source.as_mut() {
            Some(source) => source.read_byte(),
            None => return Symbol::Closed,
        };
        self.current = match next {
            Some(byte) => {
                self.position.update(byte);
                Symbol::Byte(byte)
            }
            None => Symbol::EndOfInput,
        };
        self.current
    }

    /// Appends the current byte to the capture buffer.
    ///
    /// Returns false when the buffer has no room or the cursor is not on a
    /// byte; a false return leaves the already-captured prefix intact.
    /// Running out of room here is the single out-of-memory signal in the
    /// reader.
    pub fn capture(&mut self) -> bool {
        let Symbol::Byte(byte) = self.current() else {
            return false;
        };
        if self.count.saturating_add(1) >= self.capture.len() {
            return false;
        }
        let Some(slot) = self.capture.get_mut(self.count) else {
            return false;
        };
        *slot = byte;
        self.count = self.count.wrapping_add(1);
        true
    }

    /// Clears the capture buffer.
    pub fn clear_capture(&mut self) {
        self.count = 0;
    }

    /// The captured lexeme.
    pub fn capture_buffer(&self) -> &[u8] {
        self.capture.get(..self.count).unwrap_or(&[])
    }

    /// Number of captured bytes.
    pub fn capture_len(&self) -> usize {
        self.count
    }

    /// Capacity of the capture buffer, including the reserved byte.
    pub fn capture_max(&self) -> usize {
        self.capture.len()
    }

    pub(crate) fn capture_mut(&mut self) -> &mut [u8] {
        self.capture
    }

    /// Truncates the captured lexeme; lengths past the maximum are ignored.
    pub(crate) fn set_capture_len(&mut self, len: usize) {
        if len.saturating_add(1) <= self.capture.len() {
            self.count = len;
        }
    }

    /// Advances past a maximal run of whitespace starting at the current
    /// symbol. Returns whether anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        self.start();
        if !self.current().is_whitespace() {
            return false;
        }
        while self.advance().is_whitespace() {}
        true
    }

    /// Advances without capturing until `target` is the current byte,
    /// honoring `escape` so an escaped occurrence does not terminate the
    /// scan. Consumes the target when `consume_target` is set.
    ///
    /// Returns false if the input ended first.
    pub fn skip_until(&mut self, target: u8, escape: Option<u8>, consume_target: bool) -> bool {
        self.start();
        loop {
            let Some(byte) = self.current().byte() else {
                return false;
            };
            if escape == Some(byte) {
                if self.advance().byte().is_none() {
                    return false;
                }
                self.advance();
                continue;
            }
            if byte == target {
                if consume_target {
                    self.advance();
                }
                return true;
            }
            self.advance();
        }
    }

    /// Like [`Cursor::skip_until`], but captures every byte traversed,
    /// escapes included; this is how string literals are captured with
    /// their escapes intact.
    ///
    /// Returns false on end of input or when the capture buffer runs out
    /// of room; [`Cursor::current`] distinguishes the two.
    pub fn read_until(&mut self, target: u8, escape: Option<u8>, consume_target: bool) -> bool {
        self.start();
        loop {
            let Some(byte) = self.current().byte() else {
                return false;
            };
            if escape == Some(byte) {
                if !self.capture() {
                    return false;
                }
                if self.advance().byte().is_none() {
                    return false;
                }
                if !self.capture() {
                    return false;
                }
                self.advance();
                continue;
            }
            if byte == target {
                if consume_target {
                    if !self.capture() {
                        return false;
                    }
                    self.advance();
                }
                return true;
            }
            if !self.capture() {
                return false;
            }
            self.advance();
        }
    }
}
