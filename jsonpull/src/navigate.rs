// SPDX-License-Identifier: Apache-2.0

//! Subtree skipping and field/index seeking.
//!
//! The bulk depth skip scans raw bytes without re-tokenizing interior
//! values: one pass over the container's text with integer nesting
//! counters and no per-level call stack, so stack usage stays flat however
//! deep the document nests.

use log::trace;

use crate::cursor::Symbol;
use crate::error::ErrorCode;
use crate::reader::{JsonReader, Node};
use crate::source::ByteSource;

/// Validation applied by the bulk depth skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipMode {
    /// Track array and object nesting independently; a closer with no
    /// matching opener of its own kind stops the parse.
    #[default]
    Canonical,
    /// Treat every bracket as one nesting counter. Faster, looser: some
    /// cross-matched bracketing that `Canonical` rejects slips through.
    /// The two modes agree on well-formed input.
    Fast,
}

/// Which container a bulk skip started inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    Object,
}

impl Container {
    fn unterminated(self) -> ErrorCode {
        match self {
            Container::Array => ErrorCode::UnterminatedArray,
            Container::Object => ErrorCode::UnterminatedObject,
        }
    }

    fn end_node(self) -> Node {
        match self {
            Container::Array => Node::EndArray,
            Container::Object => Node::EndObject,
        }
    }
}

impl<S: ByteSource> JsonReader<'_, S> {
    /// Skips the subtree at the current position.
    ///
    /// On a `Key`, skips the key and its value; on a container start,
    /// scans to the matching end token; on a scalar or a container end,
    /// does nothing. Leaves the reader exactly where a token-by-token
    /// traversal of the subtree would have. Returns false from a terminal
    /// state or when the skip itself fails.
    pub fn skip_subtree(&mut self) -> bool {
        loop {
            match self.node {
                Node::Error | Node::EndDocument => return false,
                Node::Initial | Node::Key => {
                    if !self.advance() {
                        return false;
                    }
                }
                Node::Value | Node::EndArray | Node::EndObject => return true,
                Node::StartArray => return self.skip_container(Container::Array),
                Node::StartObject => return self.skip_container(Container::Object),
            }
        }
    }

    /// Positions the reader on the first token of array element `index`.
    ///
    /// Elements before it are skipped wholesale. Zero-based;
    /// `skip_to_index(0)` reads the first element. Returns false when the
    /// array holds fewer than `index + 1` elements, when the reader is not
    /// at (or just above) an array start, or on any parse failure.
    pub fn skip_to_index(&mut self, index: usize) -> bool {
        if matches!(self.node, Node::Initial | Node::Key) && !self.advance() {
            return false;
        }
        if self.node != Node::StartArray {
            return false;
        }
        for _ in 0..index {
            if !self.advance() || self.node == Node::EndArray {
                return false;
            }
            if !self.skip_subtree() {
                return false;
            }
        }
        self.advance() && !matches!(self.node, Node::EndArray | Node::Error)
    }

    /// Positions the reader on the object key named `name`, comparing
    /// decoded key text.
    ///
    /// With `search_descendants` unset the reader must be at (or just
    /// above) an object start, or already on one of its keys; immediate
    /// child keys are examined and every non-matching key's subtree is
    /// skipped wholesale. With it set, the scan simply reads forward and
    /// compares every key left in the document whatever its nesting, so it
    /// can land on an identically named key belonging to a sibling or a
    /// later part of an ancestor. Returns false once the search is
    /// exhausted.
    pub fn skip_to_field(&mut self, name: &str, search_descendants: bool) -> bool {
        if search_descendants {
            while self.advance() {
                if self.node == Node::Key {
                    self.undecorate();
                    if self.cursor.capture_buffer() == name.as_bytes() {
                        return true;
                    }
                }
            }
            return false;
        }
        loop {
            match self.node {
                Node::Initial => {
                    if !self.advance() {
                        return false;
                    }
                }
                Node::StartObject => return self.scan_sibling_keys(name),
                Node::Key => {
                    self.undecorate();
                    if self.cursor.capture_buffer() == name.as_bytes() {
                        return true;
                    }
                    if !self.skip_subtree() {
                        return false;
                    }
                    return self.scan_sibling_keys(name);
                }
                _ => return false,
            }
        }
    }

    /// Bulk-skips the rest of the object the cursor is inside and lands on
    /// its `EndObject`. The object's `{` must already be behind the
    /// cursor. Returns false on a parse failure.
    pub fn skip_to_end_object(&mut self) -> bool {
        if matches!(self.node, Node::Error | Node::EndDocument) {
            return false;
        }
        self.skip_container(Container::Object)
    }

    /// Bulk-skips the rest of the array the cursor is inside and lands on
    /// its `EndArray`. The array's `[` must already be behind the cursor.
    /// Returns false on a parse failure.
    pub fn skip_to_end_array(&mut self) -> bool {
        if matches!(self.node, Node::Error | Node::EndDocument) {
            return false;
        }
        self.skip_container(Container::Array)
    }

    fn scan_sibling_keys(&mut self, name: &str) -> bool {
        while self.advance() && self.node == Node::Key {
            self.undecorate();
            if self.cursor.capture_buffer() == name.as_bytes() {
                return true;
            }
            if !self.skip_subtree() {
                return false;
            }
        }
        false
    }

    fn skip_container(&mut self, container: Container) -> bool {
        trace!("bulk skip of {:?}, {:?} mode", container, self.mode);
        self.cursor.start();
        match self.mode {
            SkipMode::Canonical => self.depth_skip_canonical(container),
            SkipMode::Fast => self.depth_skip_fast(container),
        }
        if self.node == Node::Error {
            return false;
        }
        self.cursor.skip_whitespace();
        self.node = container.end_node();
        true
    }

    fn depth_skip_canonical(&mut self, container: Container) {
        let mut arrays: u32 = 0;
        let mut objects: u32 = 0;
        match container {
            Container::Array => arrays = 1,
            Container::Object => objects = 1,
        }
        while arrays > 0 || objects > 0 {
            match self.cursor.current() {
                Symbol::Byte(b'"') => {
                    if !self.skip_string_part() {
                        return;
                    }
                }
                Symbol::Byte(b'[') => {
                    arrays = arrays.saturating_add(1);
                    self.cursor.advance();
                }
                Symbol::Byte(b']') => {
                    if arrays == 0 {
                        // only an object is open here
                        self.fail(ErrorCode::UnterminatedObject);
                        return;
                    }
                    arrays -= 1;
                    self.cursor.advance();
                }
                Symbol::Byte(b'{') => {
                    objects = objects.saturating_add(1);
                    self.cursor.advance();
                }
                Symbol::Byte(b'}') => {
                    if objects == 0 {
                        self.fail(ErrorCode::UnterminatedArray);
                        return;
                    }
                    objects -= 1;
                    self.cursor.advance();
                }
                Symbol::Byte(_) => {
                    self.cursor.advance();
                }
                _ => {
                    let code = if arrays > 0 {
                        ErrorCode::UnterminatedArray
                    } else {
                        ErrorCode::UnterminatedObject
                    };
                    self.fail(code);
                    return;
                }
            }
        }
    }

    fn depth_skip_fast(&mut self, container: Container) {
        let mut depth: u32 = 1;
        while depth > 0 {
            match self.cursor.current() {
                Symbol::Byte(b'"') => {
                    if !self.skip_string_part() {
                        return;
                    }
                }
                Symbol::Byte(b'[' | b'{') => {
                    depth = depth.saturating_add(1);
                    self.cursor.advance();
                }
                Symbol::Byte(b']' | b'}') => {
                    depth -= 1;
                    self.cursor.advance();
                }
                Symbol::Byte(_) => {
                    self.cursor.advance();
                }
                _ => {
                    self.fail(container.unterminated());
                    return;
                }
            }
        }
    }

    /// Skips a quoted string during a bulk depth skip, escapes honored, so
    /// brackets inside string content never reach the depth counters.
    fn skip_string_part(&mut self) -> bool {
        if self.cursor.current() != Symbol::Byte(b'"') {
            self.fail(ErrorCode::UnterminatedString);
            return false;
        }
        self.cursor.advance();
        if !self.cursor.skip_until(b'"', Some(b'\\'), true) {
            self.fail(ErrorCode::UnterminatedString);
            return false;
        }
        true
    }
}
