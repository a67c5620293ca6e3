// SPDX-License-Identifier: Apache-2.0

//! A pull-style JSON reader for resource-constrained environments.
//!
//! The reader consumes a forward-only byte source one byte at a time and
//! produces a stream of structural tokens (values, keys, container
//! boundaries) without building a document tree. All working memory is a
//! caller-provided capture buffer of fixed size, so documents of arbitrary
//! size can be examined with a few hundred bytes of RAM.
//!
//! Navigation shortcuts ([`JsonReader::skip_subtree`],
//! [`JsonReader::skip_to_index`], [`JsonReader::skip_to_field`]) are layered
//! directly on the tokenizer so a handful of values can be extracted from a
//! large document without walking every token.
//!
//! ```
//! use jsonpull::{JsonReader, SliceSource};
//!
//! let mut capture = [0u8; 64];
//! let mut reader = JsonReader::new(&mut capture);
//! reader.begin(SliceSource::new(br#"{"status": "ok", "code": 200}"#));
//!
//! assert!(reader.skip_to_field("code", false));
//! assert!(reader.advance());
//! assert_eq!(reader.numeric_value(), Some(200.0));
//! ```

#![cfg_attr(not(test), no_std)]

mod cursor;
mod error;
mod escape;
mod navigate;
mod reader;
mod source;

pub use cursor::{Cursor, Position, Symbol};
pub use error::ErrorCode;
pub use navigate::SkipMode;
pub use reader::{JsonReader, Node, ValueKind};
pub use source::{ByteSource, SliceSource};
