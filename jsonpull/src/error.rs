// SPDX-License-Identifier: Apache-2.0

/// Reason a reader entered the terminal error state.
///
/// Recorded once on the transition into [`Node::Error`](crate::Node::Error)
/// and kept until a new parse begins. The state machine never carries
/// message text; mapping codes to text is left to the caller, with the
/// `Display` impl below as one such mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// An object was still open when the input ended, or a `}` closed
    /// nothing.
    UnterminatedObject,
    /// An array was still open when the input ended, or a `]` closed
    /// nothing.
    UnterminatedArray,
    /// A string literal was still open when the input ended.
    UnterminatedString,
    /// A key's `:` was followed by end of input.
    KeyHasNoValue,
    /// A byte that cannot start a value, or a malformed `true`/`false`/
    /// `null` literal.
    UnexpectedValue,
    /// The reader was driven without an attached source.
    UnknownState,
    /// The capture buffer could not hold the token's raw text.
    OutOfMemory,
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ErrorCode::UnterminatedObject => "Unterminated object",
            ErrorCode::UnterminatedArray => "Unterminated array",
            ErrorCode::UnterminatedString => "Unterminated string",
            ErrorCode::KeyHasNoValue => "Key has no value",
            ErrorCode::UnexpectedValue => "Unexpected value",
            ErrorCode::UnknownState => "Unknown state",
            ErrorCode::OutOfMemory => "Out of memory",
        };
        f.write_str(text)
    }
}
