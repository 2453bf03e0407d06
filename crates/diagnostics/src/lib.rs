//! Error taxonomy for the `atcmd` AT command lexer/parser.
//!
//! Every public operation in `atcmd_core` returns a [`Result<T, AtError>`]
//! rather than panicking on malformed input. The variants mirror the
//! POSIX-style status codes used by the reference implementation this
//! crate's behavior is grounded in (`-EINVAL`, `-EPERM`, `-ERANGE`, `-EIO`,
//! `-EBADMSG`, `-ENOMEM`, `-EAGAIN`).

#![warn(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias for results returned by the parser and its accessors.
pub type AtResult<T> = Result<T, AtError>;

/// Byte span in the original input, attached to errors that can localize
/// the problem (e.g. [`AtError::BadMessage`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start` — this is a caller contract violation, not a
    /// recoverable parse error.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    #[must_use]
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// The error taxonomy for AT command lexing, parsing, and token access.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AtError {
    /// A null/empty argument, an uninitialized parser used for a non-init
    /// operation, or the wrong token type passed to an accessor.
    #[error("invalid argument{}", context_suffix(.context))]
    InvalidArgument {
        /// Optional human-readable detail (e.g. which field was wrong).
        context: Option<String>,
    },

    /// `next`/`seek` was invoked on a parser that has not been initialized.
    #[error("parser not initialized")]
    PermissionDenied,

    /// Input too short or too long, a numeric accessor overflowed its target
    /// width, or `seek` targeted an index at or before one already emitted.
    #[error("value out of range{}", context_suffix(.context))]
    OutOfRange {
        /// Optional human-readable detail (e.g. requested width vs. value).
        context: Option<String>,
    },

    /// The cursor is at the end of the input; nothing left to tokenize.
    #[error("no more input")]
    NoMoreInput,

    /// The lexer rejected the head of the input, a counter/well-formedness
    /// rule failed, or the trailing-comma look-ahead found a malformed tail.
    #[error("malformed AT message at byte {}", .span.start)]
    BadMessage {
        /// Span where the rejection occurred (zero-width if no specific
        /// range applies, e.g. an empty input).
        span: Span,
    },

    /// The destination buffer passed to the string accessor was too small.
    #[error("destination buffer too small: need {needed} bytes, have {available}")]
    NoMemory {
        /// Bytes required (payload length plus one for the NUL terminator).
        needed: usize,
        /// Bytes actually available in the caller's buffer.
        available: usize,
    },

    /// Line-parser only: a new notification line started; the caller should
    /// resume parsing from the returned cursor.
    #[error("try again: new notification line started")]
    TryAgain,
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl AtError {
    /// Build an [`AtError::InvalidArgument`] with no extra context.
    #[must_use]
    pub fn invalid_argument() -> Self {
        AtError::InvalidArgument { context: None }
    }

    /// Build an [`AtError::InvalidArgument`] annotated with `why`.
    #[must_use]
    pub fn invalid_argument_because(why: impl fmt::Display) -> Self {
        AtError::InvalidArgument {
            context: Some(why.to_string()),
        }
    }

    /// Build an [`AtError::OutOfRange`] with no extra context.
    #[must_use]
    pub fn out_of_range() -> Self {
        AtError::OutOfRange { context: None }
    }

    /// Build an [`AtError::OutOfRange`] annotated with `why`.
    #[must_use]
    pub fn out_of_range_because(why: impl fmt::Display) -> Self {
        AtError::OutOfRange {
            context: Some(why.to_string()),
        }
    }

    /// Build an [`AtError::BadMessage`] at a zero-width span (e.g. EOF hit
    /// mid-grammar).
    #[must_use]
    pub fn bad_message_at(offset: usize) -> Self {
        AtError::BadMessage {
            span: Span::empty(offset),
        }
    }
}
