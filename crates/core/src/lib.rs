//! Zero-copy lexer and streaming parser for 3GPP 27.007 AT command and
//! response text, with vendor sigil extensions (`+`, `%`, `#`).
//!
//! The entry points are [`AtParser`] for token-at-a-time streaming use and
//! [`line_parse`] for one-shot, per-line convenience use. Every [`Token`]
//! borrows directly from the caller's input buffer — no allocation is
//! performed anywhere in this crate.

#![warn(missing_docs)]

/// The token accessors (§4.4): bounded integer extraction, a
/// NUL-terminating string copy, a structural-validity counter, and the
/// command-type classifier.
pub mod accessor;
/// The lexical grammar (§4.1). Internal — callers drive the grammar
/// through [`AtParser`] or [`line::line_parse`], never the lexer directly.
mod lexer;
/// The one-shot line parser (§4.3).
pub mod line;
/// The streaming parser (§4.2) and its [`parser::AtParser`] type.
pub mod parser;
/// The token type system (§3.1).
pub mod token;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

pub use accessor::{as_i16, as_i32, as_i64, as_u16, as_u32, command_type, copy_to_cstr, valid_count};
pub use lexer::LexerConfig;
pub use line::{LineEnd, LineParse, line_parse};
pub use parser::{AtParser, MAX_INPUT_LEN};
pub use token::{Token, TokenKind, TrailingComma};

// Diagnostics (re-exported from the diagnostics crate)
pub use atcmd_diagnostics::{AtError, AtResult, Span};
