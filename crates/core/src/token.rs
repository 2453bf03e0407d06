//! The token type system (§3.1).

use serde::Serialize;

/// Classification of a single lexical unit recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TokenKind {
    /// The lexer failed to match anything at the head of the cursor.
    ///
    /// Never appears in caller-visible output on a successful return — a
    /// [`TokenKind::Invalid`] match is always converted to a `bad-message`
    /// error by the parser before it could be observed.
    Invalid,
    /// `AT<id>` or `AT<id>=...` — assignment or bare command.
    CmdSet,
    /// `AT<id>?`.
    CmdRead,
    /// `AT<id>=?`.
    CmdTest,
    /// `+ID`, `%ID`, or `#ID` followed by `:` or end-of-line.
    Notif,
    /// Decimal integer, optional leading `+` or `-`.
    Int,
    /// Text between `"` delimiters.
    QuotedString,
    /// Parenthesized group, possibly nested.
    Array,
    /// Non-quoted residual text (firmware version, PDU hex, error tail, ...).
    String,
    /// A missing subparameter between two commas, or between a comma and
    /// end-of-line. Synthesized by the parser; never produced by the lexer.
    Empty,
    /// Trailing response tail starting at `\r\n`: `OK`, `ERROR`,
    /// `+CME ERROR: n`, `+CMS ERROR: n`.
    Resp,
}

impl TokenKind {
    /// A subparameter is any token that can occupy a comma-separated slot
    /// following a command or notification header (§4.2).
    #[must_use]
    pub fn is_subparameter(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::QuotedString | TokenKind::Array | TokenKind::Empty
        )
    }

    /// Whether this is one of the three command-header variants.
    #[must_use]
    pub fn is_command(self) -> bool {
        matches!(
            self,
            TokenKind::CmdSet | TokenKind::CmdRead | TokenKind::CmdTest
        )
    }
}

/// Whether a comma was consumed immediately after a subparameter token.
///
/// Meaningful only when the token it is attached to is a subparameter
/// (§3.1); ignored for command, notification, and response tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrailingComma {
    /// No comma followed this token.
    Absent,
    /// A comma (and, optionally, a single following space) was consumed.
    Present,
}

/// A single token borrowed from the input buffer.
///
/// `text` always borrows directly from the buffer passed to
/// [`crate::parser::AtParser::init`] — no token ever owns a copy of its
/// payload. For [`TokenKind::Empty`], `text` is the empty string borrowed at
/// the synthesis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// The token's classification.
    pub kind: TokenKind,
    /// The token's payload, per the "Payload" column of §3.1's type table.
    pub text: &'a str,
    /// Whether a trailing comma (and optional space) was consumed.
    pub comma: TrailingComma,
    /// Byte offset of `text.as_ptr()` from the start of the original input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Structural validity per §3.1's invariants list, independent of
    /// whether the token participates in a well-formed line.
    #[must_use]
    pub fn is_structurally_valid(&self) -> bool {
        match self.kind {
            TokenKind::Invalid => false,
            TokenKind::Empty => self.text.is_empty(),
            TokenKind::QuotedString => true,
            _ => !self.text.is_empty(),
        }
    }
}
