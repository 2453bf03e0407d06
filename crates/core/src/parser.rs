//! The streaming parser (§4.2): drives the lexer across an input, maintains
//! per-line counters, and enforces whole-line well-formedness.

use atcmd_diagnostics::{AtError, AtResult};

use crate::lexer::{self, Lexed, LexerConfig};
use crate::token::{Token, TokenKind, TrailingComma};

/// Maximum input length the parser accepts, per §1's non-goals.
pub const MAX_INPUT_LEN: usize = 65_535;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    cmd: usize,
    notif: usize,
    subparam: usize,
    string: usize,
    end: usize,
}

impl Counters {
    /// Applies the update rule for a freshly-matched token, returning
    /// whether this token triggered the notif-boundary counter reset (i.e.
    /// it is the first token of a new logical line).
    fn record(&mut self, kind: TokenKind) -> bool {
        let starts_new_line = kind == TokenKind::Notif && self.notif == 2;
        if starts_new_line {
            *self = Counters::default();
        }
        match kind {
            TokenKind::CmdSet | TokenKind::CmdRead | TokenKind::CmdTest => self.cmd += 1,
            TokenKind::Notif => self.notif += 1,
            TokenKind::String => self.string += 1,
            TokenKind::Resp => self.end += 1,
            TokenKind::Int | TokenKind::QuotedString | TokenKind::Array | TokenKind::Empty => {
                self.subparam += 1;
            }
            TokenKind::Invalid => unreachable!("invalid tokens are never recorded"),
        }
        starts_new_line
    }

    /// Rules (a), (b), (c) from §4.2.
    fn is_valid_line(&self) -> bool {
        let a = self.cmd <= 1;
        let b = self.subparam == 0 || self.cmd >= 1 || self.notif >= 1;
        let c = self.notif < 2 || self.subparam >= 1;
        a && b && c
    }
}

/// A zero-copy, zero-allocation streaming parser over one AT command or
/// response buffer (§3.2).
///
/// Borrows its input for its entire lifetime; every emitted [`Token`]
/// borrows from that same buffer.
pub struct AtParser<'a> {
    input: &'a str,
    config: LexerConfig,
    cursor: usize,
    count: usize,
    counters: Counters,
    prev_token: Option<Token<'a>>,
    next_is_empty: bool,
    initialized: bool,
    started_new_line: bool,
}

impl<'a> AtParser<'a> {
    /// Initialize a parser over `input`, using the default §6 dialect.
    ///
    /// # Errors
    /// Returns [`AtError::OutOfRange`] if `input` is empty or longer than
    /// [`MAX_INPUT_LEN`] bytes.
    pub fn init(input: &'a str) -> AtResult<Self> {
        Self::init_with_config(input, LexerConfig::default())
    }

    /// Initialize a parser over `input` with a non-default [`LexerConfig`]
    /// — see that type's documentation for when this is appropriate.
    ///
    /// # Errors
    /// Returns [`AtError::OutOfRange`] if `input` is empty or longer than
    /// [`MAX_INPUT_LEN`] bytes.
    pub fn init_with_config(input: &'a str, config: LexerConfig) -> AtResult<Self> {
        if input.is_empty() {
            return Err(AtError::out_of_range_because("input must not be empty"));
        }
        if input.len() > MAX_INPUT_LEN {
            return Err(AtError::out_of_range_because(format!(
                "input is {} bytes, exceeds {MAX_INPUT_LEN}",
                input.len()
            )));
        }
        Ok(Self {
            input,
            config,
            cursor: 0,
            count: 0,
            counters: Counters::default(),
            prev_token: None,
            next_is_empty: false,
            initialized: true,
            started_new_line: false,
        })
    }

    /// Number of tokens successfully emitted so far, across all lines of
    /// this parser's lifetime.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The most recently emitted token, if any.
    #[must_use]
    pub fn prev_token(&self) -> Option<Token<'a>> {
        self.prev_token
    }

    /// Whether the most recently emitted token was a `NOTIF` that triggered
    /// the §4.2 notif-boundary counter reset — i.e. the per-line `cmd`,
    /// `notif`, `subparam`, `string`, and `end` counters were just cleared
    /// because this is the third consecutive `NOTIF` seen by this parser
    /// instance without an intervening `RESP`. This is internal
    /// well-formedness bookkeeping (§9); [`crate::line::line_parse`] draws
    /// its own, coarser per-call line boundary (any `NOTIF` after the
    /// first token) rather than relying on this flag — see that module's
    /// documentation.
    #[must_use]
    pub fn started_new_line(&self) -> bool {
        self.started_new_line
    }

    fn offset_of(&self, s: &str) -> usize {
        s.as_ptr() as usize - self.input.as_ptr() as usize
    }

    fn remainder(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    /// Emit the next token (§4.2's state machine).
    ///
    /// # Errors
    /// - [`AtError::PermissionDenied`] if the parser was not initialized
    ///   (unreachable via the public constructor, kept for parity with the
    ///   reference API's gate check).
    /// - [`AtError::NoMoreInput`] at end of input.
    /// - [`AtError::BadMessage`] on a rejected token, a failed counter rule,
    ///   or a malformed trailing-comma look-ahead.
    pub fn next(&mut self) -> AtResult<Token<'a>> {
        if !self.initialized {
            return Err(AtError::PermissionDenied);
        }

        let (kind, text, comma) = self.match_next_raw()?;
        let kind = self.retype_line_head(kind, comma);

        self.counters.record(kind);
        if !self.counters.is_valid_line() {
            return Err(AtError::bad_message_at(self.offset_of(text)));
        }

        if kind.is_subparameter() {
            self.lookahead_trailing_empty(comma, text)?;
        }

        let token = Token {
            kind,
            text,
            comma,
            offset: self.offset_of(text),
        };
        self.count += 1;
        self.prev_token = Some(token);
        Ok(token)
    }

    /// Steps 2–4 of §4.2: synthesize an `EMPTY` token where called for,
    /// otherwise invoke the lexer (skipping non-`RESP` `\r\n` boundaries).
    fn match_next_raw(&mut self) -> AtResult<(TokenKind, &'a str, TrailingComma)> {
        if self.next_is_empty {
            self.next_is_empty = false;
            let text = &self.input[self.cursor..self.cursor];
            return Ok((TokenKind::Empty, text, TrailingComma::Absent));
        }

        if self.remainder().starts_with(self.config.delimiter) {
            let start = self.cursor;
            self.cursor += self.config.delimiter.len_utf8();
            if self.remainder().starts_with(' ') {
                self.cursor += 1;
            }
            let text = &self.input[start..start];
            return Ok((TokenKind::Empty, text, TrailingComma::Present));
        }

        loop {
            let remainder = self.remainder();
            if remainder.is_empty() {
                return Err(AtError::NoMoreInput);
            }
            if remainder.starts_with("\r\n") {
                if let Some(lexed) = lexer::match_resp(remainder) {
                    return Ok(self.accept(lexed));
                }
                // Not a RESP tail: this `\r\n` is a line boundary, not a
                // token — skip it and keep matching (§9).
                self.cursor += 2;
                continue;
            }
            return match lexer::match_token_with_config(remainder, &self.config) {
                Some(lexed) => Ok(self.accept(lexed)),
                None => Err(AtError::bad_message_at(self.cursor)),
            };
        }
    }

    fn accept(&mut self, lexed: Lexed<'a>) -> (TokenKind, &'a str, TrailingComma) {
        self.cursor += lexed.consumed;
        (lexed.kind, lexed.text, lexed.comma)
    }

    /// §4.1.2 / step 5: a leading `INT` with no trailing comma is really a
    /// bare `STRING` (firmware version, etc.) — but only at the very first
    /// token this parser instance ever emits.
    fn retype_line_head(&self, kind: TokenKind, comma: TrailingComma) -> TokenKind {
        if kind == TokenKind::Int && comma == TrailingComma::Absent && self.count == 0 {
            TokenKind::String
        } else {
            kind
        }
    }

    /// Step 8: look-ahead for a synthesized trailing `EMPTY`, and reject a
    /// subparameter whose `NO_TRAILING_COMMA` tail isn't immediately
    /// followed by end-of-input or `\r\n`.
    fn lookahead_trailing_empty(&mut self, comma: TrailingComma, text: &str) -> AtResult<()> {
        let remainder = self.remainder();
        let at_boundary = remainder.is_empty() || remainder.starts_with("\r\n");
        match comma {
            TrailingComma::Absent if !at_boundary => {
                Err(AtError::bad_message_at(self.offset_of(text) + text.len()))
            }
            TrailingComma::Present if at_boundary => {
                self.next_is_empty = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Advance to the token at zero-based index `n`, refusing to seek
    /// backward.
    ///
    /// # Errors
    /// [`AtError::OutOfRange`] if `n` is at or before an already-emitted
    /// index; otherwise propagates whatever [`Self::next`] returns for the
    /// intervening tokens.
    pub fn seek(&mut self, n: usize) -> AtResult<Token<'a>> {
        if n + 1 <= self.count {
            return Err(AtError::out_of_range_because(format!(
                "seek target {n} is at or before already-emitted index {}",
                self.count.saturating_sub(1)
            )));
        }
        let mut last = self.next()?;
        while self.count <= n {
            last = self.next()?;
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut parser = AtParser::init(input).unwrap();
        let mut out = Vec::new();
        loop {
            match parser.next() {
                Ok(tok) => out.push(tok.kind),
                Err(AtError::NoMoreInput) => break,
                Err(e) => panic!("unexpected error {e} after {out:?}"),
            }
        }
        out
    }

    #[test]
    fn init_rejects_empty_and_oversized() {
        assert!(AtParser::init("").is_err());
        let big = "a".repeat(MAX_INPUT_LEN + 1);
        assert!(AtParser::init(&big).is_err());
        let exactly_max = "a".repeat(MAX_INPUT_LEN);
        assert!(AtParser::init(&exactly_max).is_ok());
    }

    #[test]
    fn s1_notification_with_quoted_strings_and_resp() {
        let input = "+CEREG: 2,\"76C1\",\"0102DA04\", 7\r\nOK\r\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Notif,
                TokenKind::Int,
                TokenKind::QuotedString,
                TokenKind::QuotedString,
                TokenKind::Int,
                TokenKind::Resp,
            ]
        );
    }

    #[test]
    fn s2_middle_of_line_empties() {
        let input = "+CPSMS: 1,,,\"10101111\",\"01101100\"\r\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Notif,
                TokenKind::Int,
                TokenKind::Empty,
                TokenKind::Empty,
                TokenKind::QuotedString,
                TokenKind::QuotedString,
            ]
        );
    }

    #[test]
    fn s3_firmware_version_is_string_not_retyped_int() {
        let input = "mfw_nrf9160_0.7.0-23.prealpha\r\n";
        assert_eq!(kinds(input), vec![TokenKind::String]);
    }

    #[test]
    fn s5_bad_tail_stops_after_second_int() {
        let input = "+NOTIF: 1,2,\"TEST\"9,...\r\nOK\r\n";
        let mut parser = AtParser::init(input).unwrap();
        assert_eq!(parser.next().unwrap().kind, TokenKind::Notif);
        assert_eq!(parser.next().unwrap().kind, TokenKind::Int);
        let last_good = parser.next().unwrap();
        assert_eq!(last_good.kind, TokenKind::Int);
        assert_eq!(last_good.text, "2");
        let err = parser.next().unwrap_err();
        assert!(matches!(err, AtError::BadMessage { .. }));
        assert_eq!(parser.prev_token().unwrap().text, "2");
    }

    #[test]
    fn s6_second_command_on_one_line_is_bad_message() {
        let input = "AT+TEST=AT+TEST?\r\nOK\r\n";
        let mut parser = AtParser::init(input).unwrap();
        assert_eq!(parser.next().unwrap().kind, TokenKind::CmdSet);
        let err = parser.next().unwrap_err();
        assert!(matches!(err, AtError::BadMessage { .. }));
    }

    #[test]
    fn trailing_empty_via_next_is_empty_flag() {
        let input = "+TEST: 1,\r\nOK\r\n";
        assert_eq!(
            kinds(input),
            vec![TokenKind::Notif, TokenKind::Int, TokenKind::Empty, TokenKind::Resp]
        );
    }

    #[test]
    fn line_head_int_retypes_to_string() {
        let input = "220\r\n";
        assert_eq!(kinds(input), vec![TokenKind::String]);
    }

    #[test]
    fn leading_empty_via_comma_headed_synthesis() {
        let input = "+TEST: ,1\r\n";
        assert_eq!(
            kinds(input),
            vec![TokenKind::Notif, TokenKind::Empty, TokenKind::Int]
        );
    }

    #[test]
    fn three_consecutive_middle_empties() {
        let input = "+TEST: 1,,,\r\nOK\r\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Notif,
                TokenKind::Int,
                TokenKind::Empty,
                TokenKind::Empty,
                TokenKind::Empty,
                TokenKind::Resp,
            ]
        );
    }

    #[test]
    fn three_leading_empties() {
        let input = "+TEST: ,,,1\r\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Notif,
                TokenKind::Empty,
                TokenKind::Empty,
                TokenKind::Empty,
                TokenKind::Int,
            ]
        );
    }

    #[test]
    fn pdu_style_string_after_non_resp_crlf() {
        let input = "+CMT: \"07911326\",23\r\n0891267F0\r\nOK\r\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Notif,
                TokenKind::QuotedString,
                TokenKind::Int,
                TokenKind::String,
                TokenKind::Resp,
            ]
        );
    }

    #[test]
    fn seek_refuses_backward() {
        let input = "+CEREG: 2,\"76C1\"\r\nOK\r\n";
        let mut parser = AtParser::init(input).unwrap();
        let third = parser.seek(2).unwrap();
        assert_eq!(third.kind, TokenKind::QuotedString);
        assert!(parser.seek(0).is_err());
        assert!(parser.seek(1).is_err());
    }

    #[test]
    fn idempotent_relex() {
        let input = "+CEREG: 2,\"76C1\",\"0102DA04\", 7\r\nOK\r\n";
        assert_eq!(kinds(input), kinds(input));
    }
}
