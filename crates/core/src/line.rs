//! The line parser (§4.3): a one-shot convenience wrapper around
//! [`AtParser`] that fills a caller-provided output slice with one logical
//! line's worth of tokens and reports where to resume.
//!
//! Its line boundary is coarser than the streaming parser's own §4.2
//! counter-reset bookkeeping: any `NOTIF` token encountered after this
//! call has already written at least one token marks the start of the
//! *next* line, regardless of how many notifications the underlying
//! [`AtParser`] instance has folded into its own well-formedness counters.
//! This is what lets a caller walk a buffer containing several
//! back-to-back unsolicited notifications one line at a time (§8 S4).

use atcmd_diagnostics::{AtError, AtResult};

use crate::parser::AtParser;
use crate::token::{Token, TokenKind};

/// How a successful [`line_parse`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    /// A `RESP` tail (`OK`, `ERROR`, `+CME ERROR: n`, `+CMS ERROR: n`) was
    /// consumed; `next_cursor` points at the input's end.
    Resp,
    /// The output slice filled up, or the input ran out, before a `RESP`
    /// or a new notification line was reached.
    Exhausted,
}

/// The outcome of a successful [`line_parse`] call: how many tokens were
/// written into the caller's output slice, how the line ended, and the
/// byte offset to resume parsing from on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParse {
    /// Number of output slots filled, `0..=out.len()`.
    pub count: usize,
    /// How the line ended.
    pub end: LineEnd,
    /// Byte offset into the original input to resume from.
    pub next_cursor: usize,
}

/// Run the streaming parser over one logical line of `input`, filling
/// `out` in order (§4.3).
///
/// Loops calling [`AtParser::next`] at most `out.len()` times:
/// - *no-more-input* is treated as a clean completion, returning
///   [`Ok`] with whatever was filled so far.
/// - A `RESP` token completes the line; `next_cursor` is set to the
///   input's end and the token itself is **not** copied into `out`.
/// - A `NOTIF` token that arrives after this call has already written at
///   least one token marks the start of the next logical line: the
///   token is **not** copied into `out`, and the call returns
///   [`AtError::TryAgain`] with the *previous* `line_parse` call's
///   `next_cursor` effectively advanced to that `NOTIF`'s own offset —
///   the caller resumes by calling `line_parse` again on
///   `&input[offset..]` (see [`LineParse`]'s doc for how that offset is
///   recovered before the error is returned).
/// - Any other token is copied into `out[count - 1]` and `next_cursor`
///   advances past it.
///
/// # Errors
/// [`AtError::TryAgain`] when a new notification line started; any other
/// error [`AtParser::next`] can return.
pub fn line_parse<'a>(input: &'a str, out: &mut [Token<'a>]) -> AtResult<LineParse> {
    let mut parser = AtParser::init(input)?;
    let mut count = 0usize;
    let mut next_cursor = 0usize;

    while count < out.len() {
        let token = match parser.next() {
            Ok(token) => token,
            Err(AtError::NoMoreInput) => {
                return Ok(LineParse {
                    count,
                    end: LineEnd::Exhausted,
                    next_cursor,
                });
            }
            Err(e) => return Err(e),
        };

        if token.kind == TokenKind::Notif && count > 0 {
            return Err(AtError::TryAgain);
        }

        if token.kind == TokenKind::Resp {
            return Ok(LineParse {
                count,
                end: LineEnd::Resp,
                next_cursor: input.len(),
            });
        }

        out[count] = token;
        count += 1;
        next_cursor = token.offset + token.text.len();
    }

    Ok(LineParse {
        count,
        end: LineEnd::Exhausted,
        next_cursor,
    })
}
