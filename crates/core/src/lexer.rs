//! The lexical grammar (§4.1): matches one token at the head of a cursor.
//!
//! The lexer is a pure function of its input slice (and an optional
//! [`LexerConfig`]) — it holds no state of its own. `\r\n` line-boundary
//! skipping and `EMPTY`-token synthesis are parser concerns (§4.2, §9) and
//! live in [`crate::parser`], not here.

use crate::token::{TokenKind, TrailingComma};

/// The punctuation the lexer treats as fixed by the AT dialect of §6,
/// exposed here so a caller with a closely related vendor dialect can swap
/// them without forking the grammar. Defaults to the dialect §6 describes;
/// non-default configurations are exercised only by unit tests in this
/// crate, not by the default parsing path or the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// The three sigil characters that introduce a [`TokenKind::Notif`]
    /// header. `sigils[0]` doubles as the optional sign on an `INT`, so it
    /// must stay `'+'` for any dialect that also wants signed integers to
    /// lex unambiguously; that coupling is inherited from §6 and is not
    /// itself configurable.
    pub sigils: [char; 3],
    /// The subparameter delimiter (`,` in §6).
    pub delimiter: char,
    /// The quoted-string delimiter (`"` in §6).
    pub quote: char,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            sigils: ['+', '%', '#'],
            delimiter: ',',
            quote: '"',
        }
    }
}

/// Byte offsets for the matched chunk of a lexer attempt, split into the
/// part that becomes the token's payload and the total bytes consumed from
/// the cursor (payload plus any quotes/parens/suffix/comma/space).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexed<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub comma: TrailingComma,
    /// Total bytes consumed from the head of the cursor.
    pub consumed: usize,
}

/// Attempt to match a `RESP` tail at the head of `input`, which must begin
/// with `"\r\n"`. Returns `None` (not [`TokenKind::Invalid`]) when the
/// keyword following `\r\n` isn't recognized — that is a line-boundary
/// `\r\n`, not a rejected token, and the parser skips it and retries.
pub(crate) fn match_resp(input: &str) -> Option<Lexed<'_>> {
    debug_assert!(input.starts_with("\r\n"));
    let rest = &input[2..];
    let keyword_len = if rest.starts_with("OK") {
        2
    } else if rest.starts_with("ERROR") {
        5
    } else if let Some(digits) = rest.strip_prefix("+CME ERROR: ") {
        12 + digit_run_len(digits)?
    } else if let Some(digits) = rest.strip_prefix("+CMS ERROR: ") {
        12 + digit_run_len(digits)?
    } else {
        return None;
    };
    let mut consumed = 2 + keyword_len;
    if input[consumed..].starts_with("\r\n") {
        consumed += 2;
    }
    Some(Lexed {
        kind: TokenKind::Resp,
        text: &input[..consumed],
        comma: TrailingComma::Absent,
        consumed,
    })
}

fn digit_run_len(s: &str) -> Option<usize> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 { None } else { Some(len) }
}

const ID_BODY: fn(u8) -> bool =
    |b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'%' | b'+' | b'#');

/// Match one token at the head of `input` under the default [`LexerConfig`]
/// (§6's dialect). See [`match_token_with_config`] for the general form.
///
/// Returns `None` when the head is a rejected form (§4.1.3) — the caller
/// turns this into a `bad-message` error.
pub(crate) fn match_token(input: &str) -> Option<Lexed<'_>> {
    match_token_with_config(input, &LexerConfig::default())
}

/// Match one token at the head of `input`, using `cfg`'s sigil, delimiter,
/// and quote characters in place of §6's defaults.
///
/// `input` must be non-empty and must not start with `"\r\n"` (callers
/// route that case to [`match_resp`] first, per §4.1's line-boundary
/// handling).
pub(crate) fn match_token_with_config<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    debug_assert!(!input.is_empty());
    let bytes = input.as_bytes();
    let head = bytes[0] as char;
    match bytes[0] {
        b'A' if input[1..].starts_with('T') => match_cmd(input, cfg),
        b'-' => match_int(input, cfg),
        b'0'..=b'9' => match_int(input, cfg).or_else(|| match_string(input)),
        b' ' => None,
        b if b as char == cfg.quote => match_quoted_string(input, cfg),
        b'(' => match_array(input, cfg),
        _ if head == cfg.sigils[0] => match_sign_sigil(input, cfg),
        _ if cfg.sigils[1..].contains(&head) => match_notif(input, cfg),
        _ => match_string(input),
    }
}

// ── The primary sigil doubles as the INT sign ───────────────────────────

fn match_sign_sigil<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let after = input.as_bytes().get(1).copied();
    match after {
        Some(b) if b.is_ascii_digit() => match_int(input, cfg).or_else(|| match_string(input)),
        Some(b) if b.is_ascii_alphanumeric() => match_notif(input, cfg),
        _ => None,
    }
}

// ── AT<id>[=?|?|=] ───────────────────────────────────────────────────────

fn match_cmd<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let body_len = input[2..].bytes().take_while(|&b| ID_BODY(b)).count();
    let id_end = 2 + body_len;
    let payload = &input[..id_end];
    let rest = &input[id_end..];
    let (kind, suffix_len) = if rest.starts_with("=?") {
        (TokenKind::CmdTest, 2)
    } else if rest.starts_with('?') {
        (TokenKind::CmdRead, 1)
    } else if rest.starts_with('=') {
        (TokenKind::CmdSet, 1)
    } else {
        (TokenKind::CmdSet, 0)
    };
    let _ = cfg;
    Some(Lexed {
        kind,
        text: payload,
        comma: TrailingComma::Absent,
        consumed: id_end + suffix_len,
    })
}

// ── [+%#] ALNUM+ (":" " "? | end-of-line) ───────────────────────────────

fn match_notif<'a>(input: &'a str, _cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let id_len = input[1..]
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if id_len == 0 {
        return None;
    }
    let id_end = 1 + id_len;
    let payload = &input[..id_end];
    let rest = &input[id_end..];
    let consumed = if let Some(after_colon) = rest.strip_prefix(':') {
        let space = usize::from(after_colon.starts_with(' '));
        id_end + 1 + space
    } else if rest.is_empty() || rest.starts_with("\r\n") {
        id_end
    } else {
        return None;
    };
    Some(Lexed {
        kind: TokenKind::Notif,
        text: payload,
        comma: TrailingComma::Absent,
        consumed,
    })
}

// ── [+\-]? DIGIT+ ────────────────────────────────────────────────────────
//
// A digit run is only an INT if what follows it is a valid subparameter
// terminator (a delimiter, `\r\n`, or end-of-input). A digit run immediately
// followed by anything else (e.g. the hex letters of a PDU tail) is not an
// integer at all — callers for the unsigned-leading-digit case fall back to
// [`match_string`] when this returns `None` for that reason.
fn match_int<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let bytes = input.as_bytes();
    let sign_len = usize::from(matches!(bytes[0], b'+' | b'-'));
    let digit_len = input[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digit_len == 0 {
        return None;
    }
    let payload_end = sign_len + digit_len;
    let rest = &input[payload_end..];
    let valid_terminator =
        rest.is_empty() || rest.starts_with(cfg.delimiter) || rest.starts_with("\r\n");
    if !valid_terminator {
        return None;
    }
    finish_subparam(input, TokenKind::Int, payload_end, cfg)
}

// ── '"' ( !'"' . )* '"' ──────────────────────────────────────────────────

fn match_quoted_string<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let body = &input[cfg.quote.len_utf8()..];
    let close = body.find(cfg.quote)?;
    let payload = &body[..close];
    if payload.contains('\0') {
        return None;
    }
    finish_subparam(
        input,
        TokenKind::QuotedString,
        cfg.quote.len_utf8() + close + cfg.quote.len_utf8(),
        cfg,
    )
    .map(|lexed| Lexed {
        text: payload,
        ..lexed
    })
}

// ── '(' ARRAY_BODY ')' ───────────────────────────────────────────────────

fn match_array<'a>(input: &'a str, cfg: &LexerConfig) -> Option<Lexed<'a>> {
    let bytes = input.as_bytes();
    let quote = cfg.quote as u8;
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut saw_letter_outside_quotes = false;
    let mut i = 0usize;
    loop {
        let b = *bytes.get(i)?;
        match b {
            b if b == quote => in_quotes = !in_quotes,
            b'(' if !in_quotes => depth += 1,
            b')' if !in_quotes => {
                depth -= 1;
                if depth == 0 {
                    i += 1;
                    break;
                }
            }
            b if b.is_ascii_alphabetic() && !in_quotes => saw_letter_outside_quotes = true,
            _ => {}
        }
        i += 1;
    }
    if saw_letter_outside_quotes || in_quotes {
        return None;
    }
    let payload = &input[1..i - 1];
    finish_subparam(input, TokenKind::Array, i, cfg).map(|lexed| Lexed {
        text: payload,
        ..lexed
    })
}

/// Shared trailing-delimiter/space consumption for subparameter productions
/// (INT, QUOTED_STRING, ARRAY). `payload_end` is the byte offset, relative
/// to `input`, one past the matched payload (including any closing
/// delimiter such as `"` or `)`).
fn finish_subparam<'a>(
    input: &'a str,
    kind: TokenKind,
    payload_end: usize,
    cfg: &LexerConfig,
) -> Option<Lexed<'a>> {
    let text = &input[..payload_end];
    let rest = &input[payload_end..];
    let (comma, consumed) = if rest.starts_with(cfg.delimiter) {
        let delim_len = cfg.delimiter.len_utf8();
        let space = usize::from(rest[delim_len..].starts_with(' '));
        (TrailingComma::Present, payload_end + delim_len + space)
    } else {
        (TrailingComma::Absent, payload_end)
    };
    Some(Lexed {
        kind,
        text,
        comma,
        consumed,
    })
}

// ── any run up to the next "\r\n" or end-of-input ───────────────────────

fn match_string(input: &str) -> Option<Lexed<'_>> {
    let crlf = input.find("\r\n").unwrap_or(input.len());
    let nul = input.find('\0').unwrap_or(input.len());
    let end = crlf.min(nul);
    if end == 0 {
        return None;
    }
    Some(Lexed {
        kind: TokenKind::String,
        text: &input[..end],
        comma: TrailingComma::Absent,
        consumed: end,
    })
}

/// Run the lexer once on the head of `input` and report the type of
/// command found, if any — the command-type classifier (§4.4's last
/// bullet). Used both by [`crate::accessor::command_type`] and internally
/// to keep the single-shot classification logic in one place.
pub(crate) fn classify_command(input: &str) -> TokenKind {
    if input.is_empty() || input.starts_with("\r\n") {
        return TokenKind::Invalid;
    }
    match match_token(input) {
        Some(lexed) if lexed.kind.is_command() => lexed.kind,
        _ => TokenKind::Invalid,
    }
}
