//! Pretty and JSON rendering of tokens and [`AtError`]s.
//!
//! Falls back to structured JSON when the output is piped or when the
//! user explicitly requests it, mirroring the teacher's `--output
//! pretty|json` convention.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use atcmd_core::{Token, TokenKind};
use atcmd_diagnostics::AtError;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for token and error rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve `Auto` to a concrete format based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Token rendering ──────────────────────────────────────────────────────

fn kind_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::CmdSet | TokenKind::CmdRead | TokenKind::CmdTest => Color::Cyan,
        TokenKind::Notif => Color::Magenta,
        TokenKind::Int => Color::Yellow,
        TokenKind::QuotedString | TokenKind::String => Color::Green,
        TokenKind::Array => Color::Blue,
        TokenKind::Empty => Color::White,
        TokenKind::Resp => Color::Red,
        TokenKind::Invalid => Color::Red,
    }
}

/// Print one line per token to stdout: `<offset> <KIND> <payload>`.
pub(crate) fn render_tokens_pretty(tokens: &[Token<'_>]) {
    use ariadne::Fmt;

    for token in tokens {
        let kind = format!("{:?}", token.kind).fg(kind_color(token.kind));
        println!("{:>6}  {kind:<14}  {:?}", token.offset, token.text);
    }
}

/// Print the token stream as a JSON array to stdout.
pub(crate) fn render_tokens_json(tokens: &[Token<'_>]) {
    let json = serde_json::to_string_pretty(tokens).expect("Token serialization cannot fail");
    println!("{json}");
}

/// Render a token stream in the given format.
pub(crate) fn render_tokens(tokens: &[Token<'_>], format: Format) {
    match format {
        Format::Pretty => render_tokens_pretty(tokens),
        Format::Json => render_tokens_json(tokens),
    }
}

// ── Error rendering ──────────────────────────────────────────────────────

/// Render an [`AtError`] against its originating `source`/`filename`.
///
/// Errors carrying a span ([`AtError::BadMessage`]) are rendered with
/// source context via ariadne; every other variant is printed as a
/// standalone message.
pub(crate) fn render_error_pretty(source: &str, filename: &str, err: &AtError) {
    if let AtError::BadMessage { span } = err {
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);

        let config = Config::default().with_compact(false);
        Report::build(ReportKind::Error, (filename, start..end))
            .with_message(err.to_string())
            .with_config(config)
            .with_label(
                Label::new((filename, start..end))
                    .with_message("rejected here")
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
            .ok();
    } else {
        eprintln!("error: {err}");
    }
}

/// Render an [`AtError`] as a single JSON object to stdout.
pub(crate) fn render_error_json(err: &AtError) {
    let json = serde_json::to_string_pretty(err).expect("AtError serialization cannot fail");
    println!("{json}");
}

/// Render an error in the given format.
///
/// - `Pretty` → coloured output to stderr (token data stays on stdout).
/// - `Json`   → JSON object to stdout.
pub(crate) fn render_error(source: &str, filename: &str, err: &AtError, format: Format) {
    match format {
        Format::Pretty => render_error_pretty(source, filename, err),
        Format::Json => render_error_json(err),
    }
}
