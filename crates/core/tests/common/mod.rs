//! Shared test helpers for `atcmd_core` integration tests.

#![allow(unreachable_pub, dead_code)]

use atcmd_core::{AtError, AtParser, Token, TokenKind};

/// Drain an `AtParser` over `input`, panicking if anything but a clean
/// *no-more-input* ends the run.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokens(input).into_iter().map(|t| t.kind).collect()
}

/// Drain an `AtParser` over `input`, collecting every successfully
/// emitted token, panicking on the first unexpected error.
pub fn tokens(input: &str) -> Vec<Token<'_>> {
    let mut parser = AtParser::init(input).expect("init");
    let mut out = Vec::new();
    loop {
        match parser.next() {
            Ok(tok) => out.push(tok),
            Err(AtError::NoMoreInput) => break,
            Err(e) => panic!("unexpected error {e} after {out:?}"),
        }
    }
    out
}
