//! Token accessors (§4.4): convert a single [`Token`] to a bounded integer
//! or a null-terminated byte copy, classify a command prefix, and count
//! structurally valid tokens in a slice.

use atcmd_diagnostics::{AtError, AtResult};

use crate::lexer;
use crate::token::{Token, TokenKind};

/// Recheck the structural-validity invariants of §3.1 before an accessor
/// touches a token's payload, independent of whether the token's `kind`
/// is one the accessor accepts.
fn require_structurally_valid(token: &Token<'_>) -> AtResult<()> {
    if token.is_structurally_valid() {
        Ok(())
    } else {
        Err(AtError::invalid_argument_because(
            "token fails the §3.1 structural-validity invariants",
        ))
    }
}

/// Parse an `INT` token's payload as a base-10 signed 64-bit intermediary,
/// shared by all five width-specific extractors below.
fn parse_i64(token: &Token<'_>) -> AtResult<i64> {
    if token.kind != TokenKind::Int {
        return Err(AtError::invalid_argument_because(format!(
            "expected an INT token, found {:?}",
            token.kind
        )));
    }
    require_structurally_valid(token)?;
    token.text.parse::<i64>().map_err(|_| {
        AtError::out_of_range_because(format!(
            "\"{}\" overflows a 64-bit signed intermediary",
            token.text
        ))
    })
}

/// Extract an `INT` token as a bounded `i16` (§4.4).
///
/// # Errors
/// [`AtError::InvalidArgument`] if `token` is not a structurally valid
/// `INT`; [`AtError::OutOfRange`] if the value overflows `i16`.
pub fn as_i16(token: &Token<'_>) -> AtResult<i16> {
    i16::try_from(parse_i64(token)?)
        .map_err(|_| AtError::out_of_range_because(format!("{} exceeds i16 bounds", token.text)))
}

/// Extract an `INT` token as a bounded `u16` (§4.4).
///
/// # Errors
/// [`AtError::InvalidArgument`] if `token` is not a structurally valid
/// `INT`; [`AtError::OutOfRange`] if the value overflows `u16`.
pub fn as_u16(token: &Token<'_>) -> AtResult<u16> {
    u16::try_from(parse_i64(token)?)
        .map_err(|_| AtError::out_of_range_because(format!("{} exceeds u16 bounds", token.text)))
}

/// Extract an `INT` token as a bounded `i32` (§4.4).
///
/// # Errors
/// [`AtError::InvalidArgument`] if `token` is not a structurally valid
/// `INT`; [`AtError::OutOfRange`] if the value overflows `i32`.
pub fn as_i32(token: &Token<'_>) -> AtResult<i32> {
    i32::try_from(parse_i64(token)?)
        .map_err(|_| AtError::out_of_range_because(format!("{} exceeds i32 bounds", token.text)))
}

/// Extract an `INT` token as a bounded `u32` (§4.4).
///
/// # Errors
/// [`AtError::InvalidArgument`] if `token` is not a structurally valid
/// `INT`; [`AtError::OutOfRange`] if the value overflows `u32`.
pub fn as_u32(token: &Token<'_>) -> AtResult<u32> {
    u32::try_from(parse_i64(token)?)
        .map_err(|_| AtError::out_of_range_because(format!("{} exceeds u32 bounds", token.text)))
}

/// Extract an `INT` token as a signed `i64` (§4.4).
///
/// # Errors
/// [`AtError::InvalidArgument`] if `token` is not a structurally valid
/// `INT`; [`AtError::OutOfRange`] if parsing the payload overflows `i64`.
pub fn as_i64(token: &Token<'_>) -> AtResult<i64> {
    parse_i64(token)
}

/// Copy a token's payload into `dest`, appending a NUL terminator (§4.4's
/// string extractor).
///
/// Every [`TokenKind`] except `INT`, `EMPTY`, and `INVALID` is permitted.
/// `dest` must have room for `token.text.len() + 1` bytes; on success,
/// returns the number of payload bytes copied (excluding the terminator).
///
/// # Errors
/// [`AtError::InvalidArgument`] for a disallowed token kind or a
/// structurally invalid token; [`AtError::NoMemory`] if `dest` is too
/// small.
pub fn copy_to_cstr(token: &Token<'_>, dest: &mut [u8]) -> AtResult<usize> {
    if matches!(token.kind, TokenKind::Int | TokenKind::Empty | TokenKind::Invalid) {
        return Err(AtError::invalid_argument_because(format!(
            "{:?} tokens are not accepted by the string extractor",
            token.kind
        )));
    }
    require_structurally_valid(token)?;

    let needed = token.text.len() + 1;
    if dest.len() < needed {
        return Err(AtError::NoMemory {
            needed,
            available: dest.len(),
        });
    }
    dest[..token.text.len()].copy_from_slice(token.text.as_bytes());
    dest[token.text.len()] = 0;
    Ok(token.text.len())
}

/// Count the tokens in `tokens` that satisfy [`Token::is_structurally_valid`]
/// (§4.4's valid-count accessor).
#[must_use]
pub fn valid_count(tokens: &[Token<'_>]) -> usize {
    tokens.iter().filter(|t| t.is_structurally_valid()).count()
}

/// Run the lexer once on the head of `input` and classify it as one of the
/// three command-header variants, or [`TokenKind::Invalid`] if the head is
/// not a command at all (§4.4's command-type classifier).
#[must_use]
pub fn command_type(input: &str) -> TokenKind {
    lexer::classify_command(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TrailingComma;

    fn int_token(text: &str) -> Token<'_> {
        Token {
            kind: TokenKind::Int,
            text,
            comma: TrailingComma::Absent,
            offset: 0,
        }
    }

    #[test]
    fn round_trips_within_each_width() {
        assert_eq!(as_i16(&int_token("-32768")).unwrap(), i16::MIN);
        assert_eq!(as_u16(&int_token("65535")).unwrap(), u16::MAX);
        assert_eq!(as_i32(&int_token("-2147483648")).unwrap(), i32::MIN);
        assert_eq!(as_u32(&int_token("4294967295")).unwrap(), u32::MAX);
        assert_eq!(as_i64(&int_token("-9223372036854775808")).unwrap(), i64::MIN);
    }

    #[test]
    fn width_overflow_is_out_of_range() {
        assert!(matches!(
            as_i16(&int_token("32768")),
            Err(AtError::OutOfRange { .. })
        ));
        assert!(matches!(
            as_u16(&int_token("-1")),
            Err(AtError::OutOfRange { .. })
        ));
        assert!(matches!(
            as_u32(&int_token("-1")),
            Err(AtError::OutOfRange { .. })
        ));
    }

    #[test]
    fn i64_intermediary_overflow_is_out_of_range() {
        assert!(matches!(
            as_i64(&int_token("99999999999999999999")),
            Err(AtError::OutOfRange { .. })
        ));
    }

    #[test]
    fn wrong_kind_is_invalid_argument() {
        let notif = Token {
            kind: TokenKind::Notif,
            text: "+CEREG",
            comma: TrailingComma::Absent,
            offset: 0,
        };
        assert!(matches!(
            as_i16(&notif),
            Err(AtError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn string_extractor_copies_and_terminates() {
        let token = Token {
            kind: TokenKind::QuotedString,
            text: "76C1",
            comma: TrailingComma::Absent,
            offset: 0,
        };
        let mut buf = [0u8; 5];
        let written = copy_to_cstr(&token, &mut buf).unwrap();
        assert_eq!(written, 4);
        assert_eq!(&buf, b"76C1\0");
    }

    #[test]
    fn string_extractor_rejects_int_empty_and_invalid() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            copy_to_cstr(&int_token("1"), &mut buf),
            Err(AtError::InvalidArgument { .. })
        ));
        let empty = Token {
            kind: TokenKind::Empty,
            text: "",
            comma: TrailingComma::Absent,
            offset: 0,
        };
        assert!(matches!(
            copy_to_cstr(&empty, &mut buf),
            Err(AtError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn string_extractor_rejects_undersized_buffer() {
        let token = Token {
            kind: TokenKind::String,
            text: "mfw_nrf9160",
            comma: TrailingComma::Absent,
            offset: 0,
        };
        let mut buf = [0u8; 4];
        let err = copy_to_cstr(&token, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            AtError::NoMemory {
                needed: 12,
                available: 4
            }
        ));
    }

    #[test]
    fn valid_count_excludes_invalid_and_malformed_empty() {
        let tokens = [
            int_token("1"),
            Token {
                kind: TokenKind::Empty,
                text: "",
                comma: TrailingComma::Absent,
                offset: 0,
            },
            Token {
                kind: TokenKind::Invalid,
                text: "",
                comma: TrailingComma::Absent,
                offset: 0,
            },
        ];
        assert_eq!(valid_count(&tokens), 2);
    }

    #[test]
    fn command_type_classifies_or_rejects() {
        assert_eq!(command_type("AT+CFUN=?"), TokenKind::CmdTest);
        assert_eq!(command_type("AT+CFUN?"), TokenKind::CmdRead);
        assert_eq!(command_type("AT+CFUN=1"), TokenKind::CmdSet);
        assert_eq!(command_type("ABBA"), TokenKind::Invalid);
    }
}
