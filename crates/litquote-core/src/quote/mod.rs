//! Quoting codec for C-style string literals.
//!
//! [`quote`] turns an arbitrary byte sequence into a double-quoted literal and
//! [`unquote`] reverses it.
//!
//! ## Literal Grammar
//!
//! - `\"` and `\\` for the delimiter and the backslash
//! - `\a \b \f \n \r \t \v` for the named controls (decode only, the encoder
//!   writes these seven as raw bytes)
//! - `\xHH` for invalid input bytes and controls below 0x20
//! - `\uHHHH` / `\UHHHHHHHH` for every other non-printable scalar
//! - `\OOO` octal byte escapes (decode only)
//!
//! Printable characters, as decided by [`is_printable`], pass through as UTF-8.
//!
//! ## Recovery
//!
//! Decoding is lenient. A malformed escape unit costs exactly one byte of
//! input: the offending byte is dropped and decoding resumes right after it,
//! so `"a\qb"` decodes to `aqb`. Only a malformed delimiter wrapper is an
//! error.

mod escape;

use crate::error::{Error, Result, SyntaxReason};
use std::borrow::Cow;
use tracing::trace;

pub use escape::{is_printable, CHAR_QUOTE, QUOTE};

use escape::{named_escape_byte, named_escape_marker, parse_hex, push_byte_escape, push_unicode_escape};

/// Quote `input` as a double-quoted literal.
///
/// Never fails. Bytes that do not start a valid UTF-8 sequence are written
/// as `\xHH` and consume exactly one input byte.
///
/// ```
/// use litquote_core::quote;
///
/// assert_eq!(quote("say \"hi\""), r#""say \"hi\"""#);
/// assert_eq!(quote([0x00, 0xff]), r#""\x00\xff""#);
/// ```
pub fn quote(input: impl AsRef<[u8]>) -> String {
    let input = input.as_ref();
    let mut buf = String::with_capacity(3 * input.len() / 2 + 2);
    buf.push(QUOTE as char);
    for chunk in input.utf8_chunks() {
        for ch in chunk.valid().chars() {
            push_char(&mut buf, ch);
        }
        // An invalid run can be several bytes long; each one is escaped on its own
        for &byte in chunk.invalid() {
            push_byte_escape(&mut buf, byte);
        }
    }
    buf.push(QUOTE as char);
    buf
}

fn push_char(buf: &mut String, ch: char) {
    if ch == QUOTE as char || ch == '\\' {
        buf.push('\\');
        buf.push(ch);
    } else if is_printable(ch) || named_escape_marker(ch).is_some() {
        buf.push(ch);
    } else if u32::from(ch) < 0x20 {
        push_byte_escape(buf, ch as u8);
    } else {
        push_unicode_escape(buf, u32::from(ch));
    }
}

/// Recover the bytes of a quoted literal.
///
/// Literals that need no decoding are returned borrowed. A `'`-delimited
/// literal is accepted only when it holds exactly one unescaped character.
///
/// ```
/// use litquote_core::unquote;
///
/// assert_eq!(&*unquote(r#""\x41\u00e9""#)?, "Aé".as_bytes());
/// assert!(unquote(r#""ab"#).is_err());
/// # Ok::<(), litquote_core::Error>(())
/// ```
pub fn unquote(literal: &str) -> Result<Cow<'_, [u8]>> {
    let bytes = literal.as_bytes();
    let n = bytes.len();
    if n < 2 {
        return Err(Error::syntax(SyntaxReason::TooShort));
    }
    let quote = bytes[0];
    if quote != bytes[n - 1] {
        return Err(Error::syntax(SyntaxReason::MismatchedDelimiter));
    }
    if quote != QUOTE && quote != CHAR_QUOTE {
        return Err(Error::syntax(SyntaxReason::UnsupportedDelimiter));
    }
    let interior = &literal[1..n - 1];

    if let Some(verbatim) = unquote_verbatim(interior, quote) {
        return Ok(Cow::Borrowed(verbatim));
    }
    if quote == CHAR_QUOTE {
        return Err(Error::syntax(SyntaxReason::NotSingleCharacter));
    }
    Ok(Cow::Owned(unquote_escaped(interior, quote)))
}

/// Returns the interior as-is when it holds nothing to decode.
fn unquote_verbatim(interior: &str, quote: u8) -> Option<&[u8]> {
    let bytes = interior.as_bytes();
    if bytes.iter().any(|&b| b == b'\\' || b == quote) {
        return None;
    }
    if quote == CHAR_QUOTE {
        let mut chars = interior.chars();
        chars.next()?;
        if chars.next().is_some() {
            return None;
        }
    }
    Some(bytes)
}

fn unquote_escaped(interior: &str, quote: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 * interior.len() / 2);
    let mut rest = interior;
    while !rest.is_empty() {
        match next_unit(rest, quote) {
            Some((unit, tail)) => {
                unit.push_to(&mut buf);
                rest = tail;
            }
            None => {
                // Units only fail on an ASCII lead byte, so this stays on a char boundary
                trace!(
                    "Skipping malformed escape byte at offset {}",
                    interior.len() - rest.len()
                );
                rest = &rest[1..];
            }
        }
    }
    buf
}

/// One decoded piece of a literal body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    /// A single raw byte, not necessarily valid UTF-8 on its own
    Byte(u8),
    /// A scalar written out as UTF-8
    Char(char),
}

impl Unit {
    fn push_to(self, buf: &mut Vec<u8>) {
        match self {
            Unit::Byte(b) => buf.push(b),
            Unit::Char(ch) => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
}

/// Decodes the unit at the front of `s`, returning it with the remaining input.
fn next_unit(s: &str, quote: u8) -> Option<(Unit, &str)> {
    let bytes = s.as_bytes();
    let &lead = bytes.first()?;
    if lead == quote {
        return None;
    }
    if !lead.is_ascii() {
        let ch = s.chars().next()?;
        return Some((Unit::Char(ch), &s[ch.len_utf8()..]));
    }
    if lead != b'\\' {
        return Some((Unit::Byte(lead), &s[1..]));
    }

    let &marker = bytes.get(1)?;
    let args = &bytes[2..];
    let (unit, used) = match marker {
        b'x' => (Unit::Byte(parse_hex(args.get(..2)?)? as u8), 2),
        b'u' => (Unit::Char(char::from_u32(parse_hex(args.get(..4)?)?)?), 4),
        b'U' => (Unit::Char(char::from_u32(parse_hex(args.get(..8)?)?)?), 8),
        b'0'..=b'7' => {
            let value = args.get(..2)?.iter().try_fold(
                u32::from(marker - b'0'),
                |acc, &d| match d {
                    b'0'..=b'7' => Some((acc << 3) | u32::from(d - b'0')),
                    _ => None,
                },
            )?;
            (Unit::Byte(u8::try_from(value).ok()?), 2)
        }
        b'\\' => (Unit::Byte(b'\\'), 0),
        b'"' | b'\'' if marker == quote => (Unit::Byte(marker), 0),
        _ => (Unit::Byte(named_escape_byte(marker)?), 0),
    };
    Some((unit, &s[2 + used..]))
}
