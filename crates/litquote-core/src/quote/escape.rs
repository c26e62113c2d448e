//! Escape table and character classification shared by the encoder and decoder.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Delimiter of a string literal
pub const QUOTE: u8 = b'"';

/// Delimiter of a single-character literal (decode only)
pub const CHAR_QUOTE: u8 = b'\'';

/// Largest valid Unicode scalar value
pub(crate) const MAX_SCALAR: u32 = char::MAX as u32;

/// Substitute for scalars outside the valid range
pub(crate) const REPLACEMENT: u32 = char::REPLACEMENT_CHARACTER as u32;

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

/// Named control escapes as `(marker, raw byte)` pairs
const NAMED_ESCAPES: [(u8, u8); 7] = [
    (b'a', 0x07),
    (b'b', 0x08),
    (b'f', 0x0c),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b't', b'\t'),
    (b'v', 0x0b),
];

/// Returns the raw byte for a named escape marker such as `n` in `\n`.
pub(crate) fn named_escape_byte(marker: u8) -> Option<u8> {
    NAMED_ESCAPES
        .iter()
        .find(|(m, _)| *m == marker)
        .map(|&(_, b)| b)
}

/// Returns the marker for one of the seven named control characters.
pub(crate) fn named_escape_marker(ch: char) -> Option<u8> {
    let code = u32::from(ch);
    NAMED_ESCAPES
        .iter()
        .find(|(_, b)| u32::from(*b) == code)
        .map(|&(m, _)| m)
}

/// Reports whether `ch` may appear verbatim inside a literal.
///
/// The classification does not depend on the locale: ASCII graphic
/// characters and the plain space, Latin-1 graphic characters except the
/// soft hyphen, and above that letters, marks, numbers, punctuation and
/// symbols.
pub fn is_printable(ch: char) -> bool {
    let code = u32::from(ch);
    if code <= 0xff {
        return (0x20..=0x7e).contains(&code) || ((0xa1..=0xff).contains(&code) && code != 0xad);
    }
    use GeneralCategory::*;
    matches!(
        get_general_category(ch),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

/// Appends `\xHH` for a raw byte.
pub(crate) fn push_byte_escape(buf: &mut String, byte: u8) {
    buf.push_str("\\x");
    buf.push(LOWER_HEX[usize::from(byte >> 4)] as char);
    buf.push(LOWER_HEX[usize::from(byte & 0xf)] as char);
}

/// Appends `\uHHHH` or `\UHHHHHHHH` depending on magnitude.
///
/// Values above [`MAX_SCALAR`] are written as the replacement character.
pub(crate) fn push_unicode_escape(buf: &mut String, scalar: u32) {
    let scalar = if scalar > MAX_SCALAR {
        REPLACEMENT
    } else {
        scalar
    };
    let digits = if scalar < 0x10000 {
        buf.push_str("\\u");
        4
    } else {
        buf.push_str("\\U");
        8
    };
    for shift in (0..digits).rev().map(|d| d * 4) {
        buf.push(LOWER_HEX[((scalar >> shift) & 0xf) as usize] as char);
    }
}

/// Parses exactly `digits.len()` hex digits, either case.
pub(crate) fn parse_hex(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &d| {
        let nibble = (d as char).to_digit(16)?;
        Some((acc << 4) | nibble)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_named_escapes_are_bidirectional() {
        for (marker, byte) in NAMED_ESCAPES {
            assert_eq!(named_escape_byte(marker), Some(byte));
            assert_eq!(named_escape_marker(byte as char), Some(marker));
        }
        assert_eq!(named_escape_byte(b'q'), None);
        assert_eq!(named_escape_marker('\0'), None);
        assert_eq!(named_escape_marker('n'), None);
    }

    #[test]
    fn test_is_printable_latin1() {
        assert!(is_printable(' '));
        assert!(is_printable('~'));
        assert!(is_printable('é'));
        assert!(!is_printable('\u{7f}'));
        assert!(!is_printable('\u{a0}'));
        assert!(!is_printable('\u{ad}'));
        assert!(!is_printable('\n'));
        assert!(!is_printable('\u{85}'));
    }

    #[test]
    fn test_is_printable_beyond_latin1() {
        assert!(is_printable('日'));
        assert!(is_printable('€'));
        assert!(is_printable('\u{301}'));
        assert!(is_printable('😀'));
        assert!(!is_printable('\u{2028}'));
        assert!(!is_printable('\u{3000}'));
        assert!(!is_printable('\u{200b}'));
        assert!(!is_printable('\u{feff}'));
        assert!(!is_printable('\u{e000}'));
        assert!(!is_printable('\u{10ffff}'));
    }

    #[test]
    fn test_push_byte_escape() {
        let mut buf = String::new();
        push_byte_escape(&mut buf, 0x00);
        push_byte_escape(&mut buf, 0xff);
        push_byte_escape(&mut buf, 0x1b);
        assert_eq!(buf, "\\x00\\xff\\x1b");
    }

    #[test]
    fn test_push_unicode_escape_widths() {
        let mut buf = String::new();
        push_unicode_escape(&mut buf, 0x85);
        push_unicode_escape(&mut buf, 0xfeff);
        push_unicode_escape(&mut buf, 0x10ffff);
        assert_eq!(buf, "\\u0085\\ufeff\\U0010ffff");
    }

    #[test]
    fn test_push_unicode_escape_out_of_range() {
        let mut buf = String::new();
        push_unicode_escape(&mut buf, 0x110000);
        assert_eq!(buf, "\\ufffd");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex(b"41"), Some(0x41));
        assert_eq!(parse_hex(b"FfFe"), Some(0xfffe));
        assert_eq!(parse_hex(b"0010ffff"), Some(0x10ffff));
        assert_eq!(parse_hex(b"4g"), None);
    }
}
