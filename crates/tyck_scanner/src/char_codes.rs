//! Character classification used by the scanner.

use unicode_xid::UnicodeXID;

#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace other than line terminators.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_xid_start())
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_'
        || ch == '$'
        || ch.is_ascii_alphanumeric()
        || (!ch.is_ascii() && (ch.is_xid_continue() || ch == '\u{200C}' || ch == '\u{200D}'))
}

/// Whether `text` is a valid identifier on its own.
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classification() {
        assert!(is_identifier_text("foo$1"));
        assert!(is_identifier_text("_bar"));
        assert!(is_identifier_text("café"));
        assert!(!is_identifier_text("1abc"));
        assert!(!is_identifier_text(""));
    }

    #[test]
    fn test_whitespace_excludes_line_breaks() {
        assert!(is_white_space_single_line('\u{00A0}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_line_break('\u{2028}'));
    }
}
