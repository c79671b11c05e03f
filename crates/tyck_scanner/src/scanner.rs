//! The scanner.
//!
//! Works over the UTF-8 bytes of the source so every position it reports is a
//! byte offset. Non-ASCII characters are decoded on demand; the fast paths
//! for comments and line scanning go through `memchr`.

use std::sync::Arc;

use memchr::{memchr2, memmem};
use tyck_ast::syntax_kind::SyntaxKind;
use tyck_ast::types::TokenFlags;
use tyck_core::text::TextRange;
use tyck_diagnostics::{messages, Diagnostic, DiagnosticMessage};

use crate::char_codes::*;

/// Saved scanner state for speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    diagnostics_len: usize,
}

pub struct Scanner {
    file_name: String,
    text: Arc<str>,
    /// Current byte position.
    pos: usize,
    /// Start of the current token, after leading trivia.
    token_start: usize,
    token: SyntaxKind,
    /// Identifier text, raw numeric text or the cooked value of a string or
    /// template part.
    token_value: String,
    token_flags: TokenFlags,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    pub fn new(file_name: impl Into<String>, text: Arc<str>) -> Self {
        Self {
            file_name: file_name.into(),
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            diagnostics: Vec::new(),
        }
    }

    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// Skip a `#!` line at the very start of the file.
    pub fn skip_shebang(&mut self) {
        if self.pos == 0 && self.text.starts_with("#!") {
            let bytes = &self.text.as_bytes()[2..];
            self.pos = memchr2(b'\n', b'\r', bytes).map_or(self.text.len(), |i| i + 2);
        }
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_range(&self) -> TextRange {
        TextRange::new(self.token_start as u32, self.pos as u32)
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.diagnostics.truncate(state.diagnostics_len);
    }

    /// Run `f` and rewind the scanner afterwards.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize, end: usize) {
        self.diagnostics.push(Diagnostic::with_location(
            self.file_name.clone(),
            TextRange::new(start as u32, end.max(start) as u32),
            message,
            &[],
        ));
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// Decode the character at the current position.
    #[inline]
    fn current_char(&self) -> Option<char> {
        match self.byte_at(0)? {
            b if b.is_ascii() => Some(b as char),
            _ => self.text.get(self.pos..)?.chars().next(),
        }
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.byte_at(offset).filter(u8::is_ascii).map(|b| b as char)
    }

    #[inline]
    fn advance_char(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                '\r' | '\n' | '\u{2028}' | '\u{2029}' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.advance_char(ch);
                }
                '/' if self.char_at(1) == Some('/') => {
                    let rest = &self.text.as_bytes()[self.pos..];
                    self.pos += memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                }
                '/' if self.char_at(1) == Some('*') => {
                    let start = self.pos;
                    let body = &self.text.as_bytes()[self.pos + 2..];
                    let (len, terminated) = match memmem::find(body, b"*/") {
                        Some(i) => (i + 4, true),
                        None => (body.len() + 2, false),
                    };
                    let comment = &self.text.as_bytes()[start..start + len];
                    if memchr2(b'\n', b'\r', comment).is_some() {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.pos = start + len;
                    if !terminated {
                        self.error(&messages::ASTERISK_SLASH_EXPECTED, self.pos, self.pos);
                    }
                }
                c if is_white_space_single_line(c) => self.advance_char(c),
                _ => return,
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.current_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            '~' => self.single(SyntaxKind::TildeToken),
            '@' => self.single(SyntaxKind::AtToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '.' => self.scan_dot(),
            '?' => self.scan_question(),
            '<' => self.scan_operator(
                SyntaxKind::LessThanToken,
                SyntaxKind::LessThanEqualsToken,
                Some(('<', SyntaxKind::LessThanLessThanToken, SyntaxKind::LessThanLessThanEqualsToken)),
            ),
            // `>>` and `>=` are produced on demand by `rescan_greater_than_token`
            // so that nested type argument lists close cleanly.
            '>' => self.single(SyntaxKind::GreaterThanToken),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '+' => self.scan_operator(
                SyntaxKind::PlusToken,
                SyntaxKind::PlusEqualsToken,
                Some(('+', SyntaxKind::PlusPlusToken, SyntaxKind::PlusPlusToken)),
            ),
            '-' => self.scan_operator(
                SyntaxKind::MinusToken,
                SyntaxKind::MinusEqualsToken,
                Some(('-', SyntaxKind::MinusMinusToken, SyntaxKind::MinusMinusToken)),
            ),
            '*' => self.scan_operator(
                SyntaxKind::AsteriskToken,
                SyntaxKind::AsteriskEqualsToken,
                Some(('*', SyntaxKind::AsteriskAsteriskToken, SyntaxKind::AsteriskAsteriskEqualsToken)),
            ),
            '/' => self.scan_operator(SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken, None),
            '%' => self.scan_operator(SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken, None),
            '^' => self.scan_operator(SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken, None),
            '&' => self.scan_operator(
                SyntaxKind::AmpersandToken,
                SyntaxKind::AmpersandEqualsToken,
                Some(('&', SyntaxKind::AmpersandAmpersandToken, SyntaxKind::AmpersandAmpersandEqualsToken)),
            ),
            '|' => self.scan_operator(
                SyntaxKind::BarToken,
                SyntaxKind::BarEqualsToken,
                Some(('|', SyntaxKind::BarBarToken, SyntaxKind::BarBarEqualsToken)),
            ),
            '\'' | '"' => self.scan_string_literal(ch),
            '`' => {
                self.pos += 1;
                self.scan_template_part(SyntaxKind::NoSubstitutionTemplateLiteral, SyntaxKind::TemplateHead)
            }
            '0'..='9' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            '\\' => self.scan_identifier(),
            c => {
                self.advance_char(c);
                self.error(&messages::INVALID_CHARACTER, self.token_start, self.pos);
                SyntaxKind::Unknown
            }
        };
        self.token
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Scan `op`, `op=`, and optionally `opop` / `opop=`.
    fn scan_operator(
        &mut self,
        plain: SyntaxKind,
        with_equals: SyntaxKind,
        doubled: Option<(char, SyntaxKind, SyntaxKind)>,
    ) -> SyntaxKind {
        if let Some((repeat, twice, twice_equals)) = doubled {
            if self.char_at(1) == Some(repeat) {
                if twice != twice_equals && self.char_at(2) == Some('=') {
                    self.pos += 3;
                    return twice_equals;
                }
                self.pos += 2;
                return twice;
            }
        }
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            return with_equals;
        }
        self.pos += 1;
        plain
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.pos += 3;
            SyntaxKind::DotDotDotToken
        } else if self.char_at(1).is_some_and(is_digit) {
            self.scan_number()
        } else {
            self.single(SyntaxKind::DotToken)
        }
    }

    fn scan_question(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('?') {
            if self.char_at(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::QuestionQuestionEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::QuestionQuestionToken
            }
        } else if self.char_at(1) == Some('.') && !self.char_at(2).is_some_and(is_digit) {
            self.pos += 2;
            SyntaxKind::QuestionDotToken
        } else {
            self.single(SyntaxKind::QuestionToken)
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        match (self.char_at(1), self.char_at(2)) {
            (Some('='), Some('=')) => {
                self.pos += 3;
                SyntaxKind::EqualsEqualsEqualsToken
            }
            (Some('='), _) => {
                self.pos += 2;
                SyntaxKind::EqualsEqualsToken
            }
            (Some('>'), _) => {
                self.pos += 2;
                SyntaxKind::EqualsGreaterThanToken
            }
            _ => self.single(SyntaxKind::EqualsToken),
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        match (self.char_at(1), self.char_at(2)) {
            (Some('='), Some('=')) => {
                self.pos += 3;
                SyntaxKind::ExclamationEqualsEqualsToken
            }
            (Some('='), _) => {
                self.pos += 2;
                SyntaxKind::ExclamationEqualsToken
            }
            _ => self.single(SyntaxKind::ExclamationToken),
        }
    }

    /// Rescan `>` as `>=`, `>>`, `>>=`, `>>>` or `>>>=` in expression context.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        let (len, kind) = match (self.char_at(0), self.char_at(1), self.char_at(2)) {
            (Some('>'), Some('>'), Some('=')) => (3, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
            (Some('>'), Some('>'), _) => (2, SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
            (Some('>'), Some('='), _) => (2, SyntaxKind::GreaterThanGreaterThanEqualsToken),
            (Some('>'), _, _) => (1, SyntaxKind::GreaterThanGreaterThanToken),
            (Some('='), _, _) => (1, SyntaxKind::GreaterThanEqualsToken),
            _ => (0, SyntaxKind::GreaterThanToken),
        };
        self.pos += len;
        self.token = kind;
        kind
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.token_start, self.pos);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.scan_escape_sequence(&mut value);
                continue;
            }
            if ch == '\n' || ch == '\r' {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.token_start, self.pos);
                break;
            }
            value.push(ch);
            self.advance_char(ch);
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Scan template text up to a closing backtick or a `${`.
    fn scan_template_part(&mut self, on_backtick: SyntaxKind, on_substitution: SyntaxKind) -> SyntaxKind {
        let mut value = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, self.token_start, self.pos);
                self.token_value = value;
                return on_backtick;
            };
            match ch {
                '`' => {
                    self.pos += 1;
                    self.token_value = value;
                    return on_backtick;
                }
                '$' if self.char_at(1) == Some('{') => {
                    self.pos += 2;
                    self.token_value = value;
                    return on_substitution;
                }
                '\\' => self.scan_escape_sequence(&mut value),
                '\r' => {
                    // Template values normalize line endings.
                    self.pos += 1;
                    if self.char_at(0) == Some('\n') {
                        self.pos += 1;
                    }
                    value.push('\n');
                }
                _ => {
                    value.push(ch);
                    self.advance_char(ch);
                }
            }
        }
    }

    /// Continue a template after the `}` closing a substitution. The current
    /// token must be the `}`.
    pub fn rescan_template_token(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.token = self.scan_template_part(SyntaxKind::TemplateTail, SyntaxKind::TemplateMiddle);
        self.token
    }

    fn scan_escape_sequence(&mut self, out: &mut String) {
        self.pos += 1;
        let Some(ch) = self.current_char() else {
            return;
        };
        self.advance_char(ch);
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.char_at(0).is_some_and(is_digit) => out.push('\0'),
            'x' => match self.scan_hex_value(2) {
                Some(c) => out.push(c),
                None => out.push('x'),
            },
            'u' => {
                let code = if self.char_at(0) == Some('{') {
                    self.pos += 1;
                    let start = self.pos;
                    while self.char_at(0).is_some_and(is_hex_digit) {
                        self.pos += 1;
                    }
                    let digits = &self.text[start..self.pos];
                    if self.char_at(0) == Some('}') {
                        self.pos += 1;
                    }
                    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
                } else {
                    self.scan_hex_value(4)
                };
                out.push(code.unwrap_or('\u{FFFD}'));
            }
            '\r' => {
                // Line continuation.
                if self.char_at(0) == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn scan_hex_value(&mut self, count: usize) -> Option<char> {
        let digits = self.text.get(self.pos..self.pos + count)?;
        if !digits.chars().all(is_hex_digit) {
            return None;
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.char_at(0) == Some('0') {
            let radix = match self.char_at(1) {
                Some('x' | 'X') => Some((16, TokenFlags::HEX_SPECIFIER)),
                Some('b' | 'B') => Some((2, TokenFlags::BINARY_SPECIFIER)),
                Some('o' | 'O') => Some((8, TokenFlags::OCTAL_SPECIFIER)),
                _ => None,
            };
            if let Some((radix, flag)) = radix {
                self.pos += 2;
                self.token_flags |= flag;
                self.scan_digits(|c| c.is_digit(radix));
                return self.finish_number(start);
            }
        }

        self.scan_digits(is_digit);
        if self.char_at(0) == Some('.') {
            self.pos += 1;
            self.scan_digits(is_digit);
        }
        if let Some('e' | 'E') = self.char_at(0) {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            if let Some('+' | '-') = self.char_at(0) {
                self.pos += 1;
            }
            self.scan_digits(is_digit);
        }
        self.finish_number(start)
    }

    fn finish_number(&mut self, start: usize) -> SyntaxKind {
        let kind = if self.char_at(0) == Some('n') {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value = self.text[start..self.pos].replace('_', "");
        kind
    }

    fn scan_digits(&mut self, is_valid: impl Fn(char) -> bool) {
        while let Some(ch) = self.char_at(0) {
            if ch == '_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
            } else if !is_valid(ch) {
                break;
            }
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut value = String::new();
        let mut escaped = false;
        while let Some(ch) = self.current_char() {
            if ch == '\\' && self.char_at(1) == Some('u') {
                escaped = true;
                self.scan_escape_sequence(&mut value);
                continue;
            }
            if !(if self.pos == start { is_identifier_start(ch) } else { is_identifier_part(ch) }) {
                break;
            }
            value.push(ch);
            self.advance_char(ch);
        }
        if self.pos == start {
            // A lone backslash.
            self.pos += 1;
            self.error(&messages::INVALID_CHARACTER, start, self.pos);
            return SyntaxKind::Unknown;
        }
        let kind = if escaped { None } else { SyntaxKind::from_keyword(&value) };
        self.token_value = value;
        kind.unwrap_or(SyntaxKind::Identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(text: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new("test.ts", Arc::from(text));
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            kinds.push(kind);
        }
        kinds
    }

    #[test]
    fn test_scan_punctuation_and_operators() {
        assert_eq!(
            scan_all("a ??= b?.c === d !== e => f ** g"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionQuestionEqualsToken,
                SyntaxKind::Identifier,
                SyntaxKind::QuestionDotToken,
                SyntaxKind::Identifier,
                SyntaxKind::EqualsEqualsEqualsToken,
                SyntaxKind::Identifier,
                SyntaxKind::ExclamationEqualsEqualsToken,
                SyntaxKind::Identifier,
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::Identifier,
                SyntaxKind::AsteriskAsteriskToken,
                SyntaxKind::Identifier,
            ]
        );
        assert_eq!(scan_all("x && y || z"), vec![
            SyntaxKind::Identifier,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::Identifier,
            SyntaxKind::BarBarToken,
            SyntaxKind::Identifier,
        ]);
        assert_eq!(scan_all("i++ --j"), vec![
            SyntaxKind::Identifier,
            SyntaxKind::PlusPlusToken,
            SyntaxKind::MinusMinusToken,
            SyntaxKind::Identifier,
        ]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            scan_all("const typeof foo keyof"),
            vec![
                SyntaxKind::ConstKeyword,
                SyntaxKind::TypeOfKeyword,
                SyntaxKind::Identifier,
                SyntaxKind::KeyOfKeyword,
            ]
        );
    }

    #[test]
    fn test_string_escapes_are_cooked() {
        let mut scanner = Scanner::new("test.ts", Arc::from(r#"'a\nbA\x42'"#));
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\nbAB");
        assert!(scanner.take_diagnostics().is_empty());
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let mut scanner = Scanner::new("test.ts", Arc::from("'abc\n"));
        scanner.scan();
        assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
        let diagnostics = scanner.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, 1002);
    }

    #[test]
    fn test_template_with_substitution() {
        let mut scanner = Scanner::new("test.ts", Arc::from("`a${x}b`"));
        assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.rescan_template_token(), SyntaxKind::TemplateTail);
        assert_eq!(scanner.token_value(), "b");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_number_formats() {
        let mut scanner = Scanner::new("test.ts", Arc::from("0xFF 1_000 1.5e3 10n"));
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::HEX_SPECIFIER));
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), "1000");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
        assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
    }

    #[test]
    fn test_comments_set_line_break_flag() {
        let mut scanner = Scanner::new("test.ts", Arc::from("a /* x\n */ b // c\nd"));
        scanner.scan();
        assert!(!scanner.has_preceding_line_break());
        scanner.scan();
        assert!(scanner.has_preceding_line_break());
        scanner.scan();
        assert_eq!(scanner.token_value(), "d");
        assert!(scanner.has_preceding_line_break());
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let mut scanner = Scanner::new("test.ts", Arc::from("'é' x"));
        scanner.scan();
        assert_eq!(scanner.token_end(), 4);
        scanner.scan();
        assert_eq!(scanner.token_start(), 5);
    }

    #[test]
    fn test_rescan_greater_than() {
        let mut scanner = Scanner::new("test.ts", Arc::from("a >>= b"));
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.rescan_greater_than_token(), SyntaxKind::GreaterThanGreaterThanEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_look_ahead_restores_state() {
        let mut scanner = Scanner::new("test.ts", Arc::from("a b c"));
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.token_value().to_string()
        });
        assert_eq!(next, "b");
        assert_eq!(scanner.token_value(), "a");
        scanner.scan();
        assert_eq!(scanner.token_value(), "b");
    }

    #[test]
    fn test_shebang_is_skipped() {
        let mut scanner = Scanner::new("test.ts", Arc::from("#!/usr/bin/env node\nlet"));
        scanner.skip_shebang();
        assert_eq!(scanner.scan(), SyntaxKind::LetKeyword);
    }
}
