//! Hand-coded scanner for Big source text.
//!
//! A single pass over the input bytes produces a finite token sequence that
//! always ends in exactly one `Eof` token, for every input, including the
//! empty string. The main loop dispatches on the current byte into one of
//! the literal scanners (identifier, numeric, string, char) or the operator
//! table.
//!
//! ## Rules
//!
//! - Whitespace (space, tab, CR, LF) is skipped.
//! - `//` starts a line comment; `/* ... */` is a non-nesting block comment.
//! - String and char literals keep their body text verbatim; a backslash
//!   escapes the delimiter but no other escape interpretation happens.
//! - Identifiers are `[A-Za-z_][A-Za-z0-9_]*`; any code point above 127
//!   counts as a letter.
//! - Numerics are digit runs with at most one `.`; a `-` immediately
//!   followed by a digit merges into a negative literal.
//! - Identifiers matching a reserved word are retagged as keywords.
//! - Bytes that fit no rule are dropped.
//!
//! Token spans are byte offsets into the source; line/column is derived
//! from the span when a diagnostic is rendered.

use biggie_base::{Interner, Span};

use crate::token::{Token, TokenType};

pub struct Lexer<'src, 'int> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    interner: &'int mut Interner,
    tokens: Vec<Token>,
}

impl<'src, 'int> Lexer<'src, 'int> {
    pub fn new(source: &'src str, interner: &'int mut Interner) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            interner,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole input. Total: terminates on every input and appends
    /// exactly one `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            self.scan_token();
        }
        let end = self.bytes.len();
        self.tokens.push(Token::new(TokenType::Eof, Span::new(end, end)));
        self.tokens
    }

    fn scan_token(&mut self) {
        let start = self.pos;
        let byte = self.bytes[self.pos];

        match byte {
            b' ' | b'\t' | b'\r' | b'\n' => {
                self.pos += 1;
            }
            b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
            b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
            b'\'' => self.scan_char(),
            b'"' => self.scan_string(),
            b'0'..=b'9' => self.scan_number(start),
            b'-' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => {
                self.pos += 1;
                self.scan_number(start);
            }
            _ if is_identifier_start(self.current_char()) => self.scan_identifier(),
            _ => self.scan_operator(),
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn push(&mut self, kind: TokenType, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.pos)));
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
        // Unterminated comment swallows the rest of the input.
    }

    /// Scans a delimited literal body, honoring `\` before the delimiter.
    /// The body text between the delimiters is preserved verbatim,
    /// backslashes included. An unterminated literal ends at EOF.
    fn scan_delimited(&mut self, delimiter: u8) -> (usize, usize) {
        self.pos += 1;
        let body_start = self.pos;
        while self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            if byte == b'\\' {
                self.pos += 2;
                continue;
            }
            if byte == delimiter {
                let body_end = self.pos;
                self.pos += 1;
                return (body_start, body_end);
            }
            self.pos += 1;
        }
        (body_start, self.bytes.len().min(self.pos))
    }

    fn scan_char(&mut self) {
        let start = self.pos;
        let (body_start, body_end) = self.scan_delimited(b'\'');
        let text = self.interner.intern(&self.source[body_start..body_end]);
        self.push(TokenType::Char(text), start);
    }

    fn scan_string(&mut self) {
        let start = self.pos;
        let (body_start, body_end) = self.scan_delimited(b'"');
        let text = self.interner.intern(&self.source[body_start..body_end]);
        self.push(TokenType::String(text), start);
    }

    fn scan_number(&mut self, start: usize) {
        let mut seen_dot = false;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot && matches!(self.peek_at(1), Some(b'0'..=b'9')) => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let text = self.interner.intern(&self.source[start..self.pos]);
        self.push(TokenType::Number(text), start);
    }

    fn scan_identifier(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_identifier_part(self.current_char()) {
            self.pos += self.current_char().len_utf8();
        }
        let text = &self.source[start..self.pos];
        let kind = match TokenType::keyword(text) {
            Some(keyword) => keyword,
            None => TokenType::Identifier(self.interner.intern(text)),
        };
        self.push(kind, start);
    }

    fn scan_operator(&mut self) {
        let start = self.pos;
        let one = self.bytes[self.pos];
        let two = self.peek_at(1);

        // Two-character operators first.
        let double = match (one, two) {
            (b'=', Some(b'=')) => Some(TokenType::EqualsEquals),
            (b'!', Some(b'=')) => Some(TokenType::BangEquals),
            (b'<', Some(b'=')) => Some(TokenType::LessEquals),
            (b'>', Some(b'=')) => Some(TokenType::GreaterEquals),
            (b'+', Some(b'=')) => Some(TokenType::PlusEquals),
            (b'-', Some(b'=')) => Some(TokenType::MinusEquals),
            (b'*', Some(b'=')) => Some(TokenType::StarEquals),
            (b'/', Some(b'=')) => Some(TokenType::SlashEquals),
            (b'&', Some(b'&')) => Some(TokenType::AmpersandAmpersand),
            (b'|', Some(b'|')) => Some(TokenType::BarBar),
            _ => None,
        };
        if let Some(kind) = double {
            self.pos += 2;
            self.push(kind, start);
            return;
        }

        let single = match one {
            b'(' => Some(TokenType::OpenParen),
            b')' => Some(TokenType::CloseParen),
            b'{' => Some(TokenType::OpenBrace),
            b'}' => Some(TokenType::CloseBrace),
            b'[' => Some(TokenType::OpenBracket),
            b']' => Some(TokenType::CloseBracket),
            b',' => Some(TokenType::Comma),
            b';' => Some(TokenType::Semicolon),
            b':' => Some(TokenType::Colon),
            b'.' => Some(TokenType::Dot),
            b'+' => Some(TokenType::Plus),
            b'-' => Some(TokenType::Minus),
            b'*' => Some(TokenType::Star),
            b'/' => Some(TokenType::Slash),
            b'=' => Some(TokenType::Equals),
            b'<' => Some(TokenType::Less),
            b'>' => Some(TokenType::Greater),
            b'!' => Some(TokenType::Bang),
            b'&' => Some(TokenType::Ampersand),
            b'|' => Some(TokenType::Bar),
            _ => None,
        };
        match single {
            Some(kind) => {
                self.pos += 1;
                self.push(kind, start);
            }
            None => {
                // Known limitation: unrecognized input is dropped.
                self.pos += self.current_char().len_utf8().max(1);
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (c as u32) > 127
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (c as u32) > 127
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> (Vec<Token>, Interner) {
        let mut interner = Interner::new();
        let tokens = Lexer::new(source, &mut interner).tokenize();
        (tokens, interner)
    }

    fn kinds(source: &str) -> Vec<TokenType> {
        scan(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_yields_single_eof() {
        assert_eq!(kinds(""), vec![TokenType::Eof]);
    }

    #[test]
    fn whitespace_only_yields_single_eof() {
        assert_eq!(kinds(" \t\r\n  \n"), vec![TokenType::Eof]);
    }

    #[test]
    fn identifiers_and_keywords() {
        let (tokens, interner) = scan("func main");
        assert_eq!(tokens[0].kind, TokenType::Func);
        match tokens[1].kind {
            TokenType::Identifier(name) => assert_eq!(interner.resolve(name), "main"),
            other => panic!("expected identifier, got {:?}", other),
        }
        assert_eq!(tokens[2].kind, TokenType::Eof);
    }

    #[test]
    fn unicode_identifier_is_one_token() {
        let (tokens, interner) = scan("grüße");
        match tokens[0].kind {
            TokenType::Identifier(name) => assert_eq!(interner.resolve(name), "grüße"),
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn multi_character_operators() {
        assert_eq!(
            kinds("== != <= >= += -= *= /= && ||"),
            vec![
                TokenType::EqualsEquals,
                TokenType::BangEquals,
                TokenType::LessEquals,
                TokenType::GreaterEquals,
                TokenType::PlusEquals,
                TokenType::MinusEquals,
                TokenType::StarEquals,
                TokenType::SlashEquals,
                TokenType::AmpersandAmpersand,
                TokenType::BarBar,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn lone_ampersand_and_bar() {
        assert_eq!(
            kinds("& |"),
            vec![TokenType::Ampersand, TokenType::Bar, TokenType::Eof]
        );
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("a // comment ; var\nb"),
            kinds("a\nb"),
        );
    }

    #[test]
    fn block_comment_does_not_nest() {
        // The first */ closes the comment.
        let k = kinds("a /* x /* y */ b");
        assert_eq!(k.len(), 3); // a, b, Eof
    }

    #[test]
    fn unterminated_block_comment_reaches_eof() {
        assert_eq!(kinds("a /* trailing"), vec![kinds("a")[0], TokenType::Eof]);
    }

    #[test]
    fn number_with_fraction() {
        let (tokens, interner) = scan("3.25");
        match tokens[0].kind {
            TokenType::Number(name) => assert_eq!(interner.resolve(name), "3.25"),
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn second_dot_ends_number() {
        let (tokens, interner) = scan("1.2.3");
        match tokens[0].kind {
            TokenType::Number(name) => assert_eq!(interner.resolve(name), "1.2"),
            other => panic!("expected number, got {:?}", other),
        }
        assert_eq!(tokens[1].kind, TokenType::Dot);
    }

    #[test]
    fn minus_digit_merges_into_negative_literal() {
        let (tokens, interner) = scan("-42");
        match tokens[0].kind {
            TokenType::Number(name) => assert_eq!(interner.resolve(name), "-42"),
            other => panic!("expected number, got {:?}", other),
        }
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn minus_before_space_stays_an_operator() {
        assert_eq!(kinds("- 42").first(), Some(&TokenType::Minus));
    }

    #[test]
    fn string_body_is_verbatim() {
        let (tokens, interner) = scan(r#""a\"b\n""#);
        match tokens[0].kind {
            TokenType::String(name) => assert_eq!(interner.resolve(name), r#"a\"b\n"#),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn char_literal_keeps_body() {
        let (tokens, interner) = scan(r"'\''");
        match tokens[0].kind {
            TokenType::Char(name) => assert_eq!(interner.resolve(name), r"\'"),
            other => panic!("expected char, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_string_still_ends_in_eof() {
        let (tokens, _) = scan("\"never closed");
        assert!(matches!(tokens[0].kind, TokenType::String(_)));
        assert_eq!(tokens[1].kind, TokenType::Eof);
    }

    #[test]
    fn unknown_characters_are_dropped() {
        assert_eq!(kinds("a @ # $ b").len(), 3); // a, b, Eof
    }

    #[test]
    fn spans_point_at_first_character() {
        let (tokens, _) = scan("ab  cd");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(4, 6));
    }

    #[test]
    fn every_scan_ends_in_exactly_one_eof() {
        for source in ["", "func", "1 + 2", "\"open", "/* open", "@@@", "-"] {
            let (tokens, _) = scan(source);
            let eofs = tokens.iter().filter(|t| t.kind == TokenType::Eof).count();
            assert_eq!(eofs, 1, "source {:?}", source);
            assert_eq!(tokens.last().unwrap().kind, TokenType::Eof);
        }
    }
}
