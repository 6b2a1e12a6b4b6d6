//! Tokenizer for server response lines.
//!
//! Splits a complete response line (including any literal payloads) into
//! [`Token`]s per the RFC 9051 grammar. Quoted strings and literals are
//! decoded leniently: servers routinely pass raw 8-bit header bytes through
//! envelopes, so invalid UTF-8 is replaced rather than rejected.

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Cursor over one response line.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Starts at the beginning of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// True once every byte has been consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Byte under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes and returns the byte under the cursor.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Moves the cursor forward by up to `n` bytes.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.input.len());
    }

    /// Consumes the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::Eof);
        };

        if let Some(token) = Token::delimiter(byte) {
            self.pos += 1;
            return Ok(token);
        }

        match byte {
            b'\r' if self.eat_all(b"\r\n") => Ok(Token::Crlf),
            b'\r' => Err(self.error("CR without LF")),
            b'"' => self.quoted(),
            b'{' => self.literal(),
            _ if is_atom_char(byte) => self.atom(),
            _ => Err(self.error(format!("unexpected byte {byte:#04x}"))),
        }
    }

    /// Consumes `expected` if it comes next, comparing by kind only.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let found = self.next_token()?;
        if std::mem::discriminant(&found) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {expected:?}, found {found:?}")))
        }
    }

    /// Consumes a single space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Token::Space)
    }

    /// Reads an `nstring`: `NIL`, a quoted string or a literal.
    pub fn read_nstring(&mut self) -> Result<Option<String>> {
        match self.next_token()? {
            Token::Nil => Ok(None),
            Token::QuotedString(text) => Ok(Some(text)),
            Token::Literal(data) => Ok(Some(String::from_utf8_lossy(data).into_owned())),
            other => Err(self.error(format!("expected nstring, found {other:?}"))),
        }
    }

    /// Reads a number.
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            other => Err(self.error(format!("expected number, found {other:?}"))),
        }
    }

    /// Reads an atom.
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(atom) => Ok(atom),
            other => Err(self.error(format!("expected atom, found {other:?}"))),
        }
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.eat_all(&[byte])
    }

    fn eat_all(&mut self, bytes: &[u8]) -> bool {
        let matched = self.remaining().starts_with(bytes);
        if matched {
            self.pos += bytes.len();
        }
        matched
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let mut text = Vec::new();

        loop {
            let byte = self
                .advance()
                .ok_or_else(|| self.error("unterminated quoted string"))?;
            match byte {
                b'"' => break,
                b'\\' => match self.advance() {
                    Some(escaped @ (b'"' | b'\\')) => text.push(escaped),
                    Some(other) => {
                        return Err(self.error(format!("invalid escape \\{}", char::from(other))));
                    }
                    None => return Err(self.error("unterminated quoted string")),
                },
                _ => text.push(byte),
            }
        }

        Ok(Token::QuotedString(
            String::from_utf8_lossy(&text).into_owned(),
        ))
    }

    fn literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let size = std::str::from_utf8(self.take_while(|b| b.is_ascii_digit()))
            .ok()
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| self.error("invalid literal size"))?;

        // `{n+}` (LITERAL+) carries the same payload.
        self.eat(b'+');
        if !self.eat_all(b"}\r\n") {
            return Err(self.error("malformed literal header"));
        }

        let end = self
            .pos
            .checked_add(size)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error("literal runs past end of input"))?;
        let data = &self.input[self.pos..end];
        self.pos = end;

        Ok(Token::Literal(data))
    }

    fn atom(&mut self) -> Result<Token<'a>> {
        let bytes = self.take_while(is_atom_char);
        let text =
            std::str::from_utf8(bytes).map_err(|_| self.error("atom is not valid UTF-8"))?;

        if bytes.iter().all(u8::is_ascii_digit) {
            return text
                .parse()
                .map(Token::Number)
                .map_err(|_| self.error(format!("number {text} out of range")));
        }

        if text.eq_ignore_ascii_case("NIL") {
            Ok(Token::Nil)
        } else {
            Ok(Token::Atom(text))
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.into(),
        }
    }
}

/// Returns true if `b` may appear in an atom.
///
/// Accepts `\` so flags like `\Seen` lex as one atom, although RFC 9051
/// lists it as a quoted-special. Brackets and braces always end an atom.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    b.is_ascii_graphic()
        && !matches!(b, b'(' | b')' | b'{' | b'}' | b'"' | b'%' | b'*' | b'[' | b']')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            match lexer.next_token().unwrap() {
                Token::Eof => return out,
                token => out.push(token),
            }
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            tokens(b"A0001 NO [TRYCREATE] gone\r\n"),
            vec![
                Token::Atom("A0001"),
                Token::Space,
                Token::Atom("NO"),
                Token::Space,
                Token::LBracket,
                Token::Atom("TRYCREATE"),
                Token::RBracket,
                Token::Space,
                Token::Atom("gone"),
                Token::Crlf,
            ]
        );
    }

    #[test]
    fn test_numbers_and_digit_atoms() {
        assert_eq!(
            tokens(b"* 17 EXISTS 4294967295 12ab"),
            vec![
                Token::Asterisk,
                Token::Space,
                Token::Number(17),
                Token::Space,
                Token::Atom("EXISTS"),
                Token::Space,
                Token::Number(u32::MAX),
                Token::Space,
                Token::Atom("12ab"),
            ]
        );
    }

    #[test]
    fn test_number_overflow_is_an_error() {
        assert!(Lexer::new(b"4294967296").next_token().is_err());
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            tokens(br#""say \"hi\" \\ bye""#),
            vec![Token::QuotedString(r#"say "hi" \ bye"#.to_string())]
        );

        let Token::QuotedString(lossy) = Lexer::new(b"\"Caf\xe9\"").next_token().unwrap() else {
            panic!("expected quoted string");
        };
        assert!(lossy.starts_with("Caf"));

        assert!(Lexer::new(br#""tab \t""#).next_token().is_err());
        assert!(Lexer::new(b"\"open").next_token().is_err());
    }

    #[test]
    fn test_nil_in_any_case() {
        assert_eq!(
            tokens(b"NIL nil Nil"),
            vec![Token::Nil, Token::Space, Token::Nil, Token::Space, Token::Nil]
        );
    }

    #[test]
    fn test_flags_are_atoms() {
        assert_eq!(
            tokens(b"(\\Seen $Junk)"),
            vec![
                Token::LParen,
                Token::Atom("\\Seen"),
                Token::Space,
                Token::Atom("$Junk"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let mut lexer = Lexer::new(b"{5}\r\nhello {3+}\r\nabc");
        assert_eq!(lexer.next_token().unwrap(), Token::Literal(b"hello"));
        assert_eq!(lexer.next_token().unwrap(), Token::Space);
        assert_eq!(lexer.next_token().unwrap(), Token::Literal(b"abc"));
        assert!(lexer.is_eof());

        assert!(Lexer::new(b"{10}\r\nshort").next_token().is_err());
        assert!(Lexer::new(b"{}\r\n").next_token().is_err());
        assert!(Lexer::new(b"{3}abc").next_token().is_err());
    }

    #[test]
    fn test_lone_cr_is_an_error() {
        assert!(Lexer::new(b"\rX").next_token().is_err());
    }

    #[test]
    fn test_read_helpers() {
        let mut lexer = Lexer::new(b"NIL \"x\" {2}\r\nyz 9 OK");
        assert_eq!(lexer.read_nstring().unwrap(), None);
        lexer.expect_space().unwrap();
        assert_eq!(lexer.read_nstring().unwrap().as_deref(), Some("x"));
        lexer.expect_space().unwrap();
        assert_eq!(lexer.read_nstring().unwrap().as_deref(), Some("yz"));
        lexer.expect_space().unwrap();
        assert_eq!(lexer.read_number().unwrap(), 9);
        lexer.expect_space().unwrap();
        assert_eq!(lexer.read_atom_string().unwrap(), "OK");
        assert!(lexer.expect(Token::Crlf).is_err());
    }

    #[test]
    fn test_is_atom_char() {
        for b in [b'A', b'0', b'\\', b'$', b'~', b'-'] {
            assert!(is_atom_char(b), "{}", char::from(b));
        }
        for b in [b' ', b'(', b')', b'"', b'%', b'*', b'[', b']', b'{', b'}', b'\r', 0x7F, 0xE9] {
            assert!(!is_atom_char(b), "{b:#04x}");
        }
    }
}
