//! Lexical units of a server response line.

/// One lexical unit. Borrowed variants point into the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Bare atom such as `OK`, `FETCH` or `\Seen`.
    Atom(&'a str),
    /// Quoted string with escapes resolved.
    QuotedString(String),
    /// Payload following a `{n}` literal header.
    Literal(&'a [u8]),
    /// Unsigned 32-bit number.
    Number(u32),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// A single space.
    Space,
    /// `*`, which opens an untagged response.
    Asterisk,
    /// `+`, which opens a continuation request.
    Plus,
    /// `NIL` in any case.
    Nil,
    /// Line terminator.
    Crlf,
    /// No input left.
    Eof,
}

impl Token<'_> {
    /// Returns the token for a one-byte delimiter, or `None` if `byte` is not
    /// a delimiter.
    #[must_use]
    pub const fn delimiter(byte: u8) -> Option<Self> {
        let token = match byte {
            b' ' => Self::Space,
            b'(' => Self::LParen,
            b')' => Self::RParen,
            b'[' => Self::LBracket,
            b']' => Self::RBracket,
            b'*' => Self::Asterisk,
            b'+' => Self::Plus,
            _ => return None,
        };
        Some(token)
    }
}
