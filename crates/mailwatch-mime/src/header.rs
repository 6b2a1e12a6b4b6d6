//! RFC 2047 encoded-word decoding for header values.

use crate::encoding::{decode_charset, decode_transfer};
use crate::error::{Error, Result};

/// The parts of a `=?charset?encoding?text?=` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    text: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Splits an encoded word off the front of `s`.
    ///
    /// Returns the word and the number of bytes it spans, or `None` when `s`
    /// does not start with a well-formed encoded word.
    fn split_front(s: &'a str) -> Option<(Self, usize)> {
        let body = s.strip_prefix("=?")?;
        let (charset, rest) = body.split_once('?')?;
        let (encoding, rest) = rest.split_once('?')?;
        let end = rest.find("?=")?;
        let text = &rest[..end];

        let valid = !charset.is_empty()
            && encoding.len() == 1
            && !charset.contains(char::is_whitespace)
            && !text.contains(char::is_whitespace);
        if !valid {
            return None;
        }

        let len = 2 + charset.len() + 1 + encoding.len() + 1 + end + 2;
        Some((
            Self {
                charset,
                encoding,
                text,
            },
            len,
        ))
    }

    fn decode(self) -> Result<String> {
        let content = decode_transfer(self.encoding, self.text)?;
        decode_charset(self.charset, &content)
    }
}

/// Decodes a single encoded word such as `=?UTF-8?Q?Hi?=`.
///
/// # Errors
///
/// Returns an error if `word` is not exactly one well-formed encoded word or
/// if its content or charset cannot be decoded.
pub fn decode_word(word: &str) -> Result<String> {
    match EncodedWord::split_front(word) {
        Some((parsed, len)) if len == word.len() => parsed.decode(),
        _ => Err(Error::MalformedWord(word.to_string())),
    }
}

/// Decodes every encoded word in a header value.
///
/// Text outside encoded words is kept as is. Whitespace between two adjacent
/// encoded words is dropped. A `=?` sequence that does not open a well-formed
/// word, or whose content does not decode, is left verbatim.
///
/// # Errors
///
/// Returns an error if a word names a charset that cannot be decoded.
pub fn decode_header(header: &str) -> Result<String> {
    if !header.contains("=?") {
        return Ok(header.to_string());
    }

    let mut out = String::with_capacity(header.len());
    let mut rest = header;
    let mut between_words = false;

    while let Some(start) = rest.find("=?") {
        let candidate = EncodedWord::split_front(&rest[start..]);
        let Some((word, len)) = candidate else {
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            between_words = false;
            continue;
        };

        let Ok(content) = decode_transfer(word.encoding, word.text) else {
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            between_words = false;
            continue;
        };

        let gap = &rest[..start];
        if !(between_words && gap.chars().all(char::is_whitespace)) {
            out.push_str(gap);
        }
        out.push_str(&decode_charset(word.charset, &content)?);

        rest = &rest[start + len..];
        between_words = true;
    }

    out.push_str(rest);
    Ok(out)
}
