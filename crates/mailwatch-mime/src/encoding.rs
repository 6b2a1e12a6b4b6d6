//! Transfer and charset decoding for encoded words.
//!
//! Supports the `B` (Base64) and `Q` (quoted-printable variant) transfer
//! encodings of RFC 2047 and any charset label `encoding_rs` recognises.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes `Q`-encoded text (RFC 2047 §4.2).
///
/// `_` stands for an ASCII space regardless of charset and `=XX` is a hex
/// escaped byte. Soft line breaks do not exist inside an encoded word.
///
/// # Errors
///
/// Returns an error on a truncated or non-hex escape.
pub fn decode_q(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                result.push(b' ');
                i += 1;
            }
            b'=' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .ok_or_else(|| Error::InvalidQEncoding("incomplete escape".to_string()))?;
                let byte = std::str::from_utf8(hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| {
                        Error::InvalidQEncoding(format!(
                            "invalid hex {:?}",
                            String::from_utf8_lossy(hex)
                        ))
                    })?;
                result.push(byte);
                i += 3;
            }
            other => {
                result.push(other);
                i += 1;
            }
        }
    }

    Ok(result)
}

/// Applies the transfer encoding named by `encoding` (`B` or `Q`).
///
/// # Errors
///
/// Returns an error for an unknown encoding or undecodable content.
pub fn decode_transfer(encoding: &str, text: &str) -> Result<Vec<u8>> {
    match encoding {
        "b" | "B" => decode_base64(text),
        "q" | "Q" => decode_q(text),
        other => Err(Error::UnknownEncoding(other.to_string())),
    }
}

/// Converts bytes in the given charset to a string.
///
/// RFC 2231 language suffixes (`utf-8*en`) are ignored. Byte sequences that
/// are invalid in the charset become U+FFFD.
///
/// # Errors
///
/// Returns an error if the charset label is unknown.
pub fn decode_charset(charset: &str, content: &[u8]) -> Result<String> {
    let label = charset.split('*').next().unwrap_or(charset);
    let encoding = Encoding::for_label_no_replacement(label.trim().as_bytes())
        .ok_or_else(|| Error::UnsupportedCharset(charset.to_string()))?;

    let (decoded, _) = encoding.decode_with_bom_removal(content);
    Ok(decoded.into_owned())
}
