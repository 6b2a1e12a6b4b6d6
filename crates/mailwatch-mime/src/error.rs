//! Error types for header decoding.

/// Result type alias for header decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Header decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text is not a well-formed `=?charset?encoding?text?=` word.
    #[error("Malformed encoded word: {0}")]
    MalformedWord(String),

    /// Transfer encoding other than `B` or `Q`.
    #[error("Unknown transfer encoding: {0}")]
    UnknownEncoding(String),

    /// Charset label that no decoder is available for.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Invalid Q-encoded content.
    #[error("Invalid Q encoding: {0}")]
    InvalidQEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
