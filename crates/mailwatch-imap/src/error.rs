//! Failures of an IMAP session.

use std::time::Duration;

use thiserror::Error;

/// Everything that can end an IMAP exchange early.
#[derive(Debug, Error)]
pub enum Error {
    /// The socket failed or closed.
    #[error("connection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or record processing failed.
    #[error("TLS failure: {0}")]
    Tls(#[from] rustls::Error),

    /// The host cannot be used as a TLS server name.
    #[error("{0} is not a valid TLS server name")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A server line did not match the grammar.
    #[error("malformed server response at byte {position}: {message}")]
    Parse {
        /// Offset into the line.
        position: usize,
        /// What was expected.
        message: String,
    },

    /// The server would not accept the credentials.
    #[error("login refused: {0}")]
    Auth(String),

    /// Tagged `NO`. Carries the server's text without any response code.
    #[error("server said NO: {0}")]
    No(String),

    /// Tagged `BAD`.
    #[error("server said BAD: {0}")]
    Bad(String),

    /// The server announced it is closing the connection.
    #[error("server closed the session: {0}")]
    Bye(String),

    /// Connecting took longer than the configured bound.
    #[error("no greeting within {0:?}")]
    Timeout(Duration),

    /// The receiver of a streaming fetch was dropped.
    #[error("fetch receiver dropped after {delivered} message(s)")]
    ConsumerClosed {
        /// Messages handed over before the drop.
        delivered: usize,
    },

    /// The server broke the protocol in a way the parser cannot express.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

/// `Result` with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
