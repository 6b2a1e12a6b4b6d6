//! Errors raised while reading the mailbox or recording what was seen.

use thiserror::Error;

/// A failure that aborts the current run.
#[derive(Debug, Error)]
pub enum Error {
    /// The IMAP session failed.
    #[error("IMAP: {0}")]
    Imap(#[from] mailwatch_imap::Error),

    /// The ledger database failed.
    #[error("ledger database: {0}")]
    Database(#[from] sqlx::Error),

    /// An announcement could not be written.
    #[error("could not write announcement: {0}")]
    Notify(#[from] std::io::Error),

    /// The server left out an item the FETCH asked for.
    #[error("message {seq} was returned without {item}")]
    IncompleteFetch {
        /// Sequence number of the message.
        seq: u32,
        /// Name of the missing item.
        item: &'static str,
    },

    /// A stored or received timestamp did not parse.
    #[error("unparseable date {value:?}: {source}")]
    InvalidDate {
        /// The offending text.
        value: String,
        /// Why chrono rejected it.
        #[source]
        source: chrono::ParseError,
    },

    /// The mailbox session was used out of order.
    #[error("mailbox session misuse: {0}")]
    Session(String),
}

/// `Result` with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
