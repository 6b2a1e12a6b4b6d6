//! # mailwatch-core
//!
//! Finds messages in a mail folder that have never been seen before and
//! announces each of them exactly once.
//!
//! This crate provides:
//! - **Reader**: read-only fetch of envelope and internal date for every message
//! - **Identity**: the `(Message-ID, internal date)` deduplication key
//! - **Ledger**: append-only `SQLite` record of announced messages
//! - **Orchestrator**: the skip / record-and-announce / warn decision loop
//! - **Notifier**: decoded announcements written to a pluggable sink
//!
//! ## Example
//!
//! ```ignore
//! use mailwatch_core::{ImapSession, Notifier, SqliteLedger, WriterSink};
//! use mailwatch_core::{fetch_messages, process, DEFAULT_CHANNEL_CAPACITY};
//!
//! let session = ImapSession::from(authenticated_client);
//! let records = fetch_messages(session, "Junk", DEFAULT_CHANNEL_CAPACITY).await?;
//!
//! let ledger = SqliteLedger::new("seen.db").await?;
//! let mut notifier = Notifier::new(WriterSink::stdout());
//! let report = process(&ledger, &mut notifier, &records).await?;
//! println!("{report}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod identity;
pub mod ledger;
pub mod model;
pub mod notifier;
pub mod orchestrator;
pub mod reader;

pub use error::{Error, Result};
pub use identity::IdentityKey;
pub use ledger::{Ledger, SqliteLedger};
pub use model::{MessageRecord, PersistedRecord};
pub use notifier::{NotificationSink, Notifier, TracingSink, WriterSink};
pub use orchestrator::{Outcome, RunReport, process, process_one};
pub use reader::{
    DEFAULT_CHANNEL_CAPACITY, ImapSession, MailboxSession, fetch_messages, read_mailbox,
};
