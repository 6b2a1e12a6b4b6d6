//! # mailwatch-imap
//!
//! A read-only IMAP client. It logs in over implicit TLS, opens a mailbox
//! with `EXAMINE`, streams `ENVELOPE` and `INTERNALDATE` for a range of
//! messages and logs out. Nothing it sends can change a flag.
//!
//! ```ignore
//! use mailwatch_imap::{Client, Config, FetchAttribute, FetchedMessage, SequenceSet};
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> mailwatch_imap::Result<()> {
//! let client = Client::connect(&Config::new("imap.example.com")).await?;
//! let client = client.login("me@example.com", "secret").await?;
//! let (mut client, status) = client.examine("Junk").await?;
//!
//! if let Some(range) = SequenceSet::range(1, status.exists) {
//!     let (tx, mut rx) = mpsc::channel::<FetchedMessage>(16);
//!     let attributes = [FetchAttribute::Envelope, FetchAttribute::InternalDate];
//!     let print = async move {
//!         while let Some(message) = rx.recv().await {
//!             println!("{:?}", message.internal_date());
//!         }
//!     };
//!     let (fetched, ()) = tokio::join!(client.fetch_stream(&range, &attributes, tx), print);
//!     fetched?;
//! }
//! client.logout().await
//! # }
//! ```
//!
//! The session is a type-state machine:
//!
//! ```text
//! NotAuthenticated --login()--> Authenticated --examine()--> Selected
//! ```
//!
//! Every state can `logout()`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
mod stream_fetch;
pub mod types;

pub use command::{Command, FetchAttribute, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, ImapStream, NotAuthenticated, Selected,
};
pub use error::{Error, Result};
pub use parser::{
    Address, Envelope, FetchItem, Response, ResponseParser, StatusResponse, UntaggedResponse,
};
pub use stream_fetch::FetchedMessage;
pub use types::{
    Capability, Mailbox, MailboxStatus, ResponseCode, SeqNum, SequenceSet, Status, Tag,
};
