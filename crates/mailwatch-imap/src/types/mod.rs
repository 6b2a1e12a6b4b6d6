//! Protocol values shared by commands, the parser and the client.

#![allow(clippy::missing_const_for_fn)]

mod capability;
mod mailbox;
mod sequence;
mod status;

pub use capability::Capability;
pub use mailbox::{Mailbox, MailboxStatus, Tag};
pub use sequence::{SeqNum, SequenceSet};
pub use status::{ResponseCode, Status};
