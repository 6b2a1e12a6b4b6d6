//! Messages yielded by a streaming fetch.
//!
//! [`Client::fetch_stream`](crate::Client::fetch_stream) hands each FETCH
//! response to a bounded channel as soon as it is parsed, so the consumer sees
//! messages while the server is still sending the rest of the range.

use crate::parser::{Envelope, FetchItem};
use crate::types::SeqNum;

/// A message from the fetch stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    /// Sequence number.
    pub seq: SeqNum,
    /// Raw fetch items.
    pub items: Vec<FetchItem>,
}

impl FetchedMessage {
    /// Creates a fetched message from a parsed FETCH response.
    #[must_use]
    pub const fn new(seq: SeqNum, items: Vec<FetchItem>) -> Self {
        Self { seq, items }
    }

    /// Returns the envelope if it was fetched.
    #[must_use]
    pub fn envelope(&self) -> Option<&Envelope> {
        self.items.iter().find_map(|item| match item {
            FetchItem::Envelope(env) => Some(env.as_ref()),
            _ => None,
        })
    }

    /// Returns the raw internal date if it was fetched.
    #[must_use]
    pub fn internal_date(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            FetchItem::InternalDate(date) => Some(date.as_str()),
            _ => None,
        })
    }

    /// Returns the UID if the server included one.
    #[must_use]
    pub fn uid(&self) -> Option<u32> {
        self.items.iter().find_map(|item| match item {
            FetchItem::Uid(uid) => Some(*uid),
            _ => None,
        })
    }

    /// Returns the flags if the server included them.
    #[must_use]
    pub fn flags(&self) -> Option<&[String]> {
        self.items.iter().find_map(|item| match item {
            FetchItem::Flags(flags) => Some(flags.as_slice()),
            _ => None,
        })
    }

    /// True when neither the envelope nor the internal date is present.
    ///
    /// Servers may push such responses at any time, for example
    /// `* 1 FETCH (FLAGS (\Seen))` after another session changes a flag.
    #[must_use]
    pub fn is_unsolicited(&self) -> bool {
        self.envelope().is_none() && self.internal_date().is_none()
    }
}
