//! Values produced by the response parser.

use crate::types::{Capability, ResponseCode, SeqNum, Status};
use crate::{Error, Result};

/// A status keyword with its optional `[code]` and trailing text.
///
/// Tagged completions carry one, as do untagged `OK`, `NO`, `BAD`,
/// `PREAUTH` and `BYE` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    /// Status keyword.
    pub status: Status,
    /// Bracketed response code, if any.
    pub code: Option<ResponseCode>,
    /// Text after the code, possibly empty.
    pub text: String,
}

impl StatusResponse {
    /// Turns a command completion into a result.
    ///
    /// # Errors
    ///
    /// `NO`, `BAD` and `BYE` become [`Error::No`], [`Error::Bad`] and
    /// [`Error::Bye`] carrying the text. The response code is dropped.
    pub fn into_result(self) -> Result<()> {
        match self.status {
            Status::Ok | Status::PreAuth => Ok(()),
            Status::No => Err(Error::No(self.text)),
            Status::Bad => Err(Error::Bad(self.text)),
            Status::Bye => Err(Error::Bye(self.text)),
        }
    }
}

/// One data item of a FETCH response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    /// `INTERNALDATE`, verbatim.
    InternalDate(String),
    /// `ENVELOPE`.
    Envelope(Box<Envelope>),
    /// `UID`, which servers may send unasked.
    Uid(u32),
    /// `FLAGS`, which servers may send unasked.
    Flags(Vec<String>),
}

/// The ten envelope fields, in wire order. Header values are undecoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// `Date:`
    pub date: Option<String>,
    /// `Subject:`
    pub subject: Option<String>,
    /// `From:`
    pub from: Vec<Address>,
    /// `Sender:`
    pub sender: Vec<Address>,
    /// `Reply-To:`
    pub reply_to: Vec<Address>,
    /// `To:`
    pub to: Vec<Address>,
    /// `Cc:`
    pub cc: Vec<Address>,
    /// `Bcc:`
    pub bcc: Vec<Address>,
    /// `In-Reply-To:`
    pub in_reply_to: Option<String>,
    /// `Message-ID:`
    pub message_id: Option<String>,
}

/// An envelope address. Any part may be `NIL`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// Display name, undecoded.
    pub name: Option<String>,
    /// Obsolete source route.
    pub adl: Option<String>,
    /// Local part.
    pub mailbox: Option<String>,
    /// Domain.
    pub host: Option<String>,
}

/// Server data sent outside any command completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `OK`, `NO`, `BAD`, `PREAUTH` or `BYE`.
    Status(StatusResponse),
    /// `CAPABILITY`
    Capability(Vec<Capability>),
    /// `FLAGS`
    Flags(Vec<String>),
    /// `n EXISTS`
    Exists(u32),
    /// `n RECENT`
    Recent(u32),
    /// `n EXPUNGE`
    Expunge(SeqNum),
    /// `n FETCH (...)`
    Fetch {
        /// Sequence number of the message.
        seq: SeqNum,
        /// Items the server returned.
        items: Vec<FetchItem>,
    },
}
