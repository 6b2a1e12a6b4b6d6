//! Mailbox reader.
//!
//! Opens a folder read-only, streams `ENVELOPE` and `INTERNALDATE` for every
//! message in it and turns each FETCH response into a [`MessageRecord`].

use chrono::{DateTime, FixedOffset};
use mailwatch_imap::connection::{Authenticated, Client, Selected};
use mailwatch_imap::parser::Address;
use mailwatch_imap::{FetchAttribute, FetchedMessage, SequenceSet};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::model::MessageRecord;
use crate::{Error, Result};

/// Channel capacity between the FETCH producer and the record consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Format of the IMAP `date-time` production.
const INTERNAL_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// The only items ever fetched: no bodies, no flag changes.
const METADATA: [FetchAttribute; 2] = [FetchAttribute::Envelope, FetchAttribute::InternalDate];

/// An authenticated mailbox session.
#[allow(async_fn_in_trait)]
pub trait MailboxSession {
    /// Opens `mailbox` read-only and returns how many messages it holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox cannot be opened.
    async fn examine(&mut self, mailbox: &str) -> Result<u32>;

    /// Fetches message metadata for `sequence` in the open mailbox, sending
    /// each message to `sink` as it arrives. Returns how many were sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails at any point.
    async fn fetch_metadata(
        &mut self,
        sequence: &SequenceSet,
        sink: mpsc::Sender<FetchedMessage>,
    ) -> Result<usize>;

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns an error if LOGOUT could not be sent.
    async fn logout(self) -> Result<()>;
}

/// [`MailboxSession`] over a type-state IMAP client.
#[derive(Debug)]
pub enum ImapSession<S> {
    /// Logged in, no mailbox open.
    Authenticated(Client<S, Authenticated>),
    /// A mailbox is open read-only.
    Selected(Client<S, Selected>),
    /// The client was consumed by a failed state transition.
    Closed,
}

impl<S> From<Client<S, Authenticated>> for ImapSession<S> {
    fn from(client: Client<S, Authenticated>) -> Self {
        Self::Authenticated(client)
    }
}

impl<S> MailboxSession for ImapSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn examine(&mut self, mailbox: &str) -> Result<u32> {
        let client = match std::mem::replace(self, Self::Closed) {
            Self::Authenticated(client) => client,
            other => {
                *self = other;
                return Err(Error::Session(
                    "EXAMINE needs a logged-in session with no open mailbox".to_string(),
                ));
            }
        };

        let (selected, status) = client.examine(mailbox).await?;
        *self = Self::Selected(selected);
        Ok(status.exists)
    }

    async fn fetch_metadata(
        &mut self,
        sequence: &SequenceSet,
        sink: mpsc::Sender<FetchedMessage>,
    ) -> Result<usize> {
        let Self::Selected(client) = self else {
            return Err(Error::Session("no mailbox is open".to_string()));
        };
        Ok(client.fetch_stream(sequence, &METADATA, sink).await?)
    }

    async fn logout(self) -> Result<()> {
        match self {
            Self::Authenticated(client) => client.logout().await?,
            Self::Selected(client) => client.logout().await?,
            Self::Closed => {}
        }
        Ok(())
    }
}

/// Reads every message in `mailbox` and always logs out afterwards.
///
/// A logout failure is logged and does not affect the result.
///
/// # Errors
///
/// Returns an error if the mailbox cannot be opened or the fetch fails; no
/// records are returned in that case.
pub async fn fetch_messages<M: MailboxSession>(
    mut session: M,
    mailbox: &str,
    capacity: usize,
) -> Result<Vec<MessageRecord>> {
    let result = read_mailbox(&mut session, mailbox, capacity).await;

    tracing::debug!("logging out");
    match session.logout().await {
        Ok(()) => tracing::debug!("logged out"),
        Err(e) => tracing::warn!(error = %e, "error closing mailbox session"),
    }

    result
}

/// Reads every message in `mailbox` in ascending sequence order.
///
/// The FETCH producer and the record consumer run concurrently over a
/// bounded channel. The producer's result is checked only after the channel
/// is drained, and any failure discards what was already received.
///
/// # Errors
///
/// Returns an error if the mailbox cannot be opened, the fetch fails, or a
/// FETCH response has only one of its envelope and internal date.
pub async fn read_mailbox<M: MailboxSession>(
    session: &mut M,
    mailbox: &str,
    capacity: usize,
) -> Result<Vec<MessageRecord>> {
    let exists = session.examine(mailbox).await?;
    tracing::debug!(mailbox, messages = exists, "mailbox opened");

    let Some(sequence) = SequenceSet::range(1, exists) else {
        return Ok(Vec::new());
    };

    let (tx, mut rx) = mpsc::channel::<FetchedMessage>(capacity.max(1));
    let consumer = async move {
        let mut records = Vec::new();
        while let Some(fetched) = rx.recv().await {
            if let Some(record) = record_from_fetched(&fetched)? {
                records.push(record);
            }
        }
        Ok::<_, Error>(records)
    };

    let (produced, consumed) = tokio::join!(session.fetch_metadata(&sequence, tx), consumer);
    let records = consumed?;
    let delivered = produced?;
    tracing::debug!(delivered, "fetch complete");

    Ok(records)
}

/// Builds a record from a FETCH response.
///
/// Returns `None` for a response carrying neither the envelope nor the
/// internal date, such as a flag update pushed by the server mid-fetch.
///
/// # Errors
///
/// Returns an error if only one of the envelope and internal date is
/// present, or the internal date does not parse.
pub fn record_from_fetched(fetched: &FetchedMessage) -> Result<Option<MessageRecord>> {
    let seq = fetched.seq.get();
    if fetched.is_unsolicited() {
        tracing::debug!(
            seq,
            uid = ?fetched.uid(),
            flags = ?fetched.flags(),
            "skipping FETCH response without message metadata"
        );
        return Ok(None);
    }

    let envelope = fetched.envelope().ok_or(Error::IncompleteFetch {
        seq,
        item: "ENVELOPE",
    })?;
    let internal_date = fetched.internal_date().ok_or(Error::IncompleteFetch {
        seq,
        item: "INTERNALDATE",
    })?;

    Ok(Some(MessageRecord {
        message_id: envelope.message_id.clone().unwrap_or_default(),
        subject: envelope.subject.clone().unwrap_or_default(),
        senders: envelope.from.iter().map(format_sender).collect(),
        internal_date: parse_internal_date(internal_date)?,
    }))
}

/// Renders an envelope address as `name <mailbox@host>`.
///
/// Missing parts become empty strings, so a bare address renders as
/// ` <mailbox@host>`.
#[must_use]
pub fn format_sender(address: &Address) -> String {
    format!(
        "{} <{}@{}>",
        address.name.as_deref().unwrap_or_default(),
        address.mailbox.as_deref().unwrap_or_default(),
        address.host.as_deref().unwrap_or_default()
    )
}

/// Parses an IMAP internal date such as `17-Jul-1996 02:44:25 -0700`.
///
/// The day may be space padded.
///
/// # Errors
///
/// Returns an error if the text is not a valid IMAP `date-time`.
pub fn parse_internal_date(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value.trim(), INTERNAL_DATE_FORMAT).map_err(|source| {
        Error::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}
