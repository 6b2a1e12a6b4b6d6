//! Streaming `FETCH` from the open mailbox.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use super::states::Selected;
use super::Client;
use crate::command::{Command, FetchAttribute};
use crate::connection::framed::is_completion_for;
use crate::parser::{Response, ResponseParser, StatusResponse, UntaggedResponse};
use crate::stream_fetch::FetchedMessage;
use crate::types::{Mailbox, MailboxStatus, SequenceSet, Status};
use crate::{Error, Result};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the open mailbox.
    #[must_use]
    pub const fn mailbox(&self) -> &Mailbox {
        self.state.mailbox()
    }

    /// Returns the status snapshot taken when the mailbox was opened.
    #[must_use]
    pub const fn status(&self) -> &MailboxStatus {
        self.state.status()
    }

    /// Fetches `attributes` for every message in `sequence`, handing each
    /// message to `sink` as soon as its FETCH response is parsed.
    ///
    /// Waits on the bounded channel when the consumer falls behind. The
    /// sender is dropped on return, so the receiver sees the end of the
    /// stream once this future completes.
    ///
    /// Returns the number of messages delivered.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, on a malformed FETCH response, on an untagged
    /// BYE, on a non-OK completion, and with [`Error::ConsumerClosed`] when
    /// the receiver is dropped mid-stream. Untagged responses of other kinds
    /// are skipped.
    pub async fn fetch_stream(
        &mut self,
        sequence: &SequenceSet,
        attributes: &[FetchAttribute],
        sink: mpsc::Sender<FetchedMessage>,
    ) -> Result<usize> {
        let tag = self.tag_gen.issue();
        let command = Command::Fetch {
            sequence: *sequence,
            attributes: attributes.to_vec(),
        };
        tracing::debug!(%tag, command = %command.redacted(), "sending IMAP command");
        self.stream.write_command(&command.serialize(&tag)).await?;

        let mut delivered = 0usize;
        loop {
            let raw = self.stream.read_response().await?;

            if is_completion_for(&raw, &tag) {
                return match ResponseParser::parse(&raw)? {
                    Response::Tagged { outcome, .. } => outcome.into_result().map(|()| delivered),
                    other => Err(Error::Protocol(format!(
                        "expected tagged FETCH completion, got {other:?}"
                    ))),
                };
            }

            match ResponseParser::parse(&raw) {
                Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) => {
                    sink.send(FetchedMessage::new(seq, items))
                        .await
                        .map_err(|_| Error::ConsumerClosed { delivered })?;
                    delivered += 1;
                }
                Ok(Response::Untagged(UntaggedResponse::Status(StatusResponse {
                    status: Status::Bye,
                    text,
                    ..
                }))) => return Err(Error::Bye(text)),
                Ok(other) => {
                    tracing::debug!(response = ?other, "ignoring response during FETCH");
                }
                Err(e) if ResponseParser::is_fetch_line(&raw) => return Err(e),
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        line = %String::from_utf8_lossy(&raw).trim_end(),
                        "skipping unrecognised response during FETCH"
                    );
                }
            }
        }
    }

    /// Sends `LOGOUT`, consuming the session.
    pub async fn logout(self) -> Result<()> {
        self.send_logout().await
    }
}
