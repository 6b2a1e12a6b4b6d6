//! The IMAP session as a type-state machine.
//!
//! A [`Client`] starts [`NotAuthenticated`], becomes [`Authenticated`] after
//! `LOGIN` and [`Selected`] after `EXAMINE`. Each transition consumes the
//! previous client, so a command can only be issued in a state where the
//! server accepts it.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use tokio::io::{AsyncRead, AsyncWrite};

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::FramedStream;
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, StatusResponse, UntaggedResponse};
use crate::types::Capability;
use crate::{Error, Result};

/// An IMAP connection in state `State`.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) state: State,
}

impl<S, State: std::fmt::Debug> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities last announced by the server.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns true if the server announced `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Returns true if the server refuses plaintext `LOGIN`.
    #[must_use]
    pub fn login_disabled(&self) -> bool {
        self.has_capability(&Capability::LoginDisabled)
    }

    /// Asks the server for its capabilities and remembers the answer.
    pub async fn capability(&mut self) -> Result<Vec<Capability>> {
        let lines = self.run_command(&Command::Capability).await?;
        self.absorb_capabilities(&lines);
        Ok(self.capabilities.clone())
    }

    /// Sends `command` and returns every line up to and including its
    /// completion, failing unless the completion is `OK`.
    pub(crate) async fn run_command(&mut self, command: &Command) -> Result<Vec<Vec<u8>>> {
        let tag = self.tag_gen.issue();
        tracing::debug!(%tag, command = %command.redacted(), "sending IMAP command");

        self.stream.write_command(&command.serialize(&tag)).await?;
        let lines = self.stream.read_until_tagged(&tag).await?;
        completion(&lines, &tag)?.into_result()?;
        Ok(lines)
    }

    /// Keeps the last untagged `CAPABILITY` list found in `lines`.
    pub(crate) fn absorb_capabilities(&mut self, lines: &[Vec<u8>]) {
        let announced = lines.iter().filter_map(|line| match ResponseParser::parse(line) {
            Ok(Response::Untagged(UntaggedResponse::Capability(list))) => Some(list),
            _ => None,
        });
        if let Some(list) = announced.last() {
            self.capabilities = list;
        }
    }

    pub(crate) fn into_state<Next>(self, state: Next) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            state,
        }
    }

    /// Sends `LOGOUT` and drains the reply.
    ///
    /// Servers often hang up straight after `BYE`, so only a failure to
    /// write the command is reported.
    pub(crate) async fn send_logout(mut self) -> Result<()> {
        let tag = self.tag_gen.issue();
        tracing::debug!(%tag, "sending IMAP command LOGOUT");
        self.stream
            .write_command(&Command::Logout.serialize(&tag))
            .await?;

        if let Err(e) = self.stream.read_until_tagged(&tag).await {
            tracing::debug!(error = %e, "connection ended before LOGOUT completed");
        }
        Ok(())
    }
}

/// Finds the completion for `tag` among `lines`, searching from the end.
pub(crate) fn completion(lines: &[Vec<u8>], tag: &str) -> Result<StatusResponse> {
    lines
        .iter()
        .rev()
        .find_map(|line| match ResponseParser::parse(line) {
            Ok(Response::Tagged { tag: found, outcome }) if found.as_str() == tag => Some(outcome),
            _ => None,
        })
        .ok_or_else(|| Error::Protocol(format!("no tagged completion for {tag}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ResponseCode, Status};

    fn lines(raw: &[&[u8]]) -> Vec<Vec<u8>> {
        raw.iter().map(|line| line.to_vec()).collect()
    }

    #[test]
    fn test_completion_is_found_after_data() {
        let found = completion(
            &lines(&[b"* 1 EXISTS\r\n", b"A0001 OK [READ-ONLY] done\r\n"]),
            "A0001",
        )
        .unwrap();

        assert_eq!(found.status, Status::Ok);
        assert_eq!(found.code, Some(ResponseCode::ReadOnly));
    }

    #[test]
    fn test_failed_completion_becomes_error() {
        let no = completion(
            &lines(&[b"A0002 NO [NONEXISTENT] no such mailbox\r\n"]),
            "A0002",
        )
        .unwrap();
        assert!(matches!(no.into_result(), Err(Error::No(t)) if t == "no such mailbox"));
    }

    #[test]
    fn test_completion_for_other_tag_is_missing() {
        let result = completion(
            &lines(&[b"* OK still going\r\n", b"A0009 OK done\r\n"]),
            "A0001",
        );
        assert!(matches!(result, Err(Error::Protocol(_))));
    }
}
