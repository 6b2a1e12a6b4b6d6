//! Opening a mailbox with `EXAMINE`.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::Command;
use crate::parser::{Response, ResponseParser, StatusResponse, UntaggedResponse};
use crate::types::{Mailbox, MailboxStatus, ResponseCode, Status};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Opens a mailbox read-only with EXAMINE.
    ///
    /// Consumes self and returns a client in the selected state together with
    /// the mailbox status the server reported.
    pub async fn examine(
        mut self,
        mailbox: impl Into<Mailbox>,
    ) -> Result<(Client<S, Selected>, MailboxStatus)> {
        let mailbox = mailbox.into();
        let responses = self
            .run_command(&Command::Examine {
                mailbox: mailbox.clone(),
            })
            .await?;

        let status = parse_mailbox_status(&responses);
        tracing::debug!(
            mailbox = %mailbox,
            exists = status.exists,
            recent = status.recent,
            "mailbox opened read-only"
        );

        let client = self.into_state(Selected::new(mailbox, status.clone()));
        Ok((client, status))
    }

    /// Sends `LOGOUT`, consuming the session.
    pub async fn logout(self) -> Result<()> {
        self.send_logout().await
    }
}

/// Collects mailbox counters and codes from EXAMINE responses.
pub(crate) fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for response_bytes in responses {
        let Ok(response) = ResponseParser::parse(response_bytes) else {
            continue;
        };
        let code = match response {
            Response::Untagged(UntaggedResponse::Exists(n)) => {
                status.exists = n;
                None
            }
            Response::Untagged(UntaggedResponse::Recent(n)) => {
                status.recent = n;
                None
            }
            Response::Untagged(UntaggedResponse::Status(StatusResponse {
                status: Status::Ok,
                code,
                ..
            }))
            | Response::Tagged {
                outcome: StatusResponse { code, .. },
                ..
            } => code,
            _ => None,
        };

        match code {
            Some(ResponseCode::UidNext(n)) => status.uid_next = Some(n),
            Some(ResponseCode::UidValidity(n)) => status.uid_validity = Some(n),
            Some(ResponseCode::ReadOnly) => status.read_only = true,
            _ => {}
        }
    }

    status
}
