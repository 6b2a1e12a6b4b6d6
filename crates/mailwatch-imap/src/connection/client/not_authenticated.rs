//! Greeting and `LOGIN`.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::config::Config;
use crate::connection::framed::FramedStream;
use crate::connection::stream::{ImapStream, connect_tls};
use crate::parser::{Response, ResponseParser, StatusResponse, UntaggedResponse};
use crate::types::{ResponseCode, Status};
use crate::{Error, Result};

impl Client<ImapStream, NotAuthenticated> {
    /// Connects over implicit TLS and reads the server greeting.
    ///
    /// TCP connect, TLS handshake and greeting share one deadline of
    /// `config.connect_timeout`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let deadline = config.connect_timeout;
        tracing::debug!(host = %config.host, port = config.port, "connecting to IMAP server");

        tokio::time::timeout(deadline, async {
            let stream = connect_tls(&config.host, config.port).await?;
            Self::from_stream(stream).await
        })
        .await
        .map_err(|_| Error::Timeout(deadline))?
    }
}

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Starts a session on an already connected `stream` by reading the
    /// greeting. Capabilities in a `[CAPABILITY ...]` greeting code are kept.
    ///
    /// A `BYE` greeting becomes [`Error::Bye`].
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut stream = FramedStream::new(stream);
        let greeting = ResponseParser::parse(&stream.read_response().await?)?;

        let capabilities = match greeting {
            Response::Untagged(UntaggedResponse::Status(StatusResponse {
                status: Status::Ok | Status::PreAuth,
                code,
                ..
            })) => match code {
                Some(ResponseCode::Capability(list)) => list,
                _ => Vec::new(),
            },
            Response::Untagged(UntaggedResponse::Status(StatusResponse {
                status: Status::Bye,
                text,
                ..
            })) => return Err(Error::Bye(text)),
            other => return Err(Error::Protocol(format!("unexpected greeting: {other:?}"))),
        };

        Ok(Self {
            stream,
            tag_gen: TagGenerator::default(),
            capabilities,
            state: NotAuthenticated,
        })
    }

    /// Logs in with a plaintext `LOGIN`.
    ///
    /// Without capabilities from the greeting, `CAPABILITY` is sent first.
    /// Credentials are never sent to a server announcing `LOGINDISABLED`.
    /// A `NO` or `BAD` reply becomes [`Error::Auth`].
    pub async fn login(mut self, user: &str, password: &str) -> Result<Client<S, Authenticated>> {
        if self.capabilities.is_empty() {
            self.capability().await?;
        }
        if self.login_disabled() {
            return Err(Error::Auth("server advertises LOGINDISABLED".to_string()));
        }

        let login = Command::Login {
            username: user.to_owned(),
            password: password.to_owned(),
        };
        let lines = self.run_command(&login).await.map_err(|e| match e {
            Error::No(text) | Error::Bad(text) => Error::Auth(text),
            other => other,
        })?;
        self.absorb_capabilities(&lines);

        tracing::debug!(user, "IMAP login accepted");
        Ok(self.into_state(Authenticated))
    }

    /// Ends the session before logging in.
    pub async fn logout(self) -> Result<()> {
        self.send_logout().await
    }
}
