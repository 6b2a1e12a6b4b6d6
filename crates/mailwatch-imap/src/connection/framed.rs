//! Line framing for server responses.
//!
//! A response is one CRLF-terminated line, extended by the payload of any
//! `{n}` literal it ends with and by the line that follows that payload.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

const BUFFER_SIZE: usize = 8 * 1024;

/// Longest single line accepted.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Largest literal accepted. Envelope fields are far smaller.
const MAX_LITERAL_SIZE: usize = 16 * 1024 * 1024;

/// A buffered connection that reads whole responses and writes commands.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    outgoing: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps `stream`.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, stream),
            outgoing: BytesMut::with_capacity(BUFFER_SIZE),
        }
    }

    /// Reads one response with its literals inlined.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        loop {
            let line = self.read_line().await?;
            let literal = literal_length(&line);
            response.extend_from_slice(&line);

            let Some(size) = literal else {
                return Ok(response);
            };
            if size > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {size} bytes, limit {MAX_LITERAL_SIZE}"
                )));
            }
            let start = response.len();
            response.resize(start + size, 0);
            self.reader.read_exact(&mut response[start..]).await?;
        }
    }

    /// Reads responses until the completion tagged `tag`, which is the last
    /// element of the result.
    pub async fn read_until_tagged(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut responses = Vec::new();
        loop {
            let response = self.read_response().await?;
            let done = is_completion_for(&response, tag);
            responses.push(response);
            if done {
                return Ok(responses);
            }
        }
    }

    /// Reads up to and including the next CRLF. A bare LF does not end a line.
    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        while !line.ends_with(b"\r\n") {
            let room = (MAX_LINE_LENGTH + 1).saturating_sub(line.len());
            if room == 0 {
                return Err(Error::Protocol("line too long".to_string()));
            }
            let limit = u64::try_from(room).unwrap_or(u64::MAX);
            let read = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut line)
                .await?;
            if read == 0 {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "server closed the connection",
                )));
            }
        }
        Ok(line)
    }

    /// Writes and flushes one serialized command.
    pub async fn write_command(&mut self, command: &[u8]) -> Result<()> {
        self.outgoing.clear();
        self.outgoing.extend_from_slice(command);

        let stream = self.reader.get_mut();
        stream.write_all(&self.outgoing).await?;
        stream.flush().await?;
        Ok(())
    }
}

/// Returns true if `response` is the tagged completion for `tag`.
#[must_use]
pub fn is_completion_for(response: &[u8], tag: &str) -> bool {
    response
        .strip_prefix(tag.as_bytes())
        .is_some_and(|rest| rest.starts_with(b" "))
}

/// Size of the literal announced at the end of `line`, as `{n}` or the
/// non-synchronizing `{n+}`.
fn literal_length(line: &[u8]) -> Option<usize> {
    let head = line.strip_suffix(b"}\r\n")?;
    let head = head.strip_suffix(b"+").unwrap_or(head);
    let open = head.iter().rposition(|b| !b.is_ascii_digit())?;
    let digits = &head[open + 1..];
    if head[open] != b'{' || digits.is_empty() {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}
