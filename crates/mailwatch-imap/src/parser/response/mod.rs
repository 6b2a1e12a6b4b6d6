//! Turns one complete server line into a [`Response`].

#![allow(clippy::missing_errors_doc)]

mod fetch;
mod helpers;
mod types;

pub use types::{Address, Envelope, FetchItem, StatusResponse, UntaggedResponse};

use crate::Result;
use crate::parser::lexer::{Lexer, Token};
use crate::types::{SeqNum, Status, Tag};

use helpers::{
    parse_capability_data, parse_error, parse_flag_list, parse_response_code, rest_of_line,
};

/// A parsed server line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Completion of the command carrying `tag`.
    Tagged {
        /// Tag of the completed command.
        tag: Tag,
        /// How it completed.
        outcome: StatusResponse,
    },
    /// Server data.
    Untagged(UntaggedResponse),
    /// `+` continuation request.
    Continuation {
        /// Text after the `+`, if any.
        text: Option<String>,
    },
}

/// Stateless response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one line, CRLF and any literals included.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);
        match lexer.next_token()? {
            Token::Asterisk => Self::untagged(&mut lexer).map(Response::Untagged),
            Token::Plus => Ok(Self::continuation(&mut lexer)),
            Token::Atom(tag) => Self::tagged(&mut lexer, tag),
            other => Err(parse_error(
                &lexer,
                format!("expected *, + or a tag, found {other:?}"),
            )),
        }
    }

    /// Returns true if the raw line starts like `* n FETCH`.
    ///
    /// A malformed FETCH line is fatal to a read, while an untagged
    /// response this parser does not model can be ignored.
    #[must_use]
    pub fn is_fetch_line(input: &[u8]) -> bool {
        let mut lexer = Lexer::new(input);
        matches!(lexer.next_token(), Ok(Token::Asterisk))
            && matches!(lexer.next_token(), Ok(Token::Space))
            && matches!(lexer.next_token(), Ok(Token::Number(_)))
            && matches!(lexer.next_token(), Ok(Token::Space))
            && matches!(lexer.next_token(), Ok(Token::Atom(kw)) if kw.eq_ignore_ascii_case("FETCH"))
    }

    fn tagged(lexer: &mut Lexer<'_>, tag: &str) -> Result<Response> {
        lexer.expect_space()?;
        let keyword = lexer.read_atom_string()?;
        let status = Status::from_keyword(keyword)
            .ok_or_else(|| parse_error(lexer, format!("invalid status {keyword}")))?;

        Ok(Response::Tagged {
            tag: Tag::new(tag),
            outcome: Self::status_response(lexer, status)?,
        })
    }

    fn untagged(lexer: &mut Lexer<'_>) -> Result<UntaggedResponse> {
        lexer.expect_space()?;
        match lexer.next_token()? {
            Token::Atom(keyword) => Self::server_data(lexer, keyword),
            Token::Number(n) => Self::message_data(lexer, n),
            other => Err(parse_error(lexer, format!("unexpected {other:?} after *"))),
        }
    }

    fn server_data(lexer: &mut Lexer<'_>, keyword: &str) -> Result<UntaggedResponse> {
        if let Some(status) = Status::from_keyword(keyword) {
            return Self::status_response(lexer, status).map(UntaggedResponse::Status);
        }

        match keyword.to_ascii_uppercase().as_str() {
            "CAPABILITY" => Ok(UntaggedResponse::Capability(parse_capability_data(
                lexer,
            )?)),
            "FLAGS" => {
                lexer.expect_space()?;
                Ok(UntaggedResponse::Flags(parse_flag_list(lexer)?))
            }
            _ => Err(parse_error(
                lexer,
                format!("unknown untagged response {keyword}"),
            )),
        }
    }

    fn message_data(lexer: &mut Lexer<'_>, n: u32) -> Result<UntaggedResponse> {
        lexer.expect_space()?;
        let keyword = lexer.read_atom_string()?;

        match keyword.to_ascii_uppercase().as_str() {
            "EXISTS" => Ok(UntaggedResponse::Exists(n)),
            "RECENT" => Ok(UntaggedResponse::Recent(n)),
            "EXPUNGE" => Self::seq_num(lexer, n).map(UntaggedResponse::Expunge),
            "FETCH" => {
                let seq = Self::seq_num(lexer, n)?;
                lexer.expect_space()?;
                let items = fetch::parse_fetch_items(lexer)?;
                Ok(UntaggedResponse::Fetch { seq, items })
            }
            _ => Err(parse_error(lexer, format!("unknown message data {keyword}"))),
        }
    }

    fn seq_num(lexer: &Lexer<'_>, n: u32) -> Result<SeqNum> {
        SeqNum::new(n).ok_or_else(|| parse_error(lexer, "sequence number 0"))
    }

    fn continuation(lexer: &mut Lexer<'_>) -> Response {
        if lexer.peek() == Some(b' ') {
            lexer.skip(1);
        }
        let text = rest_of_line(lexer);
        Response::Continuation {
            text: (!text.is_empty()).then_some(text),
        }
    }

    /// Parses `[code] text` after a status keyword. Both parts are optional;
    /// some servers send a bare `A1 OK`.
    fn status_response(lexer: &mut Lexer<'_>, status: Status) -> Result<StatusResponse> {
        if lexer.peek() == Some(b' ') {
            lexer.skip(1);
        }
        let code = match lexer.peek() {
            Some(b'[') => Some(parse_response_code(lexer)?),
            _ => None,
        };
        if lexer.peek() == Some(b' ') {
            lexer.skip(1);
        }

        Ok(StatusResponse {
            status,
            code,
            text: rest_of_line(lexer),
        })
    }
}
