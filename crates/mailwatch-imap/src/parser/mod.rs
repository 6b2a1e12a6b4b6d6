//! Sans-I/O parsing of server responses.
//!
//! [`Lexer`] splits a response into tokens and [`ResponseParser`] assembles
//! them into a [`Response`]. Input is one complete response as returned by
//! [`FramedStream`](crate::FramedStream), literals included.
//!
//! ```
//! use mailwatch_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* 12 EXISTS\r\n").unwrap();
//! assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(12)));
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{
    Address, Envelope, FetchItem, Response, ResponseParser, StatusResponse, UntaggedResponse,
};
