//! # mailwatch-mime
//!
//! Decoding of RFC 2047 encoded words in email header values, such as the
//! subject and address display names an IMAP envelope carries verbatim.
//!
//! ## Features
//!
//! - **Encoded words**: `=?charset?B?...?=` and `=?charset?Q?...?=`
//! - **Charsets**: every label known to `encoding_rs` (UTF-8, ISO-8859-x,
//!   Windows code pages, KOI8, Shift JIS, GBK and more)
//! - **Header values**: mixed plain and encoded text, with whitespace between
//!   adjacent encoded words removed
//!
//! ## Quick Start
//!
//! ```
//! use mailwatch_mime::decode_header;
//!
//! let subject = decode_header("=?UTF-8?Q?Caf=C3=A9?= menu").unwrap();
//! assert_eq!(subject, "Café menu");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod encoding;
pub mod error;
pub mod header;

pub use error::{Error, Result};
pub use header::{decode_header, decode_word};
