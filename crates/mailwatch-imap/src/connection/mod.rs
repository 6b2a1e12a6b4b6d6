//! Connecting to a server and driving the session.

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authenticated, Client, NotAuthenticated, Selected};
pub use config::{Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
pub use framed::{FramedStream, is_completion_for};
pub use stream::{ImapStream, connect_tls, tls_connector};
