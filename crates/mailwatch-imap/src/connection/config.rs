//! Where to connect and how long to wait.

use std::time::Duration;

/// Port for IMAP over implicit TLS.
pub const DEFAULT_PORT: u16 = 993;

/// Bound on TCP connect, TLS handshake and greeting together.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings. TLS is always on from the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host name, also used for certificate verification.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Deadline for reaching the greeting.
    pub connect_timeout: Duration,
}

impl Config {
    /// Settings for `host` with [`DEFAULT_PORT`] and
    /// [`DEFAULT_CONNECT_TIMEOUT`].
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Replaces the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the connect deadline.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
