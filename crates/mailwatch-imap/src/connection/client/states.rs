//! Session states carried by [`Client`](super::Client).

use crate::types::{Mailbox, MailboxStatus};

/// Greeting received, no credentials sent yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in, no mailbox open.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// A mailbox is open read-only.
#[derive(Debug, Clone)]
pub struct Selected {
    mailbox: Mailbox,
    status: MailboxStatus,
}

impl Selected {
    /// Records the mailbox opened and what the server said about it.
    #[must_use]
    pub const fn new(mailbox: Mailbox, status: MailboxStatus) -> Self {
        Self { mailbox, status }
    }

    /// The open mailbox.
    #[must_use]
    pub const fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Counters and codes from `EXAMINE`.
    #[must_use]
    pub const fn status(&self) -> &MailboxStatus {
        &self.status
    }
}
