//! Message identity used for deduplication.
//!
//! A message is identified by its Message-ID together with the server's
//! receipt time. Message-IDs alone are not reliably unique, and the pair is
//! stable across runs because the internal date never changes.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::model::MessageRecord;

/// The `(message_id, internal_date)` pair looked up in the ledger.
///
/// Equality is exact: the same instant reported with a different UTC offset
/// is a different key.
#[derive(Debug, Clone)]
pub struct IdentityKey {
    message_id: String,
    internal_date: DateTime<FixedOffset>,
}

impl IdentityKey {
    /// Derives the key for a message, or `None` when it has no Message-ID.
    #[must_use]
    pub fn resolve(record: &MessageRecord) -> Option<Self> {
        if record.message_id.is_empty() {
            return None;
        }
        Some(Self {
            message_id: record.message_id.clone(),
            internal_date: record.internal_date,
        })
    }

    /// Returns the Message-ID part.
    #[must_use]
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Returns the internal date part.
    #[must_use]
    pub const fn internal_date(&self) -> DateTime<FixedOffset> {
        self.internal_date
    }

    /// Returns the internal date in the form the ledger stores it.
    #[must_use]
    pub fn internal_date_text(&self) -> String {
        format_stored_date(&self.internal_date)
    }
}

impl PartialEq for IdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.message_id == other.message_id
            && self.internal_date == other.internal_date
            && self.internal_date.offset() == other.internal_date.offset()
    }
}

impl Eq for IdentityKey {}

/// Renders a timestamp as RFC 3339, keeping its offset.
#[must_use]
pub fn format_stored_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
