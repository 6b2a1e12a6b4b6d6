//! Message data models.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

/// Separator between senders in the persisted `from_addresses` column.
pub const SENDER_SEPARATOR: &str = ", ";

/// Metadata of one message as fetched from the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Message-ID header, empty when the envelope had none.
    pub message_id: String,
    /// Subject header as sent, possibly RFC 2047 encoded.
    pub subject: String,
    /// Senders rendered as `name <mailbox@host>`, in envelope order.
    pub senders: Vec<String>,
    /// Server receipt time with the offset the server reported.
    pub internal_date: DateTime<FixedOffset>,
}

impl MessageRecord {
    /// Creates a message record.
    #[must_use]
    pub fn new(
        message_id: impl Into<String>,
        subject: impl Into<String>,
        senders: Vec<String>,
        internal_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            subject: subject.into(),
            senders,
            internal_date,
        }
    }

    /// Returns the senders joined into a single display string.
    #[must_use]
    pub fn from_addresses(&self) -> String {
        self.senders.join(SENDER_SEPARATOR)
    }
}

impl fmt::Display for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message-ID: {} Subject: {} Time: {} From: {}",
            self.message_id,
            self.subject,
            self.internal_date,
            self.from_addresses()
        )
    }
}

/// A row of the seen-message ledger.
///
/// Rows are never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecord {
    /// Row identifier assigned by the ledger.
    pub id: i64,
    /// Message-ID header.
    pub message_id: String,
    /// Raw subject header.
    pub subject: String,
    /// Senders joined with `", "`.
    pub from_addresses: String,
    /// Server receipt time.
    pub internal_date: DateTime<FixedOffset>,
    /// When the row was written.
    pub create_time: DateTime<Utc>,
}

impl fmt::Display for PersistedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} Message-ID: {} Subject: {} Time: {} From: {} Create Time: {}",
            self.id,
            self.message_id,
            self.subject,
            self.internal_date,
            self.from_addresses,
            self.create_time
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-02-01T10:00:00+01:00").unwrap()
    }

    #[test]
    fn test_from_addresses_joins_in_order() {
        let record = MessageRecord::new(
            "<a@example.com>",
            "Hi",
            vec![
                "Alice <alice@example.com>".to_string(),
                " <bob@example.com>".to_string(),
            ],
            date(),
        );
        assert_eq!(
            record.from_addresses(),
            "Alice <alice@example.com>,  <bob@example.com>"
        );
    }

    #[test]
    fn test_message_record_display() {
        let record = MessageRecord::new(
            "<a@example.com>",
            "Hi",
            vec!["Alice <alice@example.com>".to_string()],
            date(),
        );
        assert_eq!(
            record.to_string(),
            "Message-ID: <a@example.com> Subject: Hi Time: 2024-02-01 10:00:00 +01:00 \
             From: Alice <alice@example.com>"
        );
    }

    #[test]
    fn test_persisted_record_display() {
        let record = PersistedRecord {
            id: 7,
            message_id: "<a@example.com>".to_string(),
            subject: "Hi".to_string(),
            from_addresses: "A <a@x>, B <b@y>".to_string(),
            internal_date: date(),
            create_time: DateTime::parse_from_rfc3339("2024-02-02T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        assert!(record.to_string().starts_with("ID: 7 Message-ID: <a@example.com> "));
        assert!(record.to_string().ends_with("Create Time: 2024-02-02 00:00:00 UTC"));
    }
}
