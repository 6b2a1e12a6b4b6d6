//! Seen-message ledger.
//!
//! An append-only record of every message that has been announced. Lookups
//! go by [`IdentityKey`]; the key is deliberately not unique in storage, so a
//! lookup may return any number of rows.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::identity::{IdentityKey, format_stored_date};
use crate::model::{MessageRecord, PersistedRecord};
use crate::{Error, Result};

/// Storage for previously seen messages.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Returns every row whose key equals `key`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_by_key(&self, key: &IdentityKey) -> Result<Vec<PersistedRecord>>;

    /// Appends a row for `record` and returns it with its assigned id and
    /// creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn insert(&self, record: &MessageRecord) -> Result<PersistedRecord>;
}

/// [`Ledger`] backed by a `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Opens the ledger at `database_path`, creating the file and table if
    /// they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await?;

        let ledger = Self { pool };
        ledger.initialize().await?;
        Ok(ledger)
    }

    /// Creates an in-memory ledger for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        // A memory database lives as long as its connection, so keep exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let ledger = Self { pool };
        ledger.initialize().await?;
        Ok(ledger)
    }

    /// Creates the table and lookup index when missing. Never alters an
    /// existing table.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS seen_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id TEXT NOT NULL,
                subject TEXT NOT NULL,
                from_addresses TEXT NOT NULL,
                internal_date TEXT NOT NULL,
                create_time TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_seen_messages_key
            ON seen_messages(message_id, internal_date)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the number of rows in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM seen_messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Ledger for SqliteLedger {
    async fn find_by_key(&self, key: &IdentityKey) -> Result<Vec<PersistedRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, message_id, subject, from_addresses, internal_date, create_time
            FROM seen_messages
            WHERE message_id = ? AND internal_date = ?
            ",
        )
        .bind(key.message_id())
        .bind(key.internal_date_text())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn insert(&self, record: &MessageRecord) -> Result<PersistedRecord> {
        let internal_date = format_stored_date(&record.internal_date);
        let from_addresses = record.from_addresses();

        let row = sqlx::query(
            r"
            INSERT INTO seen_messages (message_id, subject, from_addresses, internal_date)
            VALUES (?, ?, ?, ?)
            RETURNING id, create_time
            ",
        )
        .bind(&record.message_id)
        .bind(&record.subject)
        .bind(&from_addresses)
        .bind(&internal_date)
        .fetch_one(&self.pool)
        .await?;

        let create_time: String = row.try_get("create_time")?;

        Ok(PersistedRecord {
            id: row.try_get("id")?,
            message_id: record.message_id.clone(),
            subject: record.subject.clone(),
            from_addresses,
            internal_date: record.internal_date,
            create_time: parse_create_time(&create_time)?,
        })
    }
}

fn record_from_row(row: &SqliteRow) -> Result<PersistedRecord> {
    let internal_date: String = row.try_get("internal_date")?;
    let create_time: String = row.try_get("create_time")?;

    Ok(PersistedRecord {
        id: row.try_get("id")?,
        message_id: row.try_get("message_id")?,
        subject: row.try_get("subject")?,
        from_addresses: row.try_get("from_addresses")?,
        internal_date: DateTime::parse_from_rfc3339(&internal_date).map_err(|source| {
            Error::InvalidDate {
                value: internal_date.clone(),
                source,
            }
        })?,
        create_time: parse_create_time(&create_time)?,
    })
}

fn parse_create_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| Error::InvalidDate {
            value: value.to_string(),
            source,
        })
}
