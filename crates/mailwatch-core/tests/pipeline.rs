//! End-to-end tests of the decision loop against an in-memory ledger.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::DateTime;
use mailwatch_core::{
    Error, IdentityKey, Ledger, MessageRecord, Notifier, NotificationSink, Outcome,
    PersistedRecord, Result, RunReport, SqliteLedger, WriterSink, process, process_one,
};

/// Wraps a ledger, counts calls and can fail the n-th lookup or insert.
struct CountingLedger {
    inner: SqliteLedger,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
    fail_lookup: Option<usize>,
    fail_insert: Option<usize>,
}

impl CountingLedger {
    async fn new() -> Self {
        Self {
            inner: SqliteLedger::in_memory().await.unwrap(),
            lookups: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            fail_lookup: None,
            fail_insert: None,
        }
    }

    /// Fails the `n`-th lookup (1-based).
    async fn failing_lookup(n: usize) -> Self {
        Self {
            fail_lookup: Some(n),
            ..Self::new().await
        }
    }

    /// Fails the `n`-th insert (1-based).
    async fn failing_insert(n: usize) -> Self {
        Self {
            fail_insert: Some(n),
            ..Self::new().await
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl Ledger for CountingLedger {
    async fn find_by_key(&self, key: &IdentityKey) -> Result<Vec<PersistedRecord>> {
        let n = self.lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_lookup == Some(n) {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        self.inner.find_by_key(key).await
    }

    async fn insert(&self, record: &MessageRecord) -> Result<PersistedRecord> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_insert == Some(n) {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        self.inner.insert(record).await
    }
}

struct BrokenSink;

impl NotificationSink for BrokenSink {
    fn emit(&mut self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }
}

fn message(id: &str, subject: &str, senders: &[&str]) -> MessageRecord {
    MessageRecord::new(
        id,
        subject,
        senders.iter().map(ToString::to_string).collect(),
        DateTime::parse_from_rfc3339("2024-05-01T12:30:00+02:00").unwrap(),
    )
}

fn output(notifier: Notifier<WriterSink<Vec<u8>>>) -> String {
    String::from_utf8(notifier.into_sink().into_inner()).unwrap()
}

#[tokio::test]
async fn test_new_message_is_recorded_and_announced() {
    let ledger = CountingLedger::new().await;
    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let msg = message("<abc@mail>", "=?UTF-8?Q?Hi?=", &["Alice <alice@example.com>"]);

    let outcome = process_one(&ledger, &mut notifier, &msg).await.unwrap();

    let Outcome::New(inserted) = outcome else {
        panic!("expected a new message, got {outcome:?}");
    };
    assert_eq!(inserted.message_id, "<abc@mail>");
    assert_eq!(inserted.subject, "=?UTF-8?Q?Hi?=");
    assert_eq!(inserted.from_addresses, "Alice <alice@example.com>");
    assert_eq!(ledger.inserts(), 1);
    assert_eq!(
        output(notifier),
        "----------\n\nSubject: Hi\nFrom: Alice <alice@example.com>\n\n"
    );
}

#[tokio::test]
async fn test_seen_before_is_skipped() {
    let ledger = CountingLedger::new().await;
    let msg = message("<b@example.com>", "Hello", &["Bob <bob@example.com>"]);
    ledger.inner.insert(&msg).await.unwrap();

    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let outcome = process_one(&ledger, &mut notifier, &msg).await.unwrap();

    assert!(matches!(outcome, Outcome::SeenBefore(row) if row.message_id == "<b@example.com>"));
    assert_eq!(ledger.inserts(), 0);
    assert_eq!(output(notifier), "");
}

#[tokio::test]
async fn test_ambiguous_match_is_skipped() {
    let ledger = CountingLedger::new().await;
    let msg = message("<c@example.com>", "Hello", &[]);
    ledger.inner.insert(&msg).await.unwrap();
    ledger.inner.insert(&msg).await.unwrap();

    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let outcome = process_one(&ledger, &mut notifier, &msg).await.unwrap();

    assert_eq!(outcome, Outcome::Ambiguous(2));
    assert_eq!(ledger.inserts(), 0);
    assert_eq!(ledger.inner.count().await.unwrap(), 2);
    assert_eq!(output(notifier), "");
}

#[tokio::test]
async fn test_missing_message_id_never_reaches_ledger() {
    let ledger = CountingLedger::new().await;
    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let msg = message("", "No id", &["Eve <eve@example.com>"]);

    let outcome = process_one(&ledger, &mut notifier, &msg).await.unwrap();

    assert_eq!(outcome, Outcome::MissingIdentity);
    assert_eq!(ledger.lookups(), 0);
    assert_eq!(ledger.inserts(), 0);
    assert_eq!(output(notifier), "");
}

#[tokio::test]
async fn test_second_run_announces_nothing() {
    let ledger = CountingLedger::new().await;
    let records = vec![
        message("<1@example.com>", "One", &["A <a@example.com>"]),
        message("<2@example.com>", "Two", &["B <b@example.com>"]),
        message("", "Three", &[]),
    ];

    let mut first = Notifier::new(WriterSink::new(Vec::new()));
    let report = process(&ledger, &mut first, &records).await.unwrap();
    assert_eq!(
        report,
        RunReport {
            new: 2,
            seen_before: 0,
            ambiguous: 0,
            missing_identity: 1,
        }
    );
    assert_eq!(output(first).matches("----------").count(), 2);

    let mut second = Notifier::new(WriterSink::new(Vec::new()));
    let report = process(&ledger, &mut second, &records).await.unwrap();
    assert_eq!(report.new, 0);
    assert_eq!(report.seen_before, 2);
    assert_eq!(output(second), "");
    assert_eq!(ledger.inner.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_senders_with_separator_render_intact() {
    let ledger = CountingLedger::new().await;
    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let msg = message("<d@example.com>", "x", &["Doe, Jane <jane@example.com>"]);

    process_one(&ledger, &mut notifier, &msg).await.unwrap();

    assert!(output(notifier).contains("From: Doe, Jane <jane@example.com>\n"));
}

#[tokio::test]
async fn test_notify_failure_aborts_but_keeps_insert() {
    let ledger = CountingLedger::new().await;
    let mut notifier = Notifier::new(BrokenSink);
    let records = vec![
        message("<e@example.com>", "first", &[]),
        message("<f@example.com>", "second", &[]),
    ];

    let result = process(&ledger, &mut notifier, &records).await;

    assert!(matches!(result, Err(Error::Notify(_))));
    assert_eq!(ledger.inserts(), 1);
    assert_eq!(ledger.inner.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_lookup_failure_aborts_before_insert() {
    let ledger = CountingLedger::failing_lookup(1).await;
    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let records = vec![
        message("<g@example.com>", "first", &["G <g@example.com>"]),
        message("<h@example.com>", "second", &["H <h@example.com>"]),
    ];

    let result = process(&ledger, &mut notifier, &records).await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(ledger.lookups(), 1);
    assert_eq!(ledger.inserts(), 0);
    assert_eq!(ledger.inner.count().await.unwrap(), 0);
    assert_eq!(output(notifier), "");
}

#[tokio::test]
async fn test_insert_failure_aborts_and_keeps_earlier_inserts() {
    let ledger = CountingLedger::failing_insert(2).await;
    let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
    let records = vec![
        message("<i@example.com>", "first", &["I <i@example.com>"]),
        message("<j@example.com>", "second", &["J <j@example.com>"]),
        message("<k@example.com>", "third", &["K <k@example.com>"]),
    ];

    let result = process(&ledger, &mut notifier, &records).await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(ledger.lookups(), 2);
    assert_eq!(ledger.inserts(), 2);
    assert_eq!(ledger.inner.count().await.unwrap(), 1);

    let printed = output(notifier);
    assert_eq!(printed.matches("----------").count(), 1);
    assert!(printed.contains("Subject: first\n"));
    assert!(!printed.contains("second"));
}
