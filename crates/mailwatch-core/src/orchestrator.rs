//! Per-message decision loop.
//!
//! For each fetched message, in order: resolve its identity key, look it up
//! in the ledger and, only when there is no match at all, record it and
//! announce it. Lookup and insert are separate statements, so two runs that
//! overlap can both announce the same message.

use std::fmt;

use crate::identity::IdentityKey;
use crate::ledger::Ledger;
use crate::model::{MessageRecord, PersistedRecord};
use crate::notifier::{NotificationSink, Notifier};
use crate::Result;

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No Message-ID; skipped without touching the ledger.
    MissingIdentity,
    /// Recorded and announced.
    New(PersistedRecord),
    /// Exactly one earlier sighting; skipped.
    SeenBefore(PersistedRecord),
    /// Several rows share the key; skipped with a warning.
    Ambiguous(usize),
}

/// Counts of each outcome over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Messages recorded and announced.
    pub new: usize,
    /// Messages already in the ledger.
    pub seen_before: usize,
    /// Messages matching more than one ledger row.
    pub ambiguous: usize,
    /// Messages without a Message-ID.
    pub missing_identity: usize,
}

impl RunReport {
    /// Counts one outcome.
    pub const fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::MissingIdentity => self.missing_identity += 1,
            Outcome::New(_) => self.new += 1,
            Outcome::SeenBefore(_) => self.seen_before += 1,
            Outcome::Ambiguous(_) => self.ambiguous += 1,
        }
    }

    /// Returns the number of messages processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.new + self.seen_before + self.ambiguous + self.missing_identity
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} seen before, {} ambiguous, {} without Message-ID",
            self.new, self.seen_before, self.ambiguous, self.missing_identity
        )
    }
}

/// Runs the decision loop over `records` in order.
///
/// # Errors
///
/// Stops at the first ledger or notification failure. Rows inserted before
/// the failure stay in the ledger.
pub async fn process<L, S>(
    ledger: &L,
    notifier: &mut Notifier<S>,
    records: &[MessageRecord],
) -> Result<RunReport>
where
    L: Ledger,
    S: NotificationSink,
{
    let mut report = RunReport::default();
    for record in records {
        let outcome = process_one(ledger, notifier, record).await?;
        report.record(&outcome);
    }
    Ok(report)
}

/// Decides and acts on a single message.
///
/// # Errors
///
/// Returns an error if the lookup, the insert or the announcement fails.
pub async fn process_one<L, S>(
    ledger: &L,
    notifier: &mut Notifier<S>,
    record: &MessageRecord,
) -> Result<Outcome>
where
    L: Ledger,
    S: NotificationSink,
{
    let Some(key) = IdentityKey::resolve(record) else {
        tracing::warn!(%record, "message has no Message-ID, skipping");
        return Ok(Outcome::MissingIdentity);
    };

    let mut matches = ledger.find_by_key(&key).await?;
    match matches.len() {
        0 => {
            let inserted = ledger.insert(record).await?;
            notifier.notify(&inserted, &record.senders)?;
            tracing::debug!(%inserted, "recorded new message");
            Ok(Outcome::New(inserted))
        }
        1 => {
            let existing = matches.remove(0);
            tracing::debug!(%record, %existing, "message already seen");
            Ok(Outcome::SeenBefore(existing))
        }
        n => {
            tracing::warn!(%record, matches = n, "multiple matching messages in the ledger, skipping");
            Ok(Outcome::Ambiguous(n))
        }
    }
}
