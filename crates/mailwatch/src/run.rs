//! One watch run: open the ledger, read the mailbox, announce new messages.

use std::path::Path;

use anyhow::Context;
use mailwatch_core::{
    DEFAULT_CHANNEL_CAPACITY, ImapSession, MessageRecord, Notifier, RunReport, SqliteLedger,
    TracingSink, WriterSink, fetch_messages, process,
};
use mailwatch_imap::{Client, Config};

use crate::cli::OutputMode;
use crate::config::Settings;
use crate::password::read_password;

/// Runs once with `settings`.
///
/// The ledger is closed on every path once opened. The IMAP session is
/// logged out before any message is processed.
///
/// # Errors
///
/// Returns an error on any fatal failure: unreadable password, connection,
/// login, mailbox read, ledger access or announcement output.
pub async fn run(settings: &Settings) -> anyhow::Result<RunReport> {
    let password = read_password(&settings.password_file).await?;
    let ledger = open_ledger(&settings.database).await?;

    let result = watch(settings, &password, &ledger).await;
    ledger.close().await;
    result
}

async fn watch(
    settings: &Settings,
    password: &str,
    ledger: &SqliteLedger,
) -> anyhow::Result<RunReport> {
    let records = read_messages(settings, password).await?;
    tracing::debug!(count = records.len(), "messages in the mailbox");

    let report = match settings.output {
        OutputMode::Stdout => {
            process(ledger, &mut Notifier::new(WriterSink::stdout()), &records).await
        }
        OutputMode::Log => process(ledger, &mut Notifier::new(TracingSink), &records).await,
    }
    .context("failed to process messages")?;

    tracing::info!(%report, "run complete");
    Ok(report)
}

async fn read_messages(settings: &Settings, password: &str) -> anyhow::Result<Vec<MessageRecord>> {
    let config = Config::new(&settings.host)
        .with_port(settings.port)
        .with_connect_timeout(settings.connect_timeout);

    tracing::debug!(host = %settings.host, port = settings.port, "connecting");
    let client = Client::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}:{}", settings.host, settings.port))?;

    let client = client
        .login(&settings.user, password)
        .await
        .with_context(|| format!("failed to log in as {}", settings.user))?;
    tracing::debug!(user = %settings.user, "logged in");

    fetch_messages(
        ImapSession::from(client),
        &settings.mailbox,
        DEFAULT_CHANNEL_CAPACITY,
    )
    .await
    .with_context(|| format!("failed to read mailbox {}", settings.mailbox))
}

/// Opens the ledger at `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the path is not
/// UTF-8 or the database cannot be opened.
pub async fn open_ledger(path: &Path) -> anyhow::Result<SqliteLedger> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let database = path
        .to_str()
        .with_context(|| format!("database path {} is not UTF-8", path.display()))?;
    SqliteLedger::new(database)
        .await
        .with_context(|| format!("failed to open database {database}"))
}
