//! Settings resolved from the config file and the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mailwatch_imap::connection::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
use serde::Deserialize;

use crate::cli::{Cli, OutputMode};

/// A required setting that was not given anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MissingSetting {
    /// No server host.
    #[error("You must provide an IMAP host.")]
    Host,
    /// No username.
    #[error("You must provide an IMAP username.")]
    User,
    /// No password file.
    #[error("You must provide an IMAP password file.")]
    PasswordFile,
    /// No mailbox.
    #[error("You must provide an IMAP mailbox.")]
    Mailbox,
}

/// Contents of the optional JSON config file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// IMAP server host name.
    pub host: Option<String>,
    /// IMAP server port.
    pub port: Option<u16>,
    /// IMAP username.
    pub user: Option<String>,
    /// File holding the IMAP password.
    pub password_file: Option<PathBuf>,
    /// Mailbox to inspect.
    pub mailbox: Option<String>,
    /// Seen-message database path.
    pub database: Option<PathBuf>,
    /// Connect-phase timeout in seconds.
    pub connect_timeout: Option<u64>,
    /// Announcement output.
    pub output: Option<OutputMode>,
    /// Verbose logging; `--verbose` turns it on regardless.
    pub verbose: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// IMAP server host name.
    pub host: String,
    /// IMAP server port.
    pub port: u16,
    /// IMAP username.
    pub user: String,
    /// File holding the IMAP password.
    pub password_file: PathBuf,
    /// Mailbox to inspect.
    pub mailbox: String,
    /// Seen-message database path.
    pub database: PathBuf,
    /// Connect-phase timeout.
    pub connect_timeout: Duration,
    /// Announcement output.
    pub output: OutputMode,
}

impl Settings {
    /// Merges command line values over file values and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns the first required setting that is missing or empty, checked
    /// in the order host, user, password file, mailbox.
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self, MissingSetting> {
        let host = non_empty(cli.host.or(file.host)).ok_or(MissingSetting::Host)?;
        let user = non_empty(cli.user.or(file.user)).ok_or(MissingSetting::User)?;
        let password_file = cli
            .password_file
            .or(file.password_file)
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(MissingSetting::PasswordFile)?;
        let mailbox = non_empty(cli.mailbox.or(file.mailbox)).ok_or(MissingSetting::Mailbox)?;

        Ok(Self {
            host,
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            user,
            password_file,
            mailbox,
            database: cli
                .database
                .or(file.database)
                .unwrap_or_else(default_database_path),
            connect_timeout: cli
                .connect_timeout
                .or(file.connect_timeout)
                .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs),
            output: cli.output.or(file.output).unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Returns `<config dir>/mailwatch/config.json`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailwatch")
        .join("config.json")
}

/// Returns `<data dir>/mailwatch/seen.db`.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailwatch")
        .join("seen.db")
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, the default location is used
/// only if a file is there.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub async fn load_file(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path();
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Ok(FileConfig::default());
            }
            path
        }
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
