//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Where announcements go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Plain lines on standard output.
    #[default]
    Stdout,
    /// INFO log events on standard error.
    Log,
}

/// Announce messages in an IMAP folder that have never been seen before.
///
/// Every option can also come from the config file; options given here win.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "mailwatch", version, about, long_about = None)]
pub struct Cli {
    /// IMAP server host name
    #[arg(long, env = "MAILWATCH_HOST")]
    pub host: Option<String>,

    /// IMAP server port (implicit TLS) [default: 993]
    #[arg(long, env = "MAILWATCH_PORT")]
    pub port: Option<u16>,

    /// IMAP username
    #[arg(short, long, env = "MAILWATCH_USER")]
    pub user: Option<String>,

    /// File holding the IMAP password
    #[arg(short, long, env = "MAILWATCH_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Mailbox to inspect, e.g. Junk
    #[arg(short, long, env = "MAILWATCH_MAILBOX")]
    pub mailbox: Option<String>,

    /// SQLite database of seen messages [default: <data dir>/mailwatch/seen.db]
    #[arg(short, long, env = "MAILWATCH_DATABASE")]
    pub database: Option<PathBuf>,

    /// Seconds allowed for connect, TLS handshake and greeting [default: 30]
    #[arg(long, env = "MAILWATCH_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Where to send announcements [default: stdout]
    #[arg(short, long, value_enum, env = "MAILWATCH_OUTPUT")]
    pub output: Option<OutputMode>,

    /// JSON config file [default: <config dir>/mailwatch/config.json]
    #[arg(short, long, env = "MAILWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log connection progress and skipped messages
    #[arg(short, long)]
    pub verbose: bool,
}
