//! `mailwatch` - announces never-before-seen messages in an IMAP folder.
//!
//! Each run logs in, reads the folder read-only, records every message it
//! has not seen before in a local `SQLite` ledger and announces it once.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod logging;
mod password;
mod run;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let file = config::load_file(cli.config.as_deref()).await;

    let verbose = cli.verbose || file.as_ref().is_ok_and(|f| f.verbose.unwrap_or(false));
    logging::init(verbose);

    let result = match file {
        Ok(file) => start(cli, file).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: Cli, file: config::FileConfig) -> anyhow::Result<()> {
    let settings = Settings::resolve(cli, file)?;
    tracing::debug!(?settings, "starting");

    run::run(&settings).await?;
    Ok(())
}
