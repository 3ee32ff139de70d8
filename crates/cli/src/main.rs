//! `invoiceflow` command-line front end.
//!
//! Every invocation opens the data directory, runs one command against the
//! persisted session and exits. Log in once; later commands act as that user.

mod args;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use invoiceflow_infra::{Config, InvoiceFlow};

use crate::args::Cli;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // A missing .env is fine; anything set there only fills unset variables.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    invoiceflow_observability::init(config.log_format);
    tracing::debug!(data_dir = %config.data_dir.display(), "opening data directory");

    let mut app = InvoiceFlow::open_dir(&config)
        .with_context(|| format!("failed to open {}", config.data_dir.display()))?;
    commands::run(&mut app, cli.command)
}
