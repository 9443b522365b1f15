//! SpendLens CLI - Personal expense tracker
//!
//! Usage:
//!   spendlens summary --file expenses.csv    Totals, categories, daily trend
//!   spendlens alerts --sample                Smart alerts
//!   spendlens export --file in.csv -o out.csv
//!   spendlens ask --file expenses.csv "How can I save more?"
//!   spendlens session --sample               Interactive session

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Summary { ledger } => commands::cmd_summary(&ledger),
        Commands::Alerts { ledger } => commands::cmd_alerts(&ledger),
        Commands::Export {
            ledger,
            output,
            order,
        } => commands::cmd_export(&ledger, &output, &order).map(|_| ()),
        Commands::Ask {
            ledger,
            recent,
            question,
        } => commands::cmd_ask(config, &ledger, recent, &question.join(" "))
            .await
            .map(|_| ()),
        Commands::Config => commands::cmd_config(config),
        Commands::Session { ledger } => commands::cmd_session(config, &ledger).await,
    }
}
