//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SpendLens - Track expenses and spot spending patterns
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(
    about = "Personal expense tracker with smart alerts and an AI advisor",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Advisor config file (defaults to ~/.local/share/spendlens/config/advisor.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the ledger for a one-shot command comes from
#[derive(Args, Debug, Clone, Default)]
pub struct LedgerArgs {
    /// Ledger CSV (Date,Category,Amount,Description)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Start from the three demo expenses
    #[arg(long)]
    pub sample: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show totals, category breakdown and daily trend
    Summary {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Show smart alerts
    Alerts {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Export the ledger to CSV
    Export {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Row order: date-desc, date-asc, entry
        #[arg(long, default_value = "date-desc")]
        order: String,
    },

    /// Ask the AI advisor a question about your spending
    Ask {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Number of recent transactions to include (overrides config)
        #[arg(long)]
        recent: Option<usize>,

        /// The question
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Show the resolved advisor configuration
    Config,

    /// Start an interactive session
    Session {
        #[command(flatten)]
        ledger: LedgerArgs,
    },
}
