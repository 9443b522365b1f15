//! SpendLens Core Library
//!
//! Shared functionality for the SpendLens expense tracker:
//! - In-memory expense ledger and form validation
//! - Aggregates (category totals, daily totals, summary statistics)
//! - Smart alert rules
//! - CSV export and re-import
//! - Advisory client for chat-completion providers
//! - Prompt library for customizable advisor prompts
//! - Session context owning one ledger and one chat history

pub mod advisor;
pub mod aggregate;
pub mod ai;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod import;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod session;

/// Test utilities including mock chat-completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advice, Advisor};
pub use aggregate::{CategoryAggregate, DailyTotal, LedgerSnapshot, SummaryStats};
pub use ai::{AIBackend, AIClient, Envelope, HttpChatBackend, MockBackend};
pub use config::{AdvisorConfig, ApiKey, ConfigSource, ProviderConfig};
pub use context::LedgerSummary;
pub use error::{Error, Result};
pub use export::ExportOrder;
pub use insights::{Alert, AlertEngine, AlertKind, AlertRule, Severity};
pub use ledger::ExpenseLedger;
pub use models::{Category, ChatEntry, ExpenseRecord, NewExpense};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use session::Session;
