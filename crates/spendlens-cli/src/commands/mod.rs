//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ledger` - Ledger commands (summary, alerts, export) and shared renderers
//! - `advisor` - AI advisor commands (ask, config)
//! - `session` - Interactive session loop

pub mod advisor;
pub mod ledger;
pub mod session;

// Re-export command functions for main.rs
pub use advisor::*;
pub use ledger::*;
pub use session::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
