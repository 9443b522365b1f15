//! Smart Alerts - threshold rules over the ledger
//!
//! Each rule is an independent check that reads the ledger and its aggregates
//! and emits zero or more alerts. Rules run in a fixed order which only
//! controls display order.
//!
//! ## Built-in Rules
//!
//! - **Week over week** - last 7 entries vs the 7 before
//! - **Category dominance** - one category above 35% of spend
//! - **Weekend skew** - weekend days 1.5x more expensive than weekdays
//! - **Outliers** - expenses above mean + 2 standard deviations
//! - **Frequency** - a category used 3 or more times
//! - **Daily average** - always reported for a non-empty ledger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendlens_core::insights::AlertEngine;
//!
//! let alerts = AlertEngine::new().evaluate(&ledger);
//! for alert in &alerts {
//!     println!("{}", alert);
//! }
//! ```

pub mod composition;
pub mod engine;
pub mod outliers;
pub mod timing;
pub mod trend;
pub mod types;

pub use composition::{CategoryDominanceRule, FrequencyRule};
pub use engine::{AlertEngine, AlertRule, AnalysisContext};
pub use outliers::OutlierRule;
pub use timing::{DailyAverageRule, WeekendSkewRule};
pub use trend::WeekOverWeekRule;
pub use types::{Alert, AlertKind, Severity};

/// Entries in each window of the week-over-week comparison
pub const TREND_WINDOW: usize = 7;

/// Percent change (either direction) that makes the trend rule fire
pub const TREND_CHANGE_PERCENT: f64 = 20.0;

/// Share of total spend above which the top category is called out
pub const DOMINANCE_PERCENT: f64 = 35.0;

/// Weekend-to-weekday average ratio above which the skew rule fires
pub const WEEKEND_RATIO: f64 = 1.5;

/// Standard deviations above the mean for an expense to count as a spike
pub const OUTLIER_STD_DEVS: f64 = 2.0;

/// Most spikes reported in one pass
pub const MAX_OUTLIERS: usize = 3;

/// Entries in one category before the frequency rule fires
pub const FREQUENCY_MIN_COUNT: usize = 3;
