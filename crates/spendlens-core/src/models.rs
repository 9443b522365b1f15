//! Data models for SpendLens

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Date format used for form input, CSV and display
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expense categories offered by the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Education,
    Health,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// All categories, in form order
    pub fn all() -> &'static [Category] {
        &[
            Category::Food,
            Category::Transport,
            Category::Shopping,
            Category::Entertainment,
            Category::Bills,
            Category::Education,
            Category::Health,
            Category::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Available: {}",
                    wanted,
                    Category::all()
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// A single expense in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: Category,
    /// Always non-negative
    pub amount: f64,
    pub description: String,
}

impl ExpenseRecord {
    /// Create a record, enforcing the non-negative amount invariant
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            date,
            category,
            amount,
            description: description.into(),
        })
    }
}

/// Raw expense form input, validated before it reaches the ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl NewExpense {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
        }
    }

    /// Validate the form fields and build a record
    pub fn validate(&self) -> Result<ExpenseRecord> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            Error::validation(
                "date",
                format!("'{}' is not a YYYY-MM-DD date", self.date.trim()),
            )
        })?;

        let category: Category = self
            .category
            .parse()
            .map_err(|e: String| Error::validation("category", e))?;

        let amount = parse_amount(&self.amount)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::validation("description", "must not be empty"));
        }

        ExpenseRecord::new(date, category, amount, description)
    }
}

/// Parse a form amount, accepting an optional leading currency symbol and
/// thousands separators
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['₹', '$'])
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let amount: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| Error::validation("amount", format!("'{}' is not a number", raw.trim())))?;

    validate_amount(amount)?;
    Ok(amount)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::validation("amount", "must be a finite number"));
    }
    if amount < 0.0 {
        return Err(Error::validation("amount", "must not be negative"));
    }
    Ok(())
}

/// Format an amount for tables: whole numbers without decimals, everything
/// else with two
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Currency symbol used in human-readable messages
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format money for messages: rounded to whole units with thousands
/// separators (e.g., "₹1,250")
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}", sign, CURRENCY_SYMBOL, grouped)
}

/// One question/answer exchange with the advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}
