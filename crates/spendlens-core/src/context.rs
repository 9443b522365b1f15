//! Ledger summary for advisor prompts
//!
//! Captures what the advisor needs to know about the ledger:
//! - Grand total and expense count
//! - Per-category totals (largest first)
//! - The most recent transactions (newest first)

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::aggregate::category_totals;
use crate::ledger::ExpenseLedger;
use crate::models::{format_money, Category, ExpenseRecord, DATE_FORMAT};

/// Spending recap sent alongside a question
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total: f64,
    pub count: usize,
    /// (category, total, share of grand total 0-100)
    pub categories: Vec<(Category, f64, f64)>,
    /// Newest first, at most `recent_limit` entries
    pub recent: Vec<ExpenseRecord>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl LedgerSummary {
    /// Summarize a ledger, keeping the `recent_limit` newest transactions
    pub fn from_ledger(ledger: &ExpenseLedger, recent_limit: usize) -> Self {
        let records = ledger.records();
        let categories = category_totals(records)
            .into_iter()
            .map(|c| (c.category, c.total, c.percentage))
            .collect();
        let recent = ledger
            .sorted_by_date(true)
            .into_iter()
            .take(recent_limit)
            .cloned()
            .collect();

        Self {
            total: records.iter().map(|r| r.amount).sum(),
            count: records.len(),
            categories,
            recent,
            first_date: records.iter().map(|r| r.date).min(),
            last_date: records.iter().map(|r| r.date).max(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Convert the summary to template variables for prompt rendering
    pub fn to_template_vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();

        vars.insert("total", format_money(self.total));
        vars.insert("count", self.count.to_string());

        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            vars.insert(
                "date_range",
                format!(
                    "{} to {}",
                    first.format(DATE_FORMAT),
                    last.format(DATE_FORMAT)
                ),
            );
        }

        let category_totals = if self.categories.is_empty() {
            "- (no expenses recorded)".to_string()
        } else {
            self.categories
                .iter()
                .map(|(category, total, pct)| {
                    format!("- {}: {} ({:.1}%)", category, format_money(*total), pct)
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        vars.insert("category_totals", category_totals);

        if !self.recent.is_empty() {
            let recent = self
                .recent
                .iter()
                .map(|r| {
                    format!(
                        "- {} | {} | {} | {}",
                        r.date.format(DATE_FORMAT),
                        r.category,
                        format_money(r.amount),
                        r.description
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            vars.insert("recent_transactions", recent);
        }

        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> ExpenseLedger {
        let record = |d: u32, category, amount, desc: &str| {
            ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2026, 1, d).unwrap(),
                category,
                amount,
                desc,
            )
            .unwrap()
        };
        ExpenseLedger::with_records(vec![
            record(1, Category::Food, 150.0, "Breakfast"),
            record(5, Category::Transport, 50.0, "Auto"),
            record(10, Category::Shopping, 500.0, "New shirt"),
        ])
    }

    #[test]
    fn test_summary_totals_and_recent_order() {
        let summary = LedgerSummary::from_ledger(&ledger(), 2);

        assert_eq!(summary.total, 700.0);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.categories[0].0, Category::Shopping);
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].description, "New shirt");
        assert_eq!(summary.recent[1].description, "Auto");
    }

    #[test]
    fn test_template_vars() {
        let vars = LedgerSummary::from_ledger(&ledger(), 10).to_template_vars();

        assert_eq!(vars["total"], "₹700");
        assert_eq!(vars["count"], "3");
        assert_eq!(vars["date_range"], "2026-01-01 to 2026-01-10");
        assert!(vars["category_totals"].starts_with("- Shopping: ₹500 (71.4%)"));
        assert!(vars["recent_transactions"].contains("2026-01-05 | Transport | ₹50 | Auto"));
    }

    #[test]
    fn test_empty_ledger_summary() {
        let summary = LedgerSummary::from_ledger(&ExpenseLedger::new(), 10);
        assert!(summary.is_empty());

        let vars = summary.to_template_vars();
        assert_eq!(vars["total"], "₹0");
        assert!(!vars.contains_key("recent_transactions"));
        assert!(!vars.contains_key("date_range"));
    }
}
