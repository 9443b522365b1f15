//! Week-over-week trend rule
//!
//! Compares the most recent 7 entries with the 7 before them. Windows are
//! positional after a stable date sort, not calendar weeks.

use crate::models::format_money;

use super::engine::{AlertRule, AnalysisContext};
use super::types::{Alert, AlertKind, Severity};
use super::{TREND_CHANGE_PERCENT, TREND_WINDOW};

pub struct WeekOverWeekRule;

impl WeekOverWeekRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeekOverWeekRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for WeekOverWeekRule {
    fn kind(&self) -> AlertKind {
        AlertKind::WeekOverWeek
    }

    fn name(&self) -> &'static str {
        "Week over Week"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        let sorted = ctx.ledger.sorted_by_date(false);
        let n = sorted.len();
        if n < TREND_WINDOW * 2 {
            return vec![];
        }

        let recent: f64 = sorted[n - TREND_WINDOW..].iter().map(|r| r.amount).sum();
        let prior: f64 = sorted[n - 2 * TREND_WINDOW..n - TREND_WINDOW]
            .iter()
            .map(|r| r.amount)
            .sum();

        if prior <= 0.0 {
            return vec![];
        }

        let change = (recent - prior) / prior * 100.0;

        if change > TREND_CHANGE_PERCENT {
            vec![Alert::new(
                self.kind(),
                Severity::Warning,
                "Spending Up",
                format!(
                    "Spending increased {:.1}% over your last {} expenses ({} vs {})",
                    change,
                    TREND_WINDOW,
                    format_money(recent),
                    format_money(prior)
                ),
            )
            .with_value(change)]
        } else if change < -TREND_CHANGE_PERCENT {
            vec![Alert::new(
                self.kind(),
                Severity::Success,
                "Spending Down",
                format!(
                    "Spending decreased {:.1}% over your last {} expenses ({} vs {})",
                    change.abs(),
                    TREND_WINDOW,
                    format_money(recent),
                    format_money(prior)
                ),
            )
            .with_value(change)]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LedgerSnapshot;
    use crate::ledger::ExpenseLedger;
    use crate::models::{Category, ExpenseRecord};
    use chrono::{Duration, NaiveDate};

    /// Ledger with one entry per day starting 2026-03-01
    fn daily_ledger(amounts: &[f64]) -> ExpenseLedger {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        ExpenseLedger::with_records(
            amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| {
                    ExpenseRecord::new(
                        start + Duration::days(i as i64),
                        Category::Food,
                        *amount,
                        "meal",
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn run(ledger: &ExpenseLedger) -> Vec<Alert> {
        let snapshot = LedgerSnapshot::compute(ledger).unwrap();
        WeekOverWeekRule::new().evaluate(&AnalysisContext::new(ledger, &snapshot))
    }

    fn windows(prior_each: f64, recent_each: f64) -> Vec<f64> {
        let mut amounts = vec![prior_each; 7];
        amounts.extend(vec![recent_each; 7]);
        amounts
    }

    #[test]
    fn test_increase_fires_with_100_percent() {
        // prior 7 sum to 500, latest 7 sum to 1000
        let mut amounts = vec![100.0, 100.0, 100.0, 50.0, 50.0, 50.0, 50.0];
        amounts.extend(vec![200.0, 200.0, 100.0, 100.0, 100.0, 150.0, 150.0]);
        let alerts = run(&daily_ledger(&amounts));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].title, "Spending Up");
        assert!((alerts[0].value.unwrap() - 100.0).abs() < 1e-9);
        assert!(alerts[0].message.contains("increased 100.0%"));
    }

    #[test]
    fn test_decrease_fires() {
        let alerts = run(&daily_ledger(&windows(100.0, 50.0)));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Success);
        assert!((alerts[0].value.unwrap() + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_change_does_not_fire() {
        assert!(run(&daily_ledger(&windows(100.0, 115.0))).is_empty());
        assert!(run(&daily_ledger(&windows(100.0, 85.0))).is_empty());
    }

    #[test]
    fn test_requires_fourteen_records() {
        let mut amounts = windows(10.0, 100.0);
        amounts.pop();
        assert!(run(&daily_ledger(&amounts)).is_empty());
    }

    #[test]
    fn test_zero_prior_window_is_skipped() {
        assert!(run(&daily_ledger(&windows(0.0, 100.0))).is_empty());
    }

    #[test]
    fn test_windows_follow_date_order_not_entry_order() {
        // Entered newest first; the rule must sort by date before slicing
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let records = (0..14)
            .rev()
            .map(|day| {
                let amount = if day >= 7 { 300.0 } else { 100.0 };
                ExpenseRecord::new(start + Duration::days(day), Category::Food, amount, "meal")
                    .unwrap()
            })
            .collect();
        let ledger = ExpenseLedger::with_records(records);

        let alerts = run(&ledger);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Spending Up");
        assert!((alerts[0].value.unwrap() - 200.0).abs() < 1e-9);
    }
}
