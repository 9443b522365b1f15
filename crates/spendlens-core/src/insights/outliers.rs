//! Outlier spike rule
//!
//! Threshold is mean + 2 population standard deviations. With a single
//! record (or identical amounts) the deviation is zero and nothing can be
//! strictly above the mean, so the rule stays silent.

use crate::models::format_money;

use super::engine::{AlertRule, AnalysisContext};
use super::types::{Alert, AlertKind, Severity};
use super::{MAX_OUTLIERS, OUTLIER_STD_DEVS};

pub struct OutlierRule;

impl OutlierRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutlierRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for OutlierRule {
    fn kind(&self) -> AlertKind {
        AlertKind::Outlier
    }

    fn name(&self) -> &'static str {
        "Outlier Spike"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        let stats = &ctx.snapshot.stats;
        let threshold = stats.mean + OUTLIER_STD_DEVS * stats.std_dev;

        ctx.ledger
            .records()
            .iter()
            .filter(|r| r.amount > threshold)
            .take(MAX_OUTLIERS)
            .map(|r| {
                Alert::new(
                    self.kind(),
                    Severity::Error,
                    "Unusual Expense",
                    format!(
                        "{} on {} ({}) on {} is well above your usual spend (threshold {})",
                        format_money(r.amount),
                        r.category,
                        r.description,
                        r.date,
                        format_money(threshold)
                    ),
                )
                .with_value(r.amount)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::LedgerSnapshot;
    use crate::ledger::ExpenseLedger;
    use crate::models::{Category, ExpenseRecord};
    use chrono::{Duration, NaiveDate};

    fn ledger(amounts: &[f64]) -> ExpenseLedger {
        ExpenseLedger::with_records(
            amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| {
                    ExpenseRecord::new(
                        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap() + Duration::days(i as i64),
                        Category::Shopping,
                        *amount,
                        format!("item {}", i),
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn run(ledger: &ExpenseLedger) -> Vec<Alert> {
        let snapshot = LedgerSnapshot::compute(ledger).unwrap();
        OutlierRule::new().evaluate(&AnalysisContext::new(ledger, &snapshot))
    }

    #[test]
    fn test_single_record_never_fires() {
        assert!(run(&ledger(&[5000.0])).is_empty());
    }

    #[test]
    fn test_identical_amounts_never_fire() {
        assert!(run(&ledger(&[20.0; 10])).is_empty());
    }

    #[test]
    fn test_spike_is_reported() {
        let mut amounts = vec![10.0; 9];
        amounts.push(1000.0);
        let alerts = run(&ledger(&amounts));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Error);
        assert_eq!(alerts[0].value, Some(1000.0));
        assert!(alerts[0].message.contains("item 9"));
    }

    #[test]
    fn test_caps_at_three_in_ledger_order() {
        let mut amounts = vec![1.0; 60];
        amounts.extend([500.0, 400.0, 600.0, 450.0]);
        let alerts = run(&ledger(&amounts));

        assert_eq!(alerts.len(), 3);
        let values: Vec<_> = alerts.iter().map(|a| a.value.unwrap()).collect();
        assert_eq!(values, vec![500.0, 400.0, 600.0]);
    }
}
