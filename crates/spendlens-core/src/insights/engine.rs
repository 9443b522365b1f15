//! Alert Engine - runs every registered rule over the current ledger

use crate::aggregate::LedgerSnapshot;
use crate::ledger::ExpenseLedger;

use super::types::{Alert, AlertKind};
use super::{
    CategoryDominanceRule, DailyAverageRule, FrequencyRule, OutlierRule, WeekOverWeekRule,
    WeekendSkewRule,
};

/// Context provided to alert rules
pub struct AnalysisContext<'a> {
    /// Ledger in entry order
    pub ledger: &'a ExpenseLedger,
    /// Aggregates for the same ledger state
    pub snapshot: &'a LedgerSnapshot,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(ledger: &'a ExpenseLedger, snapshot: &'a LedgerSnapshot) -> Self {
        Self { ledger, snapshot }
    }
}

/// A single threshold rule
///
/// Rules are pure: they read the context and return zero or more alerts.
/// A rule whose guard does not hold returns an empty list.
pub trait AlertRule: Send + Sync {
    /// Kind of alert this rule emits
    fn kind(&self) -> AlertKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert>;
}

/// Ordered list of rules. Registration order is display order; every rule
/// that matches fires and none suppresses another.
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(WeekOverWeekRule::new()));
        engine.register(Box::new(CategoryDominanceRule::new()));
        engine.register(Box::new(WeekendSkewRule::new()));
        engine.register(Box::new(OutlierRule::new()));
        engine.register(Box::new(FrequencyRule::new()));
        engine.register(Box::new(DailyAverageRule::new()));

        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule to the end of the evaluation order
    pub fn register(&mut self, rule: Box<dyn AlertRule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule against the ledger. An empty ledger yields no alerts.
    pub fn evaluate(&self, ledger: &ExpenseLedger) -> Vec<Alert> {
        match LedgerSnapshot::compute(ledger) {
            Some(snapshot) => self.evaluate_snapshot(ledger, &snapshot),
            None => vec![],
        }
    }

    /// Evaluate every rule against an already computed snapshot
    pub fn evaluate_snapshot(
        &self,
        ledger: &ExpenseLedger,
        snapshot: &LedgerSnapshot,
    ) -> Vec<Alert> {
        let ctx = AnalysisContext::new(ledger, snapshot);
        let mut alerts = vec![];

        for rule in &self.rules {
            let fired = rule.evaluate(&ctx);
            tracing::debug!(
                rule = rule.name(),
                kind = rule.kind().as_str(),
                count = fired.len(),
                "Alert rule evaluated"
            );
            alerts.extend(fired);
        }

        alerts
    }

    /// Kinds of the registered rules, in evaluation order
    pub fn rule_kinds(&self) -> Vec<AlertKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Severity;
    use crate::models::{Category, ExpenseRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_engine_rule_order() {
        let engine = AlertEngine::new();
        assert_eq!(
            engine.rule_kinds(),
            vec![
                AlertKind::WeekOverWeek,
                AlertKind::CategoryDominance,
                AlertKind::WeekendSkew,
                AlertKind::Outlier,
                AlertKind::Frequency,
                AlertKind::DailyAverage,
            ]
        );
    }

    #[test]
    fn test_empty_ledger_has_no_alerts() {
        let engine = AlertEngine::new();
        assert!(engine.evaluate(&ExpenseLedger::new()).is_empty());
    }

    #[test]
    fn test_single_record_alerts() {
        let ledger = ExpenseLedger::with_records(vec![ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
            Category::Food,
            120.0,
            "Dinner",
        )
        .unwrap()]);

        let alerts = AlertEngine::new().evaluate(&ledger);
        let kinds: Vec<_> = alerts.iter().map(|a| a.kind).collect();

        assert!(kinds.contains(&AlertKind::CategoryDominance));
        assert!(!kinds.contains(&AlertKind::Outlier));
        assert_eq!(alerts.last().unwrap().kind, AlertKind::DailyAverage);
        assert_eq!(alerts.last().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_all_zero_amounts_do_not_panic() {
        let records = (1..=20)
            .map(|day| {
                ExpenseRecord::new(
                    NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
                    Category::Other,
                    0.0,
                    "free",
                )
                .unwrap()
            })
            .collect();
        let ledger = ExpenseLedger::with_records(records);

        let alerts = AlertEngine::new().evaluate(&ledger);
        assert!(alerts.iter().all(|a| a.kind != AlertKind::WeekOverWeek));
        assert!(alerts.iter().all(|a| a.kind != AlertKind::Outlier));
        assert!(alerts.iter().all(|a| a.kind != AlertKind::WeekendSkew));
        assert!(alerts.iter().any(|a| a.kind == AlertKind::DailyAverage));
    }

    struct AlwaysRule;

    impl AlertRule for AlwaysRule {
        fn kind(&self) -> AlertKind {
            AlertKind::Frequency
        }

        fn name(&self) -> &'static str {
            "Always"
        }

        fn evaluate(&self, _ctx: &AnalysisContext<'_>) -> Vec<Alert> {
            vec![Alert::new(self.kind(), Severity::Info, "Always", "fires")]
        }
    }

    #[test]
    fn test_custom_rule_registration() {
        let mut engine = AlertEngine::empty();
        engine.register(Box::new(AlwaysRule));

        let ledger = ExpenseLedger::with_records(vec![ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            Category::Food,
            1.0,
            "x",
        )
        .unwrap()]);

        let alerts = engine.evaluate(&ledger);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "fires");
    }
}
