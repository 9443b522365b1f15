//! Category composition rules: dominance and frequency

use crate::models::{format_money, Category};

use super::engine::{AlertRule, AnalysisContext};
use super::types::{Alert, AlertKind, Severity};
use super::{DOMINANCE_PERCENT, FREQUENCY_MIN_COUNT};

/// Calls out a category that takes more than 35% of total spend
pub struct CategoryDominanceRule;

impl CategoryDominanceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CategoryDominanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for CategoryDominanceRule {
    fn kind(&self) -> AlertKind {
        AlertKind::CategoryDominance
    }

    fn name(&self) -> &'static str {
        "Category Dominance"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        let top = ctx.snapshot.top_category();
        if top.percentage <= DOMINANCE_PERCENT {
            return vec![];
        }

        vec![Alert::new(
            self.kind(),
            Severity::Warning,
            "Top Category",
            format!(
                "{} makes up {:.1}% of your spending ({})",
                top.category,
                top.percentage,
                format_money(top.total)
            ),
        )
        .with_value(top.percentage)]
    }
}

/// Calls out the most frequently used category once it reaches 3 entries
pub struct FrequencyRule;

impl FrequencyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FrequencyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for FrequencyRule {
    fn kind(&self) -> AlertKind {
        AlertKind::Frequency
    }

    fn name(&self) -> &'static str {
        "Frequency"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        // (category, count, total) in first-seen order so ties go to the earliest category
        let mut counts: Vec<(Category, usize, f64)> = Vec::new();
        for record in ctx.ledger.records() {
            match counts.iter_mut().find(|(c, _, _)| *c == record.category) {
                Some(entry) => {
                    entry.1 += 1;
                    entry.2 += record.amount;
                }
                None => counts.push((record.category, 1, record.amount)),
            }
        }

        let most_frequent = counts
            .into_iter()
            .fold(None::<(Category, usize, f64)>, |best, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            });

        match most_frequent {
            Some((category, count, total)) if count >= FREQUENCY_MIN_COUNT => {
                vec![Alert::new(
                    self.kind(),
                    Severity::Info,
                    "Frequent Category",
                    format!(
                        "You logged {} {} expenses totalling {}",
                        count,
                        category,
                        format_money(total)
                    ),
                )
                .with_value(count as f64)]
            }
            _ => vec![],
        }
    }
}
