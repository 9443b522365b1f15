//! Time-based rules: weekend skew and daily average

use chrono::{Datelike, Weekday};

use crate::models::format_money;

use super::engine::{AlertRule, AnalysisContext};
use super::types::{Alert, AlertKind, Severity};
use super::WEEKEND_RATIO;

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Compares the average spend of weekend days with weekdays, counting only
/// days that have at least one expense
pub struct WeekendSkewRule;

impl WeekendSkewRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeekendSkewRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for WeekendSkewRule {
    fn kind(&self) -> AlertKind {
        AlertKind::WeekendSkew
    }

    fn name(&self) -> &'static str {
        "Weekend Skew"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        let (weekend, weekday): (Vec<_>, Vec<_>) = ctx
            .snapshot
            .daily
            .iter()
            .partition(|d| is_weekend(d.date.weekday()));

        if weekend.is_empty() || weekday.is_empty() {
            return vec![];
        }

        let weekend_avg = weekend.iter().map(|d| d.total).sum::<f64>() / weekend.len() as f64;
        let weekday_avg = weekday.iter().map(|d| d.total).sum::<f64>() / weekday.len() as f64;

        if weekday_avg <= 0.0 {
            return vec![];
        }

        let ratio = weekend_avg / weekday_avg;
        if ratio <= WEEKEND_RATIO {
            return vec![];
        }

        vec![Alert::new(
            self.kind(),
            Severity::Info,
            "Weekend Spending",
            format!(
                "You spend {:.1}x more on weekends ({}/day vs {}/day on weekdays)",
                ratio,
                format_money(weekend_avg),
                format_money(weekday_avg)
            ),
        )
        .with_value(ratio)]
    }
}

/// Reports total spend divided by the inclusive day span
pub struct DailyAverageRule;

impl DailyAverageRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DailyAverageRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRule for DailyAverageRule {
    fn kind(&self) -> AlertKind {
        AlertKind::DailyAverage
    }

    fn name(&self) -> &'static str {
        "Daily Average"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Alert> {
        let average = ctx.snapshot.daily_average();
        let days = ctx.snapshot.stats.span_days;

        vec![Alert::new(
            self.kind(),
            Severity::Info,
            "Daily Average",
            format!(
                "{} per day across {} day{}",
                format_money(average),
                days,
                if days == 1 { "" } else { "s" }
            ),
        )
        .with_value(average)]
    }
}
