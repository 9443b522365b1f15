//! Aggregates derived from the ledger
//!
//! Everything here is recomputed from the full ledger on every read. There is
//! no incremental state to keep in sync.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::ledger::ExpenseLedger;
use crate::models::{Category, ExpenseRecord};

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: Category,
    pub total: f64,
    /// Share of the grand total, 0-100
    pub percentage: f64,
    pub count: usize,
}

/// Spending for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
    pub count: usize,
}

/// Scalar statistics over all record amounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub count: usize,
    pub distinct_categories: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Days between the earliest and latest record, counting both ends
    pub span_days: i64,
}

/// Category totals, largest first (ties broken by category name)
///
/// Percentages always sum to 100 for a non-empty ledger. When every amount is
/// zero the share falls back to the category's share of record count.
pub fn category_totals(records: &[ExpenseRecord]) -> Vec<CategoryAggregate> {
    let mut by_category: HashMap<Category, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = by_category.entry(record.category).or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let grand_total: f64 = by_category.values().map(|(total, _)| total).sum();
    let record_count = records.len();

    let mut aggregates: Vec<CategoryAggregate> = by_category
        .into_iter()
        .map(|(category, (total, count))| {
            let percentage = if grand_total > 0.0 {
                total / grand_total * 100.0
            } else if record_count > 0 {
                count as f64 / record_count as f64 * 100.0
            } else {
                0.0
            };
            CategoryAggregate {
                category,
                total,
                percentage,
                count,
            }
        })
        .collect();

    aggregates.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    aggregates
}

/// Daily totals in chronological order
pub fn daily_totals(records: &[ExpenseRecord]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_day.entry(record.date).or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect()
}

/// Scalar statistics, or None for an empty slice
pub fn summary_stats(records: &[ExpenseRecord]) -> Option<SummaryStats> {
    let first = records.first()?;

    let count = records.len();
    let total: f64 = records.iter().map(|r| r.amount).sum();
    let mean = total / count as f64;

    let mut amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
    amounts.sort_by(|a, b| a.total_cmp(b));
    let min = amounts[0];
    let max = amounts[count - 1];
    let median = if count % 2 == 1 {
        amounts[count / 2]
    } else {
        (amounts[count / 2 - 1] + amounts[count / 2]) / 2.0
    };

    let variance = amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / count as f64;
    let std_dev = variance.sqrt();

    let (first_date, last_date) = records.iter().fold((first.date, first.date), |(lo, hi), r| {
        (lo.min(r.date), hi.max(r.date))
    });
    let span_days = (last_date - first_date).num_days() + 1;

    let mut categories: Vec<Category> = records.iter().map(|r| r.category).collect();
    categories.sort();
    categories.dedup();

    Some(SummaryStats {
        total,
        mean,
        max,
        min,
        median,
        std_dev,
        count,
        distinct_categories: categories.len(),
        first_date,
        last_date,
        span_days,
    })
}

/// All aggregates for one ledger state
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub categories: Vec<CategoryAggregate>,
    pub daily: Vec<DailyTotal>,
    pub stats: SummaryStats,
}

impl LedgerSnapshot {
    /// Compute every aggregate; None when the ledger is empty so callers can
    /// short-circuit instead of dividing by zero
    pub fn compute(ledger: &ExpenseLedger) -> Option<Self> {
        let records = ledger.records();
        let stats = summary_stats(records)?;
        let snapshot = Self {
            categories: category_totals(records),
            daily: daily_totals(records),
            stats,
        };
        debug!(
            records = snapshot.stats.count,
            categories = snapshot.categories.len(),
            days = snapshot.daily.len(),
            "Computed ledger snapshot"
        );
        Some(snapshot)
    }

    /// The category with the most spending
    pub fn top_category(&self) -> &CategoryAggregate {
        // A snapshot only exists for a non-empty ledger, so there is at least one category
        &self.categories[0]
    }

    /// Total spend divided by the inclusive day span
    pub fn daily_average(&self) -> f64 {
        self.stats.total / self.stats.span_days.max(1) as f64
    }
}
