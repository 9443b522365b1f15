//! In-memory expense ledger
//!
//! The ledger is append-only: records are never edited or removed one at a
//! time, only cleared as a whole. Insertion order is entry order, which is
//! not necessarily date order.

use serde::Serialize;

use crate::models::ExpenseRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseLedger {
    records: Vec<ExpenseRecord>,
}

impl ExpenseLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding the given records, in order
    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }

    /// Append a record and return a reference to it
    pub fn append(&mut self, record: ExpenseRecord) -> &ExpenseRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Append many records, keeping their order
    pub fn extend(&mut self, records: impl IntoIterator<Item = ExpenseRecord>) {
        self.records.extend(records);
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records in entry order
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by date. The sort is stable, so records sharing a date
    /// keep their entry order.
    pub fn sorted_by_date(&self, descending: bool) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.records.iter().collect();
        if descending {
            sorted.sort_by(|a, b| b.date.cmp(&a.date));
        } else {
            sorted.sort_by(|a, b| a.date.cmp(&b.date));
        }
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn record(day: u32, amount: f64, description: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            Category::Food,
            amount,
            description,
        )
        .unwrap()
    }

    #[test]
    fn test_append_then_clear_is_empty() {
        let mut ledger =
            ExpenseLedger::with_records(vec![record(1, 10.0, "a"), record(2, 20.0, "b")]);
        ledger.append(record(3, 30.0, "c"));
        assert_eq!(ledger.len(), 3);

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_append_keeps_entry_order() {
        let mut ledger = ExpenseLedger::new();
        ledger.append(record(5, 10.0, "later"));
        let appended = ledger.append(record(1, 20.0, "earlier"));
        assert_eq!(appended.description, "earlier");

        let descriptions: Vec<_> = ledger
            .records()
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["later", "earlier"]);
    }

    #[test]
    fn test_sorted_by_date_is_stable() {
        let ledger = ExpenseLedger::with_records(vec![
            record(2, 1.0, "first-on-2nd"),
            record(1, 2.0, "only-on-1st"),
            record(2, 3.0, "second-on-2nd"),
        ]);

        let asc: Vec<_> = ledger
            .sorted_by_date(false)
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(asc, vec!["only-on-1st", "first-on-2nd", "second-on-2nd"]);

        let desc: Vec<_> = ledger
            .sorted_by_date(true)
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(desc, vec!["first-on-2nd", "second-on-2nd", "only-on-1st"]);
    }
}
