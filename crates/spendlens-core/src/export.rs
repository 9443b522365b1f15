//! CSV export for the ledger
//!
//! Output layout is `Date,Category,Amount,Description` with ISO dates, one
//! row per record. The file can be fed back through [`crate::import::parse_csv`].

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::import::CSV_HEADERS;
use crate::ledger::ExpenseLedger;
use crate::models::{format_amount, ExpenseRecord, DATE_FORMAT};

/// Row order for exported files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportOrder {
    /// Same order the expenses were entered
    Entry,
    /// Newest first (what the transaction table shows)
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
}

impl ExportOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportOrder::Entry => "entry",
            ExportOrder::DateDesc => "date-desc",
            ExportOrder::DateAsc => "date-asc",
        }
    }
}

impl fmt::Display for ExportOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExportOrder::Entry),
            "date-desc" => Ok(ExportOrder::DateDesc),
            "date-asc" => Ok(ExportOrder::DateAsc),
            _ => Err(format!(
                "Unknown export order: {}. Available: entry, date-desc, date-asc",
                s
            )),
        }
    }
}

/// Records of the ledger in the requested order
pub fn ordered_records(ledger: &ExpenseLedger, order: ExportOrder) -> Vec<&ExpenseRecord> {
    match order {
        ExportOrder::Entry => ledger.records().iter().collect(),
        ExportOrder::DateDesc => ledger.sorted_by_date(true),
        ExportOrder::DateAsc => ledger.sorted_by_date(false),
    }
}

/// Amount text for a CSV cell. Uses the table format unless that would
/// lose precision, then falls back to the shortest exact representation.
pub fn export_amount(amount: f64) -> String {
    let formatted = format_amount(amount);
    if formatted.parse::<f64>() == Ok(amount) {
        formatted
    } else {
        amount.to_string()
    }
}

/// Write the ledger as CSV to any writer
pub fn write_csv<W: Write>(ledger: &ExpenseLedger, order: ExportOrder, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;

    for record in ordered_records(ledger, order) {
        let date = record.date.format(DATE_FORMAT).to_string();
        let amount = export_amount(record.amount);
        wtr.write_record([
            date.as_str(),
            record.category.as_str(),
            amount.as_str(),
            record.description.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export the ledger as a CSV string
pub fn export_csv(ledger: &ExpenseLedger, order: ExportOrder) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(ledger, order, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_csv;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn record(date: (i32, u32, u32), category: Category, amount: f64, desc: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category,
            amount,
            desc,
        )
        .unwrap()
    }

    fn two_records() -> ExpenseLedger {
        ExpenseLedger::with_records(vec![
            record((2026, 1, 1), Category::Food, 150.0, "Breakfast"),
            record((2026, 1, 5), Category::Transport, 50.0, "Auto"),
        ])
    }

    #[test]
    fn test_export_two_rows_in_field_order() {
        let csv = export_csv(&two_records(), ExportOrder::Entry).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Date,Category,Amount,Description",
                "2026-01-01,Food,150,Breakfast",
                "2026-01-05,Transport,50,Auto",
            ]
        );
    }

    #[test]
    fn test_export_date_desc() {
        let csv = export_csv(&two_records(), ExportOrder::DateDesc).unwrap();
        let lines: Vec<_> = csv.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec!["2026-01-05,Transport,50,Auto", "2026-01-01,Food,150,Breakfast"]
        );
    }

    #[test]
    fn test_export_quotes_commas() {
        let ledger = ExpenseLedger::with_records(vec![record(
            (2026, 2, 1),
            Category::Shopping,
            12.5,
            "Shirt, blue",
        )]);
        let csv = export_csv(&ledger, ExportOrder::Entry).unwrap();
        assert!(csv.contains("2026-02-01,Shopping,12.50,\"Shirt, blue\""));
    }

    #[test]
    fn test_empty_ledger_exports_header_only() {
        let csv = export_csv(&ExpenseLedger::new(), ExportOrder::DateDesc).unwrap();
        assert_eq!(csv, "Date,Category,Amount,Description\n");
    }

    #[test]
    fn test_export_then_import_reproduces_records() {
        let ledger = ExpenseLedger::with_records(vec![
            record((2026, 1, 10), Category::Shopping, 499.99, "New \"shirt\""),
            record((2026, 1, 1), Category::Food, 150.0, "Breakfast"),
        ]);
        let csv = export_csv(&ledger, ExportOrder::Entry).unwrap();
        let imported = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(imported, ledger.records());
    }

    #[test]
    fn test_export_keeps_sub_cent_precision() {
        let ledger = ExpenseLedger::with_records(vec![
            record((2026, 3, 1), Category::Food, 12.345, "Chai"),
            record((2026, 3, 2), Category::Other, 0.004, "Rounding"),
            record((2026, 3, 3), Category::Bills, 12.5, "Fee"),
        ]);
        let csv = export_csv(&ledger, ExportOrder::Entry).unwrap();
        assert!(csv.contains("2026-03-01,Food,12.345,Chai"));
        assert!(csv.contains("2026-03-02,Other,0.004,Rounding"));
        assert!(csv.contains("2026-03-03,Bills,12.50,Fee"));

        let imported = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(imported, ledger.records());
    }

    #[test]
    fn test_export_amount() {
        assert_eq!(export_amount(150.0), "150");
        assert_eq!(export_amount(499.99), "499.99");
        assert_eq!(export_amount(0.1 + 0.2), (0.1_f64 + 0.2).to_string());
    }

    #[test]
    fn test_export_order_parse() {
        assert_eq!("date-asc".parse::<ExportOrder>().unwrap(), ExportOrder::DateAsc);
        assert!("sideways".parse::<ExportOrder>().is_err());
        assert_eq!(ExportOrder::default(), ExportOrder::DateDesc);
    }
}
