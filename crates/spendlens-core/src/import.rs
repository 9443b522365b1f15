//! CSV import for ledger files
//!
//! Reads the same `Date,Category,Amount,Description` layout the exporter
//! writes. Columns are matched by header name (case-insensitive) so column
//! order does not matter. Every row goes through the same validation as the
//! entry form; the first bad row aborts the import.

use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, NewExpense};

/// Header names, in export order
pub const CSV_HEADERS: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// Column positions resolved from a header row
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
    description: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::Import {
                    line: 1,
                    message: format!("missing '{}' column", name),
                })
        };

        Ok(Self {
            date: find(CSV_HEADERS[0])?,
            category: find(CSV_HEADERS[1])?,
            amount: find(CSV_HEADERS[2])?,
            description: find(CSV_HEADERS[3])?,
        })
    }
}

/// Parse ledger CSV into validated records, in file order
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        let form = NewExpense {
            date: field(columns.date),
            category: field(columns.category),
            amount: field(columns.amount),
            description: field(columns.description),
        };

        let record = form.validate().map_err(|e| Error::Import {
            line,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    debug!(count = records.len(), "Parsed ledger CSV");
    Ok(records)
}
