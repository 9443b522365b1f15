//! Ledger commands: summary, alerts, export
//!
//! The `write_*` renderers take any writer so the interactive session can
//! reuse them.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use spendlens_core::models::{format_amount, format_money, DATE_FORMAT};
use spendlens_core::{Alert, ExpenseLedger, ExportOrder, Session};

use super::truncate;
use crate::cli::LedgerArgs;

/// Widest bar in the daily trend chart
const TREND_BAR_WIDTH: usize = 30;

/// Build a session from `--sample` and/or `--file`
pub fn load_session(args: &LedgerArgs) -> Result<Session> {
    let mut session = if args.sample {
        Session::with_sample_data()
    } else {
        Session::new()
    };

    if let Some(ref path) = args.file {
        let file = File::open(path)
            .with_context(|| format!("Failed to open ledger file {}", path.display()))?;
        let count = session
            .import_csv(file)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        tracing::debug!(count, path = %path.display(), "Loaded ledger file");
    }

    Ok(session)
}

pub fn write_summary<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    let Some(snapshot) = session.snapshot() else {
        writeln!(out, "👋 No expenses yet. Add one with `add` or load a CSV with --file.")?;
        return Ok(());
    };
    let stats = &snapshot.stats;

    writeln!(out)?;
    writeln!(out, "💰 Spending Summary")?;
    writeln!(
        out,
        "   Period: {} to {} ({} days)",
        stats.first_date, stats.last_date, stats.span_days
    )?;
    writeln!(out, "   ─────────────────────────────────────────────────────────────")?;
    writeln!(out, "   💵 Total Spent:     {}", format_money(stats.total))?;
    writeln!(out, "   📊 Avg Transaction: {}", format_money(stats.mean))?;
    writeln!(out, "   📈 Highest:         {}", format_money(stats.max))?;
    writeln!(out, "   📉 Lowest:          {}", format_money(stats.min))?;
    writeln!(out, "   ➗ Median:          {}", format_money(stats.median))?;
    writeln!(out, "   🔢 Total Entries:   {}", stats.count)?;

    writeln!(out)?;
    writeln!(out, "📊 Spending by Category")?;
    writeln!(out, "   {:25} │ {:>10} │ {:>6} │ {:>5}", "Category", "Amount", "%", "Count")?;
    writeln!(out, "   ──────────────────────────┼────────────┼────────┼───────")?;
    for cat in &snapshot.categories {
        writeln!(
            out,
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            cat.category.as_str(),
            cat.total,
            cat.percentage,
            cat.count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "📈 Daily Spending Trend")?;
    let peak = snapshot
        .daily
        .iter()
        .map(|d| d.total)
        .fold(0.0_f64, f64::max);
    for day in &snapshot.daily {
        let width = if peak > 0.0 {
            ((day.total / peak) * TREND_BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            out,
            "   {} │ {:>10.2} │ {}",
            day.date.format(DATE_FORMAT),
            day.total,
            "█".repeat(width)
        )?;
    }

    let top = snapshot.top_category();
    writeln!(out)?;
    writeln!(out, "💡 Insights")?;
    writeln!(
        out,
        "   Top Category:  {} {} ({:.1}%)",
        top.category,
        format_money(top.total),
        top.percentage
    )?;
    writeln!(out, "   Daily Average: {}", format_money(snapshot.daily_average()))?;

    Ok(())
}

pub fn write_alerts<W: Write>(out: &mut W, alerts: &[Alert]) -> io::Result<()> {
    if alerts.is_empty() {
        writeln!(out, "✅ No alerts. Add some expenses to see spending patterns.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "🔔 Smart Alerts")?;
    writeln!(out, "   ─────────────────────────────────────────────────────────────")?;
    for alert in alerts {
        writeln!(out, "   {} {}", alert.severity.icon(), alert.title)?;
        writeln!(out, "      {}", alert.message)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Transaction table, newest first
pub fn write_transactions<W: Write>(
    out: &mut W,
    ledger: &ExpenseLedger,
    limit: usize,
) -> io::Result<()> {
    if ledger.is_empty() {
        writeln!(out, "   No expenses recorded.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "📋 Transactions ({} total)", ledger.len())?;
    writeln!(out, "   {:10} │ {:13} │ {:>10} │ Description", "Date", "Category", "Amount")?;
    writeln!(out, "   ───────────┼───────────────┼────────────┼────────────────────────")?;
    for record in ledger.sorted_by_date(true).into_iter().take(limit) {
        writeln!(
            out,
            "   {} │ {:13} │ {:>10} │ {}",
            record.date.format(DATE_FORMAT),
            record.category.as_str(),
            format_amount(record.amount),
            truncate(&record.description, 40)
        )?;
    }
    if ledger.len() > limit {
        writeln!(out, "   ... and {} more", ledger.len() - limit)?;
    }

    Ok(())
}

/// Write an export to disk, returning the number of rows
pub fn export_to_file(session: &Session, output: &Path, order: ExportOrder) -> Result<usize> {
    let csv = session.export_csv(order).context("Failed to export ledger")?;
    fs::write(output, csv).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(session.ledger().len())
}

pub fn cmd_summary(args: &LedgerArgs) -> Result<()> {
    let session = load_session(args)?;
    let stdout = io::stdout();
    write_summary(&mut stdout.lock(), &session)?;
    Ok(())
}

pub fn cmd_alerts(args: &LedgerArgs) -> Result<()> {
    let session = load_session(args)?;
    let stdout = io::stdout();
    write_alerts(&mut stdout.lock(), &session.alerts())?;
    Ok(())
}

pub fn cmd_export(args: &LedgerArgs, output: &Path, order: &str) -> Result<usize> {
    let order: ExportOrder = order.parse().map_err(anyhow::Error::msg)?;
    let session = load_session(args)?;
    let rows = export_to_file(&session, output, order)?;

    println!("📥 Exported {} expenses to {} ({})", rows, output.display(), order);
    Ok(rows)
}
