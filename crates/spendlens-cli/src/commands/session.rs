//! Interactive session
//!
//! A line-oriented loop over one `Session`. Command errors are printed inline
//! and never end the loop; only `quit`/`exit` or end of input do.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use spendlens_core::models::{format_money, DATE_FORMAT};
use spendlens_core::{Advice, Advisor, ExportOrder, NewExpense, Session};

use super::advisor::build_advisor;
use super::ledger::{export_to_file, load_session, write_alerts, write_summary, write_transactions};
use crate::cli::LedgerArgs;

const DEFAULT_LIST_LIMIT: usize = 20;

const HELP: &str = "\
Commands:
  add DATE CATEGORY AMOUNT DESCRIPTION...   Add an expense (DATE is YYYY-MM-DD)
  list [N]                                  Show the newest N expenses (default 20)
  summary                                   Totals, categories, daily trend
  alerts                                    Smart alerts
  export PATH [date-desc|date-asc|entry]    Save the ledger as CSV
  import PATH                               Append expenses from a CSV
  ask QUESTION...                           Ask the AI advisor
  history                                   Show advisor answers from this session
  clear                                     Remove all expenses
  help                                      Show this help
  quit                                      Leave the session";

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    Continue,
    Quit,
}

pub struct Shell {
    session: Session,
    config_path: Option<PathBuf>,
    advisor: Option<Advisor>,
}

impl Shell {
    /// The advisor is built from config on the first `ask`
    pub fn new(session: Session, config_path: Option<&Path>) -> Self {
        Self {
            session,
            config_path: config_path.map(Path::to_path_buf),
            advisor: None,
        }
    }

    /// Use an already-built advisor
    pub fn with_advisor(session: Session, advisor: Advisor) -> Self {
        Self {
            session,
            config_path: None,
            advisor: Some(advisor),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command line
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<ShellControl> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "" => {}
            "add" => self.add(rest, out)?,
            "list" | "ls" => {
                let limit = if rest.is_empty() {
                    DEFAULT_LIST_LIMIT
                } else {
                    match rest.parse() {
                        Ok(n) => n,
                        Err(_) => {
                            writeln!(out, "❌ '{}' is not a number", rest)?;
                            return Ok(ShellControl::Continue);
                        }
                    }
                };
                write_transactions(out, self.session.ledger(), limit)?;
            }
            "summary" => write_summary(out, &self.session)?,
            "alerts" => write_alerts(out, &self.session.alerts())?,
            "export" => self.export(rest, out)?,
            "import" => self.import(rest, out)?,
            "ask" => self.ask(rest, out).await?,
            "history" => self.history(out)?,
            "clear" => {
                let removed = self.session.ledger().len();
                self.session.clear();
                writeln!(out, "🗑️  Cleared {} expenses", removed)?;
            }
            "help" | "?" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(ShellControl::Quit),
            other => writeln!(out, "❌ Unknown command '{}'. Type `help` for commands.", other)?,
        }

        Ok(ShellControl::Continue)
    }

    fn add<W: Write>(&mut self, args: &str, out: &mut W) -> io::Result<()> {
        let mut parts = args.split_whitespace();
        let (Some(date), Some(category), Some(amount)) = (parts.next(), parts.next(), parts.next())
        else {
            writeln!(out, "❌ Usage: add DATE CATEGORY AMOUNT DESCRIPTION...")?;
            return Ok(());
        };
        let description = parts.collect::<Vec<_>>().join(" ");

        let form = NewExpense::new(date, category, amount, description);
        match self.session.add_expense(&form) {
            Ok(record) => writeln!(
                out,
                "✅ Added: {} - {} ({}, {})",
                record.description,
                format_money(record.amount),
                record.category,
                record.date.format(DATE_FORMAT)
            ),
            Err(e) => writeln!(out, "❌ {}", e),
        }
    }

    fn export<W: Write>(&self, args: &str, out: &mut W) -> io::Result<()> {
        let mut parts = args.split_whitespace();
        let Some(path) = parts.next() else {
            return writeln!(out, "❌ Usage: export PATH [date-desc|date-asc|entry]");
        };
        let order = match parts.next().map(str::parse::<ExportOrder>) {
            None => ExportOrder::default(),
            Some(Ok(order)) => order,
            Some(Err(e)) => return writeln!(out, "❌ {}", e),
        };

        match export_to_file(&self.session, Path::new(path), order) {
            Ok(rows) => writeln!(out, "📥 Exported {} expenses to {}", rows, path),
            Err(e) => writeln!(out, "❌ {:#}", e),
        }
    }

    fn import<W: Write>(&mut self, path: &str, out: &mut W) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(out, "❌ Usage: import PATH");
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return writeln!(out, "❌ Failed to open {}: {}", path, e),
        };
        match self.session.import_csv(file) {
            Ok(count) => writeln!(out, "✅ Imported {} expenses from {}", count, path),
            Err(e) => writeln!(out, "❌ {}", e),
        }
    }

    async fn ask<W: Write>(&mut self, question: &str, out: &mut W) -> io::Result<()> {
        if self.advisor.is_none() {
            match build_advisor(self.config_path.as_deref(), None) {
                Ok(advisor) => self.advisor = Some(advisor),
                Err(e) => return writeln!(out, "❌ {:#}", e),
            }
        }
        let Some(ref advisor) = self.advisor else {
            return Ok(());
        };

        match self.session.ask(advisor, question).await {
            Advice::Reply(reply) => writeln!(out, "🤖 {}", reply),
            failed => writeln!(out, "{}", failed),
        }
    }

    fn history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let history = self.session.history();
        if history.is_empty() {
            return writeln!(out, "   No questions asked yet.");
        }
        for entry in history {
            writeln!(out, "🧑 {}", entry.question)?;
            writeln!(out, "🤖 {}", entry.answer)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Read commands until `quit` or end of input
pub async fn run_shell<R: BufRead, W: Write>(
    shell: &mut Shell,
    input: R,
    out: &mut W,
    prompt: bool,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "spendlens> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if shell.execute(&line?, out).await? == ShellControl::Quit {
            break;
        }
    }
    Ok(())
}

pub async fn cmd_session(config_path: Option<&Path>, args: &LedgerArgs) -> Result<()> {
    let session = load_session(args)?;
    tracing::info!(expenses = session.ledger().len(), "Session started");

    println!("💰 SpendLens session. Type `help` for commands, `quit` to leave.");
    let mut shell = Shell::new(session, config_path);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_shell(&mut shell, stdin.lock(), &mut stdout.lock(), true).await?;

    println!("👋 Bye");
    Ok(())
}
