//! Session context
//!
//! One `Session` owns one ledger and one chat history. Every operation takes
//! the session explicitly; there is no process-wide state.

use std::io::Read;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::advisor::{Advice, Advisor};
use crate::aggregate::LedgerSnapshot;
use crate::context::LedgerSummary;
use crate::error::Result;
use crate::export::{export_csv, ExportOrder};
use crate::import::parse_csv;
use crate::insights::{Alert, AlertEngine};
use crate::ledger::ExpenseLedger;
use crate::models::{Category, ChatEntry, ExpenseRecord, NewExpense};

pub struct Session {
    ledger: ExpenseLedger,
    history: Vec<ChatEntry>,
    engine: AlertEngine,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start with an empty ledger and no chat history
    pub fn new() -> Self {
        Self {
            ledger: ExpenseLedger::new(),
            history: Vec::new(),
            engine: AlertEngine::new(),
        }
    }

    /// Start with the three demo expenses
    pub fn with_sample_data() -> Self {
        let mut session = Self::new();
        session.ledger.extend(sample_records());
        session
    }

    pub fn ledger(&self) -> &ExpenseLedger {
        &self.ledger
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    /// Validate a form submission and append it
    pub fn add_expense(&mut self, form: &NewExpense) -> Result<&ExpenseRecord> {
        let record = form.validate()?;
        info!(
            date = %record.date,
            category = %record.category,
            amount = record.amount,
            "Added expense"
        );
        Ok(self.ledger.append(record))
    }

    /// Empty the ledger. Chat history is kept.
    pub fn clear(&mut self) {
        info!(removed = self.ledger.len(), "Cleared ledger");
        self.ledger.clear();
    }

    /// Aggregates for the current ledger, None when it is empty
    pub fn snapshot(&self) -> Option<LedgerSnapshot> {
        LedgerSnapshot::compute(&self.ledger)
    }

    /// Smart alerts for the current ledger
    pub fn alerts(&self) -> Vec<Alert> {
        self.engine.evaluate(&self.ledger)
    }

    pub fn export_csv(&self, order: ExportOrder) -> Result<String> {
        export_csv(&self.ledger, order)
    }

    /// Append every row of a ledger CSV. The whole file is validated first,
    /// so a bad row leaves the ledger untouched.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        let records = parse_csv(reader)?;
        let count = records.len();
        self.ledger.extend(records);
        info!(count, total = self.ledger.len(), "Imported expenses");
        Ok(count)
    }

    /// Ask the advisor about the current ledger. Only successful replies are
    /// added to the chat history.
    pub async fn ask(&mut self, advisor: &Advisor, question: &str) -> Advice {
        let summary = LedgerSummary::from_ledger(&self.ledger, advisor.recent_limit());
        let advice = advisor.advise(question, &summary).await;

        if let Advice::Reply(ref answer) = advice {
            self.history.push(ChatEntry {
                question: question.trim().to_string(),
                answer: answer.clone(),
                asked_at: Utc::now(),
            });
        }

        advice
    }
}

fn sample_records() -> Vec<ExpenseRecord> {
    [
        ((2026, 1, 1), Category::Food, 150.0, "Breakfast"),
        ((2026, 1, 5), Category::Transport, 50.0, "Auto"),
        ((2026, 1, 10), Category::Shopping, 500.0, "New shirt"),
    ]
    .into_iter()
    .filter_map(|((y, m, d), category, amount, description)| {
        let date = NaiveDate::from_ymd_opt(y, m, d)?;
        ExpenseRecord::new(date, category, amount, description).ok()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIClient, MockBackend};
    use crate::error::Error;

    #[test]
    fn test_sample_data() {
        let session = Session::with_sample_data();
        assert_eq!(session.ledger().len(), 3);

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.stats.total, 700.0);
        assert_eq!(snapshot.top_category().category, Category::Shopping);
    }

    #[test]
    fn test_add_then_clear() {
        let mut session = Session::new();
        session
            .add_expense(&NewExpense::new("2026-03-01", "Bills", "1,200", "Electricity"))
            .unwrap();
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.ledger().records()[0].amount, 1200.0);

        session.clear();
        assert!(session.ledger().is_empty());
        assert!(session.snapshot().is_none());
        assert!(session.alerts().is_empty());
    }

    #[test]
    fn test_invalid_form_never_reaches_ledger() {
        let mut session = Session::new();
        for form in [
            NewExpense::new("2026-13-01", "Food", "10", "Tea"),
            NewExpense::new("2026-01-01", "Rent", "10", "Tea"),
            NewExpense::new("2026-01-01", "Food", "-5", "Tea"),
            NewExpense::new("2026-01-01", "Food", "10", "  "),
        ] {
            assert!(matches!(
                session.add_expense(&form),
                Err(Error::Validation { .. })
            ));
        }
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_import_failure_leaves_ledger() {
        let mut session = Session::with_sample_data();
        let data = "Date,Category,Amount,Description\n\
                    2026-02-01,Food,10,Tea\n\
                    2026-02-02,Food,oops,Coffee\n";
        assert!(session.import_csv(data.as_bytes()).is_err());
        assert_eq!(session.ledger().len(), 3);
    }

    #[test]
    fn test_export_import_round_trip() {
        let session = Session::with_sample_data();
        let csv = session.export_csv(ExportOrder::Entry).unwrap();

        let mut restored = Session::new();
        assert_eq!(restored.import_csv(csv.as_bytes()).unwrap(), 3);
        assert_eq!(restored.ledger(), session.ledger());
    }

    #[test]
    fn test_round_trip_keeps_fractional_amounts() {
        let mut session = Session::new();
        session
            .add_expense(&NewExpense::new("2026-03-01", "Food", "12.345", "Chai"))
            .unwrap();
        session
            .add_expense(&NewExpense::new("2026-03-02", "Other", "0.004", "Rounding"))
            .unwrap();
        let csv = session.export_csv(ExportOrder::Entry).unwrap();

        let mut restored = Session::new();
        restored.import_csv(csv.as_bytes()).unwrap();
        assert_eq!(restored.ledger(), session.ledger());
        assert_eq!(restored.ledger().records()[1].amount, 0.004);
    }

    #[tokio::test]
    async fn test_ask_records_successful_reply() {
        let mut session = Session::with_sample_data();
        let mock = MockBackend::with_reply("Spend less on shirts.");
        let advisor = Advisor::new(AIClient::Mock(mock));

        let advice = session.ask(&advisor, "  Where does my money go? ").await;
        assert_eq!(advice, Advice::Reply("Spend less on shirts.".into()));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].question, "Where does my money go?");
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_history_and_ledger() {
        let mut session = Session::with_sample_data();
        let advisor = Advisor::new(AIClient::Mock(MockBackend::failing()));

        let advice = session.ask(&advisor, "Help?").await;
        assert!(!advice.is_reply());
        assert!(session.history().is_empty());
        assert_eq!(session.ledger().len(), 3);
    }

    #[tokio::test]
    async fn test_http_500_leaves_history_unchanged() {
        use crate::ai::{Envelope, HttpChatBackend};
        use crate::config::ProviderConfig;
        use crate::test_utils::MockChatServer;
        use std::time::Duration;

        let server = MockChatServer::with_status(500).await;
        let provider = ProviderConfig {
            envelope: Envelope::OpenAi,
            base_url: server.url(),
            path: Envelope::OpenAi.default_path().to_string(),
            auth_header: None,
            auth_scheme: None,
            model: "gpt-test".into(),
            max_tokens: 64,
            temperature: 0.0,
            requires_key: false,
        };
        let backend = HttpChatBackend::new(provider, None, Duration::from_secs(5)).unwrap();
        let advisor = Advisor::new(AIClient::Http(backend));

        let mut session = Session::with_sample_data();
        let advice = session.ask(&advisor, "Am I overspending?").await;

        assert_eq!(
            advice,
            Advice::Failed("The advisor returned an error (HTTP 500).".into())
        );
        assert!(session.history().is_empty());
        assert_eq!(session.ledger().len(), 3);
        assert_eq!(server.requests().len(), 1);
    }
}
