//! Advisory client
//!
//! Renders the ledger summary and the user's question into one prompt, sends
//! it to the configured backend and hands back the reply verbatim. Failures
//! never propagate: they become a short message for inline display.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient};
use crate::config::{AdvisorConfig, DEFAULT_RECENT_LIMIT};
use crate::context::LedgerSummary;
use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

/// Outcome of one advisory call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    /// Reply text from the provider, unmodified
    Reply(String),
    /// Human-readable reason the call failed
    Failed(String),
}

impl Advice {
    pub fn is_reply(&self) -> bool {
        matches!(self, Advice::Reply(_))
    }

    /// The reply or the error message
    pub fn text(&self) -> &str {
        match self {
            Advice::Reply(text) | Advice::Failed(text) => text,
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::Reply(text) => write!(f, "{}", text),
            Advice::Failed(reason) => write!(f, "❌ {}", reason),
        }
    }
}

pub struct Advisor {
    client: AIClient,
    prompts: Arc<RwLock<PromptLibrary>>,
    recent_limit: usize,
}

impl Advisor {
    /// Create an advisor around an existing client, using embedded prompts
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            prompts: Arc::new(RwLock::new(PromptLibrary::embedded_only())),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Create an advisor from resolved config, with user prompt overrides enabled
    ///
    /// Fails with `Error::Config` when the provider needs an API key and none is set.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let client = AIClient::from_config(config)?;
        Ok(Self {
            client,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
            recent_limit: config.recent_limit,
        })
    }

    /// Change how many recent transactions go into the prompt
    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Render the combined prompt for a question
    pub fn build_prompt(&self, question: &str, summary: &LedgerSummary) -> Result<String> {
        let summary_vars = summary.to_template_vars();
        let mut vars: HashMap<&str, &str> = summary_vars
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        vars.insert("question", question);

        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Prompt library lock poisoned".into()))?;
        let prompt = prompts.get(PromptId::FinancialAdvice)?;
        Ok(prompt.render_combined(&vars))
    }

    /// Ask the advisor a question about the summarized ledger
    pub async fn advise(&self, question: &str, summary: &LedgerSummary) -> Advice {
        let question = question.trim();
        if question.is_empty() {
            return Advice::Failed("Please enter a question.".into());
        }

        let prompt = match self.build_prompt(question, summary) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Failed to build advisor prompt");
                return Advice::Failed(format!("Could not prepare the question: {}", e));
            }
        };

        debug!(
            model = self.client.model(),
            host = self.client.host(),
            records = summary.count,
            "Requesting advice"
        );

        match self.client.complete(&prompt).await {
            Ok(reply) => Advice::Reply(reply),
            Err(e) => {
                warn!(error = %e, host = self.client.host(), "Advisory call failed");
                Advice::Failed(self.describe_failure(&e))
            }
        }
    }

    fn describe_failure(&self, err: &Error) -> String {
        match err {
            Error::Http(e) if e.is_timeout() => format!(
                "The advisor did not answer within {} seconds. Please try again.",
                self.client.timeout().as_secs_f64()
            ),
            Error::Http(e) if e.is_connect() => format!(
                "Could not reach the advisor at {}.",
                self.client.host()
            ),
            Error::Http(_) => "The advisor request failed. Please try again.".to_string(),
            Error::Provider { status, .. } if *status == 401 || *status == 403 => format!(
                "The advisor rejected the API key (HTTP {}). Check SPENDLENS_API_KEY.",
                status
            ),
            Error::Provider { status, .. } if *status == 429 => {
                "The advisor is rate limiting requests (HTTP 429). Please wait and try again."
                    .to_string()
            }
            Error::Provider { status, .. } => {
                format!("The advisor returned an error (HTTP {}).", status)
            }
            Error::Json(_) | Error::InvalidData(_) => {
                "The advisor sent a response that could not be read.".to_string()
            }
            other => format!("Advisor error: {}", other),
        }
    }
}
