//! Mock backend for testing
//!
//! Returns a canned reply (or a canned failure) and records every prompt it
//! was asked, so tests can check what the advisor sent.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{Error, Result};

use super::AIBackend;

const DEFAULT_REPLY: &str = "Your spending looks balanced. Keep tracking daily expenses.";

#[derive(Clone)]
pub struct MockBackend {
    reply: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a mock that answers every prompt with a default reply
    pub fn new() -> Self {
        Self::with_reply(DEFAULT_REPLY)
    }

    /// Create a mock that answers every prompt with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose every call fails like an unreachable server
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match self.reply {
            Some(ref reply) => Ok(reply.clone()),
            None => Err(Error::Provider {
                status: 503,
                body: "mock backend unavailable".into(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let mock = MockBackend::with_reply("ok");
        assert_eq!(mock.complete("first").await.unwrap(), "ok");
        assert_eq!(mock.prompts(), vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing();
        assert!(matches!(
            mock.complete("q").await,
            Err(Error::Provider { status: 503, .. })
        ));
    }
}
