//! Pluggable chat-completion backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: one prompt in, one reply out
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpChatBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AdvisorConfig::load(None)?;
//! let client = AIClient::from_config(&config)?;
//! let reply = client.complete("How can I spend less on food?").await?;
//! ```

mod envelope;
mod http;
mod mock;

pub use envelope::{Envelope, ANTHROPIC_VERSION};
pub use http::HttpChatBackend;
pub use mock::MockBackend;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::AdvisorConfig;
use crate::error::Result;

/// Trait defining the interface for all chat-completion backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one combined prompt and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model name used for requests
    fn model(&self) -> &str;

    /// Host (base URL) requests go to
    fn host(&self) -> &str;

    /// Longest a single request may take
    fn timeout(&self) -> Duration;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// Remote chat-completion endpoint
    Http(HttpChatBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an HTTP client from resolved config
    ///
    /// Returns `Error::Config` when the provider requires an API key and
    /// none was supplied.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        HttpChatBackend::from_config(config).map(AIClient::Http)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Http(b) => b.complete(prompt).await,
            AIClient::Mock(b) => b.complete(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Http(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Http(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }

    fn timeout(&self) -> Duration {
        match self {
            AIClient::Http(b) => b.timeout(),
            AIClient::Mock(b) => b.timeout(),
        }
    }
}
