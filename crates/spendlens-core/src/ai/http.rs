//! HTTP chat-completion backend
//!
//! One POST per prompt to `base_url + path`. The envelope flavour shapes the
//! body and the reply extraction; the auth header name and scheme come from
//! config. The reqwest client carries the request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{AdvisorConfig, ApiKey, ProviderConfig};
use crate::error::{Error, Result};

use super::AIBackend;

/// Upper bound on how much of an error body is kept
const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct HttpChatBackend {
    http_client: Client,
    provider: ProviderConfig,
    api_key: Option<ApiKey>,
    timeout: Duration,
}

impl HttpChatBackend {
    /// Build a backend for one provider
    pub fn new(
        provider: ProviderConfig,
        api_key: Option<ApiKey>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            provider,
            api_key,
            timeout,
        })
    }

    /// Build from resolved config; fails if the provider needs a key and none is set
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.cloned();
        Self::new(config.provider.clone(), api_key, config.timeout)
    }

    fn auth_value(&self, key: &ApiKey) -> String {
        match self.provider.auth_scheme.as_deref() {
            Some(scheme) if !scheme.is_empty() => format!("{} {}", scheme, key.expose()),
            _ => key.expose().to_string(),
        }
    }
}

#[async_trait]
impl AIBackend for HttpChatBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let envelope = self.provider.envelope;
        let body = envelope.request_body(
            &self.provider.model,
            prompt,
            self.provider.max_tokens,
            self.provider.temperature,
        )?;
        let url = self.provider.endpoint();

        debug!(
            url = %url,
            model = %self.provider.model,
            envelope = %envelope,
            prompt_len = prompt.len(),
            "Sending advisory request"
        );

        let mut req_builder = self.http_client.post(&url).json(&body);

        if let Some(ref key) = self.api_key {
            let header = self
                .provider
                .auth_header
                .as_deref()
                .unwrap_or("Authorization");
            req_builder = req_builder.header(header, self.auth_value(key));
        }
        for (name, value) in envelope.extra_headers() {
            req_builder = req_builder.header(*name, *value);
        }

        let response = req_builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "Advisory response received"
        );
        envelope.extract_reply(&text)
    }

    fn model(&self) -> &str {
        &self.provider.model
    }

    fn host(&self) -> &str {
        &self.provider.base_url
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
