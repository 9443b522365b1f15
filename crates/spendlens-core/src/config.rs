//! Advisor configuration
//!
//! Resolution order:
//! 1. Embedded default (`config/advisor.toml`, compiled into binary)
//! 2. Override file (explicit path, or ~/.local/share/spendlens/config/advisor.toml)
//! 3. Environment: `SPENDLENS_API_KEY`, `SPENDLENS_MODEL`, `SPENDLENS_BASE_URL`
//!
//! API keys only ever come from the environment.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::ai::Envelope;
use crate::error::{Error, Result};

/// Embedded default config
const DEFAULT_CONFIG: &str = include_str!("../../../config/advisor.toml");

pub const ENV_API_KEY: &str = "SPENDLENS_API_KEY";
pub const ENV_MODEL: &str = "SPENDLENS_MODEL";
pub const ENV_BASE_URL: &str = "SPENDLENS_BASE_URL";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RECENT_LIMIT: usize = 10;
const DEFAULT_MAX_TOKENS: u32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Secret API key. Debug and Display never show the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters, for `config` output
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// One chat-completion provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub envelope: Envelope,
    pub base_url: String,
    pub path: String,
    /// Header carrying the key, e.g. `Authorization` or `x-api-key`
    pub auth_header: Option<String>,
    /// Prefix before the key, e.g. `Bearer`
    pub auth_scheme: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub requires_key: bool,
}

impl ProviderConfig {
    /// Full endpoint URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Where the file layer of the config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Embedded => write!(f, "embedded default"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fully resolved advisor configuration
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub provider_name: String,
    pub provider: ProviderConfig,
    pub timeout: Duration,
    pub recent_limit: usize,
    pub api_key: Option<ApiKey>,
    pub source: ConfigSource,
}

impl AdvisorConfig {
    /// Resolve config from files and the process environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(override_path, |name| std::env::var(name).ok())
    }

    /// Resolve config with a custom environment lookup
    pub fn load_with_env<F>(override_path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (content, source) = read_config_file(override_path)?;
        let mut config = parse_config(&content, source)?;
        config.apply_env(env);
        Ok(config)
    }

    /// Parse config from TOML content without touching the environment
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content, ConfigSource::Embedded)
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            env(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(ApiKey::new(key));
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.provider.model = model;
        }
        if let Some(base_url) = non_empty(ENV_BASE_URL) {
            self.provider.base_url = base_url;
        }
    }

    /// The API key, or a config error when the provider needs one and none is set
    pub fn require_api_key(&self) -> Result<Option<&ApiKey>> {
        match (&self.api_key, self.provider.requires_key) {
            (Some(key), _) => Ok(Some(key)),
            (None, false) => Ok(None),
            (None, true) => Err(Error::Config(format!(
                "provider '{}' requires an API key; set {}",
                self.provider_name, ENV_API_KEY
            ))),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendlens").join("config").join("advisor.toml"))
}

/// Read the override file if present, otherwise the embedded default.
/// An explicit path that does not exist is an error.
fn read_config_file(override_path: Option<&Path>) -> Result<(String, ConfigSource)> {
    if let Some(path) = override_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        return Ok((content, ConfigSource::File(path.to_path_buf())));
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "Using advisor config override");
            let content = fs::read_to_string(&default_path)?;
            return Ok((content, ConfigSource::File(default_path)));
        }
    }

    Ok((DEFAULT_CONFIG.to_string(), ConfigSource::Embedded))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    provider: Option<String>,
    timeout_secs: Option<u64>,
    recent_limit: Option<usize>,
    providers: Option<HashMap<String, RawProvider>>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    envelope: Option<Envelope>,
    base_url: Option<String>,
    path: Option<String>,
    auth_header: Option<String>,
    auth_scheme: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    requires_key: Option<bool>,
}

fn parse_config(content: &str, source: ConfigSource) -> Result<AdvisorConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let provider_name = raw.provider.unwrap_or_else(|| "openai".to_string());
    let mut providers = raw.providers.unwrap_or_default();
    let provider = providers.remove(&provider_name).ok_or_else(|| {
        Error::Config(format!(
            "provider '{}' has no [providers.{}] section",
            provider_name, provider_name
        ))
    })?;

    let envelope = provider.envelope.unwrap_or_default();
    let base_url = provider
        .base_url
        .ok_or_else(|| Error::Config(format!("provider '{}' is missing base_url", provider_name)))?;
    let model = provider
        .model
        .ok_or_else(|| Error::Config(format!("provider '{}' is missing model", provider_name)))?;

    let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(Error::Config("timeout_secs must be at least 1".into()));
    }

    Ok(AdvisorConfig {
        provider: ProviderConfig {
            path: provider
                .path
                .unwrap_or_else(|| envelope.default_path().to_string()),
            auth_header: provider.auth_header,
            auth_scheme: provider.auth_scheme,
            max_tokens: provider.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: provider.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            requires_key: provider.requires_key.unwrap_or(true),
            envelope,
            base_url,
            model,
        },
        provider_name,
        timeout: Duration::from_secs(timeout_secs),
        recent_limit: raw.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        api_key: None,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_embedded_default_parses() {
        let config = AdvisorConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.provider.envelope, Envelope::OpenAi);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.recent_limit, 10);
        assert!(config.provider.requires_key);
        assert!(config.api_key.is_none());
        assert_eq!(
            config.provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = AdvisorConfig::from_toml(DEFAULT_CONFIG).unwrap();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = AdvisorConfig::load_with_env(
            Some(&path),
            env_from(&[
                (ENV_API_KEY, "sk-test-123456789"),
                (ENV_MODEL, "gpt-test"),
                (ENV_BASE_URL, "http://127.0.0.1:9999"),
            ]),
        )
        .unwrap();

        assert_eq!(config.source, ConfigSource::File(path));
        assert_eq!(config.provider.model, "gpt-test");
        assert_eq!(
            config.provider.endpoint(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
        let key = config.require_api_key().unwrap().unwrap();
        assert_eq!(key.expose(), "sk-test-123456789");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config =
            AdvisorConfig::load_with_env(Some(&path), env_from(&[(ENV_API_KEY, "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_keyless_provider() {
        let config = AdvisorConfig::from_toml(
            r#"
            provider = "local"
            recent_limit = 5

            [providers.local]
            envelope = "ollama"
            base_url = "http://localhost:11434"
            model = "llama3.2"
            requires_key = false
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.envelope, Envelope::Ollama);
        assert_eq!(config.provider.path, "/api/generate");
        assert_eq!(config.recent_limit, 5);
        assert!(config.require_api_key().unwrap().is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = AdvisorConfig::from_toml("provider = \"nope\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_explicit_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            AdvisorConfig::load_with_env(Some(&dir.path().join("missing.toml")), env_from(&[]))
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_api_key_is_masked() {
        let key = ApiKey::new("sk-abcdefghijklmnop");
        assert_eq!(key.masked(), "****mnop");
        assert!(!format!("{:?}", key).contains("abcdef"));
        assert_eq!(ApiKey::new("short").masked(), "****");
    }
}
