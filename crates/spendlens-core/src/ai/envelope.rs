//! Provider request/response envelopes
//!
//! Each flavour decides how a single prompt string is wrapped into a JSON
//! request body and where the reply text sits in the response JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Anthropic requires a pinned API version header
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// JSON envelope flavour of a chat-completion provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// `/v1/chat/completions`, reply in `choices[0].message.content`
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// `/v1/messages`, reply in the text blocks of `content`
    Anthropic,
    /// `/api/generate`, reply in `response`
    Ollama,
}

impl Envelope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Envelope::OpenAi => "openai",
            Envelope::Anthropic => "anthropic",
            Envelope::Ollama => "ollama",
        }
    }

    /// Endpoint path used when the config doesn't set one
    pub fn default_path(&self) -> &'static str {
        match self {
            Envelope::OpenAi => "/v1/chat/completions",
            Envelope::Anthropic => "/v1/messages",
            Envelope::Ollama => "/api/generate",
        }
    }

    /// Extra headers the provider insists on
    pub fn extra_headers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Envelope::Anthropic => &[("anthropic-version", ANTHROPIC_VERSION)],
            _ => &[],
        }
    }

    /// Build the JSON request body for one prompt
    pub fn request_body(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<serde_json::Value> {
        let value = match self {
            Envelope::OpenAi => serde_json::to_value(ChatCompletionRequest {
                model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                max_tokens,
                temperature,
                stream: false,
            })?,
            Envelope::Anthropic => serde_json::to_value(MessagesRequest {
                model,
                max_tokens,
                temperature,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
            })?,
            Envelope::Ollama => serde_json::to_value(GenerateRequest {
                model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature,
                    num_predict: max_tokens,
                },
            })?,
        };
        Ok(value)
    }

    /// Pull the reply text out of a response body
    pub fn extract_reply(&self, body: &str) -> Result<String> {
        let text = match self {
            Envelope::OpenAi => {
                let response: ChatCompletionResponse = serde_json::from_str(body)?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
            }
            Envelope::Anthropic => {
                let response: MessagesResponse = serde_json::from_str(body)?;
                let text: Vec<String> = response
                    .content
                    .into_iter()
                    .filter(|b| b.kind == "text")
                    .filter_map(|b| b.text)
                    .collect();
                (!text.is_empty()).then(|| text.join(""))
            }
            Envelope::Ollama => {
                let response: GenerateResponse = serde_json::from_str(body)?;
                response.response
            }
        };

        text.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
            Error::InvalidData(format!("No reply text in {} response", self.as_str()))
        })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Envelope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Envelope::OpenAi),
            "anthropic" => Ok(Envelope::Anthropic),
            "ollama" => Ok(Envelope::Ollama),
            _ => Err(format!(
                "Unknown envelope: {}. Available: openai, anthropic, ollama",
                s
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_request_shape() {
        let body = Envelope::OpenAi
            .request_body("gpt-test", "hello", 256, 0.5)
            .unwrap();
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_anthropic_request_shape() {
        let body = Envelope::Anthropic
            .request_body("claude-test", "hello", 128, 0.2)
            .unwrap();
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 128);
        assert!(body.get("stream").is_none());
        assert_eq!(
            Envelope::Anthropic.extra_headers(),
            &[("anthropic-version", ANTHROPIC_VERSION)]
        );
    }

    #[test]
    fn test_ollama_request_shape() {
        let body = Envelope::Ollama
            .request_body("llama3.2", "hello", 64, 0.1)
            .unwrap();
        assert_eq!(body["prompt"], "hello");
        assert_eq!(body["options"]["num_predict"], 64);
    }

    #[test]
    fn test_extract_openai_reply() {
        let body = r#"{"choices":[{"index":0,
            "message":{"role":"assistant","content":"Cut food costs."}}]}"#;
        assert_eq!(
            Envelope::OpenAi.extract_reply(body).unwrap(),
            "Cut food costs."
        );
    }

    #[test]
    fn test_extract_anthropic_reply_joins_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"Save "},{"type":"text","text":"more."}]}"#;
        assert_eq!(
            Envelope::Anthropic.extract_reply(body).unwrap(),
            "Save more."
        );
    }

    #[test]
    fn test_extract_ollama_reply() {
        let body = r#"{"model":"llama3.2","response":"Looks fine.","done":true}"#;
        assert_eq!(Envelope::Ollama.extract_reply(body).unwrap(), "Looks fine.");
    }

    #[test]
    fn test_malformed_envelope_is_error() {
        assert!(Envelope::OpenAi.extract_reply("not json").is_err());
        assert!(Envelope::OpenAi.extract_reply(r#"{"choices":[]}"#).is_err());
        assert!(Envelope::Anthropic.extract_reply(r#"{"content":[]}"#).is_err());
        assert!(Envelope::Ollama.extract_reply(r#"{"response":"  "}"#).is_err());
    }

    #[test]
    fn test_envelope_parse() {
        assert_eq!("OpenAI".parse::<Envelope>().unwrap(), Envelope::OpenAi);
        assert_eq!("ollama".parse::<Envelope>().unwrap(), Envelope::Ollama);
        assert!("grpc".parse::<Envelope>().is_err());
    }
}
