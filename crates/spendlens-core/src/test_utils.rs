//! Test utilities for spendlens-core
//!
//! This module provides a mock chat-completion server that answers on the
//! OpenAI, Anthropic and Ollama endpoint paths with a canned reply, a
//! configurable HTTP status and an optional delay. Every request is captured
//! so tests can inspect headers and bodies.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// One request the mock server received
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// How the mock server answers
#[derive(Debug, Clone)]
pub struct MockChatOptions {
    pub status: u16,
    pub reply: String,
    pub delay: Option<Duration>,
}

impl Default for MockChatOptions {
    fn default() -> Self {
        Self {
            status: 200,
            reply: "Try cooking at home twice a week.".to_string(),
            delay: None,
        }
    }
}

struct ServerState {
    options: MockChatOptions,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Mock chat-completion server for tests
pub struct MockChatServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start a server that answers 200 with the default reply
    pub async fn start() -> Self {
        Self::start_with(MockChatOptions::default()).await
    }

    /// Start a server that always answers with `reply`
    pub async fn with_reply(reply: impl Into<String>) -> Self {
        Self::start_with(MockChatOptions {
            reply: reply.into(),
            ..MockChatOptions::default()
        })
        .await
    }

    /// Start a server that always answers with the given HTTP status
    pub async fn with_status(status: u16) -> Self {
        Self::start_with(MockChatOptions {
            status,
            ..MockChatOptions::default()
        })
        .await
    }

    /// Start the mock server on an available port
    pub async fn start_with(options: MockChatOptions) -> Self {
        let state = Arc::new(ServerState {
            options,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/messages", post(handle_chat))
            .route("/api/generate", post(handle_chat))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_chat(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let captured = CapturedRequest {
        path: path.clone(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    };
    state.requests.lock().unwrap().push(captured);

    if let Some(delay) = state.options.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(state.options.status).unwrap_or(StatusCode::OK);
    if !status.is_success() {
        return (status, "mock provider error").into_response();
    }

    let reply = &state.options.reply;
    let envelope = match path.as_str() {
        "/v1/messages" => json!({
            "id": "msg_mock",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": reply }],
        }),
        "/api/generate" => json!({
            "model": "mock",
            "response": reply,
            "done": true,
        }),
        _ => json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": reply },
                "finish_reason": "stop",
            }],
        }),
    };

    (status, Json(envelope)).into_response()
}
