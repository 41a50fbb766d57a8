//! Chat-completion client for the analysis model.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (a hosted
//! provider or a local server). The trait seam keeps the orchestrator
//! testable without a live model.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("Cannot reach analysis service at {0}")]
    Connection(String),

    #[error("Analysis service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// One completion request. Sampling parameters are fixed per client
/// configuration so repeated analyses stay reproducible.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// HTTP client for an OpenAI-compatible chat API.
pub struct HttpChatClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpChatClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if !request.system.is_empty() {
            messages.push(WireMessage {
                role: "system",
                content: &request.system,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: &request.user,
        });

        let body = CompletionRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::ResponseParsing("response contained no choices".into()))
    }
}

/// Mock chat client for tests.
///
/// Queued responses are returned in order; once the queue is drained the
/// fallback response repeats. An optional delay simulates a slow model and an
/// optional failure makes every call return that error.
pub struct MockChatClient {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
    delay: Option<Duration>,
    failure: Option<LlmError>,
}

impl MockChatClient {
    pub fn returning(response: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: response.to_string(),
            delay: None,
            failure: None,
        }
    }

    pub fn with_response(self, response: &str) -> Self {
        match self.queue.lock() {
            Ok(mut q) => q.push_back(response.to_string()),
            Err(poisoned) => poisoned.into_inner().push_back(response.to_string()),
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_with(mut self, failure: LlmError) -> Self {
        self.failure = Some(failure);
        self
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let next = match self.queue.lock() {
            Ok(mut q) => q.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}
