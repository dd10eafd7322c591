use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::{BackendConfig, BackendError, BackendType, ChatBackend, ChatMessage, ChatOutput};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Any OpenAI-compatible chat completions endpoint
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key_env: String,
}

impl OpenAiBackend {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Name of the environment variable holding the bearer token
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Default for OpenAiBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

// Minimal structs to parse the chat response
#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<Choice>,
}

fn parse_response(text: &str) -> Result<(String, Option<String>), BackendError> {
    let parsed: ChatResponse = serde_json::from_str(text)
        .map_err(|e| BackendError::InvalidResponse(format!("{}: {}", e, text)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BackendError::InvalidResponse("response has no message".to_string()))?;

    Ok((content, parsed.model))
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn backend_type(&self) -> BackendType {
        BackendType::OpenAi
    }

    async fn is_available(&self, config: &BackendConfig) -> bool {
        config.env_var(&self.api_key_env).is_some()
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        config: &BackendConfig,
    ) -> Result<ChatOutput, BackendError> {
        let api_key = config
            .env_var(&self.api_key_env)
            .ok_or_else(|| BackendError::MissingApiKey(self.api_key_env.clone()))?;
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let start = Instant::now();

        debug!(
            backend = self.name(),
            model,
            messages = messages.len(),
            "Sending chat"
        );

        let mut request = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&ChatRequest { model, messages });
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                config
                    .timeout
                    .map(BackendError::Timeout)
                    .unwrap_or_else(|| BackendError::Http(e.to_string()))
            } else {
                BackendError::Http(e.to_string())
            }
        })?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let (content, reported_model) = parse_response(&text)?;
        debug!(
            chars = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completed"
        );

        Ok(ChatOutput::new(
            content,
            reported_model.or_else(|| Some(model.to_string())),
            start.elapsed(),
        ))
    }
}
