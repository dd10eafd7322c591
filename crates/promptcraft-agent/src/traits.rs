use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::ChatOutput;

/// Errors that can occur while talking to a chat backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to spawn backend process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Backend execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Http(e.to_string())
    }
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Per-call settings shared by every backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Working directory for process backends
    pub working_dir: PathBuf,
    /// Optional timeout (None = no limit)
    pub timeout: Option<Duration>,
    /// Additional environment variables
    pub env_vars: HashMap<String, String>,
    /// Model override; each backend has its own default
    pub model: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            timeout: None,
            env_vars: HashMap::new(),
            model: None,
        }
    }
}

impl BackendConfig {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env_vars.insert(key, value);
        self
    }

    /// Look up a variable in `env_vars`, then in the process environment
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env_vars
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
            .filter(|v| !v.is_empty())
    }
}

/// Supported backend types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendType {
    #[default]
    #[serde(alias = "openai")]
    OpenAi,
    #[serde(alias = "claude")]
    ClaudeCode,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::OpenAi => write!(f, "openai"),
            BackendType::ClaudeCode => write!(f, "claude-code"),
        }
    }
}

impl std::str::FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open-ai" => Ok(BackendType::OpenAi),
            "claude" | "claude-code" | "claudecode" => Ok(BackendType::ClaudeCode),
            _ => Err(format!("Unknown backend type: {}", s)),
        }
    }
}

/// A chat-completion style language model
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable name (e.g., "OpenAI", "Claude Code")
    fn name(&self) -> &str;

    fn backend_type(&self) -> BackendType;

    /// Whether the backend can be used right now (CLI installed, key set)
    async fn is_available(&self, config: &BackendConfig) -> bool;

    /// Send `messages` and return the assistant reply
    async fn chat(
        &self,
        messages: &[ChatMessage],
        config: &BackendConfig,
    ) -> Result<ChatOutput, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_parsing() {
        assert_eq!("openai".parse::<BackendType>().unwrap(), BackendType::OpenAi);
        assert_eq!("Claude".parse::<BackendType>().unwrap(), BackendType::ClaudeCode);
        assert!("gemini".parse::<BackendType>().is_err());
        assert_eq!(BackendType::ClaudeCode.to_string(), "claude-code");
    }

    #[test]
    fn test_config_env_prefers_explicit_vars() {
        let config = BackendConfig::default()
            .with_env("PROMPTCRAFT_TEST_KEY".to_string(), "from-config".to_string());
        assert_eq!(
            config.env_var("PROMPTCRAFT_TEST_KEY").as_deref(),
            Some("from-config")
        );

        let config = config.with_env("PROMPTCRAFT_EMPTY".to_string(), String::new());
        assert_eq!(config.env_var("PROMPTCRAFT_EMPTY"), None);
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }
}
