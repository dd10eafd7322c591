use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::{
    BackendConfig, BackendError, BackendType, ChatBackend, ChatMessage, ChatOutput,
    ProcessSpawner, Role,
};

/// Runs chats through the `claude` CLI in print mode
pub struct ClaudeCodeBackend {
    binary_path: PathBuf,
}

impl ClaudeCodeBackend {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("claude"),
        }
    }

    pub fn with_binary_path(path: PathBuf) -> Self {
        Self { binary_path: path }
    }
}

impl Default for ClaudeCodeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// The CLI takes a single prompt, so system instructions go first
fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| match m.role {
            Role::System | Role::User => m.content.clone(),
            Role::Assistant => format!("Assistant: {}", m.content),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl ChatBackend for ClaudeCodeBackend {
    fn name(&self) -> &str {
        "Claude Code"
    }

    fn backend_type(&self) -> BackendType {
        BackendType::ClaudeCode
    }

    async fn is_available(&self, _config: &BackendConfig) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        config: &BackendConfig,
    ) -> Result<ChatOutput, BackendError> {
        let prompt = flatten_messages(messages);
        debug!(backend = self.name(), prompt_len = prompt.len(), "Sending chat");

        let mut args = vec!["--print"];

        let model_arg;
        if let Some(ref model) = config.model {
            args.push("--model");
            model_arg = model.clone();
            args.push(&model_arg);
        }

        // Prompts starting with '-' must not be read as options
        args.push("--");
        args.push(&prompt);

        let output = ProcessSpawner::spawn(&self.binary_path, &args, config).await?;
        if !output.success() {
            let detail = if output.stderr.trim().is_empty() {
                format!("exit code {}", output.exit_code)
            } else {
                output.stderr.trim().to_string()
            };
            return Err(BackendError::ExecutionFailed(detail));
        }

        Ok(ChatOutput::new(
            output.stdout,
            config.model.clone(),
            output.duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_puts_system_first() {
        let prompt = flatten_messages(&[
            ChatMessage::system("You are an expert."),
            ChatMessage::user("Original prompt: \"hi\""),
        ]);
        assert_eq!(prompt, "You are an expert.\n\nOriginal prompt: \"hi\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let backend = ClaudeCodeBackend::with_binary_path(PathBuf::from("false"));
        let result = backend
            .chat(&[ChatMessage::user("hi")], &BackendConfig::default())
            .await;
        assert!(matches!(result, Err(BackendError::ExecutionFailed(_))));
    }
}
