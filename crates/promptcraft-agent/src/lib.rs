//! Chat backends: an OpenAI-compatible HTTP client and the `claude` CLI.

mod claude;
mod openai;
mod output;
mod spawner;
mod traits;

pub use claude::ClaudeCodeBackend;
pub use openai::{OpenAiBackend, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use output::ChatOutput;
pub use spawner::{ProcessOutput, ProcessSpawner};
pub use traits::{BackendConfig, BackendError, BackendType, ChatBackend, ChatMessage, Role};
