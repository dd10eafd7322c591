//! Talks to a chat backend on behalf of the wizard: builds the enhancement
//! request, generates clarifying questions, and validates what comes back.

mod gateway;
mod prompts;
mod questions;

pub use gateway::AiGateway;
pub use prompts::EnhancementPrompts;
pub use questions::{fallback_questions, parse_generated_questions, QuestionParseError};
