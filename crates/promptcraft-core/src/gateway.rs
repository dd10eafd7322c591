use async_trait::async_trait;
use thiserror::Error;

use crate::{AnswerStore, Category};

/// Failure of the enhancement call. Carries no payload shape beyond a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unusable response: {0}")]
    InvalidResponse(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Turns the original prompt plus collected answers into the enhanced prompt
#[async_trait]
pub trait EnhancementGateway: Send + Sync {
    async fn generate(
        &self,
        original_text: &str,
        category: Category,
        answers: &AnswerStore,
    ) -> Result<String, GatewayError>;
}
