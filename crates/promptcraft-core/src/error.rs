use thiserror::Error;

use crate::{GatewayError, StorageError, WizardState};

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Enhancement failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("History storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Waiting for the enhanced prompt")]
    Busy,

    #[error("Already at the first question")]
    Boundary,

    #[error("Not available while the wizard is {0}")]
    InvalidState(WizardState),

    #[error("Question '{question_id}' has no option '{option}'")]
    UnknownOption { question_id: String, option: String },
}

impl WizardError {
    /// Whether the user can stay where they are and try again
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WizardError::InvalidState(_))
    }
}
