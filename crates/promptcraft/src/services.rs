//! Wiring from settings to the wizard's collaborators.

use std::sync::Arc;

use tracing::warn;

use promptcraft_agent::{
    BackendConfig, BackendType, ChatBackend, ClaudeCodeBackend, OpenAiBackend,
};
use promptcraft_core::{
    HistoryStore, MemoryHistory, QuestionCatalog, QuestionSource, WizardController,
};
use promptcraft_db::Database;
use promptcraft_engine::AiGateway;

use crate::config::Settings;

pub struct Services {
    pub gateway: Arc<AiGateway>,
    pub history: Arc<dyn HistoryStore>,
    pub questions: Arc<dyn QuestionSource>,
}

impl Services {
    pub fn build(settings: &Settings) -> Self {
        let backend: Arc<dyn ChatBackend> = match settings.backend {
            BackendType::OpenAi => Arc::new(
                OpenAiBackend::new()
                    .with_base_url(settings.base_url.clone())
                    .with_api_key_env(settings.api_key_env.clone()),
            ),
            BackendType::ClaudeCode => Arc::new(ClaudeCodeBackend::new()),
        };

        let mut config = BackendConfig::default().with_timeout(settings.timeout);
        if let Some(ref model) = settings.model {
            config = config.with_model(model.clone());
        }

        let gateway = Arc::new(AiGateway::new(backend, config));
        let questions: Arc<dyn QuestionSource> = if settings.generated_questions {
            gateway.clone()
        } else {
            Arc::new(QuestionCatalog::new())
        };

        Self {
            gateway,
            history: open_history(settings),
            questions,
        }
    }

    pub fn wizard(&self) -> WizardController {
        WizardController::new(self.gateway.clone(), self.history.clone())
    }
}

/// A broken history database should not stop anyone from crafting prompts
fn open_history(settings: &Settings) -> Arc<dyn HistoryStore> {
    match Database::open_at(&settings.history_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            warn!(
                path = %settings.history_path.display(),
                error = %e,
                "Could not open history database, keeping history in memory"
            );
            Arc::new(MemoryHistory::new())
        }
    }
}
