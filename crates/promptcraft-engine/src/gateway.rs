use std::sync::Arc;

use async_trait::async_trait;
use promptcraft_agent::{BackendConfig, BackendError, ChatBackend, ChatMessage};
use promptcraft_core::{
    AnswerStore, Category, EnhancementGateway, GatewayError, QuestionList, QuestionSource,
};
use tracing::{debug, info, warn};

use crate::{fallback_questions, parse_generated_questions, EnhancementPrompts};

/// Enhancement and question generation backed by a [`ChatBackend`]
pub struct AiGateway {
    backend: Arc<dyn ChatBackend>,
    config: BackendConfig,
}

impl AiGateway {
    pub fn new(backend: Arc<dyn ChatBackend>, config: BackendConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Whether the backend can be reached with the current settings
    pub async fn is_available(&self) -> bool {
        self.backend.is_available(&self.config).await
    }

    /// Ask the model for clarifying questions about `original_text`.
    ///
    /// Never fails: transport errors and unusable replies are logged and the
    /// generic fallback list is returned instead.
    pub async fn questions(&self, original_text: &str, category: Category) -> QuestionList {
        let messages = [
            ChatMessage::system(EnhancementPrompts::question_system_prompt()),
            ChatMessage::user(EnhancementPrompts::build_question_request(
                original_text,
                category,
            )),
        ];

        let output = match self.backend.chat(&messages, &self.config).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Question generation failed, using fallback questions");
                return fallback_questions(category);
            }
        };

        match parse_generated_questions(&output.content, category) {
            Ok(list) => {
                info!(questions = list.len(), "Generated questions");
                list
            }
            Err(e) => {
                warn!(error = %e, "Unusable question output, using fallback questions");
                fallback_questions(category)
            }
        }
    }
}

fn to_gateway_error(e: BackendError) -> GatewayError {
    match e {
        BackendError::SpawnFailed(_) | BackendError::MissingApiKey(_) => {
            GatewayError::Unavailable(e.to_string())
        }
        BackendError::InvalidResponse(msg) => GatewayError::InvalidResponse(msg),
        BackendError::Timeout(_)
        | BackendError::Http(_)
        | BackendError::Api { .. }
        | BackendError::ExecutionFailed(_) => GatewayError::Transport(e.to_string()),
    }
}

#[async_trait]
impl EnhancementGateway for AiGateway {
    async fn generate(
        &self,
        original_text: &str,
        category: Category,
        answers: &AnswerStore,
    ) -> Result<String, GatewayError> {
        let messages = [
            ChatMessage::system(EnhancementPrompts::system_prompt(category)),
            ChatMessage::user(EnhancementPrompts::build_enhancement_request(
                original_text,
                answers,
            )),
        ];

        debug!(
            backend = self.backend.name(),
            %category,
            answers = answers.len(),
            "Requesting enhancement"
        );

        let output = self
            .backend
            .chat(&messages, &self.config)
            .await
            .map_err(to_gateway_error)?;

        let enhanced = output.content.trim();
        if enhanced.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "backend returned an empty reply".to_string(),
            ));
        }
        Ok(enhanced.to_string())
    }
}

#[async_trait]
impl QuestionSource for AiGateway {
    async fn questions_for(&self, original_text: &str, category: Category) -> QuestionList {
        self.questions(original_text, category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptcraft_agent::{BackendType, ChatOutput};
    use promptcraft_core::Answer;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend returning scripted replies and recording what it was sent
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, BackendError>>>,
        received: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, BackendError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                received: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn backend_type(&self) -> BackendType {
            BackendType::OpenAi
        }

        async fn is_available(&self, _config: &BackendConfig) -> bool {
            true
        }

        async fn chat(
            &self,
            messages: &[ChatMessage],
            _config: &BackendConfig,
        ) -> Result<ChatOutput, BackendError> {
            self.received.lock().unwrap().push(messages.to_vec());
            let reply = self.replies.lock().unwrap().remove(0)?;
            Ok(ChatOutput::new(reply, None, Duration::ZERO))
        }
    }

    fn gateway(backend: Arc<ScriptedBackend>) -> AiGateway {
        AiGateway::new(backend, BackendConfig::default())
    }

    #[tokio::test]
    async fn test_generate_trims_and_sends_category_prompt() {
        let backend = ScriptedBackend::new(vec![Ok("\n  You are a senior Rust developer...  \n".into())]);
        let gateway = gateway(backend.clone());

        let answers: AnswerStore = [("language".to_string(), Answer::from("Rust"))]
            .into_iter()
            .collect();
        let enhanced = gateway
            .generate("Parse a CSV", Category::Coding, &answers)
            .await
            .unwrap();
        assert_eq!(enhanced, "You are a senior Rust developer...");

        let received = backend.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0][0].content,
            EnhancementPrompts::system_prompt(Category::Coding)
        );
        assert!(received[0][1].content.contains("- Language: Rust"));
    }

    #[tokio::test]
    async fn test_generate_maps_errors() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::MissingApiKey("OPENAI_API_KEY".into())),
            Err(BackendError::Api {
                status: 500,
                body: "oops".into(),
            }),
            Ok("   ".into()),
        ]);
        let gateway = gateway(backend);
        let answers = AnswerStore::new();

        assert!(matches!(
            gateway.generate("x", Category::Chat, &answers).await,
            Err(GatewayError::Unavailable(_))
        ));
        assert!(matches!(
            gateway.generate("x", Category::Chat, &answers).await,
            Err(GatewayError::Transport(_))
        ));
        assert!(matches!(
            gateway.generate("x", Category::Chat, &answers).await,
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_questions_parsed_from_reply() {
        let backend = ScriptedBackend::new(vec![Ok(
            r#"[{"id": "breed", "type": "mcq", "question": "Breed?", "options": ["Tabby"]}]"#
                .into(),
        )]);
        let list = gateway(backend).questions_for("a cat", Category::Image).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().id, "breed");
    }

    #[tokio::test]
    async fn test_questions_fall_back_on_failure() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::Http("connection reset".into())),
            Ok("Sure! Here are some questions.".into()),
        ]);
        let gateway = gateway(backend);

        for _ in 0..2 {
            let list = gateway.questions("a cat", Category::Image).await;
            assert_eq!(list.get(0).unwrap().id, "detail_level");
            assert_eq!(list.len(), 3);
        }
    }
}
