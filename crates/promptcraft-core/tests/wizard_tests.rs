use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use promptcraft_core::{
    Answer, AnswerStore, Category, EnhancementGateway, GatewayError, HistoryRecord, HistoryStore,
    MemoryHistory, NewHistoryRecord, QuestionCatalog, QuestionList, Step, StorageError,
    WizardController, WizardError, WizardState,
};

/// Gateway that records every call and can be told to fail the next N calls
#[derive(Default)]
struct RecordingGateway {
    calls: Mutex<Vec<(String, Category, AnswerStore)>>,
    failures_left: Mutex<usize>,
}

impl RecordingGateway {
    fn failing(times: usize) -> Self {
        Self {
            failures_left: Mutex::new(times),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<(String, Category, AnswerStore)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnhancementGateway for RecordingGateway {
    async fn generate(
        &self,
        original_text: &str,
        category: Category,
        answers: &AnswerStore,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((original_text.to_string(), category, answers.clone()));

        let mut failures = self.failures_left.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        Ok(format!("Enhanced: {}", original_text))
    }
}

/// History store whose writes always fail
struct BrokenHistory;

impl HistoryStore for BrokenHistory {
    fn append(&self, _record: NewHistoryRecord) -> Result<HistoryRecord, StorageError> {
        Err(StorageError::Database("disk full".to_string()))
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn get_by_id(&self, _id: &str) -> Result<Option<HistoryRecord>, StorageError> {
        Ok(None)
    }

    fn delete(&self, _id: &str) -> Result<bool, StorageError> {
        Ok(false)
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

fn wizard_with(gateway: Arc<RecordingGateway>) -> (WizardController, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new());
    let wizard = WizardController::new(gateway, history.clone());
    (wizard, history)
}

fn started(category: Category) -> (WizardController, Arc<RecordingGateway>, Arc<MemoryHistory>) {
    let gateway = Arc::new(RecordingGateway::default());
    let (mut wizard, history) = wizard_with(gateway.clone());
    wizard
        .start(
            QuestionCatalog::new().for_category(category),
            "Write a sorting function",
            Some(category),
        )
        .unwrap();
    (wizard, gateway, history)
}

#[tokio::test]
async fn test_coding_walkthrough_collects_every_answer() {
    let (mut wizard, gateway, history) = started(Category::Coding);

    wizard.click_value("Python").unwrap();
    assert_eq!(wizard.advance().await.unwrap().map(|c| c.enhanced), None);

    wizard.click_value("Moderate (multiple functions)").unwrap();
    wizard.advance().await.unwrap();

    wizard.click_value("Yes").unwrap();
    wizard.advance().await.unwrap();

    wizard.click_value("No").unwrap();
    wizard.advance().await.unwrap();

    assert!(wizard.is_last());
    wizard.click_value("Unit tests").unwrap();
    wizard.click_value("Documentation").unwrap();
    let completion = wizard.advance().await.unwrap().unwrap();

    let expected: AnswerStore = [
        ("language", Answer::from("Python")),
        ("complexity", Answer::from("Moderate (multiple functions)")),
        ("comments", Answer::from("Yes")),
        ("errorHandling", Answer::from("No")),
        ("extras", Answer::from(vec!["Unit tests", "Documentation"])),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Write a sorting function");
    assert_eq!(calls[0].1, Category::Coding);
    assert_eq!(calls[0].2, expected);

    assert_eq!(wizard.state(), WizardState::Complete);
    assert_eq!(completion.enhanced, "Enhanced: Write a sorting function");
    assert_eq!(wizard.enhanced_text(), Some(completion.enhanced.as_str()));

    let saved = history.list().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].answers, expected);
    assert_eq!(completion.record.unwrap().id, saved[0].id);
}

#[tokio::test]
async fn test_coding_walkthrough_with_skipped_questions() {
    let (mut wizard, gateway, history) = started(Category::Coding);

    wizard.click_value("Python").unwrap();
    wizard.advance().await.unwrap();
    wizard.click_value("Moderate (multiple functions)").unwrap();
    wizard.advance().await.unwrap();

    // comments and errorHandling: no clicks
    wizard.advance().await.unwrap();
    wizard.advance().await.unwrap();

    assert!(wizard.is_last());
    wizard.click_value("Unit tests").unwrap();
    wizard.click_value("Documentation").unwrap();
    wizard.advance().await.unwrap().unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    let answers = &calls[0].2;
    assert_eq!(answers.len(), 3);
    assert_eq!(answers.get("language"), Some(&Answer::from("Python")));
    assert_eq!(
        answers.get("complexity"),
        Some(&Answer::from("Moderate (multiple functions)"))
    );
    assert!(!answers.contains("comments"));
    assert!(!answers.contains("errorHandling"));
    assert_eq!(
        answers.get("extras"),
        Some(&Answer::from(vec!["Unit tests", "Documentation"]))
    );

    assert_eq!(history.list().unwrap()[0].answers, *answers);
}

#[tokio::test]
async fn test_empty_question_list_finalizes_on_first_step() {
    let gateway = Arc::new(RecordingGateway::default());
    let (mut wizard, _history) = wizard_with(gateway.clone());
    wizard
        .start(QuestionList::empty(Category::Chat), "hi", Some(Category::Chat))
        .unwrap();

    assert!(wizard.render_current().is_none());
    assert_eq!(wizard.go_forward().unwrap(), Step::Finalizing);
    assert!(wizard.pending_request().unwrap().answers.is_empty());

    wizard.finalize().await.unwrap();
    assert_eq!(gateway.calls().len(), 1);
    assert!(gateway.calls()[0].2.is_empty());
}

#[test]
fn test_start_validates_input() {
    let gateway = Arc::new(RecordingGateway::default());
    let (mut wizard, _history) = wizard_with(gateway);
    let list = QuestionCatalog::new().for_category(Category::Chat);

    assert!(matches!(
        wizard.start(list.clone(), "   ", Some(Category::Chat)),
        Err(WizardError::InvalidInput(_))
    ));
    assert!(matches!(
        wizard.start(list, "hello", None),
        Err(WizardError::InvalidInput(_))
    ));
    assert_eq!(wizard.state(), WizardState::NotStarted);
}

#[test]
fn test_go_back_at_first_question_changes_nothing() {
    let (mut wizard, _gateway, _history) = started(Category::Chat);
    wizard.click(0).unwrap();

    assert!(!wizard.can_go_back());
    assert!(matches!(wizard.go_back(), Err(WizardError::Boundary)));
    assert_eq!(wizard.current_index(), Some(0));
    assert!(wizard.answers().unwrap().is_empty());
}

#[test]
fn test_back_and_forward_restores_selection() {
    let (mut wizard, _gateway, _history) = started(Category::Image);

    wizard.click_value("Anime / Manga").unwrap();
    assert_eq!(wizard.go_forward().unwrap(), Step::Moved { index: 1 });
    wizard.click_value("Calm & Serene").unwrap();

    assert_eq!(wizard.go_back().unwrap(), Step::Moved { index: 0 });
    let view = wizard.render_current().unwrap();
    assert_eq!(view.question_id(), "style");
    assert_eq!(
        wizard.extract("style"),
        Some(Answer::from("Anime / Manga"))
    );

    // The answer on the page we left was committed on the way back
    wizard.go_forward().unwrap();
    assert_eq!(wizard.extract("mood"), Some(Answer::from("Calm & Serene")));
    assert_eq!(
        wizard.answers().unwrap().get("mood"),
        Some(&Answer::from("Calm & Serene"))
    );
    assert_eq!(wizard.progress(), Some((2, 5)));
}

#[test]
fn test_skipping_a_question_keeps_previous_answer() {
    let (mut wizard, _gateway, _history) = started(Category::Chat);
    wizard.click_value("Casual & Friendly").unwrap();
    wizard.go_forward().unwrap();
    wizard.go_back().unwrap();

    // Nothing clicked this time
    wizard.go_forward().unwrap();
    assert_eq!(
        wizard.answers().unwrap().get("tone"),
        Some(&Answer::from("Casual & Friendly"))
    );
}

#[test]
fn test_clearing_a_multi_choice_overwrites_it() {
    let (mut wizard, _gateway, _history) = started(Category::Image);
    for _ in 0..3 {
        wizard.go_forward().unwrap();
    }
    assert_eq!(wizard.render_current().unwrap().question_id(), "lighting");

    wizard.click_value("Golden hour").unwrap();
    wizard.go_forward().unwrap();
    wizard.go_back().unwrap();
    assert_eq!(
        wizard.answers().unwrap().get("lighting"),
        Some(&Answer::from(vec!["Golden hour"]))
    );

    wizard.click_value("Golden hour").unwrap();
    wizard.go_forward().unwrap();
    assert_eq!(
        wizard.answers().unwrap().get("lighting"),
        Some(&Answer::Multi(vec![]))
    );
}

#[tokio::test]
async fn test_busy_while_finalizing() {
    let (mut wizard, gateway, _history) = started(Category::Research);
    for _ in 0..4 {
        wizard.go_forward().unwrap();
    }
    assert_eq!(wizard.go_forward().unwrap(), Step::Finalizing);
    assert_eq!(wizard.state(), WizardState::Finalizing);

    assert!(matches!(wizard.go_forward(), Err(WizardError::Busy)));
    assert!(matches!(wizard.go_back(), Err(WizardError::Busy)));
    assert!(matches!(wizard.click(0), Err(WizardError::Busy)));
    assert!(matches!(
        wizard.start(
            QuestionList::empty(Category::Chat),
            "again",
            Some(Category::Chat)
        ),
        Err(WizardError::Busy)
    ));

    wizard.finalize().await.unwrap();
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_gateway_failure_allows_retry() {
    let gateway = Arc::new(RecordingGateway::failing(1));
    let (mut wizard, history) = wizard_with(gateway.clone());
    let list = QuestionCatalog::new().for_category(Category::Video);
    wizard
        .start(list, "A drone shot of a city", Some(Category::Video))
        .unwrap();
    for _ in 0..4 {
        wizard.go_forward().unwrap();
    }
    wizard.click_value("Slow motion").unwrap();

    let err = wizard.advance().await.unwrap_err();
    assert!(matches!(err, WizardError::Gateway(_)));
    assert!(err.is_recoverable());
    assert_eq!(wizard.state(), WizardState::InProgress);
    assert_eq!(wizard.current_index(), Some(4));
    assert!(history.list().unwrap().is_empty());

    let completion = wizard.advance().await.unwrap().unwrap();
    assert_eq!(completion.enhanced, "Enhanced: A drone shot of a city");

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].2, calls[1].2);
    assert_eq!(
        calls[1].2.get("elements"),
        Some(&Answer::from(vec!["Slow motion"]))
    );
    assert_eq!(history.list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_failure_still_completes() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut wizard = WizardController::new(gateway, Arc::new(BrokenHistory));
    wizard
        .start(QuestionList::empty(Category::App), "todo app", Some(Category::App))
        .unwrap();

    let completion = wizard.advance().await.unwrap().unwrap();
    assert!(completion.record.is_none());
    assert_eq!(wizard.state(), WizardState::Complete);
}

#[tokio::test]
async fn test_regenerate_reuses_answers() {
    let (mut wizard, gateway, history) = started(Category::Chat);
    assert!(matches!(
        wizard.regenerate().await,
        Err(WizardError::InvalidState(WizardState::InProgress))
    ));

    wizard.click_value("Technical & Precise").unwrap();
    for _ in 0..4 {
        wizard.go_forward().unwrap();
    }
    wizard.advance().await.unwrap().unwrap();

    wizard.regenerate().await.unwrap();
    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].2, calls[1].2);
    assert_eq!(history.list().unwrap().len(), 2);
    assert_eq!(wizard.state(), WizardState::Complete);
}

#[tokio::test]
async fn test_reset_discards_run() {
    let (mut wizard, _gateway, _history) = started(Category::Chat);
    wizard.click(1).unwrap();
    wizard.go_forward().unwrap();

    wizard.reset();
    assert_eq!(wizard.state(), WizardState::NotStarted);
    assert!(wizard.answers().is_none());
    assert!(wizard.render_current().is_none());
    assert!(matches!(
        wizard.go_forward(),
        Err(WizardError::InvalidState(WizardState::NotStarted))
    ));
}
