use std::sync::Arc;
use std::time::Instant;

use promptcraft_logging::{LogEvent, Logger};
use tracing::{debug, info, warn};

use crate::{
    Answer, AnswerStore, Category, EnhancementGateway, HistoryRecord, HistoryStore,
    NewHistoryRecord, QuestionList, QuestionView, WizardError,
};

/// Where the wizard is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// No prompt submitted yet (or the run was reset)
    NotStarted,
    /// Showing questions
    InProgress,
    /// The enhancement call has been dispatched and not yet resolved
    Finalizing,
    /// The enhanced prompt is available
    Complete,
}

impl std::fmt::Display for WizardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardState::NotStarted => write!(f, "not started"),
            WizardState::InProgress => write!(f, "in progress"),
            WizardState::Finalizing => write!(f, "finalizing"),
            WizardState::Complete => write!(f, "complete"),
        }
    }
}

/// Everything the enhancement call sees, frozen when it is dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancementRequest {
    pub original_text: String,
    pub category: Category,
    pub answers: AnswerStore,
}

/// Outcome of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Now showing the question at `index`
    Moved { index: usize },
    /// The last answer is committed; call [`WizardController::finalize`]
    Finalizing,
}

/// A finished run
#[derive(Debug, Clone)]
pub struct Completion {
    pub enhanced: String,
    /// `None` when the history write failed
    pub record: Option<HistoryRecord>,
}

struct PendingCall {
    request: EnhancementRequest,
    /// State to return to if the call fails
    on_failure: WizardState,
}

struct Session {
    questions: QuestionList,
    index: usize,
    answers: AnswerStore,
    category: Category,
    original_text: String,
    view: Option<QuestionView>,
    enhanced: Option<String>,
}

impl Session {
    fn snapshot(&self) -> EnhancementRequest {
        EnhancementRequest {
            original_text: self.original_text.clone(),
            category: self.category,
            answers: self.answers.clone(),
        }
    }

    fn is_last(&self) -> bool {
        self.questions.is_empty() || self.index + 1 >= self.questions.len()
    }
}

/// Steps a user through a question list and dispatches the enhancement call
pub struct WizardController {
    gateway: Arc<dyn EnhancementGateway>,
    history: Arc<dyn HistoryStore>,
    logger: Option<Arc<Logger>>,
    state: WizardState,
    session: Option<Session>,
    pending: Option<PendingCall>,
}

impl WizardController {
    pub fn new(gateway: Arc<dyn EnhancementGateway>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            gateway,
            history,
            logger: None,
            state: WizardState::NotStarted,
            session: None,
            pending: None,
        }
    }

    /// Emit structured [`LogEvent`]s for each transition
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Begin a run. Fails without changing anything when the prompt is blank
    /// or no category was chosen.
    pub fn start(
        &mut self,
        questions: QuestionList,
        original_text: &str,
        category: Option<Category>,
    ) -> Result<(), WizardError> {
        if self.state == WizardState::Finalizing {
            return Err(WizardError::Busy);
        }

        let category = Self::validate_start(original_text, category)?;
        let original_text = original_text.trim();

        info!(%category, questions = questions.len(), "Starting wizard");
        self.log(LogEvent::WizardStarted {
            prompt: original_text.to_string(),
            category: category.to_string(),
            questions: questions.len(),
        });

        self.session = Some(Session {
            questions,
            index: 0,
            answers: AnswerStore::new(),
            category,
            original_text: original_text.to_string(),
            view: None,
            enhanced: None,
        });
        self.pending = None;
        self.state = WizardState::InProgress;
        self.render_at(0);
        Ok(())
    }

    /// The checks [`WizardController::start`] applies to its input, for
    /// callers that need the category before they have a question list
    pub fn validate_start(
        original_text: &str,
        category: Option<Category>,
    ) -> Result<Category, WizardError> {
        if original_text.trim().is_empty() {
            return Err(WizardError::InvalidInput(
                "Please enter a prompt first".to_string(),
            ));
        }
        category.ok_or_else(|| WizardError::InvalidInput("Please select a category".to_string()))
    }

    /// The question on screen, only while in progress
    pub fn render_current(&self) -> Option<&QuestionView> {
        if self.state != WizardState::InProgress {
            return None;
        }
        self.session.as_ref().and_then(|s| s.view.as_ref())
    }

    /// Click option `index` of the current question
    pub fn click(&mut self, index: usize) -> Result<(), WizardError> {
        self.current_view_mut()?.click(index)
    }

    /// Click the option labelled `value` of the current question
    pub fn click_value(&mut self, value: &str) -> Result<(), WizardError> {
        self.current_view_mut()?.click_value(value)
    }

    /// Current selection of `question_id`, if that question is on screen
    pub fn extract(&self, question_id: &str) -> Option<Answer> {
        self.render_current()
            .filter(|view| view.question_id() == question_id)
            .and_then(QuestionView::extract)
    }

    /// Save the current selection, if any.
    ///
    /// Nothing selected leaves a previously stored answer in place.
    pub fn commit_current_answer(&mut self) -> Result<Option<Answer>, WizardError> {
        self.ensure_in_progress()?;

        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let Some((question_id, answer)) = session
            .view
            .as_ref()
            .and_then(|view| view.extract().map(|a| (view.question_id().to_string(), a)))
        else {
            return Ok(None);
        };

        debug!(question_id = %question_id, "Committing answer");
        session.answers.commit(question_id.clone(), answer.clone());
        self.log(LogEvent::AnswerCommitted {
            question_id,
            answer: answer.to_prompt_string(),
        });
        Ok(Some(answer))
    }

    /// Commit, then show the previous question. At the first question this
    /// reports [`WizardError::Boundary`] and changes nothing.
    pub fn go_back(&mut self) -> Result<Step, WizardError> {
        self.ensure_in_progress()?;
        let index = self.current_index().unwrap_or(0);
        if index == 0 {
            return Err(WizardError::Boundary);
        }

        self.commit_current_answer()?;
        self.render_at(index - 1);
        Ok(Step::Moved { index: index - 1 })
    }

    /// Commit, then show the next question, or freeze the request when the
    /// last question was just answered.
    pub fn go_forward(&mut self) -> Result<Step, WizardError> {
        self.ensure_in_progress()?;
        self.commit_current_answer()?;

        let Some(session) = self.session.as_ref() else {
            return Err(WizardError::InvalidState(self.state));
        };

        if session.is_last() {
            let request = session.snapshot();
            self.dispatch(request, WizardState::InProgress);
            return Ok(Step::Finalizing);
        }

        let next = session.index + 1;
        self.render_at(next);
        Ok(Step::Moved { index: next })
    }

    /// Await the dispatched enhancement call and record the result.
    ///
    /// A gateway failure puts the wizard back where it was (answers and
    /// position intact) so [`WizardController::go_forward`] can retry. A
    /// history failure is logged and does not fail the run.
    pub async fn finalize(&mut self) -> Result<Completion, WizardError> {
        if self.state != WizardState::Finalizing {
            return Err(WizardError::InvalidState(self.state));
        }
        let Some(pending) = self.pending.take() else {
            self.state = WizardState::InProgress;
            return Err(WizardError::InvalidState(WizardState::Finalizing));
        };

        let gateway = Arc::clone(&self.gateway);
        let request = &pending.request;
        let started = Instant::now();

        let enhanced = match gateway
            .generate(&request.original_text, request.category, &request.answers)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Enhancement call failed");
                self.log(LogEvent::EnhancementFailed {
                    error: e.to_string(),
                });
                self.state = pending.on_failure;
                return Err(WizardError::Gateway(e));
            }
        };

        info!(
            chars = enhanced.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Enhancement completed"
        );
        self.log(LogEvent::EnhancementCompleted {
            chars: enhanced.chars().count(),
            duration_secs: started.elapsed().as_secs_f64(),
        });

        let record = match self.history.append(NewHistoryRecord {
            original: pending.request.original_text.clone(),
            enhanced: enhanced.clone(),
            category: pending.request.category,
            answers: pending.request.answers.clone(),
        }) {
            Ok(record) => {
                self.log(LogEvent::HistorySaved {
                    id: record.id.clone(),
                });
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "Failed to save history record");
                self.log(LogEvent::HistoryFailed {
                    error: e.to_string(),
                });
                None
            }
        };

        if let Some(session) = self.session.as_mut() {
            session.enhanced = Some(enhanced.clone());
        }
        self.state = WizardState::Complete;

        Ok(Completion { enhanced, record })
    }

    /// [`WizardController::go_forward`], then [`WizardController::finalize`]
    /// when that was the last question. `None` means the wizard moved on to
    /// another question.
    pub async fn advance(&mut self) -> Result<Option<Completion>, WizardError> {
        match self.go_forward()? {
            Step::Moved { .. } => Ok(None),
            Step::Finalizing => self.finalize().await.map(Some),
        }
    }

    /// Re-run the enhancement call for a completed run with the same answers
    pub async fn regenerate(&mut self) -> Result<Completion, WizardError> {
        match self.state {
            WizardState::Complete => {}
            WizardState::Finalizing => return Err(WizardError::Busy),
            other => return Err(WizardError::InvalidState(other)),
        }

        let Some(request) = self.session.as_ref().map(Session::snapshot) else {
            return Err(WizardError::InvalidState(self.state));
        };
        self.dispatch(request, WizardState::Complete);
        self.finalize().await
    }

    /// Discard the run
    pub fn reset(&mut self) {
        debug!("Resetting wizard");
        self.session = None;
        self.pending = None;
        self.state = WizardState::NotStarted;
    }

    /// The frozen request while finalizing
    pub fn pending_request(&self) -> Option<&EnhancementRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            WizardState::InProgress | WizardState::Finalizing => {
                self.session.as_ref().map(|s| s.index)
            }
            _ => None,
        }
    }

    /// `(current, total)` with a 1-based current position
    pub fn progress(&self) -> Option<(usize, usize)> {
        let session = self.session.as_ref()?;
        let total = session.questions.len();
        Some(((session.index + 1).min(total), total))
    }

    /// Whether the next forward step dispatches the enhancement call
    pub fn is_last(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_last)
    }

    pub fn can_go_back(&self) -> bool {
        self.state == WizardState::InProgress && self.session.as_ref().is_some_and(|s| s.index > 0)
    }

    pub fn answers(&self) -> Option<&AnswerStore> {
        self.session.as_ref().map(|s| &s.answers)
    }

    pub fn questions(&self) -> Option<&QuestionList> {
        self.session.as_ref().map(|s| &s.questions)
    }

    pub fn original_text(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.original_text.as_str())
    }

    pub fn category(&self) -> Option<Category> {
        self.session.as_ref().map(|s| s.category)
    }

    /// The enhanced prompt of a completed run
    pub fn enhanced_text(&self) -> Option<&str> {
        if self.state != WizardState::Complete {
            return None;
        }
        self.session.as_ref().and_then(|s| s.enhanced.as_deref())
    }

    fn dispatch(&mut self, request: EnhancementRequest, on_failure: WizardState) {
        info!(
            category = %request.category,
            answers = request.answers.len(),
            "Dispatching enhancement call"
        );
        self.log(LogEvent::EnhancementRequested {
            category: request.category.to_string(),
            answers: request.answers.len(),
        });
        self.pending = Some(PendingCall {
            request,
            on_failure,
        });
        self.state = WizardState::Finalizing;
    }

    fn render_at(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.index = index;
        session.view = session
            .questions
            .get(index)
            .map(|q| QuestionView::render(q, session.answers.get(&q.id)));

        let shown = session.view.as_ref().map(|view| LogEvent::QuestionShown {
            index,
            total: session.questions.len(),
            question_id: view.question_id().to_string(),
            prompt: view.question().prompt.clone(),
        });
        if let Some(event) = shown {
            self.log(event);
        }
    }

    fn current_view_mut(&mut self) -> Result<&mut QuestionView, WizardError> {
        self.ensure_in_progress()?;
        let state = self.state;
        self.session
            .as_mut()
            .and_then(|s| s.view.as_mut())
            .ok_or(WizardError::InvalidState(state))
    }

    fn ensure_in_progress(&self) -> Result<(), WizardError> {
        match self.state {
            WizardState::InProgress => Ok(()),
            WizardState::Finalizing => Err(WizardError::Busy),
            other => Err(WizardError::InvalidState(other)),
        }
    }

    fn log(&self, event: LogEvent) {
        if let Some(ref logger) = self.logger {
            logger.log(&event);
        }
    }
}
