//! Main TUI application for the wizard.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, warn};

use promptcraft_core::{
    Category, CategoryClassifier, Completion, HistoryRecord, KeywordClassifier, QuestionSource,
    QuestionView, Step, WizardController, WizardError, WizardState,
};

use super::layout::{ContentLayout, InputLayout, MainLayout, QuestionLayout};
use super::widgets::{
    CategoryBar, HistoryList, OptionList, OutputWidget, ProgressWidget, PromptInput,
    QuestionWidget,
};

/// The screen currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Prompt text and category
    Input,
    /// One question at a time
    Questions,
    /// Waiting on the backend
    Generating { message: String },
    /// An enhanced prompt
    Output,
    /// Saved prompts
    History,
}

/// What the output screen shows
#[derive(Debug, Clone)]
struct OutputView {
    original: String,
    category: Category,
    enhanced: String,
    /// Set when loaded from history rather than produced by this run
    history_id: Option<String>,
}

/// The main TUI application
pub struct App<B: Backend> {
    wizard: WizardController,
    questions: Arc<dyn QuestionSource>,
    classifier: KeywordClassifier,
    backend_name: String,
    screen: Screen,
    /// Prompt being typed on the input screen
    prompt: String,
    /// Category chosen on the input screen
    category: Option<Category>,
    /// Highlighted option of the current question
    option_cursor: usize,
    output: Option<OutputView>,
    output_scroll: u16,
    records: Vec<HistoryRecord>,
    history_cursor: usize,
    /// Where Esc leaves the history screen to
    history_return: Screen,
    running: bool,
    error_message: Option<String>,
    status_message: Option<String>,
    terminal: Terminal<B>,
}

impl<B: Backend> App<B> {
    pub fn new(
        terminal: Terminal<B>,
        wizard: WizardController,
        questions: Arc<dyn QuestionSource>,
        backend_name: impl Into<String>,
    ) -> Self {
        Self {
            wizard,
            questions,
            classifier: KeywordClassifier::new(),
            backend_name: backend_name.into(),
            screen: Screen::Input,
            prompt: String::new(),
            category: None,
            option_cursor: 0,
            output: None,
            output_scroll: 0,
            records: Vec::new(),
            history_cursor: 0,
            history_return: Screen::Input,
            running: true,
            error_message: None,
            status_message: None,
            terminal,
        }
    }

    /// Prefill the input screen. A prompt given without a category gets the
    /// detected one pre-selected.
    pub fn with_initial(mut self, prompt: Option<String>, category: Option<Category>) -> Self {
        if let Some(prompt) = prompt {
            self.prompt = prompt;
        }
        self.category = category.or_else(|| {
            (!self.prompt.trim().is_empty()).then(|| self.classifier.classify(&self.prompt))
        });
        self
    }

    /// Run the TUI application until the user quits
    pub async fn run(&mut self) -> Result<()> {
        while self.running {
            self.draw()?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// The last enhanced prompt shown, to print once the terminal is restored
    pub fn final_output(&self) -> Option<&str> {
        self.output
            .as_ref()
            .filter(|o| o.history_id.is_none())
            .map(|o| o.enhanced.as_str())
    }

    fn draw(&mut self) -> Result<()> {
        // Extract render state to avoid borrow issues
        let render_state = self.render_state();
        self.terminal.draw(|frame| render_state.render(frame))?;
        Ok(())
    }

    fn render_state(&self) -> RenderState {
        let view = self.wizard.render_current().cloned();
        let answered = match (&view, self.wizard.answers()) {
            (Some(view), Some(answers)) => answers.contains(view.question_id()),
            _ => false,
        };

        RenderState {
            backend_name: self.backend_name.clone(),
            screen: self.screen.clone(),
            prompt: self.prompt.clone(),
            category: self.category,
            run_category: self.wizard.category(),
            view,
            answered,
            progress: self.wizard.progress(),
            is_last: self.wizard.is_last(),
            option_cursor: self.option_cursor,
            output: self.output.clone(),
            output_scroll: self.output_scroll,
            records: self.records.clone(),
            history_cursor: self.history_cursor,
            error_message: self.error_message.clone(),
            status_message: self.status_message.clone(),
        }
    }

    fn show(&mut self, screen: Screen) {
        debug!(?screen, "Switching screen");
        self.screen = screen;
        self.status_message = None;
    }
}

/// State needed for rendering (to avoid borrow issues)
struct RenderState {
    backend_name: String,
    screen: Screen,
    prompt: String,
    category: Option<Category>,
    run_category: Option<Category>,
    view: Option<QuestionView>,
    answered: bool,
    progress: Option<(usize, usize)>,
    is_last: bool,
    option_cursor: usize,
    output: Option<OutputView>,
    output_scroll: u16,
    records: Vec<HistoryRecord>,
    history_cursor: usize,
    error_message: Option<String>,
    status_message: Option<String>,
}

impl RenderState {
    fn render(&self, frame: &mut Frame) {
        let layout = MainLayout::new(frame.area());

        self.render_header(frame, layout.header);
        match &self.screen {
            Screen::Input => self.render_input(frame, layout.body),
            Screen::Questions => self.render_questions(frame, layout.body),
            Screen::Generating { message } => self.render_generating(frame, layout.body, message),
            Screen::Output => self.render_output(frame, layout.body),
            Screen::History => self.render_history(frame, layout.body),
        }
        self.render_footer(frame, layout.footer);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " promptcraft ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::styled(
                format!("Backend: {} ", self.backend_name),
                Style::default().fg(Color::Yellow),
            ),
        ];

        let category = match self.screen {
            Screen::Input => None,
            Screen::Output => self.output.as_ref().map(|o| o.category),
            _ => self.run_category,
        };
        if let Some(category) = category {
            spans.push(Span::raw("| "));
            spans.push(Span::styled(
                format!("{} ", category.label()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let layout = InputLayout::new(area);

        frame.render_widget(PromptInput::new(&self.prompt), layout.prompt);
        frame.render_widget(CategoryBar::new(self.category), layout.categories);
        frame.render_widget(
            Paragraph::new(self.status_line("Type a prompt, pick a category, press Enter")),
            layout.status,
        );
    }

    fn render_questions(&self, frame: &mut Frame, area: Rect) {
        let layout = QuestionLayout::new(area);

        if let Some((current, total)) = self.progress {
            frame.render_widget(ProgressWidget::new(current, total), layout.progress);
        }

        match &self.view {
            Some(view) => {
                frame.render_widget(
                    QuestionWidget::new(view.question()).answered(self.answered),
                    layout.question,
                );
                frame.render_widget(OptionList::new(view, self.option_cursor), layout.options);
            }
            None => {
                let placeholder = Paragraph::new(Span::styled(
                    "No questions for this prompt.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
                frame.render_widget(placeholder, layout.question);
            }
        }

        let hint = if self.is_last {
            "Press → to generate your enhanced prompt"
        } else {
            "Every question is optional, press → to skip"
        };
        frame.render_widget(Paragraph::new(self.status_line(hint)), layout.status);
    }

    fn render_generating(&self, frame: &mut Frame, area: Rect, message: &str) {
        let layout = ContentLayout::new(area);

        let generating = Paragraph::new(vec![
            Line::from(Span::styled(
                "⏳ Generating...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

        frame.render_widget(generating, layout.content);
    }

    fn render_output(&self, frame: &mut Frame, area: Rect) {
        let layout = ContentLayout::new(area);

        if let Some(ref output) = self.output {
            let title = if output.history_id.is_some() {
                " Saved Prompt "
            } else {
                " Enhanced Prompt "
            };
            frame.render_widget(
                OutputWidget::new(&output.original, &output.enhanced)
                    .title(title)
                    .scroll(self.output_scroll),
                layout.content,
            );
        }

        frame.render_widget(
            Paragraph::new(self.status_line("Saved to history. Printed to the terminal on exit.")),
            layout.status,
        );
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let layout = ContentLayout::new(area);

        frame.render_widget(
            HistoryList::new(&self.records, self.history_cursor),
            layout.content,
        );
        frame.render_widget(
            Paragraph::new(self.status_line("Enter opens a saved prompt")),
            layout.status,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let keys: Vec<(&str, &str)> = match self.screen {
            Screen::Input => vec![
                ("Enter", "Start"),
                ("←→", "Category"),
                ("Ctrl+D", "Detect"),
                ("Ctrl+R", "History"),
                ("Esc", "Quit"),
            ],
            Screen::Questions => vec![
                ("Space", "Pick"),
                ("↑↓", "Move"),
                ("←", "Back"),
                ("→", if self.is_last { "Generate" } else { "Next" }),
                ("Esc", "Start over"),
                ("Ctrl+C", "Quit"),
            ],
            Screen::Generating { .. } => vec![],
            Screen::Output => vec![
                ("r", "Regenerate"),
                ("n", "New prompt"),
                ("h", "History"),
                ("↑↓", "Scroll"),
                ("q", "Quit"),
            ],
            Screen::History => vec![
                ("Enter", "Open"),
                ("d", "Delete"),
                ("c", "Clear all"),
                ("Esc", "Back"),
            ],
        };

        let mut spans = Vec::new();
        for (key, action) in keys {
            spans.push(Span::styled(
                format!(" {} ", key),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ));
            spans.push(Span::raw(format!(" {} ", action)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn status_line<'a>(&'a self, hint: &'a str) -> Line<'a> {
        if let Some(ref err) = self.error_message {
            Line::from(Span::styled(
                format!("Error: {}", err),
                Style::default().fg(Color::Red),
            ))
        } else if let Some(ref msg) = self.status_message {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Green)))
        } else {
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        }
    }
}

impl<B: Backend> App<B> {
    /// Handle a key event
    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Clear error on any key press
        self.error_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return Ok(());
        }

        match self.screen {
            Screen::Input => self.handle_input_key(key).await?,
            Screen::Questions => self.handle_question_key(key).await?,
            Screen::Generating { .. } => {}
            Screen::Output => self.handle_output_key(key).await?,
            Screen::History => self.handle_history_key(key),
        }

        Ok(())
    }

    async fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('d') if ctrl => self.detect_category(),
            KeyCode::Char('r') if ctrl => self.open_history(),
            KeyCode::Char(c) if !ctrl => self.prompt.push(c),
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Left => self.cycle_category(false),
            KeyCode::Right => self.cycle_category(true),
            KeyCode::Enter => self.start_wizard().await?,
            KeyCode::Esc => self.running = false,
            _ => {}
        }
        Ok(())
    }

    async fn handle_question_key(&mut self, key: KeyEvent) -> Result<()> {
        let len = self.wizard.render_current().map_or(0, QuestionView::len);

        match key.code {
            KeyCode::Up => self.option_cursor = self.option_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.option_cursor + 1 < len {
                    self.option_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.click(self.option_cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                if index < len {
                    self.option_cursor = index;
                    self.click(index);
                }
            }
            KeyCode::Left | KeyCode::Backspace => self.go_back(),
            KeyCode::Right | KeyCode::Tab => self.advance().await?,
            KeyCode::Esc => {
                self.wizard.reset();
                self.show(Screen::Input);
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_output_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('r') => self.regenerate().await?,
            KeyCode::Char('n') => self.new_prompt(),
            KeyCode::Char('h') => self.open_history(),
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => {
                if self.output.as_ref().is_some_and(|o| o.history_id.is_some()) {
                    self.open_history();
                }
            }
            KeyCode::Up => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::Down => self.scroll_down(1)?,
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll_down(10)?,
            KeyCode::Home => self.output_scroll = 0,
            _ => {}
        }
        Ok(())
    }

    /// Scroll the output, stopping once the last line is in view
    fn scroll_down(&mut self, lines: u16) -> Result<()> {
        let Some(output) = self.output.as_ref() else {
            return Ok(());
        };
        let size = self.terminal.size()?;
        let body = MainLayout::new(Rect::new(0, 0, size.width, size.height)).body;
        let max = OutputWidget::new(&output.original, &output.enhanced)
            .max_scroll(ContentLayout::new(body).content);
        self.output_scroll = self.output_scroll.saturating_add(lines).min(max);
        Ok(())
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.history_cursor = self.history_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.history_cursor + 1 < self.records.len() {
                    self.history_cursor += 1;
                }
            }
            KeyCode::Enter => self.load_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('c') => self.clear_history(),
            KeyCode::Esc => {
                let back = self.history_return.clone();
                self.show(back);
            }
            _ => {}
        }
    }

    fn detect_category(&mut self) {
        if self.prompt.trim().is_empty() {
            self.error_message = Some("Type a prompt to detect its category".to_string());
            return;
        }
        let category = self.classifier.classify(&self.prompt);
        self.category = Some(category);
        self.status_message = Some(format!("Detected category: {}", category.label()));
    }

    fn cycle_category(&mut self, forward: bool) {
        let all = Category::ALL;
        let next = match self.category.and_then(|c| all.iter().position(|x| *x == c)) {
            Some(i) if forward => (i + 1) % all.len(),
            Some(i) => (i + all.len() - 1) % all.len(),
            None if forward => 0,
            None => all.len() - 1,
        };
        self.category = Some(all[next]);
    }

    async fn start_wizard(&mut self) -> Result<()> {
        let category = match WizardController::validate_start(&self.prompt, self.category) {
            Ok(category) => category,
            Err(e) => {
                self.error_message = Some(describe(&e));
                return Ok(());
            }
        };

        self.show(Screen::Generating {
            message: "Preparing questions...".to_string(),
        });
        self.draw()?;

        let list = self
            .questions
            .questions_for(self.prompt.trim(), category)
            .await;
        if let Err(e) = self.wizard.start(list, &self.prompt, Some(category)) {
            self.show(Screen::Input);
            self.error_message = Some(describe(&e));
            return Ok(());
        }

        self.output = None;
        self.show(Screen::Questions);
        self.sync_cursor();

        // Nothing to ask, go straight to the enhancement call
        if self.wizard.render_current().is_none() {
            self.advance().await?;
        }
        Ok(())
    }

    fn click(&mut self, index: usize) {
        if let Err(e) = self.wizard.click(index) {
            self.error_message = Some(describe(&e));
        }
    }

    fn go_back(&mut self) {
        match self.wizard.go_back() {
            Ok(_) => self.sync_cursor(),
            Err(e) => self.error_message = Some(describe(&e)),
        }
    }

    async fn advance(&mut self) -> Result<()> {
        match self.wizard.go_forward() {
            Ok(Step::Moved { .. }) => self.sync_cursor(),
            Ok(Step::Finalizing) => {
                self.show(Screen::Generating {
                    message: "Enhancing your prompt...".to_string(),
                });
                self.draw()?;
                let result = self.wizard.finalize().await;
                self.finish(result);
            }
            Err(e) => self.error_message = Some(describe(&e)),
        }
        Ok(())
    }

    async fn regenerate(&mut self) -> Result<()> {
        if self.wizard.state() != WizardState::Complete {
            self.error_message = Some("Only the current run can be regenerated".to_string());
            return Ok(());
        }

        self.show(Screen::Generating {
            message: "Regenerating with the same answers...".to_string(),
        });
        self.draw()?;
        let result = self.wizard.regenerate().await;
        self.finish(result);
        Ok(())
    }

    fn finish(&mut self, result: Result<Completion, WizardError>) {
        match result {
            Ok(completion) => {
                self.output = Some(OutputView {
                    original: self.wizard.original_text().unwrap_or_default().to_string(),
                    category: self.wizard.category().unwrap_or_default(),
                    enhanced: completion.enhanced,
                    history_id: None,
                });
                self.output_scroll = 0;
                self.show(Screen::Output);
                if completion.record.is_none() {
                    self.status_message = Some("Could not save to history".to_string());
                }
            }
            Err(e) => {
                warn!(error = %e, "Enhancement failed");
                // The controller is back where it was before the call
                let screen = match self.wizard.state() {
                    WizardState::Complete => Screen::Output,
                    WizardState::InProgress => Screen::Questions,
                    _ => Screen::Input,
                };
                self.show(screen);
                self.error_message = Some(describe(&e));
            }
        }
    }

    fn new_prompt(&mut self) {
        self.wizard.reset();
        self.prompt.clear();
        self.category = None;
        self.output = None;
        self.show(Screen::Input);
    }

    fn open_history(&mut self) {
        match self.wizard.history().list() {
            Ok(records) => {
                self.records = records;
                self.history_cursor = 0;
                if self.screen != Screen::History {
                    self.history_return = self.screen.clone();
                }
                self.show(Screen::History);
            }
            Err(e) => self.error_message = Some(format!("Could not read history: {}", e)),
        }
    }

    fn load_selected(&mut self) {
        let Some(record) = self.records.get(self.history_cursor) else {
            return;
        };
        // A stored result replaces the current run
        self.wizard.reset();
        self.output = Some(OutputView {
            original: record.original.clone(),
            category: record.category,
            enhanced: record.enhanced.clone(),
            history_id: Some(record.id.clone()),
        });
        self.output_scroll = 0;
        self.show(Screen::Output);
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.records.get(self.history_cursor).map(|r| r.id.clone()) else {
            return;
        };
        match self.wizard.history().delete(&id) {
            Ok(_) => {
                self.records.remove(self.history_cursor);
                self.history_cursor = self
                    .history_cursor
                    .min(self.records.len().saturating_sub(1));
                self.status_message = Some("Deleted".to_string());
            }
            Err(e) => self.error_message = Some(format!("Could not delete: {}", e)),
        }
    }

    fn clear_history(&mut self) {
        match self.wizard.history().clear() {
            Ok(()) => {
                self.records.clear();
                self.history_cursor = 0;
                self.status_message = Some("History cleared".to_string());
            }
            Err(e) => self.error_message = Some(format!("Could not clear history: {}", e)),
        }
    }

    /// Put the cursor on the first selected option, or the first option
    fn sync_cursor(&mut self) {
        self.option_cursor = self
            .wizard
            .render_current()
            .and_then(|view| view.options().find(|o| o.selected).map(|o| o.index))
            .unwrap_or(0);
    }
}

fn describe(e: &WizardError) -> String {
    match e {
        WizardError::InvalidInput(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use promptcraft_core::{
        Answer, AnswerStore, EnhancementGateway, GatewayError, HistoryStore, MemoryHistory,
        QuestionCatalog,
    };
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;

    /// Echoes its input, failing the first `failures` calls
    struct EchoGateway {
        failures: Mutex<usize>,
        calls: Mutex<Vec<AnswerStore>>,
    }

    impl EchoGateway {
        fn new(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                failures: Mutex::new(failures),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl EnhancementGateway for EchoGateway {
        async fn generate(
            &self,
            original_text: &str,
            category: Category,
            answers: &AnswerStore,
        ) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(answers.clone());
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(GatewayError::Transport("connection refused".to_string()));
            }
            Ok(format!("Enhanced [{}]: {}", category, original_text))
        }
    }

    fn app(gateway: Arc<EchoGateway>, history: Arc<MemoryHistory>) -> App<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let wizard = WizardController::new(gateway, history);
        App::new(terminal, wizard, Arc::new(QuestionCatalog::new()), "test")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn press(app: &mut App<TestBackend>, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key_event(key(*code)).await.unwrap();
        }
    }

    async fn type_text(app: &mut App<TestBackend>, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    fn screen_text(app: &App<TestBackend>) -> String {
        let buffer = app.terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn test_coding_walkthrough() {
        let gateway = EchoGateway::new(0);
        let history = Arc::new(MemoryHistory::new());
        let mut app = app(gateway.clone(), history.clone());

        type_text(&mut app, "Write a sorting function").await;
        // None -> Chat -> Coding
        press(&mut app, &[KeyCode::Right, KeyCode::Right, KeyCode::Enter]).await;
        assert_eq!(app.screen, Screen::Questions);
        assert_eq!(app.wizard.category(), Some(Category::Coding));

        // language: Rust
        press(&mut app, &[KeyCode::Char('6'), KeyCode::Right]).await;
        // complexity: skipped
        press(&mut app, &[KeyCode::Right]).await;
        // comments: Yes
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Right]).await;
        // errorHandling: No
        press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Right]).await;
        // extras: Unit tests + Logging
        press(
            &mut app,
            &[
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Char(' '),
            ],
        )
        .await;
        assert!(app.wizard.is_last());
        press(&mut app, &[KeyCode::Tab]).await;

        assert_eq!(app.screen, Screen::Output);
        assert_eq!(
            app.final_output(),
            Some("Enhanced [coding]: Write a sorting function")
        );

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let answers = &calls[0];
        assert_eq!(answers.get("language"), Some(&Answer::from("Rust")));
        assert!(!answers.contains("complexity"));
        assert_eq!(answers.get("comments"), Some(&Answer::from("Yes")));
        assert_eq!(answers.get("errorHandling"), Some(&Answer::from("No")));
        assert_eq!(
            answers.get("extras"),
            Some(&Answer::from(vec!["Unit tests", "Logging"]))
        );

        assert_eq!(history.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_start_requires_prompt_and_category() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));

        press(&mut app, &[KeyCode::Enter]).await;
        assert_eq!(app.screen, Screen::Input);
        assert_eq!(app.error_message.as_deref(), Some("Please enter a prompt first"));

        type_text(&mut app, "hello").await;
        press(&mut app, &[KeyCode::Enter]).await;
        assert_eq!(app.error_message.as_deref(), Some("Please select a category"));
        assert_eq!(app.wizard.state(), WizardState::NotStarted);
    }

    #[tokio::test]
    async fn test_back_at_first_question_and_start_over() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));
        app = app.with_initial(Some("Paint a sunset".to_string()), Some(Category::Image));

        press(&mut app, &[KeyCode::Enter, KeyCode::Left]).await;
        assert_eq!(app.screen, Screen::Questions);
        assert!(app.error_message.is_some());
        assert_eq!(app.wizard.current_index(), Some(0));

        press(&mut app, &[KeyCode::Esc]).await;
        assert_eq!(app.screen, Screen::Input);
        assert_eq!(app.wizard.state(), WizardState::NotStarted);
        assert_eq!(app.prompt, "Paint a sunset");
    }

    #[tokio::test]
    async fn test_cursor_follows_stored_answer_on_back() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));
        app = app.with_initial(Some("Explain monads".to_string()), Some(Category::Chat));

        press(&mut app, &[KeyCode::Enter, KeyCode::Char('3'), KeyCode::Right]).await;
        assert_eq!(app.option_cursor, 0);

        press(&mut app, &[KeyCode::Left]).await;
        assert_eq!(app.option_cursor, 2);
        assert!(app.wizard.render_current().unwrap().is_selected(2));
    }

    #[tokio::test]
    async fn test_gateway_failure_returns_to_questions() {
        let gateway = EchoGateway::new(1);
        let mut app = app(gateway.clone(), Arc::new(MemoryHistory::new()));
        app = app.with_initial(Some("Trailer for a heist film".to_string()), Some(Category::Video));

        press(&mut app, &[KeyCode::Enter]).await;
        while !app.wizard.is_last() {
            press(&mut app, &[KeyCode::Right]).await;
        }
        press(&mut app, &[KeyCode::Right]).await;

        assert_eq!(app.screen, Screen::Questions);
        assert_eq!(app.wizard.state(), WizardState::InProgress);
        assert!(app
            .error_message
            .as_deref()
            .is_some_and(|e| e.contains("connection refused")));

        press(&mut app, &[KeyCode::Right]).await;
        assert_eq!(app.screen, Screen::Output);
        assert_eq!(gateway.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_regenerate_and_history_screen() {
        let gateway = EchoGateway::new(0);
        let history = Arc::new(MemoryHistory::new());
        let mut app = app(gateway.clone(), history.clone());
        app = app.with_initial(Some("Compare SQL and NoSQL".to_string()), Some(Category::Research));

        press(&mut app, &[KeyCode::Enter]).await;
        while app.screen == Screen::Questions {
            press(&mut app, &[KeyCode::Right]).await;
        }
        assert_eq!(app.screen, Screen::Output);

        press(&mut app, &[KeyCode::Char('r')]).await;
        assert_eq!(app.screen, Screen::Output);
        assert_eq!(gateway.calls.lock().unwrap().len(), 2);
        assert_eq!(history.list().unwrap().len(), 2);

        press(&mut app, &[KeyCode::Char('h')]).await;
        assert_eq!(app.screen, Screen::History);
        assert_eq!(app.records.len(), 2);

        press(&mut app, &[KeyCode::Enter]).await;
        assert_eq!(app.screen, Screen::Output);
        assert!(app.final_output().is_none());
        assert_eq!(app.wizard.state(), WizardState::NotStarted);
        assert!(app.wizard.enhanced_text().is_none());

        // Saved records cannot be regenerated
        press(&mut app, &[KeyCode::Char('r')]).await;
        assert!(app.error_message.is_some());
        assert_eq!(gateway.calls.lock().unwrap().len(), 2);

        press(&mut app, &[KeyCode::Esc, KeyCode::Char('d')]).await;
        assert_eq!(history.list().unwrap().len(), 1);

        press(&mut app, &[KeyCode::Char('c')]).await;
        assert!(history.list().unwrap().is_empty());
        assert!(app.records.is_empty());
    }

    #[tokio::test]
    async fn test_loading_history_discards_the_run() {
        let history = Arc::new(MemoryHistory::new());
        let mut app = app(EchoGateway::new(0), history.clone());
        app = app.with_initial(Some("Compare SQL and NoSQL".to_string()), Some(Category::Research));

        press(&mut app, &[KeyCode::Enter]).await;
        while app.screen == Screen::Questions {
            press(&mut app, &[KeyCode::Right]).await;
        }
        assert_eq!(app.wizard.state(), WizardState::Complete);

        press(&mut app, &[KeyCode::Char('h'), KeyCode::Enter]).await;
        assert_eq!(app.screen, Screen::Output);
        assert_eq!(app.wizard.state(), WizardState::NotStarted);
        assert!(app.wizard.answers().is_none());

        // New prompt still works from a loaded record
        press(&mut app, &[KeyCode::Char('n')]).await;
        assert_eq!(app.screen, Screen::Input);
    }

    #[tokio::test]
    async fn test_output_scroll_is_clamped() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));
        app = app.with_initial(Some("Explain monads".to_string()), Some(Category::Chat));

        press(&mut app, &[KeyCode::Enter]).await;
        while app.screen == Screen::Questions {
            press(&mut app, &[KeyCode::Right]).await;
        }
        assert_eq!(app.screen, Screen::Output);

        // A one-line result fits in a 100x30 terminal
        press(&mut app, &[KeyCode::PageDown, KeyCode::Down, KeyCode::Down]).await;
        assert_eq!(app.output_scroll, 0);

        let long: String = (1..=60).map(|i| format!("line {}\n", i)).collect();
        if let Some(output) = app.output.as_mut() {
            output.enhanced = long;
        }
        for _ in 0..20 {
            press(&mut app, &[KeyCode::PageDown]).await;
        }
        // 30 rows: header and footer take 6, margins 2, status 2, border 2
        let visible = 30 - 6 - 2 - 2 - 2;
        assert_eq!(app.output_scroll, 66 - visible);

        press(&mut app, &[KeyCode::Home]).await;
        assert_eq!(app.output_scroll, 0);
    }

    #[tokio::test]
    async fn test_detect_and_quit() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));

        app.handle_key_event(ctrl('d')).await.unwrap();
        assert!(app.error_message.is_some());

        type_text(&mut app, "debug this python script").await;
        app.handle_key_event(ctrl('d')).await.unwrap();
        assert_eq!(app.category, Some(Category::Coding));

        app.handle_key_event(ctrl('c')).await.unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_initial_prompt_detects_category() {
        let app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()))
            .with_initial(Some("A watercolor portrait of a fox".to_string()), None);
        assert_eq!(app.category, Some(Category::Image));
    }

    #[test]
    fn test_draw_renders_header() {
        let mut app = app(EchoGateway::new(0), Arc::new(MemoryHistory::new()));
        app.draw().unwrap();
        let text = screen_text(&app);
        assert!(text.contains("promptcraft"));
        assert!(text.contains("Backend: test"));
    }
}
