//! Interactive state of the question on screen.
//!
//! A [`QuestionView`] is the explicit selection model behind whatever draws the
//! question. Renderers read it, clicks mutate it, and [`QuestionView::extract`]
//! reads the answer back out without touching the [`crate::AnswerStore`].

use crate::{Answer, QuestionDefinition, QuestionKind, WizardError};

/// How a click affects sibling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Selecting one option deselects every other
    Radio,
    /// Each click flips only the clicked option
    Toggle,
}

/// One option as a renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionState<'a> {
    pub index: usize,
    pub value: &'a str,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct QuestionView {
    question: QuestionDefinition,
    choices: Vec<String>,
    selected: Vec<bool>,
    touched: bool,
}

impl QuestionView {
    /// Build the view for `question`, pre-selecting whatever `prior` selected.
    ///
    /// Prior values that are not options of this question are ignored, as is a
    /// prior answer of the wrong shape (a list for a single-choice question or
    /// a single string for a multi-choice one).
    pub fn render(question: &QuestionDefinition, prior: Option<&Answer>) -> Self {
        let choices = question.choices();
        let mut selected = vec![false; choices.len()];

        let prior_values: Vec<&str> = match (question.kind, prior) {
            (QuestionKind::SingleChoice | QuestionKind::BooleanChoice, Some(Answer::Single(v))) => {
                vec![v.as_str()]
            }
            (QuestionKind::MultiChoice, Some(Answer::Multi(values))) => {
                values.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        };

        for (flag, choice) in selected.iter_mut().zip(&choices) {
            *flag = prior_values.contains(&choice.as_str());
        }

        let mut view = Self {
            question: question.clone(),
            choices,
            selected,
            touched: false,
        };
        // A stored radio answer can never select more than one option
        if view.mode() == SelectionMode::Radio {
            if let Some(first) = view.selected.iter().position(|s| *s) {
                view.selected.iter_mut().skip(first + 1).for_each(|s| *s = false);
            }
        }
        view
    }

    pub fn question(&self) -> &QuestionDefinition {
        &self.question
    }

    pub fn question_id(&self) -> &str {
        &self.question.id
    }

    /// `allow_multiple` is authoritative for multi-choice questions; the other
    /// kinds are always radio
    pub fn mode(&self) -> SelectionMode {
        match self.question.kind {
            QuestionKind::MultiChoice if self.question.allow_multiple => SelectionMode::Toggle,
            _ => SelectionMode::Radio,
        }
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn options(&self) -> impl Iterator<Item = OptionState<'_>> {
        self.choices
            .iter()
            .zip(&self.selected)
            .enumerate()
            .map(|(index, (value, selected))| OptionState {
                index,
                value: value.as_str(),
                selected: *selected,
            })
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Whether any click happened since the view was rendered
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Click the option at `index`
    pub fn click(&mut self, index: usize) -> Result<(), WizardError> {
        if index >= self.choices.len() {
            return Err(WizardError::UnknownOption {
                question_id: self.question.id.clone(),
                option: format!("#{}", index + 1),
            });
        }

        match self.mode() {
            SelectionMode::Radio => {
                self.selected.iter_mut().for_each(|s| *s = false);
                self.selected[index] = true;
            }
            SelectionMode::Toggle => {
                self.selected[index] = !self.selected[index];
            }
        }
        self.touched = true;
        Ok(())
    }

    /// Click the option whose value is `value`
    pub fn click_value(&mut self, value: &str) -> Result<(), WizardError> {
        let index = self
            .choices
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| WizardError::UnknownOption {
                question_id: self.question.id.clone(),
                option: value.to_string(),
            })?;
        self.click(index)
    }

    /// Read the current selection as an answer.
    ///
    /// - single/boolean-choice: the selected value, or `None`
    /// - multi-choice: the selected values in option order; an empty selection
    ///   is `Some([])` only after a click in this view (an explicit clear), and
    ///   `None` when nothing was ever touched
    pub fn extract(&self) -> Option<Answer> {
        let mut values = self
            .options()
            .filter(|o| o.selected)
            .map(|o| o.value.to_string());

        match self.question.kind {
            QuestionKind::SingleChoice | QuestionKind::BooleanChoice => {
                values.next().map(Answer::Single)
            }
            QuestionKind::MultiChoice => {
                let values: Vec<String> = values.collect();
                if values.is_empty() && !self.touched {
                    None
                } else {
                    Some(Answer::Multi(values))
                }
            }
        }
    }
}
