//! Question definitions.
//!
//! The serialized shape matches what question generators exchange on the
//! wire: `{"id", "type": "mcq"|"yesno"|"chips", "question", "options",
//! "multiSelect"}`.

use serde::{Deserialize, Serialize};

use crate::Category;

/// Upper bound on questions in one list
pub const MAX_QUESTIONS: usize = 6;

/// The implicit options of a boolean-choice question
pub const BOOLEAN_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Kind of question, determining extraction and default toggle behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Pick exactly one option
    #[serde(rename = "mcq")]
    SingleChoice,
    /// Yes or No
    #[serde(rename = "yesno")]
    BooleanChoice,
    /// Chips; `allow_multiple` decides between toggle and radio behavior
    #[serde(rename = "chips")]
    MultiChoice,
}

/// A single clarifying question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, rename = "multiSelect")]
    pub allow_multiple: bool,
}

impl QuestionDefinition {
    pub fn single_choice(id: &str, prompt: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::SingleChoice,
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            allow_multiple: false,
        }
    }

    pub fn boolean_choice(id: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::BooleanChoice,
            prompt: prompt.to_string(),
            options: Vec::new(),
            allow_multiple: false,
        }
    }

    pub fn multi_choice(id: &str, prompt: &str, options: &[&str], allow_multiple: bool) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::MultiChoice,
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            allow_multiple,
        }
    }

    /// The options a user can click, in display order.
    ///
    /// Boolean-choice questions always present Yes/No regardless of any
    /// stored options.
    pub fn choices(&self) -> Vec<String> {
        match self.kind {
            QuestionKind::BooleanChoice => BOOLEAN_OPTIONS.iter().map(|o| o.to_string()).collect(),
            QuestionKind::SingleChoice | QuestionKind::MultiChoice => self.options.clone(),
        }
    }
}

/// Ordered questions for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UncappedList")]
pub struct QuestionList {
    pub category: Category,
    questions: Vec<QuestionDefinition>,
}

/// Deserialized form, capped on the way into [`QuestionList`]
#[derive(Deserialize)]
struct UncappedList {
    category: Category,
    questions: Vec<QuestionDefinition>,
}

impl From<UncappedList> for QuestionList {
    fn from(raw: UncappedList) -> Self {
        Self::new(raw.category, raw.questions)
    }
}

impl QuestionList {
    /// Build a list, keeping at most [`MAX_QUESTIONS`] entries
    pub fn new(category: Category, mut questions: Vec<QuestionDefinition>) -> Self {
        questions.truncate(MAX_QUESTIONS);
        Self {
            category,
            questions,
        }
    }

    pub fn empty(category: Category) -> Self {
        Self::new(category, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionDefinition> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionDefinition> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionList {
    type Item = &'a QuestionDefinition;
    type IntoIter = std::slice::Iter<'a, QuestionDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
