//! Collected answers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An answer to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Single-choice or boolean-choice
    Single(String),
    /// Multi-choice selections, in option order
    Multi(Vec<String>),
}

impl Answer {
    /// An explicitly cleared multi-choice
    pub fn is_empty(&self) -> bool {
        matches!(self, Answer::Multi(v) if v.is_empty())
    }

    /// Convert to a string representation for prompts and logs
    pub fn to_prompt_string(&self) -> String {
        match self {
            Answer::Single(s) => s.clone(),
            Answer::Multi(v) => v.join(", "),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<Vec<&str>> for Answer {
    fn from(values: Vec<&str>) -> Self {
        Answer::Multi(values.into_iter().map(String::from).collect())
    }
}

/// Question id to answer, in the order questions were first answered.
///
/// Keys are only ever added or overwritten; there is no per-key removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: IndexMap<String, Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Store an answer, overwriting (in place) any previous value for the id
    pub fn commit(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Answer> {
        self.answers.iter()
    }
}

impl<'a> IntoIterator for &'a AnswerStore {
    type Item = (&'a String, &'a Answer);
    type IntoIter = indexmap::map::Iter<'a, String, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.iter()
    }
}

impl FromIterator<(String, Answer)> for AnswerStore {
    fn from_iter<T: IntoIterator<Item = (String, Answer)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
