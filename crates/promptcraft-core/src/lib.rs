//! # promptcraft-core
//!
//! The question wizard behind promptcraft: a category picks an ordered list of
//! click-only questions, the [`WizardController`] walks the user through them
//! while collecting answers, and the finished [`AnswerStore`] is handed to an
//! [`EnhancementGateway`] whose output lands in a [`HistoryStore`].
//!
//! Nothing in this crate talks to a network or a terminal. Collaborators are
//! traits; renderers project [`QuestionView`] state.

mod answer;
mod catalog;
mod category;
mod error;
mod gateway;
mod history;
mod question;
mod view;
mod wizard;

pub use answer::{Answer, AnswerStore};
pub use catalog::{QuestionCatalog, QuestionSource};
pub use category::{Category, CategoryClassifier, KeywordClassifier};
pub use error::WizardError;
pub use gateway::{EnhancementGateway, GatewayError};
pub use history::{
    HistoryRecord, HistoryStore, MemoryHistory, NewHistoryRecord, StorageError, HISTORY_CAPACITY,
};
pub use question::{QuestionDefinition, QuestionKind, QuestionList, BOOLEAN_OPTIONS, MAX_QUESTIONS};
pub use view::{OptionState, QuestionView, SelectionMode};
pub use wizard::{Completion, EnhancementRequest, Step, WizardController, WizardState};
