//! TUI widgets for the wizard.

mod history;
mod input;
mod output;
mod progress;
mod question;

pub use history::HistoryList;
pub use input::{CategoryBar, PromptInput};
pub use output::OutputWidget;
pub use progress::ProgressWidget;
pub use question::{OptionList, QuestionWidget};
