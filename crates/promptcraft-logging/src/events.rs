use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structured log events for a wizard run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    WizardStarted {
        prompt: String,
        category: String,
        questions: usize,
    },
    QuestionShown {
        index: usize,
        total: usize,
        question_id: String,
        prompt: String,
    },
    AnswerCommitted {
        question_id: String,
        answer: String,
    },
    EnhancementRequested {
        category: String,
        answers: usize,
    },
    EnhancementCompleted {
        chars: usize,
        duration_secs: f64,
    },
    EnhancementFailed {
        error: String,
    },
    HistorySaved {
        id: String,
    },
    HistoryFailed {
        error: String,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for wizard events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
    console: bool,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
            console: true,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            format,
            file_writer: Some(Mutex::new(Self::open_log(log_path)?)),
            console: true,
        })
    }

    /// Create a logger that only appends JSON lines to `log_path`, for when
    /// something else owns the terminal
    pub fn file_only(log_path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            format: LogFormat::Json,
            file_writer: Some(Mutex::new(Self::open_log(log_path)?)),
            console: false,
        })
    }

    fn open_log(log_path: &Path) -> std::io::Result<File> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON lines
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        if !self.console {
            return;
        }

        let mut stderr = std::io::stderr();
        if let Some(line) = self.render(event) {
            let _ = writeln!(stderr, "{}", line);
        }
    }

    /// Render an event for the console, `None` when the format skips it
    pub fn render(&self, event: &LogEvent) -> Option<String> {
        match self.format {
            LogFormat::Json => serde_json::to_string(event).ok(),
            LogFormat::Pretty => Self::render_pretty(event),
            LogFormat::Compact => Some(Self::render_compact(event)),
        }
    }

    fn render_pretty(event: &LogEvent) -> Option<String> {
        let line = match event {
            LogEvent::WizardStarted {
                prompt,
                category,
                questions,
            } => {
                let rule = "─".repeat(60);
                format!(
                    "\n{}\n  {} {}\n  {} {}\n  {} {}\n{}",
                    rule.bright_blue(),
                    "Prompt:".dimmed(),
                    Self::truncate(prompt, 60),
                    "Category:".dimmed(),
                    category.bright_cyan(),
                    "Questions:".dimmed(),
                    questions,
                    rule.bright_blue()
                )
            }
            LogEvent::QuestionShown {
                index,
                total,
                prompt,
                ..
            } => format!(
                "  {} {} {}",
                "?".bright_cyan(),
                format!("[{}/{}]", index + 1, total).dimmed(),
                prompt.bold()
            ),
            LogEvent::AnswerCommitted { answer, .. } => {
                format!("    {} {}", "✓".bright_green(), answer)
            }
            LogEvent::EnhancementRequested { answers, .. } => format!(
                "\n  {} {} ({} {})",
                "▶".bright_magenta(),
                "ENHANCING".bright_magenta().bold(),
                answers,
                if *answers == 1 { "answer" } else { "answers" }
            ),
            LogEvent::EnhancementCompleted {
                chars,
                duration_secs,
            } => format!(
                "    {} Done, {} chars ({:.1}s)",
                "✓".bright_green(),
                chars,
                duration_secs
            ),
            LogEvent::EnhancementFailed { error } => {
                format!("    {} {}", "✗".bright_red(), error.bright_red())
            }
            LogEvent::HistorySaved { id } => {
                format!("    {} Saved to history as {}", "📁".dimmed(), id.dimmed())
            }
            LogEvent::HistoryFailed { error } => format!(
                "    {} History not saved: {}",
                "⚠".bright_yellow(),
                error
            ),
        };
        Some(line)
    }

    fn render_compact(event: &LogEvent) -> String {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        match event {
            LogEvent::WizardStarted {
                category,
                questions,
                ..
            } => format!("[{}] wizard:start {} q={}", timestamp, category, questions),
            LogEvent::QuestionShown {
                index, question_id, ..
            } => format!("[{}] question:{}:{}", timestamp, index + 1, question_id),
            LogEvent::AnswerCommitted {
                question_id,
                answer,
            } => format!("[{}] answer:{}={}", timestamp, question_id, answer),
            LogEvent::EnhancementRequested { category, answers } => {
                format!("[{}] enhance:start {} a={}", timestamp, category, answers)
            }
            LogEvent::EnhancementCompleted {
                chars,
                duration_secs,
            } => format!(
                "[{}] enhance:done {}c {:.1}s",
                timestamp, chars, duration_secs
            ),
            LogEvent::EnhancementFailed { error } => {
                format!("[{}] enhance:error {}", timestamp, error)
            }
            LogEvent::HistorySaved { id } => format!("[{}] history:saved {}", timestamp, id),
            LogEvent::HistoryFailed { error } => {
                format!("[{}] history:error {}", timestamp, error)
            }
        }
    }

    /// Truncate on a char boundary, appending an ellipsis
    fn truncate(s: &str, max_chars: usize) -> String {
        if s.chars().count() > max_chars {
            let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        }
    }
}
