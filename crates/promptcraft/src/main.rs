mod config;
mod history;
mod run;
mod services;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use promptcraft_agent::BackendType;
use promptcraft_core::{Category, CategoryClassifier, KeywordClassifier, QuestionCatalog, QuestionKind};
use promptcraft_logging::LogFormat;

use crate::config::{CliOverrides, GlobalConfig, Settings};
use crate::history::HistoryAction;
use crate::run::RunArgs;
use crate::services::Services;

#[derive(Parser, Debug)]
#[command(
    name = "promptcraft",
    about = "Turn a short prompt into a detailed one by answering a few questions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Chat backend used for enhancement
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendChoice>,

    /// Model to use (backend default if omitted)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Tracing filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// History database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Ask the model for prompt-specific questions
    #[arg(long, global = true)]
    generated_questions: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive wizard (default)
    Craft {
        /// Prompt to start with
        #[arg(short, long)]
        prompt: Option<String>,

        /// Pre-selected category
        #[arg(short, long, value_enum)]
        category: Option<CategoryChoice>,
    },

    /// Run the wizard without a UI, answering from flags
    Run {
        /// Prompt to enhance
        #[arg(short, long)]
        prompt: String,

        #[arg(short, long, value_enum)]
        category: CategoryChoice,

        /// Click option VALUE of question ID (repeatable)
        #[arg(short, long = "answer", value_name = "ID=VALUE")]
        answers: Vec<String>,

        /// Output the result as JSON
        #[arg(long)]
        json_output: bool,
    },

    /// Browse enhanced prompts
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Print the built-in questions for a category
    Questions {
        #[arg(short, long, value_enum)]
        category: CategoryChoice,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Guess the category of a prompt
    Detect {
        text: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendChoice {
    Openai,
    Claude,
}

impl From<BackendChoice> for BackendType {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Openai => BackendType::OpenAi,
            BackendChoice::Claude => BackendType::ClaudeCode,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryChoice {
    Chat,
    Coding,
    App,
    Image,
    Video,
    Research,
}

impl From<CategoryChoice> for Category {
    fn from(choice: CategoryChoice) -> Self {
        match choice {
            CategoryChoice::Chat => Category::Chat,
            CategoryChoice::Coding => Category::Coding,
            CategoryChoice::App => Category::App,
            CategoryChoice::Image => Category::Image,
            CategoryChoice::Video => Category::Video,
            CategoryChoice::Research => Category::Research,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    let command = cli.command.unwrap_or(Command::Craft {
        prompt: None,
        category: None,
    });

    // The TUI owns the terminal, so its tracing output goes to a file
    let _log_guard = if matches!(command, Command::Craft { .. }) {
        let dir = promptcraft_logging::default_log_dir();
        Some(
            promptcraft_logging::init_file_tracing(&cli.log_level, &dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?,
        )
    } else {
        promptcraft_logging::init_tracing(&cli.log_level, log_format);
        None
    };

    let global_config = GlobalConfig::load().context("Failed to load global configuration")?;
    let overrides = CliOverrides {
        backend: cli.backend.map(Into::into),
        model: cli.model,
        db: cli.db,
        generated_questions: cli.generated_questions,
    };
    let settings = Settings::resolve(&overrides, global_config.as_ref())?;

    match command {
        Command::Craft { prompt, category } => {
            let services = Services::build(&settings);
            tui::run_tui(services, prompt, category.map(Into::into)).await
        }
        Command::Run {
            prompt,
            category,
            answers,
            json_output,
        } => {
            let services = Services::build(&settings);
            run::handle_run_command(
                RunArgs {
                    prompt,
                    category: category.into(),
                    answers,
                    json_output,
                    log_format,
                },
                &services,
            )
            .await
        }
        Command::History { action } => history::handle_history_command(action, &settings),
        Command::Questions { category, json } => print_questions(category.into(), json),
        Command::Detect { text } => {
            let category = KeywordClassifier::new().classify(&text);
            println!("{} ({})", category.tag().bright_cyan(), category.label().dimmed());
            Ok(())
        }
    }
}

fn print_questions(category: Category, json: bool) -> Result<()> {
    let list = QuestionCatalog::new().for_category(category);

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", category.label().bold());
    for (i, question) in list.iter().enumerate() {
        let hint = match question.kind {
            QuestionKind::SingleChoice => "pick one",
            QuestionKind::BooleanChoice => "yes/no",
            QuestionKind::MultiChoice if question.allow_multiple => "pick any",
            QuestionKind::MultiChoice => "pick one",
        };
        println!();
        println!(
            "{} {} {}",
            format!("{}.", i + 1).dimmed(),
            question.prompt.bold(),
            format!("[{}, {}]", question.id, hint).dimmed()
        );
        for option in question.choices() {
            println!("   - {}", option);
        }
    }

    Ok(())
}
