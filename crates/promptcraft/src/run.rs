//! Headless wizard: answers come from `--answer ID=VALUE` flags.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use promptcraft_core::{AnswerStore, Category, Completion, QuestionList};
use promptcraft_logging::{LogFormat, Logger};

use crate::services::Services;

pub struct RunArgs {
    pub prompt: String,
    pub category: Category,
    pub answers: Vec<String>,
    pub json_output: bool,
    pub log_format: LogFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput<'a> {
    original: &'a str,
    category: Category,
    answers: &'a AnswerStore,
    enhanced: &'a str,
    history_id: Option<&'a str>,
}

/// Split `ID=VALUE` pairs, keeping repeated ids in order
pub fn parse_answers(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| {
            let (id, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid answer '{}', expected ID=VALUE", pair))?;
            let id = id.trim();
            if id.is_empty() {
                anyhow::bail!("Invalid answer '{}', question id is empty", pair);
            }
            Ok((id.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Ids in `answers` that no question in `list` has
fn unknown_ids<'a>(answers: &'a [(String, String)], list: &QuestionList) -> Vec<&'a str> {
    let mut unknown: Vec<&str> = answers
        .iter()
        .map(|(id, _)| id.as_str())
        .filter(|id| !list.iter().any(|q| q.id == *id))
        .collect();
    unknown.dedup();
    unknown
}

pub async fn handle_run_command(args: RunArgs, services: &Services) -> Result<()> {
    let answers = parse_answers(&args.answers)?;

    if !services.gateway.is_available().await {
        anyhow::bail!(
            "Backend '{}' is not available. Check that it is installed or that its API key is set.",
            services.gateway.backend_name()
        );
    }

    let list = services
        .questions
        .questions_for(&args.prompt, args.category)
        .await;
    for id in unknown_ids(&answers, &list) {
        warn!(question_id = id, "No such question, ignoring answer");
    }

    let logger = Arc::new(Logger::new(args.log_format));
    let mut wizard = services.wizard().with_logger(logger);
    wizard.start(list, &args.prompt, Some(args.category))?;

    let completion = loop {
        if let Some(view) = wizard.render_current() {
            let id = view.question_id().to_string();
            for (_, value) in answers.iter().filter(|(qid, _)| *qid == id) {
                wizard.click_value(value)?;
            }
        }

        if let Some(completion) = wizard.advance().await? {
            break completion;
        }
    };

    if args.json_output {
        print_json(&wizard_output(&args, &wizard_answers(&wizard), &completion))?;
    } else {
        if args.log_format == LogFormat::Pretty {
            eprintln!();
            eprintln!("{}", "=== ENHANCED PROMPT ===".bright_green().bold());
        }
        println!("{}", completion.enhanced);
    }

    Ok(())
}

fn wizard_answers(wizard: &promptcraft_core::WizardController) -> AnswerStore {
    wizard.answers().cloned().unwrap_or_default()
}

fn wizard_output<'a>(
    args: &'a RunArgs,
    answers: &'a AnswerStore,
    completion: &'a Completion,
) -> RunOutput<'a> {
    RunOutput {
        original: args.prompt.trim(),
        category: args.category,
        answers,
        enhanced: &completion.enhanced,
        history_id: completion.record.as_ref().map(|r| r.id.as_str()),
    }
}

fn print_json(output: &RunOutput<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}
