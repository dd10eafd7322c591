use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use promptcraft_core::{HistoryRecord, HistoryStore};
use promptcraft_db::Database;

use crate::config::Settings;

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved prompts, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one saved prompt
    Show {
        /// Record ID or a unique prefix of it
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one saved prompt
    Delete {
        /// Record ID or a unique prefix of it
        id: String,
    },

    /// Delete every saved prompt
    Clear,
}

pub fn handle_history_command(action: HistoryAction, settings: &Settings) -> Result<()> {
    let db = Database::open_at(&settings.history_path).with_context(|| {
        format!(
            "Failed to open history database {}",
            settings.history_path.display()
        )
    })?;

    match action {
        HistoryAction::List { json } => {
            let records = db.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("{}", "No saved prompts.".dimmed());
            } else {
                print_history_table(&records);
            }
        }
        HistoryAction::Show { id, json } => {
            let record = resolve_record(&db, &id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record_detail(&record);
            }
        }
        HistoryAction::Delete { id } => {
            let record = resolve_record(&db, &id)?;
            db.delete(&record.id)?;
            println!("{} {}", "Deleted".bright_green(), record.id);
        }
        HistoryAction::Clear => {
            db.clear()?;
            println!("{}", "History cleared.".bright_green());
        }
    }

    Ok(())
}

/// Exact id first, then a unique prefix
fn resolve_record(store: &dyn HistoryStore, id: &str) -> Result<HistoryRecord> {
    if let Some(record) = store.get_by_id(id)? {
        return Ok(record);
    }

    let mut matches: Vec<HistoryRecord> = store
        .list()?
        .into_iter()
        .filter(|r| r.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("No saved prompt with id '{}'", id),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("Id prefix '{}' matches {} saved prompts", id, n),
    }
}

fn print_history_table(records: &[HistoryRecord]) {
    println!(
        "{:<10} {:<18} {:<10} {}",
        "ID".dimmed(),
        "CREATED".dimmed(),
        "CATEGORY".dimmed(),
        "PROMPT".dimmed(),
    );

    for r in records {
        let short_id: String = r.id.chars().take(8).collect();
        println!(
            "{:<10} {:<18} {:<10} {}",
            short_id,
            r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            r.category.tag().bright_cyan(),
            preview(&r.original, 60)
        );
    }
}

fn print_record_detail(record: &HistoryRecord) {
    println!("{}", "=== Saved Prompt ===".bright_blue().bold());
    println!("{}  {}", "ID:".dimmed(), record.id);
    println!(
        "{}  {}",
        "Created:".dimmed(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}  {}", "Category:".dimmed(), record.category.label());
    println!();
    println!("{}", "Original:".dimmed());
    println!("  {}", record.original);

    if !record.answers.is_empty() {
        println!();
        println!("{}", "Answers:".dimmed());
        for (id, answer) in record.answers.iter() {
            println!("  {} {}", format!("{}:", id).bright_blue(), answer.to_prompt_string());
        }
    }

    println!();
    println!("{}", "--- Enhanced ---".dimmed());
    println!("{}", record.enhanced);
}

fn preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > max_chars {
        let head: String = single_line.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        single_line
    }
}
