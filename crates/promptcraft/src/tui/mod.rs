//! Interactive wizard in the terminal.
//!
//! Options are picked with the cursor and Space/Enter, which stand in for
//! clicks; everything else goes through the [`WizardController`].
//!
//! [`WizardController`]: promptcraft_core::WizardController

mod app;
mod layout;
mod widgets;

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use promptcraft_core::Category;
use promptcraft_logging::Logger;

use crate::services::Services;

use app::App;

/// Raw mode and the alternate screen, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<(Self, Terminal<CrosstermBackend<Stdout>>)> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;

        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Try to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

/// Handle the default `promptcraft craft` command
pub async fn run_tui(
    services: Services,
    prompt: Option<String>,
    category: Option<Category>,
) -> Result<()> {
    let mut wizard = services.wizard();
    let events_path = promptcraft_logging::default_log_dir().join("events.jsonl");
    match Logger::file_only(&events_path) {
        Ok(logger) => wizard = wizard.with_logger(Arc::new(logger)),
        Err(e) => warn!(path = %events_path.display(), error = %e, "Wizard event log disabled"),
    }

    let backend_name = services.gateway.backend_name().to_string();

    let final_output = {
        let (_guard, terminal) = TerminalGuard::enter()?;
        let mut app = App::new(terminal, wizard, services.questions.clone(), backend_name)
            .with_initial(prompt, category);
        app.run().await?;
        app.final_output().map(String::from)
    };

    // The alternate screen is gone; leave the result where the shell can see it
    if let Some(enhanced) = final_output {
        println!("{}", enhanced);
    }

    Ok(())
}
