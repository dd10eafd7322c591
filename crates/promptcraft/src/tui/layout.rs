//! Layout calculations for the TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout areas
pub struct MainLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Prompt entry screen
pub struct InputLayout {
    pub prompt: Rect,
    pub categories: Rect,
    pub status: Rect,
}

/// Question screen
pub struct QuestionLayout {
    pub progress: Rect,
    pub question: Rect,
    pub options: Rect,
    pub status: Rect,
}

/// Output and history screens: content over a status line
pub struct ContentLayout {
    pub content: Rect,
    pub status: Rect,
}

impl MainLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Main content
                Constraint::Length(3), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            body: chunks[1],
            footer: chunks[2],
        }
    }
}

impl InputLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(5),    // Prompt text
                Constraint::Length(4), // Category chips (may wrap)
                Constraint::Length(2), // Status
            ])
            .split(area);

        Self {
            prompt: chunks[0],
            categories: chunks[1],
            status: chunks[2],
        }
    }
}

impl QuestionLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Progress
                Constraint::Length(6), // Question
                Constraint::Min(4),    // Options
                Constraint::Length(2), // Status
            ])
            .split(area);

        Self {
            progress: chunks[0],
            question: chunks[1],
            options: chunks[2],
            status: chunks[3],
        }
    }
}

impl ContentLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(area);

        Self {
            content: chunks[0],
            status: chunks[1],
        }
    }
}
