//! Progress indicator widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Gauge, Widget},
};

/// Widget for showing how far through the question list the user is
pub struct ProgressWidget {
    percentage: u8,
    label: String,
}

impl ProgressWidget {
    /// Progress of question `current` (1-based) out of `total`
    pub fn new(current: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            100
        } else {
            (current.min(total) * 100 / total) as u8
        };
        Self {
            percentage,
            label: format!("Question {} of {}", current, total),
        }
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    fn color(&self) -> Color {
        match self.percentage {
            0..=25 => Color::Red,
            26..=50 => Color::Yellow,
            51..=75 => Color::Blue,
            _ => Color::Green,
        }
    }
}

impl Widget for ProgressWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(self.color()))
            .percent(self.percentage as u16)
            .label(self.label);

        gauge.render(area, buf);
    }
}
