use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use promptcraft_core::HistoryRecord;

/// Saved prompts, most recent first
pub struct HistoryList<'a> {
    records: &'a [HistoryRecord],
    cursor: usize,
}

impl<'a> HistoryList<'a> {
    pub fn new(records: &'a [HistoryRecord], cursor: usize) -> Self {
        Self { records, cursor }
    }
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(format!(" History ({}) ", self.records.len()));

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.records.is_empty() {
            Paragraph::new(Span::styled(
                "No saved prompts yet.",
                Style::default().fg(Color::DarkGray),
            ))
            .render(inner_area, buf);
            return;
        }

        // Keep the cursor row on screen
        let height = inner_area.height.max(1) as usize;
        let first = self.cursor.saturating_sub(height - 1);

        let lines: Vec<Line> = self
            .records
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(i, record)| {
                let is_cursor = i == self.cursor;
                let style = if is_cursor {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let original = record.original.split_whitespace().collect::<Vec<_>>().join(" ");

                Line::from(vec![
                    Span::styled(if is_cursor { "▶ " } else { "  " }, style),
                    Span::styled(
                        format!("{} ", record.created_at.format("%m-%d %H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{:<9}", record.category.tag()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(original, style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner_area, buf);
    }
}
