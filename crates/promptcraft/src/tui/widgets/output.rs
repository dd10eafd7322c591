//! Enhanced prompt viewer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget, Wrap,
    },
};

/// Scrollable view of an enhanced prompt, with the original above it
pub struct OutputWidget<'a> {
    original: &'a str,
    enhanced: &'a str,
    title: &'a str,
    scroll_offset: u16,
}

impl<'a> OutputWidget<'a> {
    pub fn new(original: &'a str, enhanced: &'a str) -> Self {
        Self {
            original,
            enhanced,
            title: " Enhanced Prompt ",
            scroll_offset: 0,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn scroll(mut self, offset: u16) -> Self {
        self.scroll_offset = offset;
        self
    }
}

impl OutputWidget<'_> {
    /// Largest useful scroll offset when drawn into `area`
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = Self::block().inner(area);
        let width = inner.width.max(1) as usize;
        let wrapped: usize = self
            .lines()
            .iter()
            .map(|line| line.width().div_ceil(width).max(1))
            .sum();
        (wrapped as u16).saturating_sub(inner.height)
    }

    fn block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let heading = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled("## Original", heading)),
            Line::from(""),
        ];
        lines.extend(
            self.original
                .lines()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::DarkGray)))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("## Enhanced", heading)));
        lines.push(Line::from(""));
        lines.extend(self.enhanced.lines().map(Line::from));
        lines
    }
}

impl Widget for OutputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block().title(self.title);

        let inner_area = block.inner(area);
        block.render(area, buf);

        let text = Text::from(self.lines());
        let content_height = text.height() as u16;
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0))
            .render(inner_area, buf);

        if content_height > inner_area.height {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(content_height as usize)
                .position(self.scroll_offset as usize)
                .viewport_content_length(inner_area.height as usize);

            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .render(inner_area, buf, &mut scrollbar_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_hides_leading_lines() {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        OutputWidget::new("cats", "line one\nline two\nline three")
            .scroll(6)
            .render(area, &mut buf);

        let first: String = (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect();
        assert!(first.contains("line one"));
    }

    #[test]
    fn test_max_scroll_stops_at_last_line() {
        // 9 content lines, 4 visible rows inside the border
        let widget = OutputWidget::new("cats", "line one\nline two\nline three");
        assert_eq!(widget.max_scroll(Rect::new(0, 0, 40, 6)), 5);
        assert_eq!(widget.max_scroll(Rect::new(0, 0, 40, 20)), 0);
    }

    #[test]
    fn test_max_scroll_counts_wrapped_lines() {
        // Headings and the long line wrap at 8 columns
        let widget = OutputWidget::new("a", "abcdefghijklmnop");
        let narrow = widget.max_scroll(Rect::new(0, 0, 10, 4));
        let wide = widget.max_scroll(Rect::new(0, 0, 40, 4));
        assert!(narrow > wide);
    }
}
