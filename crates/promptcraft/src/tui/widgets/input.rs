//! Prompt entry and category selection widgets.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use promptcraft_core::Category;

/// Text input for the original prompt, cursor always at the end
pub struct PromptInput<'a> {
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> PromptInput<'a> {
    pub fn new(value: &'a str) -> Self {
        Self {
            value,
            placeholder: "Describe what you want the AI to do...",
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for PromptInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            Color::Green
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Your prompt ");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let cursor = Span::styled(" ", Style::default().bg(Color::White).fg(Color::Black));
        let line = if self.value.is_empty() {
            Line::from(vec![
                cursor,
                Span::styled(self.placeholder, Style::default().fg(Color::DarkGray)),
            ])
        } else if self.focused {
            Line::from(vec![Span::raw(self.value), cursor])
        } else {
            Line::from(self.value)
        };

        Paragraph::new(line)
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

/// Row of category chips, the selected one highlighted
pub struct CategoryBar {
    selected: Option<Category>,
}

impl CategoryBar {
    pub fn new(selected: Option<Category>) -> Self {
        Self { selected }
    }
}

impl Widget for CategoryBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Category (←→ to choose, Ctrl+D to detect) ");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut spans = Vec::new();
        for category in Category::ALL {
            let chip = format!(" {} ", category.label());
            if self.selected == Some(category) {
                spans.push(Span::styled(
                    chip,
                    Style::default()
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(chip, Style::default().fg(Color::White)));
            }
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
