//! Question display and option selection widgets.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use promptcraft_core::{QuestionDefinition, QuestionKind, QuestionView, SelectionMode};

/// Widget for displaying the current question
pub struct QuestionWidget<'a> {
    question: &'a QuestionDefinition,
    answered: bool,
}

impl<'a> QuestionWidget<'a> {
    pub fn new(question: &'a QuestionDefinition) -> Self {
        Self {
            question,
            answered: false,
        }
    }

    /// Whether a stored answer is shown pre-selected
    pub fn answered(mut self, answered: bool) -> Self {
        self.answered = answered;
        self
    }

    fn hint(&self) -> &'static str {
        match self.question.kind {
            QuestionKind::SingleChoice => "Pick one",
            QuestionKind::BooleanChoice => "Yes or no",
            QuestionKind::MultiChoice if self.question.allow_multiple => "Pick any number",
            QuestionKind::MultiChoice => "Pick one",
        }
    }
}

impl Widget for QuestionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            self.question.prompt.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))];

        lines.push(Line::from(""));
        let mut hint = vec![Span::styled(self.hint(), Style::default().fg(Color::DarkGray))];
        if self.answered {
            hint.push(Span::styled(
                "  (answered earlier)",
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(Line::from(hint));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Question ");

        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Clickable options of a question.
///
/// Radio questions draw `(•)` marks, toggle questions draw checkboxes.
pub struct OptionList<'a> {
    view: &'a QuestionView,
    cursor: usize,
    focused: bool,
}

impl<'a> OptionList<'a> {
    pub fn new(view: &'a QuestionView, cursor: usize) -> Self {
        Self {
            view,
            cursor,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for OptionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            Color::Green
        } else {
            Color::DarkGray
        };

        let mode = self.view.mode();
        let title = match mode {
            SelectionMode::Radio => " Select (↑↓ to move, Space to pick) ",
            SelectionMode::Toggle => " Multi-Select (↑↓ to move, Space to toggle) ",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);

        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .view
            .options()
            .map(|option| {
                let is_cursor = option.index == self.cursor;
                let mark = match (mode, option.selected) {
                    (SelectionMode::Radio, true) => "(•)",
                    (SelectionMode::Radio, false) => "( )",
                    (SelectionMode::Toggle, true) => "[✓]",
                    (SelectionMode::Toggle, false) => "[ ]",
                };

                let style = if is_cursor {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if option.selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };

                Line::from(vec![
                    Span::styled(if is_cursor { "▶ " } else { "  " }, style),
                    Span::styled(mark, style),
                    Span::styled(format!(" {}", option.value), style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner_area, buf);
    }
}
