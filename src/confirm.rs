use crate::{float::FloatContent, hint::Shortcut, shortcuts, theme::Theme};
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Pending,
    Yes,
    No,
}

/// Yes/no question asked before quitting or resetting the columns.
pub struct Confirm {
    title: String,
    question: String,
    answer: Answer,
}

impl Confirm {
    pub fn new(title: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
            answer: Answer::Pending,
        }
    }

    pub fn quit() -> Self {
        Self::new("Quit", "Leave the table browser?")
    }

    pub fn confirmed(&self) -> bool {
        self.answer == Answer::Yes
    }
}

impl FloatContent for Confirm {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.overlay_bg())),
            frame.area(),
        );
        frame.render_widget(Clear, area);

        let key = Style::default().fg(theme.title()).add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(self.question.as_str()).style(Style::default().fg(theme.value_fg())),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", key),
                Span::raw(" yes      "),
                Span::styled("[n]", key),
                Span::raw(" no"),
            ]),
        ];
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(format!(" {} ", self.title));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        self.answer = match key.code {
            KeyCode::Char('y' | 'Y') => Answer::Yes,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Answer::No,
            _ => self.answer,
        };
        self.is_finished()
    }

    fn is_finished(&self) -> bool {
        self.answer != Answer::Pending
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (&self.title, shortcuts!(("Yes", ["y"]), ("No", ["n", "Esc"])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_confirms_and_finishes() {
        let mut c = Confirm::quit();
        assert!(!c.handle_key_event(&KeyEvent::from(KeyCode::Char('x'))));
        assert!(c.handle_key_event(&KeyEvent::from(KeyCode::Char('Y'))));
        assert!(c.confirmed());
    }

    #[test]
    fn escape_cancels() {
        let mut c = Confirm::new("Reset Columns", "Show every column in its declared order?");
        assert!(c.handle_key_event(&KeyEvent::from(KeyCode::Esc)));
        assert!(!c.confirmed());
        assert!(c.is_finished());
    }
}
