use crate::{
    float::FloatContent,
    hint::Shortcut,
    table::{
        column::{ColumnSet, Record},
        config::ColumnConfig,
    },
    theme::Theme,
};
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

/// One labelled value of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub title: String,
    pub value: String,
    pub hidden: bool,
}

/// Every declared column of one row, hidden ones included.
pub struct RowDetail {
    fields: Vec<DetailField>,
    scroll: u16,
    finished: bool,
}

impl RowDetail {
    pub fn new<T: Record>(columns: &ColumnSet<T>, config: &ColumnConfig, row: &T) -> Self {
        let fields = columns
            .iter()
            .map(|decl| DetailField {
                title: decl.title.clone(),
                value: decl.value(row),
                hidden: config.get(&decl.key).is_some_and(|s| !s.is_visible),
            })
            .collect();
        Self {
            fields,
            scroll: 0,
            finished: false,
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.fields.len().saturating_sub(1) as i32;
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, max) as u16;
    }
}

impl FloatContent for RowDetail {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

        let overlay = Block::default().style(Style::default().bg(theme.overlay_bg()));
        frame.render_widget(overlay, frame.area());
        frame.render_widget(Clear, area);

        let label_width = self.fields.iter().map(|f| f.title.len()).max().unwrap_or(0);
        let lines: Vec<Line> = self
            .fields
            .iter()
            .map(|f| {
                let label = Span::styled(
                    format!("{:>label_width$}: ", f.title),
                    Style::default().fg(theme.title()).add_modifier(Modifier::BOLD),
                );
                let mut value = Span::styled(f.value.clone(), Style::default().fg(theme.value_fg()));
                if f.hidden {
                    value = value.style(Style::default().fg(theme.muted()));
                }
                let mut spans = vec![label, value];
                if f.hidden {
                    spans.push(Span::styled(" (hidden)", Style::default().fg(theme.muted())));
                }
                Line::from(spans)
            })
            .collect();

        let text = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Detail ")
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.border())),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));

        frame.render_widget(text, area);
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => self.finished = true,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            _ => {}
        }
        self.finished
    }

    fn handle_mouse_event(&mut self, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollDown => self.scroll_by(1),
            MouseEventKind::ScrollUp => self.scroll_by(-1),
            _ => {}
        }
        false
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Detail",
            crate::shortcuts!(("Scroll", ["j", "k", "↑", "↓"]), ("Close", ["q", "Esc", "Enter"])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::{ColumnDecl, tests::Fields};
    use crate::table::config::normalize;
    use crate::table::menu;

    #[test]
    fn lists_hidden_columns_too() {
        let columns = ColumnSet::<Fields>::new(vec![
            ColumnDecl::new("id", "ID"),
            ColumnDecl::new("price", "Price")
                .render(|r: &Fields| format!("${}", r.field("price").unwrap_or_default())),
        ])
        .unwrap();
        let meta = columns.meta();
        let config = menu::toggle(&meta, &normalize(&meta, &ColumnConfig::new()), "price");
        let row = Fields(vec![("id", "7".into()), ("price", "3.50".into())]);

        let detail = RowDetail::new(&columns, &config, &row);
        assert_eq!(
            detail.fields,
            [
                DetailField {
                    title: "ID".into(),
                    value: "7".into(),
                    hidden: false
                },
                DetailField {
                    title: "Price".into(),
                    value: "$3.50".into(),
                    hidden: true
                },
            ]
        );
    }

    #[test]
    fn scroll_is_bounded() {
        let columns = ColumnSet::<Fields>::new(vec![ColumnDecl::new("id", "ID")]).unwrap();
        let mut detail = RowDetail::new(&columns, &ColumnConfig::new(), &Fields(vec![]));
        detail.handle_key_event(&KeyEvent::from(KeyCode::Down));
        detail.handle_key_event(&KeyEvent::from(KeyCode::Up));
        assert_eq!(detail.scroll, 0);
        assert!(detail.handle_key_event(&KeyEvent::from(KeyCode::Esc)));
    }
}
