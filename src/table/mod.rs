//! The data table widget: configurable columns, loading states and
//! scroll-triggered paging over rows owned by the caller.

pub mod column;
pub mod config;
pub mod layout;
pub mod menu;
pub mod pager;
pub mod presentation;
pub mod render;

use self::{
    column::Record,
    config::ColumnConfig,
    layout::ColumnLayout,
    pager::{ScrollPager, sentinel_visible},
    presentation::{BodyRow, LoadFlags, PlaceholderRows, resolve},
};
use crate::{
    source::{SortOrder, SortSpec},
    theme::Theme,
};
use log::debug;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
    prelude::*,
    symbols::border,
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
};

/// What the owner of a table should do after an input or a sentinel check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    None,
    LoadMore,
    OpenDetail(usize),
    SortChanged(Option<SortSpec>),
    OpenColumnMenu,
    ResetColumns,
}

pub struct DataTable<T> {
    layout: ColumnLayout<T>,
    placeholders: PlaceholderRows,
    state: TableState,
    cursor: usize,
    focus_col: usize,
    sort: Option<SortSpec>,
    pager: ScrollPager,
    viewport_rows: usize,
    body_area: Rect,
    title: String,
}

impl<T: Record> DataTable<T> {
    pub fn new(layout: ColumnLayout<T>, placeholders: PlaceholderRows, title: impl Into<String>) -> Self {
        Self {
            layout,
            placeholders,
            state: TableState::default(),
            cursor: 0,
            focus_col: 0,
            sort: None,
            pager: ScrollPager::default(),
            viewport_rows: 0,
            body_area: Rect::default(),
            title: title.into(),
        }
    }

    pub fn layout(&self) -> &ColumnLayout<T> {
        &self.layout
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Persist a new column configuration and keep the focused column in range.
    pub fn apply_columns(&mut self, next: ColumnConfig) {
        self.layout.apply(next);
        let visible = self.layout.visible().len();
        debug!("`{}`: {visible} columns visible", self.layout.storage_key());
        self.focus_col = self.focus_col.min(visible.saturating_sub(1));
    }

    /// Back to the top with a fresh pager, for a new result set.
    pub fn reset_view(&mut self) {
        self.cursor = 0;
        self.state = TableState::default();
        self.pager.reset();
    }

    /// Returns `LoadMore` when the slot after the last row is in view and
    /// the pager is armed.
    ///
    /// Visibility ignores `is_loading_more`: the slot stays in view while a
    /// page is in flight, so a failed fetch does not count as a new crossing.
    pub fn poll_sentinel(&mut self, rows_len: usize, flags: LoadFlags) -> TableAction {
        self.pager.sync(flags.is_loading_more);
        let visible = !flags.loading
            && rows_len > 0
            && sentinel_visible(self.state.offset(), self.viewport_rows, rows_len);
        let can_load = flags.has_more && !flags.is_loading_more;
        if self.pager.observe(visible, can_load, rows_len) {
            TableAction::LoadMore
        } else {
            TableAction::None
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, rows_len: usize) -> TableAction {
        let last = rows_len.saturating_sub(1);
        let page = self.viewport_rows.max(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = last,
            KeyCode::PageDown => self.cursor = (self.cursor + page).min(last),
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(page),
            KeyCode::Char('h') | KeyCode::Left => self.focus_col = self.focus_col.saturating_sub(1),
            KeyCode::Char('l') | KeyCode::Right => {
                let visible = self.layout.visible().len();
                self.focus_col = (self.focus_col + 1).min(visible.saturating_sub(1));
            }
            KeyCode::Char('s') => {
                let Some(column) = self.layout.visible().get(self.focus_col) else {
                    return TableAction::None;
                };
                self.sort = SortSpec::cycle(self.sort.as_ref(), column.key());
                return TableAction::SortChanged(self.sort.clone());
            }
            KeyCode::Char('c') => return TableAction::OpenColumnMenu,
            KeyCode::Char('R') => return TableAction::ResetColumns,
            KeyCode::Enter if rows_len > 0 => return TableAction::OpenDetail(self.cursor.min(last)),
            _ => {}
        }
        TableAction::None
    }

    pub fn handle_mouse(&mut self, event: &MouseEvent, rows_len: usize) -> TableAction {
        let last = rows_len.saturating_sub(1);
        match event.kind {
            MouseEventKind::ScrollDown => self.cursor = (self.cursor + 1).min(last),
            MouseEventKind::ScrollUp => self.cursor = self.cursor.saturating_sub(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.body_area.contains(Position::new(event.column, event.row)) {
                    let index = self.state.offset() + usize::from(event.row - self.body_area.y);
                    if index < rows_len {
                        self.cursor = index;
                    }
                }
            }
            _ => {}
        }
        TableAction::None
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, rows: &[T], flags: LoadFlags, theme: &Theme) {
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", self.title)).fg(theme.title()))
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = self.layout.visible();
        if columns.is_empty() {
            self.viewport_rows = 0;
            self.body_area = Rect::default();
            let hint = Paragraph::new("All columns are hidden. Press c to choose columns.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.muted()));
            frame.render_widget(hint, inner);
            return;
        }

        let span = columns.len();
        let presentation = resolve(flags, rows.len(), span, self.placeholders);

        let header = Row::new(columns.iter().enumerate().map(|(i, column)| {
            let arrow = match &self.sort {
                Some(s) if s.key == column.key() => match s.order {
                    SortOrder::Ascend => " ▲",
                    SortOrder::Descend => " ▼",
                },
                _ => "",
            };
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if i == self.focus_col {
                style = style.fg(theme.header_fg()).bg(theme.header_focus_bg());
            }
            Cell::from(
                Line::from(format!("{}{arrow}", column.decl.title)).alignment(column.align.to_alignment()),
            )
            .style(style)
        }));

        let body: Vec<Row> = presentation
            .body
            .iter()
            .map(|row| match row {
                BodyRow::Data(i) => render::data_row(columns, &rows[*i], *i, theme),
                BodyRow::Skeleton => render::skeleton_row(span, theme),
                BodyRow::Message { span, .. } => render::blank_row(*span),
            })
            .collect();

        let has_data = !flags.loading && !rows.is_empty();
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
        self.state.select(has_data.then_some(self.cursor));

        let table = Table::new(body, render::constraints(columns))
            .header(header)
            .column_spacing(1)
            .row_highlight_style(
                Style::default()
                    .fg(theme.cursor_fg())
                    .bg(theme.cursor_bg())
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(table, inner, &mut self.state);

        self.body_area = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        self.viewport_rows = usize::from(self.body_area.height);

        // Spanning messages are drawn over the blank rows that reserve them.
        let offset = self.state.offset();
        for (i, row) in presentation.body.iter().enumerate() {
            let BodyRow::Message { message, .. } = row else {
                continue;
            };
            if i < offset || i - offset >= self.viewport_rows {
                continue;
            }
            let line = Rect {
                y: self.body_area.y + (i - offset) as u16,
                height: 1,
                ..self.body_area
            };
            let text = Paragraph::new(message.text())
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.muted()).add_modifier(Modifier::ITALIC));
            frame.render_widget(text, line);
        }
    }
}
