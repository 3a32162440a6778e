use crate::{
    column_menu::ColumnMenu,
    confirm::Confirm,
    debounce::Debounce,
    detail::RowDetail,
    feed::{Criteria, Feed, PageRequest},
    filter::{SearchBar, SearchInput, parse_query},
    float::Float,
    hint::Shortcut,
    shortcuts,
    source::{DataSource, FetchError, PageResponse, SortOrder},
    table::{
        DataTable, TableAction,
        column::Record,
        layout::ColumnLayout,
        menu,
        presentation::PlaceholderRows,
    },
    theme::Theme,
};
use log::debug;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, MouseEvent},
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

/// A full-screen view the app can switch between.
pub trait Screen {
    fn title(&self) -> &str;
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
    fn handle_key(&mut self, key: &KeyEvent);
    fn handle_mouse(&mut self, event: &MouseEvent);
    /// Called once per loop iteration, after drawing.
    fn tick(&mut self, now: Instant);
    fn shortcuts(&self) -> (&str, Box<[Shortcut]>);
    /// True while a float or the search bar owns the keyboard.
    fn is_capturing_input(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions {
    pub page_size: usize,
    pub placeholders: PlaceholderRows,
    pub debounce: Duration,
}

struct FetchOutcome<T> {
    generation: u64,
    result: Result<PageResponse<T>, FetchError>,
}

/// One paginated table with its search bar, fed by a `DataSource`.
pub struct TableScreen<T> {
    table: DataTable<T>,
    feed: Feed<T>,
    source: Arc<dyn DataSource<T>>,
    search: SearchBar,
    debounce: Debounce<String>,
    handle: Handle,
    tx: UnboundedSender<FetchOutcome<T>>,
    rx: UnboundedReceiver<FetchOutcome<T>>,
    column_menu: Option<Float<ColumnMenu>>,
    confirm_reset: Option<Float<Confirm>>,
    detail: Option<Float<RowDetail>>,
}

impl<T: Record + Clone> TableScreen<T> {
    pub fn new(
        title: impl Into<String>,
        layout: ColumnLayout<T>,
        source: Arc<dyn DataSource<T>>,
        options: ScreenOptions,
        handle: Handle,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let mut screen = Self {
            table: DataTable::new(layout, options.placeholders, title),
            feed: Feed::new(options.page_size),
            source,
            search: SearchBar::default(),
            debounce: Debounce::new(options.debounce),
            handle,
            tx,
            rx,
            column_menu: None,
            confirm_reset: None,
            detail: None,
        };
        screen.refetch();
        screen
    }

    fn criteria(&self, term: &str) -> Criteria {
        let parsed = parse_query(term);
        Criteria {
            filters: parsed.filters,
            search: parsed.search,
            sort: self.table.sort().cloned(),
        }
    }

    fn refetch(&mut self) {
        let criteria = self.criteria(&self.search.text());
        let request = self.feed.reset(criteria);
        self.table.reset_view();
        self.dispatch(request);
    }

    fn dispatch(&self, request: PageRequest) {
        debug!(
            "`{}`: requesting page {} (generation {})",
            self.table.title(),
            request.query.page,
            request.generation
        );
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = source.fetch(request.query).await;
            // The screen may be gone by now; a late result is simply dropped.
            let _ = tx.send(FetchOutcome {
                generation: request.generation,
                result,
            });
        });
    }

    fn apply_search(&mut self, term: &str) {
        let next = self.criteria(term);
        let current = self.feed.criteria();
        if next.filters != current.filters || next.search != current.search {
            self.refetch();
        }
    }

    fn load_more(&mut self) {
        if let Some(request) = self.feed.next() {
            self.dispatch(request);
        }
    }

    fn open_column_menu(&mut self) {
        let layout = self.table.layout();
        let menu = ColumnMenu::new(self.table.title(), layout.meta().to_vec(), layout.config());
        self.column_menu = Some(Float::new(Box::new(menu), 60, 70));
    }

    fn open_detail(&mut self, index: usize) {
        let Some(row) = self.feed.rows().get(index) else {
            return;
        };
        let layout = self.table.layout();
        let detail = RowDetail::new(layout.columns(), layout.config(), row);
        self.detail = Some(Float::new(Box::new(detail), 60, 60));
    }

    fn take_menu_change(&mut self) {
        let Some(change) = self
            .column_menu
            .as_mut()
            .and_then(|float| float.content.take_change())
        else {
            return;
        };
        self.table.apply_columns(change);
    }

    fn handle_table_action(&mut self, action: TableAction) {
        match action {
            TableAction::None => {}
            TableAction::LoadMore => self.load_more(),
            TableAction::SortChanged(_) => self.refetch(),
            TableAction::OpenColumnMenu => self.open_column_menu(),
            TableAction::ResetColumns => {
                let confirm = Confirm::new("Reset Columns", "Show every column in its declared order?");
                self.confirm_reset = Some(Float::new_absolute(Box::new(confirm), 50, 8));
            }
            TableAction::OpenDetail(index) => self.open_detail(index),
        }
    }

    fn status_line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::raw(format!(
            "{}/{} rows · page {}",
            self.feed.rows().len(),
            self.feed.total(),
            self.feed.page()
        ))];
        if let Some(sort) = self.table.sort() {
            let order = match sort.order {
                SortOrder::Ascend => "asc",
                SortOrder::Descend => "desc",
            };
            spans.push(Span::raw(format!(" · {} {order}", sort.key)));
        }
        if let Some(err) = self.feed.last_error() {
            spans.push(Span::styled(
                format!(" · {err}"),
                Style::default().fg(theme.error()),
            ));
        }
        Line::from(spans)
    }
}

impl<T: Record + Clone> Screen for TableScreen<T> {
    fn title(&self) -> &str {
        self.table.title()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);

        self.search.draw(frame, top[0], theme.focus_border());
        let status = Paragraph::new(self.status_line(theme))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Status "),
            );
        frame.render_widget(status, top[1]);

        self.table
            .draw(frame, chunks[1], self.feed.rows(), self.feed.flags(), theme);

        let full = frame.area();
        if let Some(float) = self.column_menu.as_mut() {
            float.draw(frame, full, theme);
        }
        if let Some(float) = self.confirm_reset.as_mut() {
            float.draw(frame, full, theme);
        }
        if let Some(float) = self.detail.as_mut() {
            float.draw(frame, full, theme);
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(float) = self.detail.as_mut() {
            if float.handle_key_event(key) {
                self.detail = None;
            }
            return;
        }
        if let Some(float) = self.confirm_reset.as_mut() {
            if float.handle_key_event(key) {
                if float.content.confirmed() {
                    let next = menu::reset(self.table.layout().meta());
                    self.table.apply_columns(next);
                }
                self.confirm_reset = None;
            }
            return;
        }
        if let Some(float) = self.column_menu.as_mut() {
            let finished = float.handle_key_event(key);
            self.take_menu_change();
            if finished {
                self.column_menu = None;
            }
            return;
        }

        if self.search.is_focused() {
            match self.search.handle_key(key) {
                SearchInput::Ignored => {}
                SearchInput::Edited => self.debounce.push(self.search.text(), Instant::now()),
                SearchInput::Done => {
                    self.search.blur();
                    self.debounce.flush();
                    self.apply_search(&self.search.text());
                }
            }
            return;
        }

        if key.code == KeyCode::Char('/') {
            self.search.focus();
            return;
        }
        let action = self.table.handle_key(key, self.feed.rows().len());
        self.handle_table_action(action);
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        if let Some(float) = self.detail.as_mut() {
            if float.handle_mouse_event(event) {
                self.detail = None;
            }
            return;
        }
        if self.confirm_reset.is_some() {
            return;
        }
        if let Some(float) = self.column_menu.as_mut() {
            let finished = float.handle_mouse_event(event);
            self.take_menu_change();
            if finished {
                self.column_menu = None;
            }
            return;
        }
        let action = self.table.handle_mouse(event, self.feed.rows().len());
        self.handle_table_action(action);
    }

    fn tick(&mut self, now: Instant) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.feed.settle(outcome.generation, outcome.result);
        }
        if let Some(term) = self.debounce.poll(now) {
            self.apply_search(&term);
        }
        let action = self
            .table
            .poll_sentinel(self.feed.rows().len(), self.feed.flags());
        self.handle_table_action(action);
    }

    fn shortcuts(&self) -> (&str, Box<[Shortcut]>) {
        if let Some(float) = &self.detail {
            return float.get_shortcut_list();
        }
        if let Some(float) = &self.confirm_reset {
            return float.get_shortcut_list();
        }
        if let Some(float) = &self.column_menu {
            return float.get_shortcut_list();
        }
        if self.search.is_focused() {
            return (
                "Search",
                shortcuts!(
                    ("Done", ["Esc", "Enter"]),
                    ("Clear", ["Ctrl-C"]),
                    ("Move cursor", ["←", "→", "Home", "End"]),
                    ("Filter", ["key=v", "key>n", "key!=v"]),
                ),
            );
        }
        (
            self.table.title(),
            shortcuts!(
                ("Move", ["j", "k", "↑", "↓"]),
                ("Top/bottom", ["g", "G"]),
                ("Page", ["PgUp", "PgDn"]),
                ("Focus column", ["h", "l", "←", "→"]),
                ("Sort", ["s"]),
                ("Columns", ["c"]),
                ("Reset columns", ["R"]),
                ("Search", ["/"]),
                ("Detail", ["Enter"]),
                ("Switch table", ["1", "2", "3"]),
                ("Quit", ["q"]),
            ),
        )
    }

    fn is_capturing_input(&self) -> bool {
        self.search.is_focused()
            || self.column_menu.is_some()
            || self.confirm_reset.is_some()
            || self.detail.is_some()
    }
}
