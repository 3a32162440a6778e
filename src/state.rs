use crate::{
    cli::Args,
    confirm::Confirm,
    datasets::{NOTIFICATION_TABLE, Notification, PRODUCT_TABLE, Product, WALLET_TABLE, WalletTransaction},
    float::Float,
    hint::{Shortcut, create_shortcut_list},
    screen::{Screen, ScreenOptions, TableScreen},
    source::{DataSource, MemorySource},
    storage::KeyValueStore,
    table::{
        column::{ColumnError, ColumnSet, Record},
        layout::ColumnLayout,
        presentation::PlaceholderRows,
    },
    theme::Theme,
};
use anyhow::{Context, Result};
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap},
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::runtime::Handle;

pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

pub struct App {
    theme: Theme,
    screens: Vec<Box<dyn Screen>>,
    current: usize,
    confirm_quit: Option<Float<Confirm>>,
    quit: bool,
}

impl App {
    pub fn new(args: &Args, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let handle = Handle::try_current().context("the UI must run inside a tokio runtime")?;
        let options = ScreenOptions {
            page_size: args.page_size,
            placeholders: PlaceholderRows {
                skeleton_rows: args.skeleton_rows,
                loading_more_rows: args.loading_more_rows,
            },
            debounce: Duration::from_millis(args.debounce_ms),
        };
        let latency = Duration::from_millis(args.latency_ms);

        let screens: Vec<Box<dyn Screen>> = vec![
            table_screen(
                "Wallet Transactions",
                WalletTransaction::columns(),
                MemorySource::new(WalletTransaction::generate(args.rows), WalletTransaction::SEARCHABLE),
                WALLET_TABLE,
                &store,
                args,
                options,
                &handle,
            )?,
            table_screen(
                "Products",
                Product::columns(),
                MemorySource::new(Product::generate(args.rows), Product::SEARCHABLE),
                PRODUCT_TABLE,
                &store,
                args,
                options,
                &handle,
            )?,
            table_screen(
                "Notifications",
                Notification::columns(),
                MemorySource::new(Notification::generate(args.rows), Notification::SEARCHABLE),
                NOTIFICATION_TABLE,
                &store,
                args,
                options,
                &handle,
            )?,
        ];
        log::info!(
            "started with {} tables, {} rows each, latency {latency:?}",
            screens.len(),
            args.rows
        );

        Ok(Self {
            theme: Theme::default(),
            current: args.table.position().min(screens.len() - 1),
            screens,
            confirm_quit: None,
            quit: false,
        })
    }

    pub fn run<B: Backend>(&mut self, term: &mut Terminal<B>) -> Result<()> {
        while !self.quit {
            term.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(&key),
                    Event::Mouse(mouse) => self.handle_mouse(&mouse),
                    _ => {}
                }
            }
            self.screens[self.current].tick(Instant::now());
        }
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(float) = self.confirm_quit.as_mut() {
            if float.handle_key_event(key) {
                self.quit = float.content.confirmed();
                self.confirm_quit = None;
            }
            return;
        }

        let screen = &mut self.screens[self.current];
        if screen.is_capturing_input() {
            screen.handle_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.confirm_quit = Some(Float::new_absolute(Box::new(Confirm::quit()), 50, 8));
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.screens.len() {
                    self.current = index;
                }
            }
            KeyCode::Tab => self.current = (self.current + 1) % self.screens.len(),
            _ => screen.handle_key(key),
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        if self.confirm_quit.is_none() {
            self.screens[self.current].handle_mouse(event);
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        if is_too_small(area) {
            draw_too_small_warning(f, area);
            return;
        }

        let (title, shortcuts) = self.current_shortcuts();
        let title = title.to_string();
        let lines = create_shortcut_list(shortcuts, area.width);
        let hint_height = (lines.len() as u16 + 2).clamp(3, 8);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(hint_height),
            ])
            .split(area);

        let tabs = Tabs::new(
            self.screens
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{} {}", i + 1, s.title())),
        )
        .select(self.current)
        .style(Style::default().fg(self.theme.muted()))
        .highlight_style(
            Style::default()
                .fg(self.theme.title())
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(tabs, chunks[0]);

        self.screens[self.current].draw(f, chunks[1], &self.theme);

        let hint = Paragraph::new(lines.to_vec())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(format!(" {title} Shortcuts ")),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(hint, chunks[2]);

        if let Some(float) = self.confirm_quit.as_mut() {
            float.draw(f, area, &self.theme);
        }
    }

    fn current_shortcuts(&self) -> (&str, Box<[Shortcut]>) {
        match &self.confirm_quit {
            Some(float) => float.get_shortcut_list(),
            None => self.screens[self.current].shortcuts(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn table_screen<T: Record + Clone>(
    title: &str,
    columns: Result<ColumnSet<T>, ColumnError>,
    source: MemorySource<T>,
    storage_key: &str,
    store: &Arc<dyn KeyValueStore>,
    args: &Args,
    options: ScreenOptions,
    handle: &Handle,
) -> Result<Box<dyn Screen>> {
    let columns = columns.with_context(|| format!("invalid columns for `{title}`"))?;
    let layout = ColumnLayout::mount(columns, Arc::clone(store), storage_key);
    let source: Arc<dyn DataSource<T>> = Arc::new(
        source
            .latency(Duration::from_millis(args.latency_ms))
            .fail_every(args.fail_every),
    );
    Ok(Box::new(TableScreen::new(
        title,
        layout,
        source,
        options,
        handle.clone(),
    )))
}

pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub fn draw_too_small_warning(f: &mut Frame, area: Rect) {
    let warning = Paragraph::new(format!(
        "Terminal too small!\n\nCurrent: {}x{}\nMinimum required: {}x{}\n\nPlease resize the window.",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    .wrap(Wrap { trim: true });

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(7), Constraint::Fill(1)])
        .split(area);
    f.render_widget(warning, rows[1]);
}
