use crate::{
    float::FloatContent,
    hint::Shortcut,
    shortcuts,
    table::{
        column::ColumnMeta,
        config::{ColumnConfig, hidden_keys, normalize, visible_keys},
        menu,
    },
    theme::Theme,
};
use log::debug;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
    layout::{Constraint, Direction, Layout, Position, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Visible,
    Hidden,
}

/// Two-panel column chooser. The "Visible" panel can be reordered by
/// grabbing an item and dropping it on another; the "Hidden" panel only
/// toggles. Every mutation is left in `pending` for the owner to apply.
pub struct ColumnMenu {
    title: String,
    meta: Vec<ColumnMeta>,
    config: ColumnConfig,
    visible: Vec<String>,
    hidden: Vec<String>,
    panel: Panel,
    visible_state: ListState,
    hidden_state: ListState,
    grabbed: Option<String>,
    pending: Option<ColumnConfig>,
    visible_inner: Rect,
    hidden_inner: Rect,
    finished: bool,
}

impl ColumnMenu {
    pub fn new(title: impl Into<String>, meta: Vec<ColumnMeta>, config: &ColumnConfig) -> Self {
        let mut menu = Self {
            title: title.into(),
            meta,
            config: ColumnConfig::new(),
            visible: Vec::new(),
            hidden: Vec::new(),
            panel: Panel::Visible,
            visible_state: ListState::default().with_selected(Some(0)),
            hidden_state: ListState::default().with_selected(Some(0)),
            grabbed: None,
            pending: None,
            visible_inner: Rect::default(),
            hidden_inner: Rect::default(),
            finished: false,
        };
        menu.refresh(config);
        menu
    }

    /// Show `config`, e.g. after it was changed outside the menu.
    pub fn refresh(&mut self, config: &ColumnConfig) {
        self.config = normalize(&self.meta, config);
        self.visible = visible_keys(&self.meta, &self.config);
        self.hidden = hidden_keys(&self.meta, &self.config);
        clamp(&mut self.visible_state, self.visible.len());
        clamp(&mut self.hidden_state, self.hidden.len());
    }

    /// The configuration produced by the last mutation, if not taken yet.
    pub fn take_change(&mut self) -> Option<ColumnConfig> {
        self.pending.take()
    }

    fn commit(&mut self, next: ColumnConfig, what: &str) {
        let next = normalize(&self.meta, &next);
        if next == self.config {
            return;
        }
        debug!("column menu `{}`: {what}", self.title);
        self.refresh(&next);
        self.pending = Some(next);
    }

    fn title_of(&self, key: &str) -> String {
        self.meta
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| key.to_string())
    }

    fn current(&self) -> Option<&str> {
        let (keys, state) = match self.panel {
            Panel::Visible => (&self.visible, &self.visible_state),
            Panel::Hidden => (&self.hidden, &self.hidden_state),
        };
        state.selected().and_then(|i| keys.get(i)).map(String::as_str)
    }

    fn select_visible(&mut self, key: &str) {
        if let Some(i) = self.visible.iter().position(|k| k == key) {
            self.visible_state.select(Some(i));
        }
    }

    fn toggle_current(&mut self) {
        let Some(key) = self.current().map(str::to_string) else {
            return;
        };
        let next = menu::toggle(&self.meta, &self.config, &key);
        self.commit(next, &format!("toggled `{key}`"));
    }

    fn drop_on(&mut self, active: &str, over: Option<&str>) {
        let next = menu::drag_end(&self.meta, &self.config, active, over);
        self.commit(next, &format!("moved `{active}` onto {over:?}"));
        self.select_visible(active);
    }

    /// Grab the item under the cursor, or drop the grabbed one onto it.
    fn grab_or_drop(&mut self) {
        if self.panel != Panel::Visible {
            return;
        }
        match self.grabbed.take() {
            None => self.grabbed = self.current().map(str::to_string),
            Some(active) => {
                let over = self.current().map(str::to_string);
                self.drop_on(&active, over.as_deref());
            }
        }
    }

    fn shift(&mut self, down: bool) {
        if self.panel != Panel::Visible {
            return;
        }
        let Some(i) = self.visible_state.selected() else {
            return;
        };
        let target = if down { i + 1 } else { i.wrapping_sub(1) };
        let (Some(active), Some(over)) = (self.visible.get(i).cloned(), self.visible.get(target).cloned())
        else {
            return;
        };
        self.drop_on(&active, Some(&over));
    }

    fn move_cursor(&mut self, down: bool) {
        let (len, state) = match self.panel {
            Panel::Visible => (self.visible.len(), &mut self.visible_state),
            Panel::Hidden => (self.hidden.len(), &mut self.hidden_state),
        };
        if len == 0 {
            return;
        }
        let i = state.selected().unwrap_or(0);
        let next = if down { (i + 1).min(len - 1) } else { i.saturating_sub(1) };
        state.select(Some(next));
    }

    fn switch_panel(&mut self) {
        self.grabbed = None;
        self.panel = match self.panel {
            Panel::Visible => Panel::Hidden,
            Panel::Hidden => Panel::Visible,
        };
    }

    /// List index under a screen position, if any.
    fn hit(&self, column: u16, row: u16) -> Option<(Panel, usize)> {
        let pos = Position::new(column, row);
        let (panel, inner, state, len) = if self.visible_inner.contains(pos) {
            (Panel::Visible, self.visible_inner, &self.visible_state, self.visible.len())
        } else if self.hidden_inner.contains(pos) {
            (Panel::Hidden, self.hidden_inner, &self.hidden_state, self.hidden.len())
        } else {
            return None;
        };
        let index = state.offset() + usize::from(row - inner.y);
        (index < len).then_some((panel, index))
    }

    fn draw_panel(&mut self, frame: &mut Frame, area: Rect, panel: Panel, theme: &Theme) -> Rect {
        let focused = self.panel == panel;
        let (title, keys) = match panel {
            Panel::Visible => (" Visible ", &self.visible),
            Panel::Hidden => (" Hidden ", &self.hidden),
        };

        let items: Vec<ListItem> = keys
            .iter()
            .map(|key| {
                let grabbed = self.grabbed.as_deref() == Some(key.as_str());
                let (mark, style) = match panel {
                    Panel::Visible if grabbed => (
                        "» ",
                        Style::default().fg(theme.grabbed()).add_modifier(Modifier::BOLD),
                    ),
                    Panel::Visible => ("≡ ", Style::default()),
                    Panel::Hidden => ("  ", Style::default().fg(theme.muted())),
                };
                ListItem::new(format!("{mark}{}", self.title_of(key))).style(style)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                Style::default().fg(theme.focus_border())
            } else {
                Style::default().fg(theme.idle_border())
            });
        let inner = block.inner(area);

        let mut list = List::new(items).block(block);
        if focused {
            list = list.highlight_style(
                Style::default()
                    .fg(theme.cursor_fg())
                    .bg(theme.cursor_bg())
                    .add_modifier(Modifier::BOLD),
            );
        }
        let state = match panel {
            Panel::Visible => &mut self.visible_state,
            Panel::Hidden => &mut self.hidden_state,
        };
        frame.render_stateful_widget(list, area, state);
        inner
    }
}

fn clamp(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

impl FloatContent for ColumnMenu {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Columns · {} ", self.title))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme.border()));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.visible_inner = self.draw_panel(frame, panels[0], Panel::Visible, theme);
        self.hidden_inner = self.draw_panel(frame, panels[1], Panel::Hidden, theme);

        let status = match &self.grabbed {
            Some(key) => format!("Moving {}: pick a slot and press m", self.title_of(key)),
            None => format!("{} visible, {} hidden", self.visible.len(), self.hidden.len()),
        };
        frame.render_widget(
            Paragraph::new(status)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.muted())),
            rows[1],
        );
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        use KeyCode::*;
        match key.code {
            Char('q') | Esc => {
                if self.grabbed.take().is_none() {
                    self.finished = true;
                }
            }
            Tab | BackTab => self.switch_panel(),
            Char('j') | Down => self.move_cursor(true),
            Char('k') | Up => self.move_cursor(false),
            Char(' ') => self.toggle_current(),
            Char('m') | Enter => self.grab_or_drop(),
            Char('J') => self.shift(true),
            Char('K') => self.shift(false),
            Char('r') => {
                self.grabbed = None;
                let next = menu::reset(&self.meta);
                self.commit(next, "reset");
            }
            _ => {}
        }
        self.finished
    }

    fn handle_mouse_event(&mut self, event: &MouseEvent) -> bool {
        let hit = self.hit(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some((Panel::Visible, i)) => {
                    self.panel = Panel::Visible;
                    self.visible_state.select(Some(i));
                    self.grabbed = self.visible.get(i).cloned();
                }
                Some((Panel::Hidden, i)) => {
                    self.grabbed = None;
                    self.panel = Panel::Hidden;
                    self.hidden_state.select(Some(i));
                }
                None => {}
            },
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(active) = self.grabbed.take() {
                    let over = match hit {
                        Some((Panel::Visible, i)) => self.visible.get(i).cloned(),
                        _ => None,
                    };
                    self.drop_on(&active, over.as_deref());
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some((panel, i)) = hit {
                    self.grabbed = None;
                    self.panel = panel;
                    match panel {
                        Panel::Visible => self.visible_state.select(Some(i)),
                        Panel::Hidden => self.hidden_state.select(Some(i)),
                    }
                    self.toggle_current();
                }
            }
            MouseEventKind::ScrollDown => self.move_cursor(true),
            MouseEventKind::ScrollUp => self.move_cursor(false),
            _ => {}
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Column Menu",
            shortcuts!(
                ("Move selection", ["j", "k", "↑", "↓"]),
                ("Switch panel", ["Tab"]),
                ("Show/hide", ["Space", "Right click"]),
                ("Grab/drop", ["m", "Enter", "Drag"]),
                ("Move up/down", ["K", "J"]),
                ("Reset", ["r"]),
                ("Close", ["q", "Esc"])
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::Align;
    use ratatui::{backend::TestBackend, crossterm::event::KeyModifiers};

    fn meta(keys: &[&str]) -> Vec<ColumnMeta> {
        keys.iter()
            .map(|k| ColumnMeta {
                key: k.to_string(),
                title: k.to_uppercase(),
                align: Align::Center,
            })
            .collect()
    }

    fn open(keys: &[&str]) -> ColumnMenu {
        let meta = meta(keys);
        let config = normalize(&meta, &ColumnConfig::new());
        ColumnMenu::new("test", meta, &config)
    }

    fn press(menu: &mut ColumnMenu, code: KeyCode) -> bool {
        menu.handle_key_event(&KeyEvent::from(code))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn render(menu: &mut ColumnMenu) {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| menu.draw(f, f.area(), &Theme::default()))
            .unwrap();
    }

    #[test]
    fn space_hides_and_reports_the_change() {
        let mut m = open(&["a", "b", "c"]);
        press(&mut m, KeyCode::Char(' '));
        let change = m.take_change().unwrap();
        assert!(!change["a"].is_visible);
        assert_eq!(m.visible, ["b", "c"]);
        assert_eq!(m.hidden, ["a"]);
        assert_eq!(m.take_change(), None);

        press(&mut m, KeyCode::Tab);
        press(&mut m, KeyCode::Char(' '));
        assert!(m.take_change().unwrap()["a"].is_visible);
    }

    #[test]
    fn grab_and_drop_with_keys() {
        let mut m = open(&["a", "b", "c"]);
        press(&mut m, KeyCode::Char('m'));
        assert_eq!(m.grabbed.as_deref(), Some("a"));
        press(&mut m, KeyCode::Down);
        press(&mut m, KeyCode::Down);
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.grabbed.as_deref(), None);
        assert_eq!(m.visible, ["b", "c", "a"]);
        assert_eq!(m.visible_state.selected(), Some(2));
        assert!(m.take_change().is_some());
    }

    #[test]
    fn shift_moves_one_slot() {
        let mut m = open(&["a", "b", "c"]);
        press(&mut m, KeyCode::Char('J'));
        assert_eq!(m.visible, ["b", "a", "c"]);
        press(&mut m, KeyCode::Char('K'));
        assert_eq!(m.visible, ["a", "b", "c"]);
        press(&mut m, KeyCode::Char('K'));
        assert_eq!(m.visible, ["a", "b", "c"]);
    }

    #[test]
    fn escape_cancels_a_grab_before_closing() {
        let mut m = open(&["a", "b"]);
        press(&mut m, KeyCode::Char('m'));
        assert!(!press(&mut m, KeyCode::Esc));
        assert_eq!(m.grabbed.as_deref(), None);
        assert!(press(&mut m, KeyCode::Esc));
        assert_eq!(m.take_change(), None);
    }

    #[test]
    fn reset_restores_declaration_order() {
        let mut m = open(&["a", "b", "c"]);
        press(&mut m, KeyCode::Char(' '));
        press(&mut m, KeyCode::Char('J'));
        m.take_change();
        press(&mut m, KeyCode::Char('r'));
        assert_eq!(m.take_change(), Some(normalize(&m.meta, &ColumnConfig::new())));
        assert_eq!(m.visible, ["a", "b", "c"]);
    }

    #[test]
    fn mouse_drag_reorders_visible_columns() {
        let mut m = open(&["a", "b", "c"]);
        render(&mut m);
        let x = m.visible_inner.x + 1;
        let top = m.visible_inner.y;

        m.handle_mouse_event(&mouse(MouseEventKind::Down(MouseButton::Left), x, top));
        assert_eq!(m.grabbed.as_deref(), Some("a"));
        m.handle_mouse_event(&mouse(MouseEventKind::Up(MouseButton::Left), x, top + 2));
        assert_eq!(m.visible, ["b", "c", "a"]);
    }

    #[test]
    fn drop_outside_the_list_changes_nothing() {
        let mut m = open(&["a", "b"]);
        render(&mut m);
        let x = m.visible_inner.x + 1;
        m.handle_mouse_event(&mouse(MouseEventKind::Down(MouseButton::Left), x, m.visible_inner.y));
        m.handle_mouse_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));
        assert_eq!(m.grabbed.as_deref(), None);
        assert_eq!(m.take_change(), None);
        assert_eq!(m.visible, ["a", "b"]);
    }
}
