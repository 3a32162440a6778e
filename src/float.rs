use crate::{hint::Shortcut, theme::Theme};
use ratatui::{
    Frame,
    crossterm::event::{KeyEvent, MouseEvent},
    layout::{Constraint, Flex, Layout, Rect},
};

/// Content of a popup drawn over the current screen.
pub trait FloatContent {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
    /// Returns true once the popup wants to be closed.
    fn handle_key_event(&mut self, key: &KeyEvent) -> bool;
    fn handle_mouse_event(&mut self, _event: &MouseEvent) -> bool {
        false
    }
    fn is_finished(&self) -> bool;
    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>);
}

/// How big the popup is relative to the screen. Both kinds are centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Share of the screen, in percent
    Relative { width: u16, height: u16 },
    /// Fixed cell count, clipped to the screen
    Fixed { width: u16, height: u16 },
}

impl Placement {
    fn constraints(self) -> (Constraint, Constraint) {
        match self {
            Placement::Relative { width, height } => (
                Constraint::Percentage(width.min(100)),
                Constraint::Percentage(height.min(100)),
            ),
            Placement::Fixed { width, height } => (Constraint::Length(width), Constraint::Length(height)),
        }
    }

    fn window(self, screen: Rect) -> Rect {
        let (width, height) = self.constraints();
        let [column] = Layout::horizontal([width]).flex(Flex::Center).areas(screen);
        let [window] = Layout::vertical([height]).flex(Flex::Center).areas(column);
        window
    }
}

pub struct Float<Content: FloatContent + ?Sized> {
    pub content: Box<Content>,
    placement: Placement,
}

impl<Content: FloatContent + ?Sized> Float<Content> {
    pub fn new(content: Box<Content>, width_percent: u16, height_percent: u16) -> Self {
        Self {
            content,
            placement: Placement::Relative {
                width: width_percent,
                height: height_percent,
            },
        }
    }

    pub fn new_absolute(content: Box<Content>, width: u16, height: u16) -> Self {
        Self {
            content,
            placement: Placement::Fixed { width, height },
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, screen: Rect, theme: &Theme) {
        let window = self.placement.window(screen);
        self.content.draw(frame, window, theme);
    }

    /// Forwards the key unless the content already finished. Returns true
    /// when the popup should be dropped.
    pub fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        self.content.is_finished() || self.content.handle_key_event(key)
    }

    pub fn handle_mouse_event(&mut self, event: &MouseEvent) -> bool {
        self.content.is_finished() || self.content.handle_mouse_event(event)
    }

    pub fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        self.content.get_shortcut_list()
    }
}
