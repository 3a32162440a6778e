use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// One entry of the hint bar: a description and the keys that trigger it.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl Shortcut {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut spans: Vec<Span<'static>> = self
            .keys
            .iter()
            .map(|key| Span::styled(format!("[{key}]"), Style::default().add_modifier(Modifier::BOLD)))
            .collect();
        spans.push(Span::raw(format!(" {}", self.name)));
        spans
    }

    fn width(&self) -> usize {
        self.keys.iter().map(|k| k.width() + 2).sum::<usize>() + 1 + self.name.width()
    }
}

#[macro_export]
macro_rules! shortcuts {
    ($(($name:literal, [$($key:literal),+ $(,)?])),* $(,)?) => {
        vec![$($crate::hint::Shortcut::new($name, &[$($key),+])),*].into_boxed_slice()
    };
}

const SEPARATOR: &str = "   ";

/// Lay shortcuts out left to right, wrapping to a new line when the next one
/// would not fit in `width` (borders excluded).
pub fn create_shortcut_list(shortcuts: Box<[Shortcut]>, width: u16) -> Box<[Line<'static>]> {
    let max = usize::from(width.saturating_sub(2)).max(1);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for shortcut in shortcuts.iter() {
        let w = shortcut.width();
        if !current.is_empty() && used + SEPARATOR.len() + w > max {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        if !current.is_empty() {
            current.push(Span::raw(SEPARATOR));
            used += SEPARATOR.len();
        }
        current.extend(shortcut.spans());
        used += w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fits_on_one_line_when_wide_enough() {
        let lines = create_shortcut_list(shortcuts!(("Quit", ["q"]), ("Search", ["/"])), 80);
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "[q] Quit   [/] Search");
    }

    #[test]
    fn wraps_on_narrow_areas() {
        let lines = create_shortcut_list(
            shortcuts!(("Move", ["j", "k"]), ("Toggle", ["Space"]), ("Close", ["Esc"])),
            20,
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[1]), "[Space] Toggle");
    }
}
