use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    prelude::*,
    symbols::border,
    widgets::{Block, Paragraph},
};
use std::cmp::Ordering;
use unicode_width::UnicodeWidthChar;

/// What a key press did to the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInput {
    Ignored,
    Edited,
    /// Leave the bar and apply the text right away.
    Done,
}

/// Operator of a `key<op>value` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOp {
    /// `=`
    Contains,
    /// `==`
    Equals,
    /// `!=`
    Excludes,
    Gt,
    Lt,
    Ge,
    Le,
}

/// One column filter, e.g. `amount>200`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchExpr {
    pub key: String,
    pub op: SearchOp,
    pub value: String,
}

impl SearchExpr {
    /// Text operators ignore case. Ordering operators only match when both
    /// sides are numbers.
    pub fn matches(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        let wanted = self.value.to_lowercase();
        let ordering = match (field.parse::<f64>(), wanted.parse::<f64>()) {
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => None,
        };
        match self.op {
            SearchOp::Contains => field.contains(&wanted),
            SearchOp::Equals => field == wanted,
            SearchOp::Excludes => !field.contains(&wanted),
            SearchOp::Gt => ordering.is_some_and(Ordering::is_gt),
            SearchOp::Lt => ordering.is_some_and(Ordering::is_lt),
            SearchOp::Ge => ordering.is_some_and(Ordering::is_ge),
            SearchOp::Le => ordering.is_some_and(Ordering::is_le),
        }
    }
}

/// Search bar content split into column filters and free text,
/// e.g. `status=pending amount>200 alice` has two filters and search `alice`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub filters: Vec<SearchExpr>,
    pub search: String,
}

/// Two-character operators are tried before their one-character prefixes.
const OPERATORS: [(&str, SearchOp); 7] = [
    ("==", SearchOp::Equals),
    ("!=", SearchOp::Excludes),
    (">=", SearchOp::Ge),
    ("<=", SearchOp::Le),
    (">", SearchOp::Gt),
    ("<", SearchOp::Lt),
    ("=", SearchOp::Contains),
];

fn parse_term(term: &str) -> Option<SearchExpr> {
    let (symbol, op) = OPERATORS.iter().find(|(symbol, _)| term.contains(symbol))?;
    let (key, value) = term.split_once(symbol)?;
    if key.is_empty() {
        return None;
    }
    Some(SearchExpr {
        key: key.to_lowercase(),
        op: *op,
        value: value.trim_matches(|c: char| c == '"' || c == '\'').to_string(),
    })
}

pub fn parse_query(text: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();
    let mut words = Vec::new();
    for term in text.split_whitespace() {
        match parse_term(term) {
            Some(expr) => query.filters.push(expr),
            None => words.push(term),
        }
    }
    query.search = words.join(" ");
    query
}

/// Single-line text input above the table.
#[derive(Debug, Default)]
pub struct SearchBar {
    focused: bool,
    chars: Vec<char>,
    caret: usize,
}

impl SearchBar {
    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn caret_column(&self) -> u16 {
        self.chars[..self.caret]
            .iter()
            .map(|c| c.width().unwrap_or(1) as u16)
            .sum()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, focus_color: Color) {
        let (content, style) = if self.focused || !self.chars.is_empty() {
            (self.text(), Style::default())
        } else {
            (
                "/ to search: words, key=v, key==v, key!=v, key>n".to_string(),
                Style::default().fg(Color::DarkGray),
            )
        };
        let border = if self.focused {
            Style::default().fg(focus_color)
        } else {
            Style::default()
        };
        let block = Block::bordered()
            .title(" Search ")
            .border_set(border::ROUNDED)
            .border_style(border);
        frame.render_widget(Paragraph::new(content).style(style).block(block), area);

        if self.focused {
            let x = area.x.saturating_add(1).saturating_add(self.caret_column());
            frame.set_cursor_position(Position::new(x, area.y + 1));
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> SearchInput {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return SearchInput::Done,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.chars.clear();
                self.caret = 0;
                return SearchInput::Done;
            }
            KeyCode::Char(ch) => {
                self.chars.insert(self.caret, ch);
                self.caret += 1;
            }
            KeyCode::Backspace if self.caret > 0 => {
                self.caret -= 1;
                self.chars.remove(self.caret);
            }
            KeyCode::Delete if self.caret < self.chars.len() => {
                self.chars.remove(self.caret);
            }
            KeyCode::Left => self.caret = self.caret.saturating_sub(1),
            KeyCode::Right => self.caret = (self.caret + 1).min(self.chars.len()),
            KeyCode::Home => self.caret = 0,
            KeyCode::End => self.caret = self.chars.len(),
            _ => return SearchInput::Ignored,
        }
        SearchInput::Edited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_filters_from_free_text() {
        let q = parse_query("status=Pending amount>=200 alice  'x'");
        assert_eq!(q.search, "alice 'x'");
        assert_eq!(
            q.filters,
            vec![
                SearchExpr {
                    key: "status".into(),
                    op: SearchOp::Contains,
                    value: "Pending".into()
                },
                SearchExpr {
                    key: "amount".into(),
                    op: SearchOp::Ge,
                    value: "200".into()
                },
            ]
        );
    }

    #[test]
    fn operator_without_key_is_free_text() {
        let q = parse_query("=5 >3");
        assert!(q.filters.is_empty());
        assert_eq!(q.search, "=5 >3");
    }

    #[test]
    fn empty_input_is_an_empty_query() {
        assert_eq!(parse_query("   "), ParsedQuery::default());
    }

    #[test]
    fn expression_matching() {
        let expr = |op, value: &str| SearchExpr {
            key: "k".into(),
            op,
            value: value.into(),
        };
        assert!(expr(SearchOp::Contains, "pend").matches("Pending"));
        assert!(!expr(SearchOp::Equals, "pend").matches("Pending"));
        assert!(expr(SearchOp::Equals, "pending").matches("Pending"));
        assert!(expr(SearchOp::Excludes, "fail").matches("settled"));
        assert!(expr(SearchOp::Gt, "10").matches("10.5"));
        assert!(!expr(SearchOp::Gt, "10").matches("abc"));
        assert!(expr(SearchOp::Le, "3").matches("3"));
    }

    #[test]
    fn editing_keys() {
        let mut bar = SearchBar::default();
        bar.focus();
        for ch in "abc".chars() {
            assert_eq!(bar.handle_key(&KeyEvent::from(KeyCode::Char(ch))), SearchInput::Edited);
        }
        bar.handle_key(&KeyEvent::from(KeyCode::Left));
        bar.handle_key(&KeyEvent::from(KeyCode::Backspace));
        assert_eq!(bar.text(), "ac");
        assert_eq!(bar.caret, 1);
        bar.handle_key(&KeyEvent::from(KeyCode::End));
        bar.handle_key(&KeyEvent::from(KeyCode::Right));
        assert_eq!(bar.caret, 2);
        assert_eq!(
            bar.handle_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            SearchInput::Done
        );
        assert_eq!(bar.text(), "");
        assert_eq!(bar.handle_key(&KeyEvent::from(KeyCode::Tab)), SearchInput::Ignored);
    }
}
