use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn to_alignment(self) -> ratatui::layout::Alignment {
        use ratatui::layout::Alignment;
        match self {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

/// A row type the table can display.
///
/// `field` returns the raw value stored under `key`; it is shown as-is when the
/// column has no renderer, and it is what filtering and sorting compare.
pub trait Record: Send + Sync + 'static {
    fn id(&self) -> String;
    fn field(&self, key: &str) -> Option<String>;
}

pub type RenderFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Static description of one displayable column.
pub struct ColumnDecl<T> {
    pub key: String,
    pub title: String,
    /// Declared width, usually a percentage such as `"30%"`.
    pub width: Option<String>,
    pub align: Align,
    render: Option<RenderFn<T>>,
}

impl<T> Clone for ColumnDecl<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            width: self.width.clone(),
            align: self.align,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDecl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDecl")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl<T: Record> ColumnDecl<T> {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            width: None,
            align: Align::default(),
            render: None,
        }
    }

    /// Blank strings count as "no width declared".
    pub fn width(mut self, width: impl Into<String>) -> Self {
        let width = width.into();
        self.width = if width.trim().is_empty() { None } else { Some(width) };
        self
    }

    pub fn percent(self, percent: f64) -> Self {
        self.width(format!("{percent}%"))
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render(mut self, render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Displayed value of this column for `row`.
    pub fn value(&self, row: &T) -> String {
        match &self.render {
            Some(render) => render(row),
            None => row.field(&self.key).unwrap_or_default(),
        }
    }
}

/// Non-generic view of a declaration, enough for configuration bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub key: String,
    pub title: String,
    pub align: Align,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("duplicate column key `{0}`")]
    DuplicateKey(String),
}

/// The declared columns of one table instance, in declaration order.
pub struct ColumnSet<T> {
    columns: Vec<ColumnDecl<T>>,
}

impl<T> Clone for ColumnSet<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

impl<T: Record> ColumnSet<T> {
    pub fn new(columns: Vec<ColumnDecl<T>>) -> Result<Self, ColumnError> {
        if let Some(key) = columns.iter().map(|c| c.key.as_str()).duplicates().next() {
            return Err(ColumnError::DuplicateKey(key.to_string()));
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDecl<T>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDecl<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn meta(&self) -> Vec<ColumnMeta> {
        self.columns
            .iter()
            .map(|c| ColumnMeta {
                key: c.key.clone(),
                title: c.title.clone(),
                align: c.align,
            })
            .collect()
    }
}
