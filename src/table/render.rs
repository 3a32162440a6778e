use super::column::{Align, Record};
use super::config::ResolvedColumn;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint},
    style::Style,
    text::Line,
    widgets::{Cell, Row},
};

const SKELETON_BARS: [&str; 3] = ["░░░░░░░░", "░░░░░░░░░░░░", "░░░░░░"];

/// One cell of a data row, before it becomes a ratatui `Cell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub text: String,
    pub align: Align,
}

pub fn render_cells<T: Record>(columns: &[ResolvedColumn<T>], row: &T) -> Vec<RenderedCell> {
    columns
        .iter()
        .map(|column| RenderedCell {
            text: column.decl.value(row),
            align: column.align,
        })
        .collect()
}

pub fn constraints<T>(columns: &[ResolvedColumn<T>]) -> Vec<Constraint> {
    columns.iter().map(ResolvedColumn::constraint).collect()
}

pub fn data_row<T: Record>(
    columns: &[ResolvedColumn<T>],
    row: &T,
    position: usize,
    theme: &Theme,
) -> Row<'static> {
    let bg = if position % 2 == 0 {
        theme.stripe_even()
    } else {
        theme.stripe_odd()
    };
    let cells = render_cells(columns, row)
        .into_iter()
        .map(|cell| Cell::from(Line::from(cell.text).alignment(cell.align.to_alignment())));
    Row::new(cells).style(Style::default().bg(bg))
}

pub fn skeleton_row(span: usize, theme: &Theme) -> Row<'static> {
    let cells = (0..span)
        .map(|i| SKELETON_BARS[i % SKELETON_BARS.len()])
        .map(|bar| Cell::from(Line::from(bar).alignment(Alignment::Center)));
    Row::new(cells).style(Style::default().fg(theme.skeleton()))
}

/// Empty row that reserves the line a spanning message is drawn over.
pub fn blank_row(span: usize) -> Row<'static> {
    Row::new(vec![Cell::default(); span])
}
