//! Per-column visibility/order settings and the merge that turns declarations
//! plus stored settings into the ordered, width-resolved visible column list.

use super::column::{Align, ColumnDecl, ColumnMeta, ColumnSet, Record};
use itertools::Itertools;
use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSetting {
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

fn visible_by_default() -> bool {
    true
}

impl ColumnSetting {
    /// Entry synthesized for a column seen without a stored setting.
    pub fn synthesized(index: usize, align: Align) -> Self {
        Self {
            is_visible: true,
            index,
            align: Some(align),
        }
    }
}

/// Settings for one table instance, keyed by column key.
pub type ColumnConfig = BTreeMap<String, ColumnSetting>;

/// Fill in missing entries and drop entries whose key is no longer declared.
pub fn normalize(columns: &[ColumnMeta], stored: &ColumnConfig) -> ColumnConfig {
    columns
        .iter()
        .enumerate()
        .map(|(position, column)| {
            let setting = stored
                .get(&column.key)
                .copied()
                .unwrap_or_else(|| ColumnSetting::synthesized(position, column.align));
            (column.key.clone(), setting)
        })
        .collect()
}

/// Keys of the visible columns in display order (index ascending, ties by
/// declaration order). `config` must be normalized.
pub fn visible_keys(columns: &[ColumnMeta], config: &ColumnConfig) -> Vec<String> {
    ordered_keys(columns, config, true)
}

pub fn hidden_keys(columns: &[ColumnMeta], config: &ColumnConfig) -> Vec<String> {
    ordered_keys(columns, config, false)
}

fn ordered_keys(columns: &[ColumnMeta], config: &ColumnConfig, visible: bool) -> Vec<String> {
    columns
        .iter()
        .filter_map(|c| config.get(&c.key).map(|s| (c, s)))
        .filter(|(_, s)| s.is_visible == visible)
        .sorted_by_key(|(_, s)| s.index)
        .map(|(c, _)| c.key.clone())
        .collect()
}

/// A visible column after merging with its setting.
#[derive(Debug)]
pub struct ResolvedColumn<T> {
    pub decl: ColumnDecl<T>,
    pub align: Align,
    /// Declared width, or the share of the remaining percentage (`"35.0%"`).
    pub width: String,
}

impl<T> Clone for ResolvedColumn<T> {
    fn clone(&self) -> Self {
        Self {
            decl: self.decl.clone(),
            align: self.align,
            width: self.width.clone(),
        }
    }
}

impl<T> ResolvedColumn<T> {
    pub fn key(&self) -> &str {
        &self.decl.key
    }

    pub fn constraint(&self) -> Constraint {
        width_constraint(&self.width)
    }
}

#[derive(Debug)]
pub struct Merged<T> {
    pub visible: Vec<ResolvedColumn<T>>,
    pub config: ColumnConfig,
}

pub fn merge_config<T: Record>(columns: &ColumnSet<T>, stored: &ColumnConfig) -> Merged<T> {
    let meta = columns.meta();
    let config = normalize(&meta, stored);

    let ordered: Vec<(&ColumnDecl<T>, &ColumnSetting)> = visible_keys(&meta, &config)
        .iter()
        .filter_map(|key| Some((columns.get(key)?, config.get(key)?)))
        .collect();

    let widths = resolve_widths(ordered.iter().map(|(decl, _)| decl.width.as_deref()));

    let visible = ordered
        .into_iter()
        .zip(widths)
        .map(|((decl, setting), width)| ResolvedColumn {
            decl: decl.clone(),
            align: setting.align.unwrap_or(decl.align),
            width,
        })
        .collect();

    Merged { visible, config }
}

/// Parse `"30%"`, `"30"` or `" 30.5 % "` into a percentage number.
pub fn parse_percent(width: &str) -> Option<f64> {
    let trimmed = width.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Explicit widths are kept. Columns without one share what the explicit
/// widths leave of 100%; an unparsable explicit width counts as 0.
pub fn resolve_widths<'a>(declared: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let declared: Vec<Option<&str>> = declared.collect();

    let used: f64 = declared
        .iter()
        .flatten()
        .map(|w| parse_percent(w).unwrap_or(0.0))
        .sum();
    let auto = declared.iter().filter(|w| w.is_none()).count();
    let share = if auto == 0 {
        0.0
    } else {
        (100.0 - used).max(0.0) / auto as f64
    };

    declared
        .into_iter()
        .map(|w| match w {
            Some(w) => w.to_string(),
            None => format_percent(share),
        })
        .collect()
}

pub fn width_constraint(width: &str) -> Constraint {
    match parse_percent(width) {
        Some(p) => Constraint::Percentage(p.round().clamp(0.0, 100.0) as u16),
        None => Constraint::Fill(1),
    }
}
