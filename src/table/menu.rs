//! Column menu mutations: visibility toggle, drag reorder, reset.
//!
//! Each operation takes the current configuration and returns the next one;
//! the owner normalizes and persists it.

use super::column::ColumnMeta;
use super::config::{ColumnConfig, ColumnSetting, normalize, visible_keys};

/// Flip visibility of `key`. A column without an entry first gets one whose
/// index is the number of visible declared columns. Undeclared keys are
/// ignored.
pub fn toggle(columns: &[ColumnMeta], config: &ColumnConfig, key: &str) -> ColumnConfig {
    let Some(column) = columns.iter().find(|c| c.key == key) else {
        return config.clone();
    };

    let mut next = config.clone();
    if !next.contains_key(key) {
        let visible = columns
            .iter()
            .filter(|c| config.get(&c.key).is_some_and(|s| s.is_visible))
            .count();
        next.insert(
            key.to_string(),
            ColumnSetting::synthesized(visible, column.align),
        );
    }
    if let Some(setting) = next.get_mut(key) {
        setting.is_visible = !setting.is_visible;
    }
    next
}

/// Move `active` to the position of `over` within the visible order and
/// renumber the visible columns `0..n`. Hidden columns keep their index.
pub fn drag_end(
    columns: &[ColumnMeta],
    config: &ColumnConfig,
    active: &str,
    over: Option<&str>,
) -> ColumnConfig {
    let Some(over) = over else {
        return config.clone();
    };
    if over == active {
        return config.clone();
    }

    let mut order = visible_keys(columns, &normalize(columns, config));
    let (Some(from), Some(to)) = (
        order.iter().position(|k| k == active),
        order.iter().position(|k| k == over),
    ) else {
        return config.clone();
    };

    let moved = order.remove(from);
    order.insert(to, moved);

    let mut next = config.clone();
    for (index, key) in order.into_iter().enumerate() {
        let align = columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.align)
            .unwrap_or_default();
        next.entry(key)
            .or_insert_with(|| ColumnSetting::synthesized(index, align))
            .index = index;
    }
    next
}

/// Every declared column visible, in declaration order.
pub fn reset(columns: &[ColumnMeta]) -> ColumnConfig {
    normalize(columns, &ColumnConfig::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::Align;

    fn meta(keys: &[&str]) -> Vec<ColumnMeta> {
        keys.iter()
            .map(|k| ColumnMeta {
                key: k.to_string(),
                title: k.to_uppercase(),
                align: Align::Center,
            })
            .collect()
    }

    fn hide(config: &mut ColumnConfig, key: &str) {
        config.get_mut(key).unwrap().is_visible = false;
    }

    #[test]
    fn drag_last_onto_first() {
        let columns = meta(&["A", "B", "C"]);
        let config = reset(&columns);
        let next = drag_end(&columns, &config, "C", Some("A"));
        assert_eq!(visible_keys(&columns, &next), ["C", "A", "B"]);
        assert_eq!(next["C"].index, 0);
        assert_eq!(next["A"].index, 1);
        assert_eq!(next["B"].index, 2);
    }

    #[test]
    fn drag_first_onto_next_swaps() {
        let columns = meta(&["A", "B", "C"]);
        let next = drag_end(&columns, &reset(&columns), "A", Some("B"));
        assert_eq!(visible_keys(&columns, &next), ["B", "A", "C"]);
    }

    #[test]
    fn drag_without_target_or_onto_itself_is_noop() {
        let columns = meta(&["A", "B", "C"]);
        let config = reset(&columns);
        assert_eq!(drag_end(&columns, &config, "B", None), config);
        assert_eq!(drag_end(&columns, &config, "B", Some("B")), config);
    }

    #[test]
    fn drag_leaves_hidden_indices_alone() {
        let columns = meta(&["A", "B", "C", "D"]);
        let mut config = reset(&columns);
        hide(&mut config, "B");
        config.get_mut("B").unwrap().index = 7;

        let next = drag_end(&columns, &config, "D", Some("A"));
        assert_eq!(visible_keys(&columns, &next), ["D", "A", "C"]);
        assert_eq!(next["B"].index, 7);
        assert!(!next["B"].is_visible);
        assert_eq!(
            [next["D"].index, next["A"].index, next["C"].index],
            [0, 1, 2]
        );
    }

    #[test]
    fn drag_involving_hidden_column_is_noop() {
        let columns = meta(&["A", "B", "C"]);
        let mut config = reset(&columns);
        hide(&mut config, "B");
        assert_eq!(drag_end(&columns, &config, "B", Some("A")), config);
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let columns = meta(&["A", "B", "C"]);
        let config = reset(&columns);
        let once = toggle(&columns, &config, "B");
        assert!(!once["B"].is_visible);
        let twice = toggle(&columns, &once, "B");
        assert_eq!(twice, config);
    }

    #[test]
    fn toggle_synthesizes_entry_after_visible_columns() {
        let columns = meta(&["A", "B", "C"]);
        let mut config = reset(&columns);
        config.remove("C");
        hide(&mut config, "A");

        // Only B has a visible entry, so C lands at index 1.
        let next = toggle(&columns, &config, "C");
        assert_eq!(next["C"].index, 1);
        assert!(!next["C"].is_visible);
    }

    #[test]
    fn toggle_ignores_stale_visible_entries() {
        let columns = meta(&["A", "B"]);
        let mut config = reset(&columns);
        config.remove("B");
        config.insert("ghost".into(), ColumnSetting::synthesized(4, Align::Left));
        config.insert("old".into(), ColumnSetting::synthesized(5, Align::Left));

        let next = toggle(&columns, &config, "B");
        assert_eq!(next["B"].index, 1);
    }

    #[test]
    fn toggle_of_undeclared_key_is_ignored() {
        let columns = meta(&["A"]);
        let config = reset(&columns);
        assert_eq!(toggle(&columns, &config, "ghost"), config);
    }

    #[test]
    fn reset_restores_declaration_order() {
        let columns = meta(&["A", "B", "C"]);
        let mut config = drag_end(&columns, &reset(&columns), "C", Some("A"));
        hide(&mut config, "A");
        let restored = reset(&columns);
        assert_eq!(visible_keys(&columns, &restored), ["A", "B", "C"]);
        assert!(restored.values().all(|s| s.is_visible));
    }
}
