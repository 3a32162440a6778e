use super::column::{ColumnMeta, ColumnSet, Record};
use super::config::{ColumnConfig, ResolvedColumn, merge_config};
use crate::storage::{KeyValueStore, load_column_config, save_column_config};
use log::debug;
use std::sync::Arc;

/// Declared columns merged with the persisted configuration of one table.
///
/// The stored configuration is read once, at mount. Every change is
/// normalized and written back under the same storage key.
pub struct ColumnLayout<T> {
    columns: ColumnSet<T>,
    meta: Vec<ColumnMeta>,
    config: ColumnConfig,
    visible: Vec<ResolvedColumn<T>>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl<T: Record> ColumnLayout<T> {
    pub fn mount(
        columns: ColumnSet<T>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let stored = load_column_config(store.as_ref(), &storage_key).unwrap_or_default();
        let meta = columns.meta();
        let mut layout = Self {
            columns,
            meta,
            config: ColumnConfig::new(),
            visible: Vec::new(),
            store,
            storage_key,
        };
        layout.apply(stored);
        debug!(
            "mounted `{}`: {} of {} columns visible",
            layout.storage_key,
            layout.visible.len(),
            layout.columns.len()
        );
        layout
    }

    /// Normalize `next`, make it current and persist it.
    pub fn apply(&mut self, next: ColumnConfig) {
        let merged = merge_config(&self.columns, &next);
        self.config = merged.config;
        self.visible = merged.visible;
        save_column_config(self.store.as_ref(), &self.storage_key, &self.config);
    }

    pub fn visible(&self) -> &[ResolvedColumn<T>] {
        &self.visible
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn meta(&self) -> &[ColumnMeta] {
        &self.meta
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::table::column::ColumnDecl;
    use crate::table::column::tests::Fields;
    use crate::table::config::{ColumnSetting, normalize};
    use crate::table::menu;

    fn columns(n: usize) -> ColumnSet<Fields> {
        ColumnSet::new(
            (0..n)
                .map(|i| ColumnDecl::new(format!("col{i}"), format!("Column {i}")))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn first_mount_persists_synthesized_defaults() {
        let store = Arc::new(MemoryStore::new());
        let set = columns(20);
        let expected = normalize(&set.meta(), &ColumnConfig::new());

        let layout = ColumnLayout::mount(set, store.clone(), "t1");
        let keys: Vec<String> = layout.visible().iter().map(|c| c.key().to_string()).collect();
        let declared: Vec<String> = (0..20).map(|i| format!("col{i}")).collect();
        assert_eq!(keys, declared);
        assert_eq!(load_column_config(store.as_ref(), "t1"), Some(expected));
    }

    #[test]
    fn stale_key_disappears_after_one_cycle() {
        let store = Arc::new(MemoryStore::new());
        let mut stored = ColumnConfig::new();
        stored.insert(
            "deletedCol".into(),
            ColumnSetting {
                is_visible: true,
                index: 0,
                align: None,
            },
        );
        save_column_config(store.as_ref(), "t1", &stored);

        let _layout = ColumnLayout::mount(columns(3), store.clone(), "t1");
        let persisted = load_column_config(store.as_ref(), "t1").unwrap();
        assert!(!persisted.contains_key("deletedCol"));
        assert_eq!(persisted.len(), 3);
    }

    #[test]
    fn changes_persist_and_survive_remount() {
        let store = Arc::new(MemoryStore::new());
        let mut layout = ColumnLayout::mount(columns(3), store.clone(), "t1");
        let next = menu::drag_end(layout.meta(), layout.config(), "col2", Some("col0"));
        layout.apply(next);
        let next = menu::toggle(layout.meta(), layout.config(), "col1");
        layout.apply(next);

        let remounted = ColumnLayout::mount(columns(3), store.clone(), "t1");
        let keys: Vec<&str> = remounted.visible().iter().map(|c| c.key()).collect();
        assert_eq!(keys, ["col2", "col0"]);
    }

    #[test]
    fn layouts_under_different_keys_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let mut a = ColumnLayout::mount(columns(2), store.clone(), "a");
        let next = menu::toggle(a.meta(), a.config(), "col0");
        a.apply(next);

        let b = ColumnLayout::mount(columns(2), store.clone(), "b");
        assert_eq!(b.visible().len(), 2);
    }
}
