//! In-memory snapshot store.
//!
//! Holds at most one `Snapshot`. Writers swap the whole `Arc` under a single
//! `RwLock`, so a reader always sees either the complete previous snapshot or
//! the complete new one. Nothing is persisted.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{Snapshot, ValidatedTable};
use crate::error::AppError;

/// Clone-friendly (cloning shares the same underlying slot).
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    slot: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot (last write wins).
    ///
    /// Returns the number of records now held.
    pub fn put(&self, validated: ValidatedTable) -> usize {
        let snapshot = Arc::new(Snapshot::from(validated));
        let rows = snapshot.len();
        // The guarded value is a single pointer; a panicked writer cannot leave it torn.
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = slot.replace(snapshot).is_some();
        drop(slot);

        tracing::info!(rows, replaced, "snapshot stored");
        rows
    }

    /// Shared handle to the current snapshot.
    pub fn get(&self) -> Result<Arc<Snapshot>, AppError> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.clone().ok_or_else(AppError::no_snapshot)
    }

    /// Drop the held snapshot, if any.
    pub fn clear(&self) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, Table, TextEncoding};
    use crate::error::ErrorKind;
    use crate::io::schema::validate;

    fn validated(sku: &str) -> ValidatedTable {
        let mut columns: Vec<String> = ["SKU", "Name", "Beschreibung", "Preis", "Kategorie", "Lagerbestand"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        columns.extend((1..=24).map(|m| format!("{}-{:02}", 2022 + (m - 1) / 12, (m - 1) % 12 + 1)));
        let mut row = vec![
            Cell::Text(sku.to_string()),
            Cell::Text("Widget".to_string()),
            Cell::Text("desc".to_string()),
            Cell::Float(9.99),
            Cell::Text("Tools".to_string()),
            Cell::Int(5),
        ];
        row.extend((0..24).map(Cell::Int));
        validate(Table {
            columns,
            rows: vec![row],
            encoding: TextEncoding::Utf8,
        })
        .unwrap()
    }

    #[test]
    fn get_before_put_is_no_snapshot() {
        let store = SnapshotStore::new();
        let err = store.get().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NoSnapshot);
    }

    #[test]
    fn put_is_last_write_wins() {
        let store = SnapshotStore::new();
        store.put(validated("FIRST"));
        store.put(validated("SECOND"));

        let snapshot = store.get().unwrap();
        let skus: Vec<String> = snapshot.records().map(|r| r.sku()).collect();
        assert_eq!(skus, vec!["SECOND"]);
    }

    #[test]
    fn readers_keep_their_snapshot_across_replacement() {
        let store = SnapshotStore::new();
        store.put(validated("OLD"));
        let held = store.get().unwrap();

        store.put(validated("NEW"));
        assert_eq!(held.records().next().unwrap().sku(), "OLD");
        assert_eq!(store.get().unwrap().records().next().unwrap().sku(), "NEW");
    }

    #[test]
    fn clones_share_the_slot() {
        let store = SnapshotStore::new();
        let other = store.clone();
        other.put(validated("SHARED"));
        assert_eq!(store.get().unwrap().len(), 1);
        assert!(store.clear());
        assert!(other.get().is_err());
    }

    #[test]
    fn concurrent_readers_never_see_a_partial_snapshot() {
        let store = SnapshotStore::new();
        store.put(validated("A"));

        std::thread::scope(|scope| {
            let writer = store.clone();
            scope.spawn(move || {
                for i in 0..200 {
                    writer.put(validated(if i % 2 == 0 { "B" } else { "A" }));
                }
            });
            for _ in 0..4 {
                let reader = store.clone();
                scope.spawn(move || {
                    for _ in 0..200 {
                        let snapshot = reader.get().unwrap();
                        assert_eq!(snapshot.len(), 1);
                        assert_eq!(snapshot.month_keys().count(), 24);
                    }
                });
            }
        });
    }
}
