//! The inventory orchestrator
//!
//! Ties the core together and fixes the order of effects for every
//! mutating operation: undo snapshot, store mutation, event append, grid
//! rebuild (inside the store), persistence. Everything is synchronous and
//! runs to completion; there is exactly one logical thread of control.

use chrono::Utc;
use thiserror::Error;

use crate::core::events::{EventKind, EventLog};
use crate::core::export;
use crate::core::grid::{GridDims, GridIndex, Position};
use crate::core::identity::ProductId;
use crate::core::import::{self, ImportError, NormalizedImport};
use crate::core::persist::{KvStore, PersistError, EVENTS_KEY, PRODUCTS_KEY, UNDO_KEY};
use crate::core::product::Product;
use crate::core::store::{
    ProductDraft, ProductStore, ProductUpdate, ReturnOutcome, StoreError,
};
use crate::core::undo::UndoEngine;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("stored inventory data is corrupt: {0}")]
    CorruptData(serde_json::Error),
}

pub struct Inventory<S: KvStore> {
    store: ProductStore,
    undo: UndoEngine,
    events: EventLog,
    kv: S,
}

impl<S: KvStore> Inventory<S> {
    /// Load products and events from the key-value store
    pub fn open(kv: S, dims: GridDims, undo_capacity: usize) -> Result<Self, InventoryError> {
        let products: Vec<Product> = match kv.load(PRODUCTS_KEY)? {
            Some(value) => serde_json::from_value(value).map_err(InventoryError::CorruptData)?,
            None => Vec::new(),
        };
        let events: EventLog = match kv.load(EVENTS_KEY)? {
            Some(value) => serde_json::from_value(value).map_err(InventoryError::CorruptData)?,
            None => EventLog::new(),
        };
        // the snapshot stack lives alongside the data so undo spans
        // process restarts; it stays bounded at the configured capacity
        let undo = match kv.load(UNDO_KEY)? {
            Some(value) => {
                let snapshots: Vec<Vec<Product>> =
                    serde_json::from_value(value).map_err(InventoryError::CorruptData)?;
                UndoEngine::from_snapshots(undo_capacity, snapshots)
            }
            None => UndoEngine::new(undo_capacity),
        };
        Ok(Self {
            store: ProductStore::from_products(dims, products),
            undo,
            events,
            kv,
        })
    }

    pub fn products(&self) -> &[Product] {
        self.store.products()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.store.get(id)
    }

    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.store.search(query)
    }

    pub fn grid(&self) -> &GridIndex {
        self.store.grid()
    }

    pub fn dims(&self) -> GridDims {
        self.store.dims()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Add a product; `Ok(None)` is the deliberate all-fields-empty no-op
    pub fn add(&mut self, draft: ProductDraft) -> Result<Option<Product>, InventoryError> {
        self.undo.snapshot(self.store.products());
        let Some(product) = self.store.add(draft).cloned() else {
            self.undo.discard_last();
            return Ok(None);
        };
        self.events.append(EventKind::Add, &product);
        self.persist(true)?;
        Ok(Some(product))
    }

    pub fn edit(
        &mut self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, InventoryError> {
        self.undo.snapshot(self.store.products());
        let product = match self.store.edit(id, update) {
            Ok(product) => product.clone(),
            Err(e) => {
                self.undo.discard_last();
                return Err(e.into());
            }
        };
        self.events.append(EventKind::Edit, &product);
        self.persist(true)?;
        Ok(product)
    }

    pub fn remove(&mut self, id: &ProductId) -> Result<Product, InventoryError> {
        self.undo.snapshot(self.store.products());
        let product = match self.store.remove(id) {
            Ok(product) => product,
            Err(e) => {
                self.undo.discard_last();
                return Err(e.into());
            }
        };
        self.events.append(EventKind::Delete, &product);
        self.persist(true)?;
        Ok(product)
    }

    pub fn place(&mut self, id: &ProductId, pos: Position) -> Result<Product, InventoryError> {
        self.undo.snapshot(self.store.products());
        if let Err(e) = self.store.place(id, pos) {
            self.undo.discard_last();
            return Err(e.into());
        }
        let product = self.cloned(id);
        self.events.append(EventKind::Move, &product);
        self.persist(true)?;
        Ok(product)
    }

    pub fn unplace(&mut self, id: &ProductId) -> Result<Product, InventoryError> {
        self.undo.snapshot(self.store.products());
        if let Err(e) = self.store.unplace(id) {
            self.undo.discard_last();
            return Err(e.into());
        }
        let product = self.cloned(id);
        self.events.append(EventKind::Move, &product);
        self.persist(true)?;
        Ok(product)
    }

    pub fn pick(&mut self, id: &ProductId) -> Result<Product, InventoryError> {
        self.undo.snapshot(self.store.products());
        if let Err(e) = self.store.pick(id) {
            self.undo.discard_last();
            return Err(e.into());
        }
        let product = self.cloned(id);
        self.events.append(EventKind::Pick, &product);
        self.persist(true)?;
        Ok(product)
    }

    pub fn put_back(&mut self, id: &ProductId) -> Result<ReturnOutcome, InventoryError> {
        self.undo.snapshot(self.store.products());
        let outcome = match self.store.put_back(id) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.undo.discard_last();
                return Err(e.into());
            }
        };
        let product = self.cloned(id);
        self.events.append(EventKind::Return, &product);
        self.persist(true)?;
        Ok(outcome)
    }

    /// Restore the most recent snapshot; `false` when there is nothing to
    /// undo. Restores products only: the event log is an audit trail and
    /// keeps its history.
    pub fn undo(&mut self) -> Result<bool, InventoryError> {
        let Some(previous) = self.undo.undo() else {
            return Ok(false);
        };
        self.store.replace_all(previous);
        self.persist(false)?;
        Ok(true)
    }

    /// Normalize import text and replace the whole collection with it.
    /// On any import error the store is untouched.
    pub fn import_replace(&mut self, text: &str) -> Result<NormalizedImport, InventoryError> {
        let normalized = import::normalize(text, self.store.dims(), Utc::now())?;
        self.undo.snapshot(self.store.products());
        self.store.replace_all(normalized.products.clone());
        self.persist(true)?;
        Ok(normalized)
    }

    /// Pretty-printed JSON of the full collection
    pub fn export_json(&self) -> Result<String, PersistError> {
        export::to_pretty_json(self.store.products()).map_err(|source| PersistError::Encode {
            key: "export".to_string(),
            source,
        })
    }

    // only called right after a successful mutation of `id`
    fn cloned(&self, id: &ProductId) -> Product {
        self.store
            .get(id)
            .cloned()
            .unwrap_or_else(|| Product::new(String::new(), String::new(), String::new()))
    }

    /// Products and the undo stack are saved after every successful
    /// mutation; the event log only when it grew
    fn persist(&mut self, events_too: bool) -> Result<(), PersistError> {
        let value =
            serde_json::to_value(self.store.products()).map_err(|source| PersistError::Encode {
                key: PRODUCTS_KEY.to_string(),
                source,
            })?;
        self.kv.save(PRODUCTS_KEY, &value)?;

        let value = serde_json::to_value(self.undo.stack()).map_err(|source| {
            PersistError::Encode {
                key: UNDO_KEY.to_string(),
                source,
            }
        })?;
        self.kv.save(UNDO_KEY, &value)?;

        if events_too {
            let value =
                serde_json::to_value(self.events.events()).map_err(|source| PersistError::Encode {
                    key: EVENTS_KEY.to_string(),
                    source,
                })?;
            self.kv.save(EVENTS_KEY, &value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persist::MemoryKvStore;

    fn inventory() -> Inventory<MemoryKvStore> {
        Inventory::open(MemoryKvStore::new(), GridDims::new(4, 4), 3).unwrap()
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn add(inv: &mut Inventory<MemoryKvStore>, name: &str) -> ProductId {
        inv.add(draft(name)).unwrap().unwrap().id
    }

    #[test]
    fn test_add_appears_at_index_zero() {
        let mut inv = inventory();
        add(&mut inv, "old");
        add(&mut inv, "new");
        assert_eq!(inv.products()[0].name, "new");
        assert_eq!(inv.events().len(), 2);
    }

    #[test]
    fn test_empty_add_leaves_no_trace() {
        let mut inv = inventory();
        assert!(inv.add(ProductDraft::default()).unwrap().is_none());
        assert_eq!(inv.undo_depth(), 0);
        assert_eq!(inv.events().len(), 0);
        assert!(inv.products().is_empty());
    }

    #[test]
    fn test_undo_restores_pre_mutation_state_per_operation() {
        let mut inv = inventory();
        let id = add(&mut inv, "milk");
        let after_add = inv.products().to_vec();

        inv.place(&id, Position::new(1, 1)).unwrap();
        let after_place = inv.products().to_vec();

        inv.pick(&id).unwrap();
        assert!(inv.undo().unwrap());
        assert_eq!(inv.products(), &after_place[..]);

        assert!(inv.undo().unwrap());
        assert_eq!(inv.products(), &after_add[..]);

        assert!(inv.undo().unwrap());
        assert!(inv.products().is_empty());
        assert!(!inv.undo().unwrap());
    }

    #[test]
    fn test_undo_rebuilds_grid() {
        let mut inv = inventory();
        let id = add(&mut inv, "milk");
        inv.place(&id, Position::new(0, 0)).unwrap();
        assert_eq!(inv.grid().occupied_count(), 1);
        inv.undo().unwrap();
        assert_eq!(inv.grid().occupied_count(), 0);
    }

    #[test]
    fn test_failed_mutation_does_not_grow_undo_stack() {
        let mut inv = inventory();
        let id = add(&mut inv, "milk");
        assert_eq!(inv.undo_depth(), 1);
        assert!(inv.place(&id, Position::new(9, 9)).is_err());
        assert_eq!(inv.undo_depth(), 1);
        let ghost = ProductId::generate();
        assert!(inv.remove(&ghost).is_err());
        assert_eq!(inv.undo_depth(), 1);
    }

    #[test]
    fn test_undo_stack_bounded() {
        let mut inv = inventory(); // capacity 3
        for i in 0..6 {
            add(&mut inv, &format!("p{i}"));
        }
        assert_eq!(inv.undo_depth(), 3);
    }

    #[test]
    fn test_import_replace_is_undoable() {
        let mut inv = inventory();
        add(&mut inv, "existing");
        let before = inv.products().to_vec();

        let report = inv
            .import_replace(r#"{"items":[{"name":"X"},{"name":"Y"}]}"#)
            .unwrap();
        assert_eq!(report.products.len(), 2);
        assert_eq!(inv.products().len(), 2);

        assert!(inv.undo().unwrap());
        assert_eq!(inv.products(), &before[..]);
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let mut inv = inventory();
        add(&mut inv, "existing");
        let before = inv.products().to_vec();
        let depth = inv.undo_depth();

        assert!(inv.import_replace("{broken").is_err());
        assert!(inv.import_replace(r#"{"foo": []}"#).is_err());
        assert_eq!(inv.products(), &before[..]);
        assert_eq!(inv.undo_depth(), depth);
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let mut inv = inventory();
        let id = add(&mut inv, "Milk");
        inv.edit(
            &id,
            ProductUpdate {
                lot: Some("A1".into()),
                expiry_text: Some("2025-01-01".into()),
                ..Default::default()
            },
        )
        .unwrap();
        inv.place(&id, Position::new(2, 3)).unwrap();
        let before = inv.products().to_vec();

        let exported = inv.export_json().unwrap();
        let report = inv.import_replace(&exported).unwrap();
        assert_eq!(report.reassigned_ids, 0);
        assert_eq!(inv.products(), &before[..]);
    }

    #[test]
    fn test_state_survives_reopen() {
        let mut inv = inventory();
        let id = add(&mut inv, "milk");
        inv.place(&id, Position::new(1, 2)).unwrap();

        let kv = std::mem::take(&mut inv.kv);
        let reopened = Inventory::open(kv, GridDims::new(4, 4), 3).unwrap();
        assert_eq!(reopened.products().len(), 1);
        assert_eq!(
            reopened.get(&id).unwrap().position(),
            Some(Position::new(1, 2))
        );
        assert_eq!(reopened.grid().occupied_count(), 1);
        assert_eq!(reopened.events().len(), 2);
        // the snapshot stack is saved with the data, so undo survives too
        assert_eq!(reopened.undo_depth(), 2);
    }

    #[test]
    fn test_undo_spans_reopen() {
        let mut inv = inventory();
        add(&mut inv, "keep");
        add(&mut inv, "revert-me");

        let kv = std::mem::take(&mut inv.kv);
        let mut reopened = Inventory::open(kv, GridDims::new(4, 4), 3).unwrap();
        assert!(reopened.undo().unwrap());
        assert_eq!(reopened.products().len(), 1);
        assert_eq!(reopened.products()[0].name, "keep");
    }

    #[test]
    fn test_events_recorded_per_operation() {
        let mut inv = inventory();
        let id = add(&mut inv, "milk");
        inv.place(&id, Position::new(0, 0)).unwrap();
        inv.pick(&id).unwrap();
        inv.put_back(&id).unwrap();
        inv.remove(&id).unwrap();

        let stats = inv.events().stats();
        assert_eq!(stats.count(EventKind::Add), 1);
        assert_eq!(stats.count(EventKind::Move), 1);
        assert_eq!(stats.count(EventKind::Pick), 1);
        assert_eq!(stats.count(EventKind::Return), 1);
        assert_eq!(stats.count(EventKind::Delete), 1);
    }
}
