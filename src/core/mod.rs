//! Core module - the inventory state engine and its collaborators

pub mod config;
pub mod events;
pub mod expiry;
pub mod export;
pub mod grid;
pub mod identity;
pub mod import;
pub mod inventory;
pub mod persist;
pub mod product;
pub mod store;
pub mod undo;

pub use config::{Config, ConfigError};
pub use events::{Event, EventKind, EventLog, EventStats};
pub use expiry::{classify, Classification, ExpiryStatus, ExpiryThresholds};
pub use grid::{GridDims, GridIndex, Position};
pub use identity::ProductId;
pub use import::{ImportError, NormalizedImport};
pub use inventory::{Inventory, InventoryError};
pub use persist::{FileKvStore, KvStore, MemoryKvStore, PersistError};
pub use product::{Placement, Product};
pub use store::{ProductDraft, ProductStore, ProductUpdate, ReturnOutcome, StoreError};
pub use undo::UndoEngine;
