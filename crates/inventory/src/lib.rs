//! Inventory store.
//!
//! This crate owns the item collection, its whitespace-delimited file format
//! and the storage seam. It is the single source of truth for stock levels.

pub mod error;
pub mod item;
pub mod record;
pub mod storage;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use item::Item;
pub use record::{Decoded, SkippedRecord};
pub use storage::{FileStorage, InMemoryStorage, InventoryStorage, StorageError};
pub use store::{InventoryStore, LoadSummary};
