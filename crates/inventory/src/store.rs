//! The owning collection of items plus load/save/CRUD.
//!
//! The store is the single point where quantities change. Every mutating
//! operation persists immediately; if that write fails, the in-memory change
//! is reverted so the operation did not apply. The one exception is
//! [`InventoryStore::stage_stock_delta`], which leaves the change in memory
//! until the next [`InventoryStore::save`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use stockbill_core::entity::position_of;
use stockbill_core::{DomainError, ItemId, Money};

use crate::error::StoreResult;
use crate::item::Item;
use crate::record::{self, SkippedRecord};
use crate::storage::InventoryStorage;

/// What the last [`InventoryStore::load`] kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Ordered, owning collection of [`Item`]s backed by an [`InventoryStorage`].
///
/// Order is insertion/load order. Duplicate ids are accepted; every lookup
/// resolves to the first match in store order.
#[derive(Debug)]
pub struct InventoryStore<S> {
    storage: S,
    items: Vec<Item>,
    dirty: bool,
    last_load: LoadSummary,
}

impl<S: InventoryStorage> InventoryStore<S> {
    /// Construct the store by loading from `storage`.
    pub fn open(storage: S) -> StoreResult<Self> {
        let mut store = Self {
            storage,
            items: Vec::new(),
            dirty: false,
            last_load: LoadSummary::default(),
        };
        store.load()?;
        Ok(store)
    }

    /// Save staged changes, if any, and release the store.
    ///
    /// A clean store leaves the persisted text as it was, including any
    /// lines the last load skipped.
    pub fn close(mut self) -> StoreResult<()> {
        if self.dirty {
            self.save()?;
        }
        info!(location = %self.storage.location(), items = self.items.len(), "inventory closed");
        Ok(())
    }

    /// Replace the in-memory set with the persisted one.
    ///
    /// Malformed lines are skipped and reported in the summary; they never
    /// abort the load. Nothing persisted yet means an empty store.
    pub fn load(&mut self) -> StoreResult<LoadSummary> {
        let contents = self.storage.read()?.unwrap_or_default();
        let decoded = record::decode(&contents);

        for skip in &decoded.skipped {
            warn!(line = skip.line, reason = %skip.reason, "skipping malformed inventory record");
        }

        let summary = LoadSummary {
            loaded: decoded.items.len(),
            skipped: decoded.skipped,
        };
        info!(
            location = %self.storage.location(),
            loaded = summary.loaded,
            skipped = summary.skipped.len(),
            "inventory loaded"
        );

        self.items = decoded.items;
        self.dirty = false;
        self.last_load = summary.clone();
        Ok(summary)
    }

    /// Write the full in-memory set, overwriting what was persisted.
    pub fn save(&mut self) -> StoreResult<()> {
        self.storage.write(&record::encode(&self.items))?;
        self.dirty = false;
        debug!(location = %self.storage.location(), items = self.items.len(), "inventory saved");
        Ok(())
    }

    /// Append a new item and persist. Does not check for an existing id.
    pub fn add_item(
        &mut self,
        id: ItemId,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> StoreResult<&Item> {
        let name = name.into();
        validate_name(&name)?;

        self.items.push(Item::new(id, name, price, quantity));
        if let Err(err) = self.save() {
            self.items.pop();
            return Err(err);
        }

        debug!(item_id = %id, "item added");
        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    /// First item whose id matches.
    pub fn lookup(&self, id: ItemId) -> StoreResult<&Item> {
        let pos = self.position(id)?;
        Ok(&self.items[pos])
    }

    /// Overwrite name, price and quantity of the first match and persist.
    pub fn update_item(
        &mut self,
        id: ItemId,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> StoreResult<&Item> {
        let pos = self.position(id)?;
        let name = name.into();
        validate_name(&name)?;

        let previous = std::mem::replace(&mut self.items[pos], Item::new(id, name, price, quantity));
        if let Err(err) = self.save() {
            self.items[pos] = previous;
            return Err(err);
        }

        debug!(item_id = %id, "item updated");
        Ok(&self.items[pos])
    }

    /// Remove the first match and persist. Returns the removed item.
    pub fn delete_item(&mut self, id: ItemId) -> StoreResult<Item> {
        let pos = self.position(id)?;

        let removed = self.items.remove(pos);
        if let Err(err) = self.save() {
            self.items.insert(pos, removed);
            return Err(err);
        }

        debug!(item_id = %id, "item deleted");
        Ok(removed)
    }

    /// Read-only view in store order. Reflects current state on every call.
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    /// Change the quantity of the first match by `delta` and persist.
    ///
    /// Fails with [`DomainError::InsufficientStock`] if the result would be
    /// negative; nothing changes in that case.
    pub fn apply_stock_delta(&mut self, id: ItemId, delta: i64) -> StoreResult<&Item> {
        let pos = self.position(id)?;
        let previous = self.items[pos].quantity;
        let next = adjusted_quantity(&self.items[pos], delta)?;

        self.items[pos].quantity = next;
        if let Err(err) = self.save() {
            self.items[pos].quantity = previous;
            return Err(err);
        }

        debug!(item_id = %id, delta, quantity = next, "stock adjusted");
        Ok(&self.items[pos])
    }

    /// Like [`Self::apply_stock_delta`], but the change stays in memory until
    /// the next [`Self::save`]. Marks the store dirty.
    pub fn stage_stock_delta(&mut self, id: ItemId, delta: i64) -> StoreResult<&Item> {
        let pos = self.position(id)?;
        let next = adjusted_quantity(&self.items[pos], delta)?;

        self.items[pos].quantity = next;
        self.dirty = true;

        debug!(item_id = %id, delta, quantity = next, "stock change staged");
        Ok(&self.items[pos])
    }

    /// Whether staged changes have not been saved yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_load(&self) -> &LoadSummary {
        &self.last_load
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: ItemId) -> Result<usize, DomainError> {
        position_of(&self.items, &id).ok_or_else(|| DomainError::not_found(id))
    }
}

/// Names are single whitespace-free tokens so records round-trip.
fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation("item name cannot be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::validation(format!(
            "item name {name:?} cannot contain whitespace"
        )));
    }
    Ok(())
}

fn adjusted_quantity(item: &Item, delta: i64) -> Result<u32, DomainError> {
    let next = i64::from(item.quantity)
        .checked_add(delta)
        .ok_or_else(|| DomainError::invariant("stock adjustment overflow"))?;

    if next < 0 {
        return Err(DomainError::InsufficientStock {
            item_id: item.id,
            requested: delta.unsigned_abs(),
            available: item.quantity,
        });
    }

    u32::try_from(next).map_err(|_| DomainError::invariant("stock cannot exceed u32::MAX"))
}
