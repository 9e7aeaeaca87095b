use thiserror::Error;

use stockbill_core::{DomainError, ItemId};
use stockbill_inventory::StoreError;

/// Billing session failure.
///
/// Everything except [`BillingError::Store`] is a per-line rejection: the
/// session stays open and nothing was mutated.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("not enough stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: u32,
        available: u32,
    },

    #[error("line quantity must be positive")]
    ZeroQuantity,

    #[error("bill amount overflow")]
    AmountOverflow,

    #[error("billing session is already finalized")]
    SessionFinalized,

    #[error(transparent)]
    Store(StoreError),
}

impl BillingError {
    /// Whether the caller may continue the session after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(StoreError::Storage(_)) | Self::SessionFinalized)
    }
}

impl From<StoreError> for BillingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(DomainError::NotFound(id)) => Self::ItemNotFound(id),
            other => Self::Store(other),
        }
    }
}
