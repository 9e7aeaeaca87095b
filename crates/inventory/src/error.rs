use thiserror::Error;

use stockbill_core::DomainError;

use crate::storage::StorageError;

/// Error returned by [`crate::InventoryStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Storage(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
