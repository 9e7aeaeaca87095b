//! `stockbill-core` : domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BillId, ItemId, SessionId};
pub use money::Money;
