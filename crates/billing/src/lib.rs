//! Billing module.
//!
//! A [`BillingSession`] borrows an inventory store, takes stock line by line
//! and produces a [`Bill`]. Bills are transient; nothing here is persisted
//! except the stock changes, which the store owns.

pub mod bill;
pub mod error;
pub mod session;
pub mod sink;

pub use bill::{Bill, BillLine, TIMESTAMP_FORMAT};
pub use error::BillingError;
pub use session::{BillingSession, SessionState};
pub use sink::{BillSink, InMemoryBillSink};
