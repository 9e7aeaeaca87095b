//! Billing session: converts store lookups and stock decrements into bill lines.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockbill_core::{BillId, ItemId, Money, SessionId};
use stockbill_inventory::{InventoryStorage, InventoryStore};

use crate::bill::{Bill, BillLine};
use crate::error::BillingError;

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Open,
    Finalized,
}

/// A bill under construction, bound to one inventory store.
///
/// The session holds the store's mutable borrow for its whole lifetime, so
/// nothing else can delete or edit items while a bill is in progress. Stock
/// decrements are staged in the store's memory; only [`Self::finalize`]
/// persists them. Dropping an open session keeps the decrements in memory
/// but leaves the persisted stock untouched.
#[derive(Debug)]
pub struct BillingSession<'a, S> {
    store: &'a mut InventoryStore<S>,
    id: SessionId,
    state: SessionState,
    lines: Vec<BillLine>,
    running_total: Money,
    bill: Option<Bill>,
}

impl<'a, S: InventoryStorage> BillingSession<'a, S> {
    pub fn new(store: &'a mut InventoryStore<S>) -> Self {
        let id = SessionId::new();
        info!(session_id = %id, "billing session opened");
        Self {
            store,
            id,
            state: SessionState::Open,
            lines: Vec::new(),
            running_total: Money::ZERO,
            bill: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    /// Sum of line totals so far.
    pub fn running_total(&self) -> Money {
        self.running_total
    }

    /// The finalized bill, once [`Self::finalize`] has succeeded.
    pub fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    /// Read access to the bound store, e.g. to show current stock.
    pub fn store(&self) -> &InventoryStore<S> {
        self.store
    }

    /// Take `quantity` units of the first item with `id` and append a line.
    ///
    /// Rejections (`ItemNotFound`, `InsufficientStock`, `ZeroQuantity`,
    /// `AmountOverflow`) happen before any mutation and leave the session open.
    pub fn add_line(&mut self, id: ItemId, quantity: u32) -> Result<&BillLine, BillingError> {
        if self.state == SessionState::Finalized {
            return Err(BillingError::SessionFinalized);
        }
        if quantity == 0 {
            return Err(BillingError::ZeroQuantity);
        }

        let item = self.store.lookup(id)?;
        if quantity > item.quantity {
            warn!(
                session_id = %self.id,
                item_id = %id,
                requested = quantity,
                available = item.quantity,
                "not enough stock"
            );
            return Err(BillingError::InsufficientStock {
                item_id: id,
                requested: quantity,
                available: item.quantity,
            });
        }

        let line_total = item
            .price
            .checked_mul(quantity)
            .ok_or(BillingError::AmountOverflow)?;
        let running_total = self
            .running_total
            .checked_add(line_total)
            .ok_or(BillingError::AmountOverflow)?;
        let line = BillLine {
            item_id: id,
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
            line_total,
        };

        let remaining = self.store.stage_stock_delta(id, -i64::from(quantity))?.quantity;

        info!(
            session_id = %self.id,
            item_id = %id,
            quantity,
            line_total = %line_total,
            remaining,
            "bill line added"
        );
        self.running_total = running_total;
        self.lines.push(line);
        let idx = self.lines.len() - 1;
        Ok(&self.lines[idx])
    }

    /// Persist the store and freeze the bill.
    ///
    /// If the save fails the session stays open and finalize may be retried.
    pub fn finalize(&mut self) -> Result<&Bill, BillingError> {
        if self.state == SessionState::Finalized {
            return Err(BillingError::SessionFinalized);
        }

        self.store.save()?;

        let bill = Bill {
            id: BillId::new(),
            issued_at: Utc::now(),
            lines: self.lines.clone(),
            grand_total: self.running_total,
        };
        self.state = SessionState::Finalized;
        info!(
            session_id = %self.id,
            bill_id = %bill.id,
            lines = bill.lines.len(),
            grand_total = %bill.grand_total,
            "bill finalized"
        );
        Ok(self.bill.insert(bill))
    }

    /// Give up on an open bill. Staged stock changes are discarded by
    /// reloading the store, so memory matches what was persisted before the
    /// session. A finalized session has nothing to discard.
    pub fn abandon(self) -> Result<(), BillingError> {
        if self.state == SessionState::Finalized {
            return Ok(());
        }
        info!(session_id = %self.id, lines = self.lines.len(), "billing session abandoned");
        self.store.load()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use proptest::prelude::*;
    use stockbill_inventory::InMemoryStorage;

    type Store = InventoryStore<Rc<InMemoryStorage>>;

    const SEED: &str = "1 Pen 2.0 10\n2 Ink 1.25 4\n3 Pad 3.5 7\n";

    fn seeded() -> (Rc<InMemoryStorage>, Store) {
        let storage = Rc::new(InMemoryStorage::with_contents(SEED));
        let store = InventoryStore::open(Rc::clone(&storage)).unwrap();
        (storage, store)
    }

    fn quantity(store: &Store, id: i64) -> u32 {
        store.lookup(ItemId::new(id)).unwrap().quantity
    }

    #[test]
    fn pen_scenario() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);

        let line = session.add_line(ItemId::new(1), 4).unwrap().clone();
        assert_eq!(line.name, "Pen");
        assert_eq!(line.quantity, 4);
        assert_eq!(line.unit_price, Money::from_major(2));
        assert_eq!(line.line_total, Money::from_major(8));
        assert_eq!(quantity(session.store(), 1), 6);

        let err = session.add_line(ItemId::new(1), 10).unwrap_err();
        match err {
            BillingError::InsufficientStock {
                item_id,
                requested,
                available,
            } => {
                assert_eq!(item_id, ItemId::new(1));
                assert_eq!(requested, 10);
                assert_eq!(available, 6);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(quantity(session.store(), 1), 6);
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn unknown_item_is_rejected_and_session_continues() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);

        let err = session.add_line(ItemId::new(99), 1).unwrap_err();
        assert!(matches!(err, BillingError::ItemNotFound(id) if id == ItemId::new(99)));
        assert!(err.is_recoverable());

        session.add_line(ItemId::new(2), 1).unwrap();
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        assert!(matches!(
            session.add_line(ItemId::new(1), 0),
            Err(BillingError::ZeroQuantity)
        ));
        assert!(session.lines().is_empty());
    }

    #[test]
    fn failed_lines_leave_every_quantity_unchanged() {
        let (_, mut store) = seeded();
        let before = store.list().to_vec();

        {
            let mut session = BillingSession::new(&mut store);
            assert!(session.add_line(ItemId::new(42), 1).is_err());
            assert!(session.add_line(ItemId::new(2), 5).is_err());
            assert!(session.add_line(ItemId::new(3), 0).is_err());
        }

        assert_eq!(store.list(), before.as_slice());
        assert!(!store.is_dirty());
    }

    #[test]
    fn taking_all_stock_is_allowed() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.add_line(ItemId::new(2), 4).unwrap();
        assert_eq!(quantity(session.store(), 2), 0);
        assert!(session.add_line(ItemId::new(2), 1).is_err());
    }

    #[test]
    fn abandoned_session_leaves_storage_untouched() {
        let (storage, mut store) = seeded();
        {
            let mut session = BillingSession::new(&mut store);
            session.add_line(ItemId::new(1), 3).unwrap();
            session.add_line(ItemId::new(3), 2).unwrap();
        }

        assert_eq!(storage.write_count(), 0);
        assert_eq!(storage.contents().as_deref(), Some(SEED));
        assert_eq!(quantity(&store, 1), 7);
        assert!(store.is_dirty());
    }

    #[test]
    fn abandon_discards_staged_decrements() {
        let (storage, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.add_line(ItemId::new(1), 3).unwrap();
        session.abandon().unwrap();

        assert_eq!(quantity(&store, 1), 10);
        assert!(!store.is_dirty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn finalize_persists_once_and_returns_totals() {
        let (storage, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.add_line(ItemId::new(1), 4).unwrap();
        session.add_line(ItemId::new(2), 2).unwrap();
        session.add_line(ItemId::new(1), 1).unwrap();

        let bill = session.finalize().unwrap().clone();
        assert_eq!(bill.lines.len(), 3);
        assert_eq!(bill.grand_total, Money::from_minor(800 + 250 + 200));
        assert_eq!(session.state(), SessionState::Finalized);
        assert_eq!(session.bill(), Some(&bill));

        assert_eq!(storage.write_count(), 1);
        assert_eq!(
            storage.contents().as_deref(),
            Some("1 Pen 2.00 5\n2 Ink 1.25 2\n3 Pad 3.50 7\n")
        );
    }

    #[test]
    fn finalized_session_rejects_further_work() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.finalize().unwrap();

        let err = session.add_line(ItemId::new(1), 1).unwrap_err();
        assert!(matches!(err, BillingError::SessionFinalized));
        assert!(!err.is_recoverable());
        assert!(matches!(session.finalize(), Err(BillingError::SessionFinalized)));
        assert_eq!(quantity(session.store(), 1), 10);
    }

    #[test]
    fn failed_finalize_keeps_session_open_for_retry() {
        let (storage, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.add_line(ItemId::new(3), 2).unwrap();

        storage.set_fail_writes(true);
        let err = session.finalize().unwrap_err();
        assert!(matches!(err, BillingError::Store(_)));
        assert!(session.is_open());

        storage.set_fail_writes(false);
        let bill = session.finalize().unwrap();
        assert_eq!(bill.grand_total, Money::from_major(7));
        assert!(storage.contents().unwrap().contains("3 Pad 3.50 5\n"));
    }

    #[test]
    fn empty_bill_can_be_finalized() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        let bill = session.finalize().unwrap();
        assert!(bill.is_empty());
        assert_eq!(bill.grand_total, Money::ZERO);
    }

    #[test]
    fn bill_serializes_with_lowercase_state_fields() {
        let (_, mut store) = seeded();
        let mut session = BillingSession::new(&mut store);
        session.add_line(ItemId::new(1), 1).unwrap();
        let bill = session.finalize().unwrap();

        let json = serde_json::to_value(bill).unwrap();
        assert_eq!(json["lines"][0]["name"], "Pen");
        assert_eq!(json["grand_total"], 200);
        assert_eq!(serde_json::to_value(SessionState::Finalized).unwrap(), "finalized");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: successful lines reduce stock by exactly their quantities,
        /// rejected lines change nothing, and stock never goes negative.
        #[test]
        fn stock_is_conserved(
            initial in 0u32..200,
            requests in prop::collection::vec(1u32..60, 0..20),
        ) {
            let storage = InMemoryStorage::with_contents(format!("1 Widget 1.50 {initial}\n"));
            let mut store = InventoryStore::open(storage).unwrap();
            let mut session = BillingSession::new(&mut store);

            let mut taken: u32 = 0;
            for qty in requests {
                let available = session.store().lookup(ItemId::new(1)).unwrap().quantity;
                match session.add_line(ItemId::new(1), qty) {
                    Ok(_) => taken += qty,
                    Err(BillingError::InsufficientStock { .. }) => prop_assert!(qty > available),
                    Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                }
                let now = session.store().lookup(ItemId::new(1)).unwrap().quantity;
                prop_assert_eq!(now, initial - taken);
            }
        }

        /// Property: every line total is qty * price and the grand total is
        /// the exact sum of line totals.
        #[test]
        fn bill_arithmetic_is_exact(
            lines in prop::collection::vec((1i64..=3, 1u32..5), 0..15),
        ) {
            let storage = InMemoryStorage::with_contents(
                "1 A 0.10 1000\n2 B 19.99 1000\n3 C 7 1000\n",
            );
            let mut store = InventoryStore::open(storage).unwrap();
            let mut session = BillingSession::new(&mut store);

            for (id, qty) in lines {
                session.add_line(ItemId::new(id), qty).unwrap();
            }
            let bill = session.finalize().unwrap();

            let mut sum = 0u64;
            for line in &bill.lines {
                prop_assert_eq!(
                    line.line_total.minor(),
                    line.unit_price.minor() * u64::from(line.quantity)
                );
                sum += line.line_total.minor();
            }
            prop_assert_eq!(bill.grand_total.minor(), sum);
        }
    }
}
