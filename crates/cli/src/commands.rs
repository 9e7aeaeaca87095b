//! One-shot subcommands.

use std::io::Write;

use anyhow::{Context, bail};
use tracing::warn;

use stockbill_billing::{BillSink, BillingSession};
use stockbill_core::{ItemId, Money};
use stockbill_inventory::{InventoryStorage, InventoryStore};

use crate::config::LineSpec;
use crate::receipt::{JsonReceipt, TextReceipt, write_inventory};

pub fn list<S: InventoryStorage, W: Write>(store: &InventoryStore<S>, out: &mut W) -> anyhow::Result<()> {
    write_inventory(out, store.list())?;
    Ok(())
}

pub fn show<S: InventoryStorage, W: Write>(
    store: &InventoryStore<S>,
    id: ItemId,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = store.lookup(id)?;
    writeln!(out, "{item}")?;
    Ok(())
}

pub fn add<S: InventoryStorage, W: Write>(
    store: &mut InventoryStore<S>,
    id: ItemId,
    name: String,
    price: Money,
    quantity: u32,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = store.add_item(id, name, price, quantity)?;
    writeln!(out, "added {}", item.to_record())?;
    Ok(())
}

pub fn update<S: InventoryStorage, W: Write>(
    store: &mut InventoryStore<S>,
    id: ItemId,
    name: String,
    price: Money,
    quantity: u32,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = store.update_item(id, name, price, quantity)?;
    writeln!(out, "updated {}", item.to_record())?;
    Ok(())
}

pub fn delete<S: InventoryStorage, W: Write>(
    store: &mut InventoryStore<S>,
    id: ItemId,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = store.delete_item(id)?;
    writeln!(out, "deleted {}", item.to_record())?;
    Ok(())
}

pub fn restock<S: InventoryStorage, W: Write>(
    store: &mut InventoryStore<S>,
    id: ItemId,
    delta: i64,
    out: &mut W,
) -> anyhow::Result<()> {
    let item = store.apply_stock_delta(id, delta)?;
    writeln!(out, "{} now has {} in stock", item.id, item.quantity)?;
    Ok(())
}

/// Bill every line in order. Rejected lines are logged and skipped; the
/// rest are finalized into one bill.
pub fn bill<S: InventoryStorage, W: Write>(
    store: &mut InventoryStore<S>,
    lines: &[LineSpec],
    json: bool,
    currency: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut session = BillingSession::new(store);
    let mut rejected = 0usize;

    for spec in lines {
        match session.add_line(spec.id, spec.quantity) {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                warn!(item_id = %spec.id, quantity = spec.quantity, error = %err, "line skipped");
                if !json {
                    writeln!(out, "skipped {}:{}: {err}", spec.id, spec.quantity)?;
                }
                rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if session.lines().is_empty() {
        session.abandon()?;
        bail!("no billable lines ({rejected} rejected)");
    }

    let bill = match session.finalize().map(|bill| bill.clone()) {
        Ok(bill) => bill,
        Err(err) => {
            if let Err(discard) = session.abandon() {
                warn!(error = %discard, "could not discard unsaved bill");
            }
            return Err(err).context("failed to save stock after billing");
        }
    };

    if json {
        JsonReceipt::new(&mut *out).emit(&bill)?;
    } else {
        TextReceipt::new(&mut *out, currency).emit(&bill)?;
    }
    Ok(())
}
