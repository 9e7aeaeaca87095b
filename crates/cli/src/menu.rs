//! Interactive seven-option menu.

use std::io::Write;

use anyhow::Context;
use tracing::{error, warn};

use stockbill_billing::{BillSink, BillingError, BillingSession};
use stockbill_core::DomainError;
use stockbill_inventory::{InventoryStorage, InventoryStore, StoreError};

use crate::input::{InputError, InputSource};
use crate::receipt::{TextReceipt, write_inventory};

/// Menu loop over one store. Ends on "Exit" or when input closes.
pub struct Menu<'a, S, I, W> {
    store: &'a mut InventoryStore<S>,
    input: I,
    out: W,
    currency: String,
}

impl<'a, S, I, W> Menu<'a, S, I, W>
where
    S: InventoryStorage,
    I: InputSource,
    W: Write,
{
    pub fn new(store: &'a mut InventoryStore<S>, input: I, out: W, currency: impl Into<String>) -> Self {
        Self {
            store,
            input,
            out,
            currency: currency.into(),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.print_menu()?;
            let choice = match self.input.prompt_line("Enter your choice: ") {
                Ok(choice) => choice,
                Err(InputError::Closed) => return self.exit(),
                Err(err) => return Err(err).context("failed to read menu choice"),
            };

            let outcome = match choice.trim() {
                "1" => self.add_item(),
                "2" => self.view_items(),
                "3" => self.update_item(),
                "4" => self.delete_item(),
                "5" => self.search_item(),
                "6" => self.generate_bill(),
                "7" => return self.exit(),
                _ => writeln!(self.out, "Invalid option!").map_err(Into::into),
            };

            if let Err(err) = outcome {
                if is_input_closed(&err) {
                    return self.exit();
                }
                error!(error = %format!("{err:#}"), "menu action failed");
                writeln!(self.out, "Error: {err:#}")?;
            }
        }
    }

    fn print_menu(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "\n================= INVENTORY SYSTEM =================")?;
        writeln!(self.out, "1. Add Item")?;
        writeln!(self.out, "2. View Items")?;
        writeln!(self.out, "3. Update Item")?;
        writeln!(self.out, "4. Delete Item")?;
        writeln!(self.out, "5. Search Item")?;
        writeln!(self.out, "6. Generate Bill")?;
        writeln!(self.out, "7. Exit")?;
        Ok(())
    }

    fn exit(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "\nExiting...")?;
        Ok(())
    }

    fn add_item(&mut self) -> anyhow::Result<()> {
        let id = self.input.read_id("\nEnter ID: ")?;
        let name = self.input.read_name("Enter Name: ")?;
        let price = self.input.read_price("Enter Price: ")?;
        let quantity = self.input.read_stock("Enter Quantity: ")?;

        match self.store.add_item(id, name, price, quantity).map(|_| ()) {
            Ok(()) => writeln!(self.out, "\nItem added successfully!")?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn view_items(&mut self) -> anyhow::Result<()> {
        write_inventory(&mut self.out, self.store.list())?;
        Ok(())
    }

    fn update_item(&mut self) -> anyhow::Result<()> {
        let id = self.input.read_id("Enter Item ID to update: ")?;
        if let Err(err) = self.store.lookup(id).map(|_| ()) {
            return self.report(err);
        }

        let name = self.input.read_name("Enter new name: ")?;
        let price = self.input.read_price("Enter new price: ")?;
        let quantity = self.input.read_stock("Enter new quantity: ")?;

        match self.store.update_item(id, name, price, quantity).map(|_| ()) {
            Ok(()) => writeln!(self.out, "Item updated successfully!")?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn delete_item(&mut self) -> anyhow::Result<()> {
        let id = self.input.read_id("Enter ID to delete: ")?;
        match self.store.delete_item(id) {
            Ok(_) => writeln!(self.out, "Item deleted!")?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn search_item(&mut self) -> anyhow::Result<()> {
        let id = self.input.read_id("Enter ID to search: ")?;
        match self.store.lookup(id).map(|item| item.to_string()) {
            Ok(line) => writeln!(self.out, "Item Found:\n{line}")?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn generate_bill(&mut self) -> anyhow::Result<()> {
        let mut session = BillingSession::new(&mut *self.store);

        if let Err(err) = collect_lines(&mut session, &mut self.input, &mut self.out) {
            session.abandon().context("failed to discard abandoned bill")?;
            return Err(err);
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

        let mut receipt = TextReceipt::new(&mut self.out, self.currency.as_str());
        receipt.emit(&bill)?;
        Ok(())
    }

    /// Print a user-facing message for recoverable store errors; pass
    /// storage failures up.
    fn report(&mut self, err: StoreError) -> anyhow::Result<()> {
        match err {
            StoreError::Domain(DomainError::NotFound(_)) => writeln!(self.out, "Item not found!")?,
            StoreError::Domain(DomainError::InsufficientStock { .. }) => {
                writeln!(self.out, "Not enough stock!")?
            }
            StoreError::Domain(other) => writeln!(self.out, "{other}")?,
            StoreError::Storage(storage) => return Err(storage.into()),
        }
        Ok(())
    }
}

fn collect_lines<S, I, W>(
    session: &mut BillingSession<'_, S>,
    input: &mut I,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: InventoryStorage,
    I: InputSource,
    W: Write,
{
    loop {
        let id = input.read_id("\nEnter Item ID: ")?;
        if session.store().lookup(id).is_err() {
            writeln!(out, "Item not found!")?;
        } else {
            let quantity = input.read_quantity("Enter quantity: ")?;
            match session.add_line(id, quantity) {
                Ok(_) => {}
                Err(BillingError::InsufficientStock { .. }) => writeln!(out, "Not enough stock!")?,
                Err(err) if err.is_recoverable() => writeln!(out, "{err}")?,
                Err(err) => return Err(err.into()),
            }
        }

        if !input.confirm("Add another item? (y/n): ")? {
            return Ok(());
        }
    }
}

fn is_input_closed(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<InputError>(), Some(InputError::Closed))
}
