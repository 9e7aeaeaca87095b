use std::io;

use crate::bill::Bill;

/// Receives finalized bills for rendering or export.
///
/// Billing never formats output itself; sinks decide how a bill looks.
pub trait BillSink {
    fn emit(&mut self, bill: &Bill) -> io::Result<()>;
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBillSink {
    bills: Vec<Bill>,
}

impl InMemoryBillSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Bill] {
        &self.bills
    }
}

impl BillSink for InMemoryBillSink {
    fn emit(&mut self, bill: &Bill) -> io::Result<()> {
        self.bills.push(bill.clone());
        Ok(())
    }
}
