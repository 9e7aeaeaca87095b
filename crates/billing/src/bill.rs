use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use stockbill_core::{BillId, ItemId, Money};

/// Format of [`Bill::timestamp_label`]: day-month-year, 24h clock.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One row of a bill, snapshotting the item at the moment it was billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// `quantity * unit_price`.
    pub line_total: Money,
}

/// Finalized bill. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub issued_at: DateTime<Utc>,
    pub lines: Vec<BillLine>,
    pub grand_total: Money,
}

impl Bill {
    /// Issue time in local time, e.g. `16-10-2026 14:03:59`.
    pub fn timestamp_label(&self) -> String {
        self.issued_at
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_label_uses_day_first_format() {
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        let bill = Bill {
            id: BillId::new(),
            issued_at,
            lines: Vec::new(),
            grand_total: Money::ZERO,
        };

        let expected = issued_at.with_timezone(&Local).format("%d-%m-%Y %H:%M:%S").to_string();
        assert_eq!(bill.timestamp_label(), expected);
        assert_eq!(bill.timestamp_label().len(), "05-03-2024 07:08:09".len());
        assert!(bill.is_empty());
    }
}
