//! Rendering of inventory listings and finalized bills.

use std::io::{self, Write};

use stockbill_billing::{Bill, BillSink};
use stockbill_inventory::Item;

const RULE: &str = "--------------------------------------------";

/// Column table of items, in the order given.
pub fn write_inventory<W: Write>(out: &mut W, items: &[Item]) -> io::Result<()> {
    writeln!(out, "\n------------------ Inventory Items ------------------")?;
    writeln!(out, "{:<5}{:<20}{:<10}{:<10}", "ID", "Name", "Price", "Qty")?;
    writeln!(out, "-----------------------------------------------------")?;
    if items.is_empty() {
        writeln!(out, "(no items)")?;
    }
    for item in items {
        writeln!(out, "{item}")?;
    }
    Ok(())
}

/// Plain-text receipt with a timestamp and grand total.
#[derive(Debug)]
pub struct TextReceipt<W> {
    out: W,
    currency: String,
}

impl<W: Write> TextReceipt<W> {
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out,
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BillSink for TextReceipt<W> {
    fn emit(&mut self, bill: &Bill) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "\n=================== BILL ===================")?;
        writeln!(out, "Date/Time: {}", bill.timestamp_label())?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "{:<20}{:<10}{:<10}{:<10}", "Item", "Qty", "Price", "Total")?;
        writeln!(out, "{RULE}")?;
        for line in &bill.lines {
            writeln!(
                out,
                "{:<20}{:<10}{:<10}{:<10}",
                line.name, line.quantity, line.unit_price, line.line_total
            )?;
        }
        writeln!(out, "{RULE}")?;
        writeln!(out, "Grand Total: {} {}", self.currency, bill.grand_total)?;
        writeln!(out, "============================================")?;
        out.flush()
    }
}

/// One JSON document per bill, newline-terminated.
#[derive(Debug)]
pub struct JsonReceipt<W> {
    out: W,
}

impl<W: Write> JsonReceipt<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BillSink for JsonReceipt<W> {
    fn emit(&mut self, bill: &Bill) -> io::Result<()> {
        let lines: Vec<serde_json::Value> = bill
            .lines
            .iter()
            .map(|l| {
                serde_json::json!({
                    "item_id": l.item_id,
                    "name": l.name,
                    "quantity": l.quantity,
                    "unit_price": l.unit_price.to_string(),
                    "line_total": l.line_total.to_string(),
                })
            })
            .collect();
        let doc = serde_json::json!({
            "id": bill.id,
            "issued_at": bill.issued_at,
            "timestamp": bill.timestamp_label(),
            "lines": lines,
            "grand_total": bill.grand_total.to_string(),
        });
        serde_json::to_writer(&mut self.out, &doc)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbill_billing::BillLine;
    use stockbill_core::{BillId, ItemId, Money};

    fn sample_bill() -> Bill {
        Bill {
            id: BillId::new(),
            issued_at: "2024-03-05T07:08:09Z".parse().unwrap(),
            lines: vec![BillLine {
                item_id: ItemId::new(1),
                name: "Pen".to_string(),
                quantity: 4,
                unit_price: Money::from_major(2),
                line_total: Money::from_major(8),
            }],
            grand_total: Money::from_major(8),
        }
    }

    #[test]
    fn text_receipt_lists_lines_and_total() {
        let mut sink = TextReceipt::new(Vec::new(), "Rs.");
        sink.emit(&sample_bill()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert!(text.contains("Date/Time: "));
        assert!(text.contains(&format!("{:<20}{:<10}{:<10}{:<10}", "Pen", 4, "2.00", "8.00")));
        assert!(text.contains("Grand Total: Rs. 8.00"));
    }

    #[test]
    fn json_receipt_uses_decimal_strings() {
        let mut sink = JsonReceipt::new(Vec::new());
        sink.emit(&sample_bill()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let doc: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(doc["grand_total"], "8.00");
        assert_eq!(doc["lines"][0]["item_id"], 1);
        assert_eq!(doc["lines"][0]["unit_price"], "2.00");
        assert_eq!(doc["issued_at"], "2024-03-05T07:08:09Z");
    }

    #[test]
    fn inventory_table_has_header_and_rows() {
        let items = vec![Item::new(ItemId::new(1), "Pen", Money::from_major(2), 10)];
        let mut out = Vec::new();
        write_inventory(&mut out, &items).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Inventory Items"));
        assert!(text.contains(&items[0].to_string()));
    }
}
