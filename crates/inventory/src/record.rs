//! Whitespace-delimited record codec.
//!
//! One item per line, fields `id name price quantity`, no quoting. A name
//! containing whitespace cannot round-trip, which is why the store refuses
//! such names on add/update.

use serde::{Deserialize, Serialize};

use stockbill_core::{DomainError, ItemId, Money};

use crate::item::Item;

const FIELD_COUNT: usize = 4;

/// A line that was dropped during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// 1-based line number in the persisted file.
    pub line: usize,
    pub reason: String,
}

/// Outcome of decoding a whole file: kept items in file order plus skips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub items: Vec<Item>,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse one non-blank line into an item.
///
/// Prices may use any float notation a writer produced (`19.999`, `1e+06`)
/// and are rounded to hundredths. Fails with [`DomainError::MalformedRecord`]
/// on a wrong field count or a non-numeric id/price/quantity.
pub fn parse_record(line_no: usize, line: &str) -> Result<Item, DomainError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return Err(DomainError::malformed(
            line_no,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }

    let id: ItemId = fields[0]
        .parse()
        .map_err(|e: DomainError| DomainError::malformed(line_no, e.to_string()))?;
    let price = Money::parse_rounded(fields[2])
        .map_err(|e| DomainError::malformed(line_no, e.to_string()))?;
    let quantity: u32 = fields[3].parse().map_err(|e| {
        DomainError::malformed(line_no, format!("invalid quantity {:?}: {e}", fields[3]))
    })?;

    Ok(Item::new(id, fields[1], price, quantity))
}

/// Decode a whole file. Blank lines are ignored; malformed lines are
/// collected as skips and never abort the decode.
pub fn decode(contents: &str) -> Decoded {
    let mut decoded = Decoded::default();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(idx + 1, line) {
            Ok(item) => decoded.items.push(item),
            Err(DomainError::MalformedRecord { line, reason }) => {
                decoded.skipped.push(SkippedRecord { line, reason })
            }
            Err(other) => decoded.skipped.push(SkippedRecord {
                line: idx + 1,
                reason: other.to_string(),
            }),
        }
    }

    decoded
}

/// Encode items, one record per line, each line newline-terminated.
pub fn encode(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&item.to_record());
        out.push('\n');
    }
    out
}
