use serde::{Deserialize, Serialize};

use stockbill_core::{Entity, ItemId, Money};

/// A single inventory record.
///
/// Plain value holder: no validation happens here. The store checks shape
/// when materialising items from text and validates names on add/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Unit price.
    pub price: Money,
    pub quantity: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Persisted projection: `id name price quantity`.
    pub fn to_record(&self) -> String {
        format!("{} {} {} {}", self.id, self.name, self.price, self.quantity)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Column layout used for listings: id, name, price, quantity.
impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:<5}{:<20}{:<10}{:<10}",
            self.id.get(),
            self.name,
            self.price,
            self.quantity
        )
    }
}
