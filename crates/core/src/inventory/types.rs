use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::ItemKey;

/// An inventory item as stored.
///
/// `(name, category)` is the identity; `id` is assigned on first write and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "last_updated_dt")]
    pub last_updated_at: NaiveDateTime,
}

impl Item {
    /// Returns the primary key of this item.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.name.clone(), self.category.clone())
    }

    /// Returns the public view of this item, without storage bookkeeping.
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            price: self.price,
        }
    }
}

/// Public view of an item returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Sum and count of the items of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub count: usize,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Items within a date range plus the sum of their prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeSummary {
    pub items: Vec<ItemSummary>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}
