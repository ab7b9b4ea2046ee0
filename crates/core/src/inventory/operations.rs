//! Pure inventory operations.
//!
//! Following the Functional Core pattern, nothing here performs I/O. The service
//! layer feeds these functions the current time, fresh ids and store results.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::storage::{Attr, ItemKey, ItemUpdate, Scalar, STATIC_PARTITION_KEY};

use super::timestamp::format_timestamp;
use super::types::{AggregateResult, DateRangeSummary, Item};
use super::ValidationError;

/// Rejects negative prices.
pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price < Decimal::ZERO {
        return Err(ValidationError::InvalidPrice(format!(
            "price must not be negative, got {price}"
        )));
    }
    Ok(price)
}

/// Builds the conditional write for an upsert.
///
/// `price` and `last_updated_dt` are overwritten on every write. `static_pk` and
/// `id` are only written when absent, so an existing item keeps its id.
pub fn build_upsert(
    key: ItemKey,
    price: Decimal,
    now: NaiveDateTime,
    new_id: &str,
) -> ItemUpdate {
    ItemUpdate {
        key,
        set: vec![
            (Attr::Price, Scalar::N(price)),
            (Attr::LastUpdatedAt, Scalar::S(format_timestamp(&now))),
        ],
        set_if_absent: vec![
            (Attr::StaticPk, Scalar::S(STATIC_PARTITION_KEY.to_string())),
            (Attr::Id, Scalar::S(new_id.to_string())),
        ],
    }
}

/// Confirmation returned after a delete.
pub fn delete_message(key: &ItemKey) -> String {
    format!(
        "{} of {} category was deleted successfully",
        key.name, key.category
    )
}

/// Exact decimal sum of the item prices.
pub fn total_price(items: &[Item]) -> Decimal {
    items.iter().map(|item| item.price).sum()
}

/// Sums and counts the items of one category.
pub fn summarize(category: &str, items: &[Item]) -> AggregateResult {
    AggregateResult {
        category: category.to_string(),
        total_price: total_price(items),
        count: items.len(),
    }
}

/// Removes categories without items, keeping order.
pub fn drop_empty(results: Vec<AggregateResult>) -> Vec<AggregateResult> {
    results
        .into_iter()
        .filter(|result| !result.is_empty())
        .collect()
}

/// Strips storage bookkeeping from date range results and totals their prices.
pub fn summarize_date_range(items: &[Item]) -> DateRangeSummary {
    DateRangeSummary {
        items: items.iter().map(Item::summary).collect(),
        total_price: total_price(items),
    }
}
