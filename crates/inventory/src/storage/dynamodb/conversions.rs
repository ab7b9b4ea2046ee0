//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::{AttributeValue, IndexStatus as GsiStatus, TableDescription};
use inventory_core::inventory::{parse_stored_timestamp, Item};
use inventory_core::serde::parse_decimal;
use inventory_core::storage::{
    Attr, Cursor, IndexName, IndexStatus, ItemKey, RepositoryError, Scalar,
};
use rust_decimal::Decimal;

// ============================================================================
// Scalar conversions
// ============================================================================

/// Convert a scalar to a DynamoDB attribute value.
pub fn scalar_to_attribute(value: &Scalar) -> AttributeValue {
    match value {
        Scalar::S(s) => AttributeValue::S(s.clone()),
        Scalar::N(n) => AttributeValue::N(n.to_string()),
    }
}

/// Convert a DynamoDB attribute value to a scalar.
///
/// `N` strings are parsed straight into decimals. Returns None for attribute types
/// the item collection never stores.
pub fn attribute_to_scalar(value: &AttributeValue) -> Option<Scalar> {
    match value {
        AttributeValue::S(s) => Some(Scalar::S(s.clone())),
        AttributeValue::N(n) => parse_decimal(n).map(Scalar::N),
        _ => None,
    }
}

// ============================================================================
// Key conversions
// ============================================================================

/// Convert an item key to the primary key attribute map.
pub fn key_to_attributes(key: &ItemKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            Attr::Name.as_str().to_string(),
            AttributeValue::S(key.name.clone()),
        ),
        (
            Attr::Category.as_str().to_string(),
            AttributeValue::S(key.category.clone()),
        ),
    ])
}

/// Convert a continuation cursor to an `ExclusiveStartKey`.
pub fn cursor_to_key(cursor: &Cursor) -> HashMap<String, AttributeValue> {
    cursor
        .attributes()
        .iter()
        .map(|(name, value)| (name.clone(), scalar_to_attribute(value)))
        .collect()
}

/// Convert a `LastEvaluatedKey` to a continuation cursor.
pub fn key_to_cursor(key: &HashMap<String, AttributeValue>) -> Result<Cursor, RepositoryError> {
    let attributes = key
        .iter()
        .map(|(name, value)| {
            attribute_to_scalar(value)
                .map(|scalar| (name.clone(), scalar))
                .ok_or_else(|| {
                    RepositoryError::InvalidData(format!("Unsupported key attribute: {}", name))
                })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(Cursor::new(attributes))
}

// ============================================================================
// Item conversions
// ============================================================================

/// Convert a DynamoDB item to Item.
pub fn item_to_domain(item: &HashMap<String, AttributeValue>) -> Result<Item, RepositoryError> {
    let timestamp = get_string(item, Attr::LastUpdatedAt.as_str())?;
    let last_updated_at = parse_stored_timestamp(&timestamp).ok_or_else(|| {
        RepositoryError::InvalidData(format!("Invalid datetime last_updated_dt: {}", timestamp))
    })?;

    Ok(Item {
        id: get_string(item, Attr::Id.as_str())?,
        name: get_string(item, Attr::Name.as_str())?,
        category: get_string(item, Attr::Category.as_str())?,
        price: get_number(item, Attr::Price.as_str())?,
        last_updated_at,
    })
}

// ============================================================================
// Table description conversions
// ============================================================================

/// Readiness of `index` in a `DescribeTable` response.
///
/// An index is only usable once it reports `ACTIVE` and has finished backfilling.
pub fn index_status(table: Option<&TableDescription>, index: IndexName) -> IndexStatus {
    let description = table.and_then(|table| {
        table
            .global_secondary_indexes()
            .iter()
            .find(|gsi| gsi.index_name() == Some(index.as_str()))
    });

    match description {
        None => IndexStatus::Missing,
        Some(gsi) => {
            let active = gsi.index_status() == Some(&GsiStatus::Active);
            let backfilling = gsi.backfilling().unwrap_or(false);
            if active && !backfilling {
                IndexStatus::Active
            } else {
                IndexStatus::Building
            }
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required number attribute.
fn get_number(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Decimal, RepositoryError> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))?;
    parse_decimal(raw)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid number {}: {}", key, raw)))
}
