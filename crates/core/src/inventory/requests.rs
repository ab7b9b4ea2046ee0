//! API request types for inventory operations.
//!
//! Raw request bodies and query strings deserialize into these types with every
//! field optional. `validate`/`normalize` turn them into typed values, reporting
//! missing or invalid fields as [`ValidationError`]s before any store access.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::{Pagination, PriceRange, QueryFilters, SortOrder, SortRequest};
use crate::serde::{
    deserialize_optional_number, deserialize_optional_number_list, deserialize_optional_string,
};
use crate::storage::{DateRange, ItemKey};

use super::operations::validate_price;
use super::timestamp::parse_request_timestamp;
use super::ValidationError;

fn require_key(
    name: Option<String>,
    category: Option<String>,
    missing: &mut Vec<&'static str>,
) -> Option<ItemKey> {
    if name.is_none() {
        missing.push("name");
    }
    if category.is_none() {
        missing.push("category");
    }
    Some(ItemKey::new(name?, category?))
}

/// Request payload for creating or updating an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertItemRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub price: Option<Decimal>,
}

/// A validated upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertItem {
    pub key: ItemKey,
    pub price: Decimal,
}

impl UpsertItemRequest {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            price: Some(price),
        }
    }

    pub fn validate(self) -> Result<UpsertItem, ValidationError> {
        let mut missing = Vec::new();
        let key = require_key(self.name, self.category, &mut missing);
        if self.price.is_none() {
            missing.push("price");
        }

        match (key, self.price) {
            (Some(key), Some(price)) => Ok(UpsertItem {
                key,
                price: validate_price(price)?,
            }),
            _ => Err(ValidationError::MissingFields(missing)),
        }
    }
}

/// Request payload or query string addressing one item by its key.
///
/// Used by delete and get.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemKeyRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
}

impl ItemKeyRequest {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
        }
    }

    pub fn validate(self) -> Result<ItemKey, ValidationError> {
        let mut missing = Vec::new();
        let key = require_key(self.name, self.category, &mut missing);
        key.ok_or(ValidationError::MissingFields(missing))
    }
}

/// Filters of a query request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryFiltersRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    /// `[min, max]`. Anything without both bounds is ignored.
    #[serde(
        default,
        alias = "priceRange",
        deserialize_with = "deserialize_optional_number_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_range: Option<Vec<Option<Decimal>>>,
}

/// Pagination of a query request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Request payload for the query operation. Every part is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<QueryFiltersRequest>,
    /// `{field, order}`. Kept untyped so that malformed values are ignored instead of rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationRequest>,
}

/// A normalised query request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub filters: QueryFilters,
    pub sort: Option<SortRequest>,
    pub pagination: Pagination,
}

fn price_range(
    bounds: Option<Vec<Option<Decimal>>>,
) -> Result<Option<PriceRange>, ValidationError> {
    match bounds.as_deref() {
        Some([Some(min), Some(max), ..]) => PriceRange::new(*min, *max).map(Some),
        _ => Ok(None),
    }
}

fn sort_request(sort: Option<&Value>) -> Option<SortRequest> {
    let sort = sort?;
    let field = sort.get("field")?.as_str()?;
    let order = match sort.get("order")?.as_str()? {
        o if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        o if o.eq_ignore_ascii_case("asc") => SortOrder::Asc,
        _ => return None,
    };
    Some(SortRequest::new(field, order))
}

impl QueryRequest {
    pub fn normalize(self) -> Result<QueryParams, ValidationError> {
        let filters = self.filters.unwrap_or_default();
        let pagination = self.pagination.unwrap_or_default();

        Ok(QueryParams {
            filters: QueryFilters {
                name: filters.name,
                category: filters.category,
                price_range: price_range(filters.price_range)?,
            },
            sort: sort_request(self.sort.as_ref()),
            pagination: Pagination::new(pagination.limit, pagination.page)?,
        })
    }
}

/// Query string of the date range filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub dt_from: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub dt_to: Option<String>,
}

impl DateRangeQuery {
    pub fn new(dt_from: impl Into<String>, dt_to: impl Into<String>) -> Self {
        Self {
            dt_from: Some(dt_from.into()),
            dt_to: Some(dt_to.into()),
        }
    }

    pub fn validate(&self) -> Result<DateRange, ValidationError> {
        let (Some(dt_from), Some(dt_to)) = (&self.dt_from, &self.dt_to) else {
            return Err(ValidationError::MissingDateRange);
        };
        let start = parse_request_timestamp(dt_from)?;
        let end = parse_request_timestamp(dt_to)?;
        Ok(DateRange::new(start, end)?)
    }
}

/// Query string of the aggregation operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
}
