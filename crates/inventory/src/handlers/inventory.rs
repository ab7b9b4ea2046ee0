//! Inventory handlers.
//!
//! Thin adapters from HTTP to [`InventoryService`]. Bodies are parsed by hand so
//! malformed JSON is reported as a validation error (400) instead of axum's 422.
//!
//! [`InventoryService`]: inventory_core::inventory::InventoryService

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use inventory_core::inventory::{
    AggregateQuery, DateRangeQuery, DateRangeSummary, Item, ItemKeyRequest, QueryRequest,
    UpsertItemRequest, ValidationError,
};
use inventory_core::query::QueryOutcome;

use crate::{handlers::AppError, state::AppState};

/// Parses a JSON body. An empty body is read as `{}`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedRequest(e.to_string()))
}

fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ValidationError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ValidationError::MalformedRequest(e.body_text()))
}

/// Create or update an item (POST /api/inventories).
pub async fn upsert_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request: UpsertItemRequest = parse_body(&body)?;
    let item = state.inventory.upsert_item(request).await?;

    Ok(Json(json!({ "id": item.id })))
}

/// Delete an item (DELETE /api/inventories).
pub async fn delete_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request: ItemKeyRequest = parse_body(&body)?;
    let message = state.inventory.delete_item(request).await?;

    Ok(Json(json!({ "message": message })))
}

/// Get a single item (GET /api/inventories/item?name=&category=).
pub async fn get_item(
    State(state): State<AppState>,
    query: Result<Query<ItemKeyRequest>, QueryRejection>,
) -> Result<Json<Item>, AppError> {
    let request = parse_query(query)?;
    let item = state.inventory.get_item(request).await?;

    Ok(Json(item))
}

/// Filtered, sorted and optionally paged listing (POST /api/inventories/query).
pub async fn query_inventory(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryOutcome>, AppError> {
    let request: QueryRequest = parse_body(&body)?;
    let outcome = state.inventory.query_inventory(request).await?;

    Ok(Json(outcome))
}

/// Items last updated within a date range (GET /api/inventories/filter?dt_from=&dt_to=).
pub async fn filter_by_date_range(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<DateRangeSummary>, AppError> {
    let query = parse_query(query)?;
    let summary = state.inventory.filter_by_date_range(&query).await?;

    Ok(Json(summary))
}

/// Per-category price totals (GET /api/inventories/aggregate?category=).
pub async fn aggregate(
    State(state): State<AppState>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let query = parse_query(query)?;
    let results = state.inventory.aggregate(&query).await?;

    Ok(Json(json!({ "items": results })))
}
