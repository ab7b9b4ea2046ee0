use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::{repository_error_to_status_code, DateRangeError, RepositoryError};

/// Client input errors. Raised before any store access.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Missing or invalid category")]
    InvalidCategory,
    #[error("Missing required query parameters 'dt_from' or 'dt_to'")]
    MissingDateRange,
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error(transparent)]
    InvalidDateRange(#[from] DateRangeError),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid price range: minimum {min} is greater than maximum {max}")]
    InvalidPriceRange { min: Decimal, max: Decimal },
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

/// Errors surfaced by inventory operations.
///
/// Every operation completes with a payload or exactly one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InventoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] RepositoryError),
    #[error("{name} of {category} category not found")]
    NotFound { name: String, category: String },
    #[error("Page {page} not found: the query produced {pages} page(s)")]
    PageNotFound { page: u32, pages: usize },
    #[error("Index {index} not ready after {attempts} attempts")]
    IndexNotReady { index: &'static str, attempts: u32 },
}

/// Maps an [`InventoryError`] to an HTTP status code.
///
/// - `Validation` -> 400 (Bad Request)
/// - `NotFound`, `PageNotFound` -> 404 (Not Found)
/// - `IndexNotReady` -> 503 (Service Unavailable)
/// - `Store` -> see [`repository_error_to_status_code`]
pub fn inventory_error_to_status_code(error: &InventoryError) -> u16 {
    match error {
        InventoryError::Validation(_) => 400,
        InventoryError::NotFound { .. } => 404,
        InventoryError::PageNotFound { .. } => 404,
        InventoryError::IndexNotReady { .. } => 503,
        InventoryError::Store(store_error) => repository_error_to_status_code(store_error),
    }
}
