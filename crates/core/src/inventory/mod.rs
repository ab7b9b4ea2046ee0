mod category;
mod error;
mod operations;
mod requests;
mod service;
mod timestamp;
mod types;

pub use category::{
    CategoryError, CategoryScope, CategorySet, ALL_CATEGORY_SPELLINGS, DEFAULT_CATEGORIES,
};
pub use error::{inventory_error_to_status_code, InventoryError, ValidationError};
pub use operations::{
    build_upsert, delete_message, drop_empty, summarize, summarize_date_range, total_price,
    validate_price,
};
pub use requests::{
    AggregateQuery, DateRangeQuery, ItemKeyRequest, PaginationRequest, QueryFiltersRequest,
    QueryParams, QueryRequest, UpsertItem, UpsertItemRequest,
};
pub use service::InventoryService;
pub use timestamp::{
    format_timestamp, parse_request_timestamp, parse_stored_timestamp, CANONICAL_TIMESTAMP_FORMAT,
};
pub use types::{AggregateResult, DateRangeSummary, Item, ItemSummary};
