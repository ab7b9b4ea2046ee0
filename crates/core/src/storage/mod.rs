mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{QueryPage, RecordStore};
pub use types::{
    key_schema, Attr, Cursor, DateRange, IndexName, IndexStatus, ItemKey, ItemUpdate, Projection,
    Scalar, STATIC_PARTITION_KEY,
};
