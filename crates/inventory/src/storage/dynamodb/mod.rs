//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of [`RecordStore`]
//! using `aws-sdk-dynamodb`. Expressions and attribute conversions are pure
//! functions so they can be tested without DynamoDB access.
//!
//! [`RecordStore`]: inventory_core::storage::RecordStore

mod conversions;
mod error;
mod expressions;
mod store;

pub use store::DynamoDbStore;
