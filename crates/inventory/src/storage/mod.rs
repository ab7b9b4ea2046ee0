//! Storage backend implementations.
//!
//! This module provides concrete implementations of the [`RecordStore`] trait
//! defined in `inventory_core::storage`. The implementation is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-memory backend for development and testing
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory store (default):
//! ```bash
//! cargo build -p inventory
//! ```
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p inventory --no-default-features --features dynamodb
//! ```
//!
//! [`RecordStore`]: inventory_core::storage::RecordStore

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
