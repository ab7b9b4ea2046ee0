//! In-memory storage backend.
//!
//! Stores every item as an attribute map in a HashMap wrapped in
//! `Arc<RwLock<_>>` and evaluates queries with the same semantics as the
//! managed store, so handlers and tests behave identically on both backends.
//!
//! # Example
//!
//! ```rust,ignore
//! use inventory::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Use store for testing...
//! ```

mod store;

pub use store::InMemoryStore;
