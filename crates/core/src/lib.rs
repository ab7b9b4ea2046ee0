//! Functional core of the inventory service.
//!
//! Pure data types, the query planner and request validation live here, together
//! with the async orchestration that drives a [`storage::RecordStore`]. Storage
//! backends and the HTTP surface live in the `inventory` crate.

pub mod inventory;
pub mod query;
pub mod serde;
pub mod storage;

#[cfg(test)]
mod testing;
