use async_trait::async_trait;

use crate::inventory::Item;
use crate::query::QuerySpec;

use super::{Cursor, IndexName, IndexStatus, ItemKey, ItemUpdate, Result};

/// One batch returned by a store query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPage {
    /// Items that passed the key and filter conditions, in index order.
    pub items: Vec<Item>,
    /// Number of items in this batch after filtering.
    pub count: usize,
    /// Present when the store stopped before the end of the key range.
    pub next_cursor: Option<Cursor>,
}

/// Record store holding the inventory item collection.
///
/// The table is keyed by (name, category) and carries three secondary indexes,
/// see [`IndexName`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Gets an item by its primary key.
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>>;

    /// Applies a conditional update and returns the item as stored afterwards.
    ///
    /// Creates the item when the key does not exist yet.
    async fn put_conditional(&self, update: &ItemUpdate) -> Result<Item>;

    /// Deletes the item at `key`. Deleting a missing key is not an error.
    async fn delete_by_key(&self, key: &ItemKey) -> Result<()>;

    /// Runs one query call and returns a single batch.
    async fn query(&self, spec: &QuerySpec) -> Result<QueryPage>;

    /// Reports whether a secondary index exists and has finished building.
    async fn describe_index_status(&self, index: IndexName) -> Result<IndexStatus>;
}
