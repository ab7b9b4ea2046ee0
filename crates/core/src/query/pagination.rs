//! Pagination driver.
//!
//! The store cursor is opaque, so every execution walks pages sequentially from
//! the first one until the store stops returning a continuation cursor. There is
//! no skip-ahead: requesting page `k` costs `k` or more store calls.

use serde::Serialize;
use tracing::debug;

use crate::inventory::{InventoryError, Item, ItemSummary};
use crate::storage::{QueryPage, RecordStore, RepositoryError};

use super::plan::DEFAULT_PAGE_SIZE;
use super::spec::QuerySpec;

/// Whether the caller wants every item or a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Full,
    /// 1-based page number.
    Page(u32),
}

/// One page as produced by one store call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub items: Vec<ItemSummary>,
    pub count: usize,
    pub page: u32,
    pub limit: u32,
}

/// Result of a query: a flat listing or a single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Listing(Vec<ItemSummary>),
    Page(PageRecord),
}

impl QueryOutcome {
    pub fn len(&self) -> usize {
        match self {
            QueryOutcome::Listing(items) => items.len(),
            QueryOutcome::Page(record) => record.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issues `spec` repeatedly, advancing the start cursor, until the store reports
/// no continuation. Returns every batch in order.
pub async fn walk_pages(
    store: &dyn RecordStore,
    mut spec: QuerySpec,
) -> Result<Vec<QueryPage>, RepositoryError> {
    let mut pages = Vec::new();

    loop {
        let mut batch = store.query(&spec).await?;
        let next_cursor = batch.next_cursor.take();
        debug!(
            page = pages.len() + 1,
            count = batch.count,
            more = next_cursor.is_some(),
            "Fetched query batch"
        );
        pages.push(batch);

        match next_cursor {
            Some(cursor) => spec.start_cursor = Some(cursor),
            None => break,
        }
    }

    Ok(pages)
}

/// Walks every page of `spec` and returns all items in index order.
pub async fn collect_all(store: &dyn RecordStore, spec: QuerySpec) -> Result<Vec<Item>, RepositoryError> {
    let pages = walk_pages(store, spec).await?;
    Ok(pages.into_iter().flat_map(|page| page.items).collect())
}

fn page_records(pages: Vec<QueryPage>, limit: u32) -> Vec<PageRecord> {
    pages
        .into_iter()
        .zip(1u32..)
        .map(|(batch, page)| PageRecord {
            items: batch.items.iter().map(Item::summary).collect(),
            count: batch.count,
            page,
            limit,
        })
        .collect()
}

/// Executes a planned query in the requested mode.
///
/// In page mode a page number beyond the last page is a
/// [`InventoryError::PageNotFound`], distinct from a reached page holding no items.
pub async fn execute(
    store: &dyn RecordStore,
    spec: QuerySpec,
    mode: FetchMode,
) -> Result<QueryOutcome, InventoryError> {
    let limit = spec.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let pages = walk_pages(store, spec).await?;

    match mode {
        FetchMode::Full => Ok(QueryOutcome::Listing(
            pages
                .iter()
                .flat_map(|page| page.items.iter().map(Item::summary))
                .collect(),
        )),
        FetchMode::Page(requested) => {
            let records = page_records(pages, limit);
            let total = records.len();
            records
                .into_iter()
                .find(|record| record.page == requested)
                .map(QueryOutcome::Page)
                .ok_or(InventoryError::PageNotFound {
                    page: requested,
                    pages: total,
                })
        }
    }
}
