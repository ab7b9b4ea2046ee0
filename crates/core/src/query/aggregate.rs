//! Category aggregator: price totals and item counts per category.

use futures_util::future::try_join_all;
use tracing::debug;

use crate::inventory::{drop_empty, summarize, AggregateResult, CategorySet};
use crate::storage::{RecordStore, RepositoryError};

use super::pagination::collect_all;
use super::plan::plan_category_scan;

/// Aggregates one category spelling. A category with no items yields a zero result.
pub async fn aggregate_category(
    store: &dyn RecordStore,
    category: &str,
) -> Result<AggregateResult, RepositoryError> {
    let items = collect_all(store, plan_category_scan(category)).await?;
    let result = summarize(category, &items);
    debug!(
        category,
        count = result.count,
        total_price = %result.total_price,
        "Aggregated category"
    );
    Ok(result)
}

/// Aggregates every spelling of every configured category.
///
/// Categories are queried concurrently; the first failure fails the whole call.
/// Results follow the category order and categories without items are dropped.
pub async fn aggregate_all(
    store: &dyn RecordStore,
    categories: &CategorySet,
) -> Result<Vec<AggregateResult>, RepositoryError> {
    let spellings = categories.spellings();
    let results = try_join_all(
        spellings
            .iter()
            .map(|category| aggregate_category(store, category)),
    )
    .await?;
    Ok(drop_empty(results))
}
