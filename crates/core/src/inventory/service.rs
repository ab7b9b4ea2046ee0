//! Inventory operations bound to a record store.
//!
//! The service owns its store handle, the configured category set and the index
//! readiness gate. It is built once at startup and shared behind an `Arc`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::query::{
    aggregate_all, aggregate_category, collect_all, execute, plan, plan_recency_range,
    FetchMode, IndexReadiness, QueryOutcome, ReadinessPolicy,
};
use crate::storage::{IndexName, RecordStore};

use super::category::{CategoryScope, CategorySet};
use super::operations::{build_upsert, delete_message, summarize_date_range};
use super::requests::{AggregateQuery, DateRangeQuery, ItemKeyRequest, QueryRequest, UpsertItemRequest};
use super::types::{AggregateResult, DateRangeSummary, Item};
use super::InventoryError;

pub struct InventoryService {
    store: Arc<dyn RecordStore>,
    categories: CategorySet,
    readiness: IndexReadiness,
}

impl InventoryService {
    pub fn new(store: Arc<dyn RecordStore>, categories: CategorySet, policy: ReadinessPolicy) -> Self {
        Self {
            store,
            categories,
            readiness: IndexReadiness::new(policy),
        }
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn readiness(&self) -> &IndexReadiness {
        &self.readiness
    }

    async fn ensure_index(&self, index: Option<IndexName>) -> Result<(), InventoryError> {
        match index {
            Some(index) => self.readiness.ensure(self.store.as_ref(), index).await,
            None => Ok(()),
        }
    }

    /// Creates or updates the item at `(name, category)` and returns it as stored.
    ///
    /// The id is assigned on first write and kept by every later write.
    pub async fn upsert_item(&self, request: UpsertItemRequest) -> Result<Item, InventoryError> {
        debug!(?request, "Received upsert");
        let upsert = request.validate()?;

        let now = Utc::now().naive_utc();
        let new_id = Uuid::new_v4().to_string();
        let update = build_upsert(upsert.key, upsert.price, now, &new_id);

        let item = self.store.put_conditional(&update).await?;
        info!(
            id = %item.id,
            name = %item.name,
            category = %item.category,
            created = (item.id == new_id),
            "Upserted item"
        );
        Ok(item)
    }

    /// Deletes the item at `(name, category)`. A missing item is not an error.
    pub async fn delete_item(&self, request: ItemKeyRequest) -> Result<String, InventoryError> {
        debug!(?request, "Received delete");
        let key = request.validate()?;

        self.store.delete_by_key(&key).await?;
        info!(name = %key.name, category = %key.category, "Deleted item");
        Ok(delete_message(&key))
    }

    pub async fn get_item(&self, request: ItemKeyRequest) -> Result<Item, InventoryError> {
        let key = request.validate()?;

        self.store
            .get(&key)
            .await?
            .ok_or(InventoryError::NotFound {
                name: key.name,
                category: key.category,
            })
    }

    /// Plans and executes a query. Returns a flat listing unless a page was requested.
    pub async fn query_inventory(&self, request: QueryRequest) -> Result<QueryOutcome, InventoryError> {
        debug!(?request, "Received query");
        let params = request.normalize()?;

        let spec = plan(&params.filters, params.sort.as_ref(), &params.pagination);
        debug!(?spec, "Planned query");
        self.ensure_index(spec.index).await?;

        let mode = match params.pagination.page {
            Some(page) => FetchMode::Page(page),
            None => FetchMode::Full,
        };
        let outcome = execute(self.store.as_ref(), spec, mode).await?;
        info!(items = outcome.len(), ?mode, "Query completed");
        Ok(outcome)
    }

    /// Lists items last updated within `[dt_from, dt_to]` with their total price.
    pub async fn filter_by_date_range(
        &self,
        query: &DateRangeQuery,
    ) -> Result<DateRangeSummary, InventoryError> {
        debug!(?query, "Received date range filter");
        let range = query.validate()?;

        self.ensure_index(Some(IndexName::ItemsLastUpdated)).await?;
        let items = collect_all(self.store.as_ref(), plan_recency_range(&range)).await?;

        let summary = summarize_date_range(&items);
        info!(
            items = summary.items.len(),
            total_price = %summary.total_price,
            "Date range filter completed"
        );
        Ok(summary)
    }

    /// Aggregates one category, or every configured category for an "all" token.
    pub async fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<AggregateResult>, InventoryError> {
        debug!(?query, "Received aggregation");
        let scope = self.categories.resolve(query.category.as_deref())?;

        self.ensure_index(Some(IndexName::CategoryPrice)).await?;
        let results = match scope {
            CategoryScope::Single(category) => {
                vec![aggregate_category(self.store.as_ref(), &category).await?]
            }
            CategoryScope::All => aggregate_all(self.store.as_ref(), &self.categories).await?,
        };

        info!(categories = results.len(), "Aggregation completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::inventory::{ValidationError, ALL_CATEGORY_SPELLINGS};
    use crate::query::PageRecord;
    use crate::storage::{IndexStatus, RepositoryError};
    use crate::testing::{item, VecStore};

    fn service_with(store: Arc<VecStore>) -> InventoryService {
        InventoryService::new(
            store,
            CategorySet::default(),
            ReadinessPolicy::new(3, Duration::from_millis(1)),
        )
    }

    fn query(json: serde_json::Value) -> QueryRequest {
        serde_json::from_value(json).unwrap()
    }

    /// Three items per category priced 25, 20 and 15.
    fn priced_store() -> Arc<VecStore> {
        let mut items = Vec::new();
        for (c, category) in ["Music", "Books", "Home"].iter().enumerate() {
            for (i, price) in ["25", "20", "15"].iter().enumerate() {
                items.push(item(
                    &format!("item {}", i + 1),
                    category,
                    price,
                    (c * 3 + i) as u32,
                ));
            }
        }
        Arc::new(VecStore::new(items))
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_id() {
        let store = Arc::new(VecStore::default());
        let service = service_with(store.clone());

        let first = service
            .upsert_item(UpsertItemRequest::new("Guitar", "Music", Decimal::from(90)))
            .await
            .unwrap();
        let second = service
            .upsert_item(UpsertItemRequest::new("Guitar", "Music", Decimal::from(70)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.price, Decimal::from(70));
        assert!(second.last_updated_at >= first.last_updated_at);
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_validation_skips_store() {
        let store = Arc::new(VecStore::default());
        let service = service_with(store.clone());

        let result = service.upsert_item(UpsertItemRequest::default()).await;
        assert_eq!(
            result,
            Err(InventoryError::Validation(ValidationError::MissingFields(vec![
                "name", "category", "price"
            ])))
        );
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let store = Arc::new(VecStore::new(vec![item("Guitar", "Music", "90", 0)]));
        let service = service_with(store.clone());

        let message = service
            .delete_item(ItemKeyRequest::new("Guitar", "Music"))
            .await
            .unwrap();
        assert_eq!(message, "Guitar of Music category was deleted successfully");
        assert!(store.items().is_empty());

        assert!(service
            .delete_item(ItemKeyRequest::new("Guitar", "Music"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_item() {
        let store = Arc::new(VecStore::new(vec![item("Guitar", "Music", "90", 0)]));
        let service = service_with(store);

        let found = service
            .get_item(ItemKeyRequest::new("Guitar", "Music"))
            .await
            .unwrap();
        assert_eq!(found.price, Decimal::from(90));

        let missing = service.get_item(ItemKeyRequest::new("Guitar", "Books")).await;
        assert_eq!(
            missing,
            Err(InventoryError::NotFound {
                name: "Guitar".to_string(),
                category: "Books".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_price_range_alone_returns_cheapest_of_each_category() {
        let service = service_with(priced_store());
        let outcome = service
            .query_inventory(query(serde_json::json!({"filters": {"price_range": [1, 19]}})))
            .await
            .unwrap();

        let QueryOutcome::Listing(items) = outcome else {
            panic!("expected listing");
        };
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.price == Decimal::from(15)));
    }

    #[tokio::test]
    async fn test_query_by_category_sorted_desc() {
        let service = service_with(priced_store());
        let outcome = service
            .query_inventory(query(serde_json::json!({
                "filters": {"category": "Books"},
                "sort": {"field": "price", "order": "desc"},
            })))
            .await
            .unwrap();

        let QueryOutcome::Listing(items) = outcome else {
            panic!("expected listing");
        };
        let prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::from(25), Decimal::from(20), Decimal::from(15)]
        );
    }

    #[tokio::test]
    async fn test_query_with_page_returns_record() {
        let service = service_with(priced_store());
        let outcome = service
            .query_inventory(query(serde_json::json!({"pagination": {"limit": 4, "page": 3}})))
            .await
            .unwrap();

        let QueryOutcome::Page(PageRecord { items, count, page, limit }) = outcome else {
            panic!("expected page");
        };
        assert_eq!((count, page, limit), (1, 3, 4));
        assert_eq!(items[0].category, "Home");
    }

    #[tokio::test]
    async fn test_query_page_beyond_last_is_not_found() {
        let service = service_with(priced_store());
        let result = service
            .query_inventory(query(serde_json::json!({"pagination": {"limit": 4, "page": 4}})))
            .await;
        assert_eq!(result, Err(InventoryError::PageNotFound { page: 4, pages: 3 }));
    }

    #[tokio::test]
    async fn test_filter_by_date_range() {
        let at = |month: u32, day: u32, hour: u32| {
            NaiveDate::from_ymd_opt(2023, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
        };
        let mut items = vec![
            item("Feb 1", "Music", "1", 0),
            item("Feb 2", "Music", "2", 0),
            item("Mar 3", "Books", "3", 0),
            item("Mar 4", "Books", "4", 0),
        ];
        items[0].last_updated_at = at(2, 1, 0);
        items[1].last_updated_at = at(2, 2, 0);
        items[2].last_updated_at = at(3, 3, 5);
        items[3].last_updated_at = at(3, 4, 0);
        let service = service_with(Arc::new(VecStore::new(items)));

        let summary = service
            .filter_by_date_range(&DateRangeQuery::new("2023-02-02 00:00:00", "2023-03-03 05:00:00"))
            .await
            .unwrap();

        let names: Vec<&str> = summary.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Feb 2", "Mar 3"]);
        assert_eq!(summary.total_price, Decimal::from(5));
    }

    #[tokio::test]
    async fn test_filter_by_date_range_requires_bounds() {
        let service = service_with(Arc::new(VecStore::default()));
        let result = service.filter_by_date_range(&DateRangeQuery::default()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Missing required query parameters 'dt_from' or 'dt_to'"
        );
    }

    #[tokio::test]
    async fn test_aggregate_single_and_all() {
        let store = Arc::new(VecStore::new(vec![
            item("Lipstick", "Beauty", "20", 1),
            item("Perfume", "Beauty", "40", 2),
            item("Radio", "Electrics", "10", 3),
            item("Guitar", "Music", "90", 4),
            item("Strings", "Music", "10", 5),
        ]));
        let service = service_with(store);

        let music = service
            .aggregate(&AggregateQuery {
                category: Some("Music".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(
            music,
            vec![AggregateResult {
                category: "Music".to_string(),
                total_price: Decimal::from(100),
                count: 2,
            }]
        );

        let clothing = service
            .aggregate(&AggregateQuery {
                category: Some("Clothing".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(clothing[0].count, 0);

        for spelling in ALL_CATEGORY_SPELLINGS {
            let all = service
                .aggregate(&AggregateQuery {
                    category: Some(spelling.to_string()),
                })
                .await
                .unwrap();
            let labels: Vec<&str> = all.iter().map(|r| r.category.as_str()).collect();
            assert_eq!(labels, vec!["Music", "Electrics", "Beauty"]);
        }
    }

    #[tokio::test]
    async fn test_aggregate_rejects_unknown_category_before_store() {
        let store = Arc::new(VecStore::default());
        let service = service_with(store.clone());

        let result = service
            .aggregate(&AggregateQuery {
                category: Some("Toys".to_string()),
            })
            .await;
        assert_eq!(
            result,
            Err(InventoryError::Validation(ValidationError::InvalidCategory))
        );
        assert_eq!(store.status_calls(), 0);
        assert_eq!(store.query_calls(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_waits_for_index_once() {
        let store = Arc::new(
            VecStore::default()
                .with_statuses(IndexName::CategoryPrice, &[IndexStatus::Building]),
        );
        let service = service_with(store.clone());
        let all = AggregateQuery {
            category: Some("all".to_string()),
        };

        service.aggregate(&all).await.unwrap();
        service.aggregate(&all).await.unwrap();
        assert_eq!(store.status_calls(), 2);
        assert!(service.readiness().is_confirmed(IndexName::CategoryPrice));
    }

    #[tokio::test]
    async fn test_aggregate_index_never_ready() {
        let store = Arc::new(
            VecStore::default()
                .with_statuses(IndexName::CategoryPrice, &[IndexStatus::Missing; 3]),
        );
        let service = service_with(store.clone());

        let result = service
            .aggregate(&AggregateQuery {
                category: Some("Music".to_string()),
            })
            .await;
        assert_eq!(
            result,
            Err(InventoryError::IndexNotReady {
                index: "CategoryPriceIndex",
                attempts: 3,
            })
        );
        assert_eq!(store.query_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let store = Arc::new(VecStore::new(vec![item("Guitar", "Music", "90", 0)]).failing_on("Music"));
        let service = service_with(store);

        let result = service
            .aggregate(&AggregateQuery {
                category: Some("Music".to_string()),
            })
            .await;
        assert!(matches!(
            result,
            Err(InventoryError::Store(RepositoryError::QueryFailed(_)))
        ));
    }
}
