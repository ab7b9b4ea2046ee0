//! DynamoDB record store implementation.
//!
//! Implements [`RecordStore`] from `inventory_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use inventory_core::inventory::Item;
use inventory_core::query::QuerySpec;
use inventory_core::storage::{
    IndexName, IndexStatus, ItemKey, ItemUpdate, QueryPage, RecordStore, RepositoryError, Result,
};

use super::conversions::{
    cursor_to_key, index_status, item_to_domain, key_to_attributes, key_to_cursor,
};
use super::error::{
    map_delete_item_error, map_describe_table_error, map_get_item_error, map_query_error,
    map_update_item_error,
};
use super::expressions::ExpressionBuilder;

/// DynamoDB-based record store.
///
/// The table is keyed by `name` (HASH) and `category` (RANGE) and carries the
/// three secondary indexes named by [`IndexName`].
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl RecordStore for DynamoDbStore {
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_domain(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_conditional(&self, update: &ItemUpdate) -> Result<Item> {
        let mut builder = ExpressionBuilder::default();
        let update_expression = builder.update(update);
        let (names, values) = builder.into_parts();

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attributes(&update.key)))
            .update_expression(update_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(map_update_item_error)?;

        let attributes = result.attributes.ok_or_else(|| {
            RepositoryError::InvalidData("UpdateItem returned no attributes".to_string())
        })?;
        item_to_domain(&attributes)
    }

    async fn delete_by_key(&self, key: &ItemKey) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn query(&self, spec: &QuerySpec) -> Result<QueryPage> {
        let mut builder = ExpressionBuilder::default();
        let key_condition = builder.key_condition(&spec.key_condition);
        let filter = spec.filter.as_ref().map(|f| builder.filter(f));
        let (names, values) = builder.into_parts();

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .set_index_name(spec.index.map(|index| index.as_str().to_string()))
            .key_condition_expression(key_condition)
            .set_filter_expression(filter)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .scan_index_forward(spec.scan_forward)
            .set_limit(spec.limit.map(|limit| i32::try_from(limit).unwrap_or(i32::MAX)))
            .set_exclusive_start_key(spec.start_cursor.as_ref().map(cursor_to_key))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_domain)
            .collect::<Result<Vec<Item>>>()?;
        let next_cursor = result
            .last_evaluated_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(key_to_cursor)
            .transpose()?;

        tracing::trace!(
            index = spec.index.map(|i| i.as_str()),
            count = items.len(),
            more = next_cursor.is_some(),
            "DynamoDB query page"
        );

        Ok(QueryPage {
            count: items.len(),
            items,
            next_cursor,
        })
    }

    async fn describe_index_status(&self, index: IndexName) -> Result<IndexStatus> {
        let result = self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(map_describe_table_error)?;

        Ok(index_status(result.table(), index))
    }
}
