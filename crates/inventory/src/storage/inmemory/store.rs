//! In-memory record store implementation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inventory_core::inventory::{parse_stored_timestamp, Item};
use inventory_core::query::QuerySpec;
use inventory_core::storage::{
    key_schema, Attr, Cursor, IndexName, IndexStatus, ItemKey, ItemUpdate, Projection, QueryPage,
    RecordStore, RepositoryError, Result, Scalar,
};

/// Stored attributes of one item, keyed by attribute name.
type Record = BTreeMap<String, Scalar>;

/// In-memory record store for development and testing.
///
/// Records are attribute maps held in a HashMap wrapped in `Arc<RwLock<_>>`.
/// Queries behave like the managed store: indexes are sparse, `limit` bounds the
/// items evaluated before the filter condition, and continuation cursors carry
/// the key attributes of the last evaluated item.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<ItemKey, Record>>>,
    index_statuses: Arc<RwLock<HashMap<IndexName, VecDeque<IndexStatus>>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store with every index active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the statuses reported for `index` before it turns active.
    #[cfg(test)]
    pub async fn script_index_statuses(&self, index: IndexName, statuses: Vec<IndexStatus>) {
        self.index_statuses
            .write()
            .await
            .insert(index, statuses.into());
    }
}

fn get_string(record: &Record, attr: Attr) -> Result<String> {
    record
        .get(attr.as_str())
        .and_then(Scalar::as_s)
        .map(str::to_string)
        .ok_or_else(|| {
            RepositoryError::InvalidData(format!("Missing or invalid field: {}", attr.as_str()))
        })
}

fn record_to_item(record: &Record) -> Result<Item> {
    let price = record
        .get(Attr::Price.as_str())
        .and_then(Scalar::as_n)
        .ok_or_else(|| RepositoryError::InvalidData("Missing or invalid field: price".to_string()))?;
    let timestamp = get_string(record, Attr::LastUpdatedAt)?;
    let last_updated_at = parse_stored_timestamp(&timestamp).ok_or_else(|| {
        RepositoryError::InvalidData(format!("Invalid last_updated_dt: {timestamp}"))
    })?;

    Ok(Item {
        id: get_string(record, Attr::Id)?,
        name: get_string(record, Attr::Name)?,
        category: get_string(record, Attr::Category)?,
        price,
        last_updated_at,
    })
}

fn key_of(record: &Record) -> Result<ItemKey> {
    Ok(ItemKey::new(
        get_string(record, Attr::Name)?,
        get_string(record, Attr::Category)?,
    ))
}

/// Applies the index projection. Key attributes of the table and index are always kept.
fn project(record: &Record, index: Option<IndexName>) -> Record {
    let Some(index) = index else {
        return record.clone();
    };
    match index.projection() {
        Projection::All => record.clone(),
        Projection::Include(attrs) => {
            let (partition, sort) = key_schema(Some(index));
            let keep = [Attr::Name, Attr::Category, partition, sort];
            record
                .iter()
                .filter(|(name, _)| {
                    keep.iter()
                        .chain(attrs.iter())
                        .any(|attr| attr.as_str() == name.as_str())
                })
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        }
    }
}

/// Position of a record in index order: sort key, then primary key.
#[derive(Debug, Clone)]
struct Position {
    sort: Scalar,
    key: ItemKey,
}

impl Position {
    fn of(record: &Record, sort_attr: Attr) -> Option<Self> {
        Some(Self {
            sort: record.get(sort_attr.as_str())?.clone(),
            key: key_of(record).ok()?,
        })
    }

    fn from_cursor(cursor: &Cursor, sort_attr: Attr) -> Result<Self> {
        let attributes = cursor.attributes();
        let text = |attr: Attr| {
            attributes
                .get(attr.as_str())
                .and_then(Scalar::as_s)
                .map(str::to_string)
        };
        match (attributes.get(sort_attr.as_str()), text(Attr::Name), text(Attr::Category)) {
            (Some(sort), Some(name), Some(category)) => Ok(Self {
                sort: sort.clone(),
                key: ItemKey::new(name, category),
            }),
            _ => Err(RepositoryError::InvalidData(
                "Invalid start cursor".to_string(),
            )),
        }
    }

    fn compare(&self, other: &Position) -> Ordering {
        self.sort
            .compare(&other.sort)
            .then_with(|| self.key.cmp(&other.key))
    }

    fn cursor(&self, record: &Record, partition_attr: Attr, sort_attr: Attr) -> Cursor {
        let mut attributes = BTreeMap::new();
        for attr in [Attr::Name, Attr::Category, partition_attr, sort_attr] {
            if let Some(value) = record.get(attr.as_str()) {
                attributes.insert(attr.as_str().to_string(), value.clone());
            }
        }
        attributes.insert(sort_attr.as_str().to_string(), self.sort.clone());
        Cursor::new(attributes)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>> {
        let records = self.records.read().await;
        records.get(key).map(record_to_item).transpose()
    }

    async fn put_conditional(&self, update: &ItemUpdate) -> Result<Item> {
        let mut records = self.records.write().await;

        let mut record = records.get(&update.key).cloned().unwrap_or_else(|| {
            Record::from([
                (
                    Attr::Name.as_str().to_string(),
                    Scalar::S(update.key.name.clone()),
                ),
                (
                    Attr::Category.as_str().to_string(),
                    Scalar::S(update.key.category.clone()),
                ),
            ])
        });
        for (attr, value) in &update.set {
            record.insert(attr.as_str().to_string(), value.clone());
        }
        for (attr, value) in &update.set_if_absent {
            record
                .entry(attr.as_str().to_string())
                .or_insert_with(|| value.clone());
        }

        let item = record_to_item(&record)?;
        records.insert(update.key.clone(), record);
        Ok(item)
    }

    async fn delete_by_key(&self, key: &ItemKey) -> Result<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn query(&self, spec: &QuerySpec) -> Result<QueryPage> {
        let (partition_attr, sort_attr) = key_schema(spec.index);
        let key = &spec.key_condition;
        if key.partition_attr != partition_attr {
            return Err(RepositoryError::QueryFailed(format!(
                "Query condition missed key schema element: {}",
                partition_attr.as_str()
            )));
        }

        let records = self.records.read().await;

        // Records without both index key attributes are not in the index.
        let mut matching: Vec<(Position, &Record)> = records
            .values()
            .filter(|record| {
                record
                    .get(partition_attr.as_str())
                    .is_some_and(|value| value.compare(&key.partition_value) == Ordering::Equal)
            })
            .filter(|record| {
                key.sort.as_ref().is_none_or(|sort| {
                    record
                        .get(sort.attr().as_str())
                        .is_some_and(|value| sort.matches(value))
                })
            })
            .filter_map(|record| Position::of(record, sort_attr).map(|position| (position, record)))
            .collect();

        matching.sort_by(|(a, _), (b, _)| a.compare(b));
        if !spec.scan_forward {
            matching.reverse();
        }

        if let Some(cursor) = &spec.start_cursor {
            let start = Position::from_cursor(cursor, sort_attr)?;
            matching.retain(|(position, _)| {
                let order = position.compare(&start);
                if spec.scan_forward {
                    order == Ordering::Greater
                } else {
                    order == Ordering::Less
                }
            });
        }

        let limit = spec.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let remaining = matching.len();
        let evaluated: Vec<(Position, &Record)> = matching.into_iter().take(limit).collect();

        let next_cursor = if evaluated.len() < remaining {
            evaluated
                .last()
                .map(|(position, record)| position.cursor(record, partition_attr, sort_attr))
        } else {
            None
        };

        let items = evaluated
            .iter()
            .filter(|(_, record)| {
                spec.filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(record.get(filter.attr().as_str())))
            })
            .map(|(_, record)| record_to_item(&project(record, spec.index)))
            .collect::<Result<Vec<Item>>>()?;

        Ok(QueryPage {
            count: items.len(),
            items,
            next_cursor,
        })
    }

    async fn describe_index_status(&self, index: IndexName) -> Result<IndexStatus> {
        let mut statuses = self.index_statuses.write().await;
        Ok(statuses
            .get_mut(&index)
            .and_then(VecDeque::pop_front)
            .unwrap_or(IndexStatus::Active))
    }
}
