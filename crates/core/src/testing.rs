//! Scripted record store for driver, aggregator and service tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::inventory::{format_timestamp, parse_stored_timestamp, Item};
use crate::query::QuerySpec;
use crate::storage::{
    key_schema, Attr, Cursor, IndexName, IndexStatus, ItemKey, ItemUpdate, QueryPage, RecordStore,
    RepositoryError, Result, Scalar, STATIC_PARTITION_KEY,
};

const OFFSET: &str = "offset";

pub(crate) fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Builds an item updated `minutes` after a fixed base time.
pub(crate) fn item(name: &str, category: &str, price: &str, minutes: u32) -> Item {
    Item {
        id: format!("id-{name}-{category}"),
        name: name.to_string(),
        category: category.to_string(),
        price: price.parse().unwrap(),
        last_updated_at: base_time() + Duration::minutes(minutes as i64),
    }
}

fn attribute(item: &Item, attr: Attr) -> Scalar {
    match attr {
        Attr::Id => Scalar::S(item.id.clone()),
        Attr::Name => Scalar::S(item.name.clone()),
        Attr::Category => Scalar::S(item.category.clone()),
        Attr::Price => Scalar::N(item.price),
        Attr::LastUpdatedAt => Scalar::S(format_timestamp(&item.last_updated_at)),
        Attr::StaticPk => Scalar::S(STATIC_PARTITION_KEY.to_string()),
    }
}

fn build_item(attrs: &BTreeMap<Attr, Scalar>) -> Result<Item> {
    let text = |attr: Attr| {
        attrs
            .get(&attr)
            .and_then(Scalar::as_s)
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::InvalidData(format!("missing {}", attr.as_str())))
    };
    let price = attrs
        .get(&Attr::Price)
        .and_then(Scalar::as_n)
        .ok_or_else(|| RepositoryError::InvalidData("missing price".to_string()))?;
    let last_updated_at = parse_stored_timestamp(&text(Attr::LastUpdatedAt)?)
        .ok_or_else(|| RepositoryError::InvalidData("bad timestamp".to_string()))?;

    Ok(Item {
        id: text(Attr::Id)?,
        name: text(Attr::Name)?,
        category: text(Attr::Category)?,
        price,
        last_updated_at,
    })
}

#[derive(Default)]
pub(crate) struct VecStore {
    items: Mutex<Vec<Item>>,
    statuses: Mutex<HashMap<IndexName, VecDeque<IndexStatus>>>,
    failing_partition: Option<String>,
    query_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl VecStore {
    pub(crate) fn new(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    /// Queries whose partition value equals `partition` fail.
    pub(crate) fn failing_on(mut self, partition: &str) -> Self {
        self.failing_partition = Some(partition.to_string());
        self
    }

    /// Scripts the statuses reported for `index` before it turns active.
    pub(crate) fn with_statuses(self, index: IndexName, statuses: &[IndexStatus]) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(index, statuses.iter().copied().collect());
        self
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn items(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for VecStore {
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.key() == *key)
            .cloned())
    }

    async fn put_conditional(&self, update: &ItemUpdate) -> Result<Item> {
        let mut items = self.items.lock().unwrap();
        let position = items.iter().position(|item| item.key() == update.key);

        let mut attrs: BTreeMap<Attr, Scalar> = match position {
            Some(i) => [Attr::Id, Attr::Name, Attr::Category, Attr::Price, Attr::LastUpdatedAt]
                .into_iter()
                .map(|attr| (attr, attribute(&items[i], attr)))
                .collect(),
            None => BTreeMap::from([
                (Attr::Name, Scalar::S(update.key.name.clone())),
                (Attr::Category, Scalar::S(update.key.category.clone())),
            ]),
        };
        for (attr, value) in &update.set {
            attrs.insert(*attr, value.clone());
        }
        for (attr, value) in &update.set_if_absent {
            attrs.entry(*attr).or_insert_with(|| value.clone());
        }

        let item = build_item(&attrs)?;
        match position {
            Some(i) => items[i] = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item)
    }

    async fn delete_by_key(&self, key: &ItemKey) -> Result<()> {
        self.items.lock().unwrap().retain(|item| item.key() != *key);
        Ok(())
    }

    async fn query(&self, spec: &QuerySpec) -> Result<QueryPage> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        let key = &spec.key_condition;
        if let (Some(failing), Some(value)) = (&self.failing_partition, key.partition_value.as_s()) {
            if failing == value {
                return Err(RepositoryError::QueryFailed(format!("scripted failure on {value}")));
            }
        }

        let (_, sort_attr) = key_schema(spec.index);
        let mut matching: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| attribute(item, key.partition_attr) == key.partition_value)
            .filter(|item| {
                key.sort
                    .as_ref()
                    .is_none_or(|sort| sort.matches(&attribute(item, sort.attr())))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            attribute(a, sort_attr)
                .compare(&attribute(b, sort_attr))
                .then_with(|| a.key().cmp(&b.key()))
        });
        if !spec.scan_forward {
            matching.reverse();
        }

        let offset = spec
            .start_cursor
            .as_ref()
            .and_then(|cursor| cursor.attributes().get(OFFSET))
            .and_then(Scalar::as_s)
            .and_then(|offset| offset.parse::<usize>().ok())
            .unwrap_or(0);
        let limit = spec.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let evaluated: Vec<Item> = matching.iter().skip(offset).take(limit).cloned().collect();
        let end = offset + evaluated.len();

        let items: Vec<Item> = evaluated
            .into_iter()
            .filter(|item| {
                spec.filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(Some(&attribute(item, filter.attr()))))
            })
            .collect();

        let next_cursor = (end < matching.len()).then(|| {
            Cursor::new(BTreeMap::from([(OFFSET.to_string(), Scalar::S(end.to_string()))]))
        });

        Ok(QueryPage {
            count: items.len(),
            items,
            next_cursor,
        })
    }

    async fn describe_index_status(&self, index: IndexName) -> Result<IndexStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        Ok(statuses
            .get_mut(&index)
            .and_then(VecDeque::pop_front)
            .unwrap_or(IndexStatus::Active))
    }
}
