use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::DateRangeError;

/// Constant partition value written on every item so collection-wide indexes can be queried.
pub const STATIC_PARTITION_KEY: &str = "PRODUCT";

/// Stored attribute names.
///
/// These match the attribute names of the deployed table, so the same data can be
/// read by any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attr {
    Id,
    Name,
    Category,
    Price,
    LastUpdatedAt,
    StaticPk,
}

impl Attr {
    /// Returns the attribute name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attr::Id => "id",
            Attr::Name => "name",
            Attr::Category => "category",
            Attr::Price => "price",
            Attr::LastUpdatedAt => "last_updated_dt",
            Attr::StaticPk => "static_pk",
        }
    }
}

/// A scalar attribute value: string or exact decimal number.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    S(String),
    N(Decimal),
}

impl Scalar {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Scalar::S(s) => Some(s),
            Scalar::N(_) => None,
        }
    }

    pub fn as_n(&self) -> Option<Decimal> {
        match self {
            Scalar::N(n) => Some(*n),
            Scalar::S(_) => None,
        }
    }

    /// Orders two scalars the way the store orders sort keys.
    ///
    /// Strings compare by bytes, numbers numerically. Mixed types never occur on a
    /// single key attribute; they are ordered strings-first to keep the order total.
    pub fn compare(&self, other: &Scalar) -> Ordering {
        match (self, other) {
            (Scalar::S(a), Scalar::S(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Scalar::N(a), Scalar::N(b)) => a.cmp(b),
            (Scalar::S(_), Scalar::N(_)) => Ordering::Less,
            (Scalar::N(_), Scalar::S(_)) => Ordering::Greater,
        }
    }
}

/// Projection of a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    All,
    /// Key attributes plus the listed non-key attributes.
    Include(&'static [Attr]),
}

/// The three secondary indexes over the item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexName {
    /// Partition = static_pk, sort = price.
    ItemsPrice,
    /// Partition = category, sort = price.
    CategoryPrice,
    /// Partition = static_pk, sort = last_updated_dt.
    ItemsLastUpdated,
}

impl IndexName {
    pub const ALL: [IndexName; 3] = [
        IndexName::ItemsPrice,
        IndexName::CategoryPrice,
        IndexName::ItemsLastUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexName::ItemsPrice => "ItemsPriceIndex",
            IndexName::CategoryPrice => "CategoryPriceIndex",
            IndexName::ItemsLastUpdated => "ItemsLastUpdatedDtIndex",
        }
    }

    pub fn partition_attr(&self) -> Attr {
        match self {
            IndexName::ItemsPrice | IndexName::ItemsLastUpdated => Attr::StaticPk,
            IndexName::CategoryPrice => Attr::Category,
        }
    }

    pub fn sort_attr(&self) -> Attr {
        match self {
            IndexName::ItemsPrice | IndexName::CategoryPrice => Attr::Price,
            IndexName::ItemsLastUpdated => Attr::LastUpdatedAt,
        }
    }

    pub fn projection(&self) -> Projection {
        match self {
            IndexName::ItemsPrice | IndexName::ItemsLastUpdated => Projection::All,
            IndexName::CategoryPrice => {
                Projection::Include(&[Attr::Id, Attr::LastUpdatedAt, Attr::Name])
            }
        }
    }
}

/// Returns the (partition, sort) attributes of the base table or of an index.
pub fn key_schema(index: Option<IndexName>) -> (Attr, Attr) {
    match index {
        None => (Attr::Name, Attr::Category),
        Some(index) => (index.partition_attr(), index.sort_attr()),
    }
}

/// Readiness of a secondary index as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The index does not exist (yet).
    Missing,
    /// The index exists but is still backfilling or updating.
    Building,
    Active,
}

/// Primary key of an item: (name, category).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub name: String,
    pub category: String,
}

impl ItemKey {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// A single conditional write against one primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub key: ItemKey,
    /// Attributes overwritten on every write.
    pub set: Vec<(Attr, Scalar)>,
    /// Attributes written only when the item does not carry them yet.
    pub set_if_absent: Vec<(Attr, Scalar)>,
}

/// Opaque continuation token returned by the store.
///
/// Holds the key attributes of the last evaluated item. Callers only pass it back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cursor(BTreeMap<String, Scalar>);

impl Cursor {
    pub fn new(attributes: BTreeMap<String, Scalar>) -> Self {
        Self(attributes)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Scalar> {
        &self.0
    }

    pub fn into_attributes(self) -> BTreeMap<String, Scalar> {
        self.0
    }
}

/// A timestamp range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Creates a new range, validating that start <= end.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }
}
