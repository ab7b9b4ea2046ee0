//! Store query specification produced by the planner and consumed by the driver.

use std::cmp::Ordering;

use crate::storage::{Attr, Cursor, IndexName, Scalar};

/// Condition on the sort key of the queried table or index.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKeyCondition {
    Equals { attr: Attr, value: Scalar },
    /// Inclusive on both ends.
    Between { attr: Attr, low: Scalar, high: Scalar },
}

impl SortKeyCondition {
    pub fn attr(&self) -> Attr {
        match self {
            SortKeyCondition::Equals { attr, .. } | SortKeyCondition::Between { attr, .. } => *attr,
        }
    }

    /// Evaluates the condition against the sort key value of a record.
    pub fn matches(&self, value: &Scalar) -> bool {
        match self {
            SortKeyCondition::Equals { value: expected, .. } => {
                value.compare(expected) == Ordering::Equal
            }
            SortKeyCondition::Between { low, high, .. } => within(value, low, high),
        }
    }
}

/// Partition equality plus an optional sort key condition.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub partition_attr: Attr,
    pub partition_value: Scalar,
    pub sort: Option<SortKeyCondition>,
}

impl KeyCondition {
    pub fn partition(attr: Attr, value: Scalar) -> Self {
        Self {
            partition_attr: attr,
            partition_value: value,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: SortKeyCondition) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Condition evaluated on items after key-based retrieval.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Inclusive on both ends. An item without the attribute does not match.
    Between { attr: Attr, low: Scalar, high: Scalar },
}

impl FilterCondition {
    pub fn attr(&self) -> Attr {
        match self {
            FilterCondition::Between { attr, .. } => *attr,
        }
    }

    pub fn matches(&self, value: Option<&Scalar>) -> bool {
        match (self, value) {
            (FilterCondition::Between { low, high, .. }, Some(value)) => within(value, low, high),
            (_, None) => false,
        }
    }
}

fn within(value: &Scalar, low: &Scalar, high: &Scalar) -> bool {
    value.compare(low) != Ordering::Less && value.compare(high) != Ordering::Greater
}

/// One concrete store query.
///
/// Built fresh per request. Only `start_cursor` changes while the driver walks pages.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// `None` queries the base table.
    pub index: Option<IndexName>,
    pub key_condition: KeyCondition,
    pub filter: Option<FilterCondition>,
    /// Maximum number of items evaluated per call. `None` lets the store decide.
    pub limit: Option<u32>,
    pub scan_forward: bool,
    pub start_cursor: Option<Cursor>,
}

impl QuerySpec {
    pub fn new(index: Option<IndexName>, key_condition: KeyCondition) -> Self {
        Self {
            index,
            key_condition,
            filter: None,
            limit: None,
            scan_forward: true,
            start_cursor: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterCondition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }
}
