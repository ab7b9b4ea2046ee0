//! Query planner: maps a filter/sort/pagination request to one store query.
//!
//! Index selection is a four-way decision evaluated in strict precedence order.
//! The first matching branch wins and branches are never combined:
//!
//! 1. `name` present: base table, `name` (and `category`) in the key condition,
//!    price range as a filter condition.
//! 2. `category` present: `CategoryPriceIndex`, price range as a sort key range.
//! 3. price range alone: `ItemsPriceIndex` on the static partition.
//! 4. nothing: `ItemsLastUpdatedDtIndex` on the static partition.

use rust_decimal::Decimal;

use crate::inventory::{format_timestamp, ValidationError};
use crate::storage::{Attr, DateRange, IndexName, Scalar, STATIC_PARTITION_KEY};

use super::spec::{FilterCondition, KeyCondition, QuerySpec, SortKeyCondition};

/// Page size used when the request does not set one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Inclusive price bounds. Both bounds are always present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    fn bounds(&self) -> (Scalar, Scalar) {
        (Scalar::N(self.min), Scalar::N(self.max))
    }
}

/// Normalised query filters. Blank strings never reach this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A requested ordering. The field is kept verbatim and only honoured when it
/// names the sort key of the selected index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    pub field: String,
    pub order: SortOrder,
}

impl SortRequest {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    fn names(&self, attr: Attr) -> bool {
        match attr {
            Attr::LastUpdatedAt => matches!(self.field.as_str(), "last_updated_dt" | "lastUpdatedAt"),
            other => self.field == other.as_str(),
        }
    }

    /// Returns true when this request asks for descending order on `attr`.
    pub fn descends_on(&self, attr: Attr) -> bool {
        self.order == SortOrder::Desc && self.names(attr)
    }
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    /// 1-based. `None` selects full-listing mode.
    pub page: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            page: None,
        }
    }
}

impl Pagination {
    pub fn new(limit: Option<u32>, page: Option<u32>) -> Result<Self, ValidationError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 {
            return Err(ValidationError::InvalidPagination(
                "limit must be at least 1".to_string(),
            ));
        }
        if page == Some(0) {
            return Err(ValidationError::InvalidPagination(
                "page numbers start at 1".to_string(),
            ));
        }
        Ok(Self { limit, page })
    }
}

/// The branch of the index-selection table a request falls into.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath<'a> {
    ByName {
        name: &'a str,
        category: Option<&'a str>,
        price_range: Option<PriceRange>,
    },
    ByCategory {
        category: &'a str,
        price_range: Option<PriceRange>,
    },
    ByPriceRange(PriceRange),
    ListAll,
}

impl AccessPath<'_> {
    pub fn index(&self) -> Option<IndexName> {
        match self {
            AccessPath::ByName { .. } => None,
            AccessPath::ByCategory { .. } => Some(IndexName::CategoryPrice),
            AccessPath::ByPriceRange(_) => Some(IndexName::ItemsPrice),
            AccessPath::ListAll => Some(IndexName::ItemsLastUpdated),
        }
    }

    /// The field a sort request must name for descending order to apply.
    pub fn ordering_attr(&self) -> Attr {
        match self {
            AccessPath::ListAll => Attr::LastUpdatedAt,
            _ => Attr::Price,
        }
    }
}

/// Picks the access path for a set of filters. First match wins.
pub fn select_access_path(filters: &QueryFilters) -> AccessPath<'_> {
    match (
        filters.name.as_deref(),
        filters.category.as_deref(),
        filters.price_range,
    ) {
        (Some(name), category, price_range) => AccessPath::ByName {
            name,
            category,
            price_range,
        },
        (None, Some(category), price_range) => AccessPath::ByCategory {
            category,
            price_range,
        },
        (None, None, Some(price_range)) => AccessPath::ByPriceRange(price_range),
        (None, None, None) => AccessPath::ListAll,
    }
}

fn static_partition(sort: Option<SortKeyCondition>) -> KeyCondition {
    let key = KeyCondition::partition(
        Attr::StaticPk,
        Scalar::S(STATIC_PARTITION_KEY.to_string()),
    );
    match sort {
        Some(sort) => key.with_sort(sort),
        None => key,
    }
}

fn price_between(range: PriceRange) -> SortKeyCondition {
    let (low, high) = range.bounds();
    SortKeyCondition::Between {
        attr: Attr::Price,
        low,
        high,
    }
}

/// Builds the store query for a request.
pub fn plan(
    filters: &QueryFilters,
    sort: Option<&SortRequest>,
    pagination: &Pagination,
) -> QuerySpec {
    let path = select_access_path(filters);
    let index = path.index();
    let ordering_attr = path.ordering_attr();

    let mut spec = match path {
        AccessPath::ByName {
            name,
            category,
            price_range,
        } => {
            let mut key = KeyCondition::partition(Attr::Name, Scalar::S(name.to_string()));
            if let Some(category) = category {
                key = key.with_sort(SortKeyCondition::Equals {
                    attr: Attr::Category,
                    value: Scalar::S(category.to_string()),
                });
            }
            let spec = QuerySpec::new(index, key);
            match price_range {
                Some(range) => {
                    let (low, high) = range.bounds();
                    spec.with_filter(FilterCondition::Between {
                        attr: Attr::Price,
                        low,
                        high,
                    })
                }
                None => spec,
            }
        }
        AccessPath::ByCategory {
            category,
            price_range,
        } => {
            let mut key = KeyCondition::partition(Attr::Category, Scalar::S(category.to_string()));
            if let Some(range) = price_range {
                key = key.with_sort(price_between(range));
            }
            QuerySpec::new(index, key)
        }
        AccessPath::ByPriceRange(range) => {
            QuerySpec::new(index, static_partition(Some(price_between(range))))
        }
        AccessPath::ListAll => QuerySpec::new(index, static_partition(None)),
    };

    spec = spec.with_limit(pagination.limit);
    if sort.is_some_and(|sort| sort.descends_on(ordering_attr)) {
        spec = spec.descending();
    }
    spec
}

/// Query over every item of one category spelling, used by aggregation.
pub fn plan_category_scan(category: &str) -> QuerySpec {
    QuerySpec::new(
        Some(IndexName::CategoryPrice),
        KeyCondition::partition(Attr::Category, Scalar::S(category.to_string())),
    )
}

/// Query over every item last updated within `range`, oldest first.
pub fn plan_recency_range(range: &DateRange) -> QuerySpec {
    QuerySpec::new(
        Some(IndexName::ItemsLastUpdated),
        static_partition(Some(SortKeyCondition::Between {
            attr: Attr::LastUpdatedAt,
            low: Scalar::S(format_timestamp(&range.start)),
            high: Scalar::S(format_timestamp(&range.end)),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range(min: i64, max: i64) -> PriceRange {
        PriceRange::new(Decimal::from(min), Decimal::from(max)).unwrap()
    }

    fn filters(name: Option<&str>, category: Option<&str>, price: Option<PriceRange>) -> QueryFilters {
        QueryFilters {
            name: name.map(String::from),
            category: category.map(String::from),
            price_range: price,
        }
    }

    fn desc(field: &str) -> SortRequest {
        SortRequest::new(field, SortOrder::Desc)
    }

    fn static_pk() -> Scalar {
        Scalar::S("PRODUCT".to_string())
    }

    #[test]
    fn test_selection_is_total_and_follows_precedence() {
        let names = [None, Some("Guitar")];
        let categories = [None, Some("Music")];
        let prices = [None, Some(range(1, 19))];

        for name in names {
            for category in categories {
                for price in prices {
                    let f = filters(name, category, price);
                    let path = select_access_path(&f);
                    let expected = match (name, category, price) {
                        (Some(_), _, _) => None,
                        (None, Some(_), _) => Some(IndexName::CategoryPrice),
                        (None, None, Some(_)) => Some(IndexName::ItemsPrice),
                        (None, None, None) => Some(IndexName::ItemsLastUpdated),
                    };
                    assert_eq!(path.index(), expected, "filters: {f:?}");
                }
            }
        }
    }

    #[test]
    fn test_name_branch_wins_over_everything() {
        let f = filters(Some("Guitar"), Some("Music"), Some(range(1, 19)));
        assert_eq!(
            select_access_path(&f),
            AccessPath::ByName {
                name: "Guitar",
                category: Some("Music"),
                price_range: Some(range(1, 19)),
            }
        );
    }

    #[test]
    fn test_name_branch_puts_price_in_filter() {
        let f = filters(Some("Guitar"), Some("Music"), Some(range(1, 19)));
        let spec = plan(&f, None, &Pagination::default());

        assert_eq!(spec.index, None);
        assert_eq!(
            spec.key_condition,
            KeyCondition::partition(Attr::Name, Scalar::S("Guitar".into())).with_sort(
                SortKeyCondition::Equals {
                    attr: Attr::Category,
                    value: Scalar::S("Music".into()),
                }
            )
        );
        assert_eq!(
            spec.filter,
            Some(FilterCondition::Between {
                attr: Attr::Price,
                low: Scalar::N(Decimal::from(1)),
                high: Scalar::N(Decimal::from(19)),
            })
        );
    }

    #[test]
    fn test_name_only_has_no_sort_condition() {
        let spec = plan(&filters(Some("Guitar"), None, None), None, &Pagination::default());
        assert_eq!(
            spec.key_condition,
            KeyCondition::partition(Attr::Name, Scalar::S("Guitar".into()))
        );
        assert_eq!(spec.filter, None);
    }

    #[test]
    fn test_category_branch_puts_price_in_key() {
        let f = filters(None, Some("Music"), Some(range(1, 19)));
        let spec = plan(&f, None, &Pagination::default());

        assert_eq!(spec.index, Some(IndexName::CategoryPrice));
        assert_eq!(
            spec.key_condition,
            KeyCondition::partition(Attr::Category, Scalar::S("Music".into()))
                .with_sort(price_between(range(1, 19)))
        );
        assert_eq!(spec.filter, None);
    }

    #[test]
    fn test_price_only_branch_uses_static_partition() {
        let spec = plan(
            &filters(None, None, Some(range(1, 19))),
            None,
            &Pagination::default(),
        );
        assert_eq!(spec.index, Some(IndexName::ItemsPrice));
        assert_eq!(spec.key_condition.partition_attr, Attr::StaticPk);
        assert_eq!(spec.key_condition.partition_value, static_pk());
        assert_eq!(
            spec.key_condition.sort,
            Some(price_between(range(1, 19)))
        );
    }

    #[test]
    fn test_zero_is_a_valid_price_bound() {
        let spec = plan(
            &filters(None, None, Some(range(0, 0))),
            None,
            &Pagination::default(),
        );
        assert_eq!(spec.index, Some(IndexName::ItemsPrice));
    }

    #[test]
    fn test_no_filters_lists_by_recency() {
        let spec = plan(&QueryFilters::default(), None, &Pagination::default());
        assert_eq!(spec.index, Some(IndexName::ItemsLastUpdated));
        assert_eq!(spec.key_condition, static_partition(None));
        assert_eq!(spec.filter, None);
        assert!(spec.scan_forward);
        assert_eq!(spec.limit, Some(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_price_desc_honoured_on_price_branches() {
        let cases = [
            filters(Some("Guitar"), None, None),
            filters(None, Some("Music"), None),
            filters(None, None, Some(range(1, 19))),
        ];
        for f in cases {
            assert!(!plan(&f, Some(&desc("price")), &Pagination::default()).scan_forward);
            assert!(plan(&f, Some(&desc("last_updated_dt")), &Pagination::default()).scan_forward);
        }
    }

    #[test]
    fn test_recency_desc_honoured_on_list_all() {
        let none = QueryFilters::default();
        assert!(!plan(&none, Some(&desc("last_updated_dt")), &Pagination::default()).scan_forward);
        assert!(!plan(&none, Some(&desc("lastUpdatedAt")), &Pagination::default()).scan_forward);
        assert!(plan(&none, Some(&desc("price")), &Pagination::default()).scan_forward);
    }

    #[test]
    fn test_unknown_sort_field_and_asc_are_ignored() {
        let f = filters(None, Some("Music"), None);
        assert!(plan(&f, Some(&desc("name")), &Pagination::default()).scan_forward);
        assert!(
            plan(
                &f,
                Some(&SortRequest::new("price", SortOrder::Asc)),
                &Pagination::default()
            )
            .scan_forward
        );
    }

    #[test]
    fn test_limit_comes_from_pagination() {
        let pagination = Pagination::new(Some(3), Some(2)).unwrap();
        let spec = plan(&QueryFilters::default(), None, &pagination);
        assert_eq!(spec.limit, Some(3));
        assert_eq!(spec.start_cursor, None);
    }

    #[test]
    fn test_pagination_validation() {
        assert_eq!(Pagination::new(None, None).unwrap(), Pagination::default());
        assert!(matches!(
            Pagination::new(Some(0), None),
            Err(ValidationError::InvalidPagination(_))
        ));
        assert!(matches!(
            Pagination::new(Some(5), Some(0)),
            Err(ValidationError::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_price_range_validation() {
        let (ten, twenty) = (Decimal::from(10), Decimal::from(20));
        assert_eq!(
            PriceRange::new(twenty, ten),
            Err(ValidationError::InvalidPriceRange {
                min: twenty,
                max: ten
            })
        );
        assert!(PriceRange::new(ten, ten).is_ok());
        assert!(PriceRange::new(Decimal::new(1, 1), Decimal::new(2, 1)).is_ok());
    }

    #[test]
    fn test_category_scan_has_no_limit() {
        let spec = plan_category_scan("music");
        assert_eq!(spec.index, Some(IndexName::CategoryPrice));
        assert_eq!(spec.limit, None);
        assert_eq!(
            spec.key_condition,
            KeyCondition::partition(Attr::Category, Scalar::S("music".into()))
        );
    }

    #[test]
    fn test_recency_range_uses_canonical_bounds() {
        let start = NaiveDate::from_ymd_opt(2023, 2, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 3, 3)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let spec = plan_recency_range(&DateRange::new(start, end).unwrap());

        assert_eq!(spec.index, Some(IndexName::ItemsLastUpdated));
        assert_eq!(
            spec.key_condition.sort,
            Some(SortKeyCondition::Between {
                attr: Attr::LastUpdatedAt,
                low: Scalar::S("2023-02-02T00:00:00.000000".into()),
                high: Scalar::S("2023-03-03T05:00:00.000000".into()),
            })
        );
    }
}
