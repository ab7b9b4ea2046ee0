mod aggregate;
mod pagination;
mod plan;
mod readiness;
mod spec;

pub use aggregate::{aggregate_all, aggregate_category};
pub use pagination::{collect_all, execute, walk_pages, FetchMode, PageRecord, QueryOutcome};
pub use plan::{
    plan, plan_category_scan, plan_recency_range, select_access_path, AccessPath, Pagination,
    PriceRange, QueryFilters, SortOrder, SortRequest, DEFAULT_PAGE_SIZE,
};
pub use readiness::{wait_for_index_active, IndexReadiness, ReadinessPolicy};
pub use spec::{FilterCondition, KeyCondition, QuerySpec, SortKeyCondition};
