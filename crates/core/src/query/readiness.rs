//! Index readiness gate.
//!
//! A secondary index may still be backfilling when the process starts. Queries
//! that depend on one wait until the store reports it active, polling on a fixed
//! interval up to a bounded number of attempts.

use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::inventory::InventoryError;
use crate::storage::{IndexName, IndexStatus, RecordStore};

/// Bounded polling policy for index readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Number of status checks before giving up. Always at least 1.
    pub max_attempts: u32,
    /// Delay between two status checks.
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

impl ReadinessPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

/// Polls the store until `index` is active or the policy is exhausted.
///
/// A missing index counts as not ready yet.
pub async fn wait_for_index_active(
    store: &dyn RecordStore,
    index: IndexName,
    policy: &ReadinessPolicy,
) -> Result<(), InventoryError> {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let status = store.describe_index_status(index).await?;
        if status == IndexStatus::Active {
            info!(index = index.as_str(), attempt, "Index is active");
            return Ok(());
        }

        info!(
            index = index.as_str(),
            attempt,
            max_attempts,
            ?status,
            "Index not active yet"
        );
        if attempt < max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    warn!(
        index = index.as_str(),
        attempts = max_attempts,
        "Gave up waiting for index"
    );
    Err(InventoryError::IndexNotReady {
        index: index.as_str(),
        attempts: max_attempts,
    })
}

/// Remembers, per index, that readiness has been confirmed.
///
/// Once an index has been seen active it is never polled again for the lifetime
/// of this value. A failed wait is not remembered, so the next caller polls again.
#[derive(Debug, Default)]
pub struct IndexReadiness {
    policy: ReadinessPolicy,
    items_price: OnceCell<()>,
    category_price: OnceCell<()>,
    items_last_updated: OnceCell<()>,
}

impl IndexReadiness {
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    fn gate(&self, index: IndexName) -> &OnceCell<()> {
        match index {
            IndexName::ItemsPrice => &self.items_price,
            IndexName::CategoryPrice => &self.category_price,
            IndexName::ItemsLastUpdated => &self.items_last_updated,
        }
    }

    pub fn is_confirmed(&self, index: IndexName) -> bool {
        self.gate(index).initialized()
    }

    /// Waits for `index` unless it was already confirmed active.
    pub async fn ensure(
        &self,
        store: &dyn RecordStore,
        index: IndexName,
    ) -> Result<(), InventoryError> {
        self.gate(index)
            .get_or_try_init(|| wait_for_index_active(store, index, &self.policy))
            .await
            .map(|_| ())
    }
}
