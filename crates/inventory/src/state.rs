//! Application state shared by all request handlers.
//!
//! The state wraps a single [`InventoryService`] bound to the record store
//! selected at compile time via feature flags.

use std::sync::Arc;

use inventory_core::inventory::InventoryService;
use inventory_core::storage::RecordStore;

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'dynamodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'dynamodb'");

/// Shared application state.
///
/// Cloned for each request handler. The service, its store handle and the
/// index readiness gate live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<InventoryService>,
}

impl AppState {
    /// Creates a new AppState over the given store and configuration.
    pub fn from_store(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        let service = InventoryService::new(
            store,
            config.categories.clone(),
            config.readiness_policy(),
        );

        Self {
            inventory: Arc::new(service),
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!("Using in-memory record store");
            Ok(Self::from_store(Arc::new(InMemoryStore::new()), config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::DynamoDbStore;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(endpoint_url) = &config.aws_endpoint_url {
                loader = loader.endpoint_url(endpoint_url);
            }
            if let Some(region) = &config.aws_region {
                loader = loader.region(aws_config::Region::new(region.clone()));
            }
            let aws_config = loader.load().await;

            let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);
            let store = DynamoDbStore::new(dynamodb_client, config.table_name.clone());
            tracing::info!(table = %store.table_name(), "Using DynamoDB record store");

            Ok(Self::from_store(Arc::new(store), config))
        }
    }
}
