use std::{env, time::Duration};

use inventory_core::inventory::{CategoryError, CategorySet};
use inventory_core::query::ReadinessPolicy;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CATEGORIES: {0}")]
    Categories(#[from] CategoryError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the inventory table (default: "InventoryTable")
    pub table_name: String,
    /// Categories accepted by aggregation (default: the eight built-in categories)
    pub categories: CategorySet,
    /// Index readiness checks before giving up (default: 60)
    pub index_ready_max_attempts: u32,
    /// Delay between two index readiness checks in milliseconds (default: 5,000)
    pub index_ready_interval_ms: u64,
    /// Endpoint override for the DynamoDB client, e.g. a local emulator.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_endpoint_url: Option<String>,
    /// Region override for the DynamoDB client.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_region: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DB_TABLE_NAME` - Table name (default: "InventoryTable")
    /// - `CATEGORIES` - JSON array or comma-separated list of category names
    /// - `INDEX_READY_MAX_ATTEMPTS` - Readiness checks before giving up (default: 60)
    /// - `INDEX_READY_INTERVAL_MS` - Delay between readiness checks (default: 5,000)
    /// - `AWS_ENDPOINT_URL` - DynamoDB endpoint override
    /// - `AWS_REGION` - DynamoDB region override
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let categories = match non_blank("CATEGORIES") {
            Some(raw) => CategorySet::parse(&raw)?,
            None => CategorySet::default(),
        };

        Ok(Self {
            table_name: non_blank("DB_TABLE_NAME").unwrap_or_else(|| "InventoryTable".to_string()),
            categories,
            index_ready_max_attempts: non_blank("INDEX_READY_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            index_ready_interval_ms: non_blank("INDEX_READY_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            aws_endpoint_url: non_blank("AWS_ENDPOINT_URL"),
            aws_region: non_blank("AWS_REGION"),
        })
    }

    /// Get the index readiness policy.
    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            self.index_ready_max_attempts,
            Duration::from_millis(self.index_ready_interval_ms),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: "InventoryTable".to_string(),
            categories: CategorySet::default(),
            index_ready_max_attempts: 60,
            index_ready_interval_ms: 5_000,
            aws_endpoint_url: None,
            aws_region: None,
        }
    }
}
