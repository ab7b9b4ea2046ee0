//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`RepositoryError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// Every store failure is a server-side error:
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `Throttled` -> 503 (Service Unavailable)
/// - everything else -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use inventory_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::Throttled("Throughput exceeded".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::Throttled(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::WriteFailed(_) => 500,
        RepositoryError::ConditionalCheckFailed(_) => 500,
        RepositoryError::IndexNotFound(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}
