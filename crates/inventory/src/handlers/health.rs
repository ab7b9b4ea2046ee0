//! Health check endpoint for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)

use axum::http::StatusCode;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
/// Does NOT wait for the secondary indexes to become active.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
