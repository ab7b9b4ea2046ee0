use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inventory_core::inventory::{inventory_error_to_status_code, InventoryError, ValidationError};
use inventory_core::storage::{repository_error_to_status_code, RepositoryError};

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(error) = self.0.downcast_ref::<InventoryError>() {
            inventory_error_to_status_code(error)
        } else if let Some(error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(error)
        } else if self.0.downcast_ref::<ValidationError>().is_some() {
            400
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self.0, "Request failed");
        } else {
            tracing::warn!(status = %status, message = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
