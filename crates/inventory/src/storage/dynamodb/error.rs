//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `inventory_core::storage`.
//! Transport failures become `ConnectionFailed`; service errors keep the
//! message DynamoDB returned.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use inventory_core::storage::RepositoryError;

/// Returns the service message, or `fallback` when DynamoDB sent none.
fn service_message(err: &impl ProvideErrorMetadata, fallback: &str) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Returns true for failures that never reached the service.
fn is_transport_failure<E, R>(err: &SdkError<E, R>) -> bool {
    matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_))
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    if is_transport_failure(&err) {
        return map_connection_error(DisplayErrorContext(&err));
    }
    let err = err.into_service_error();
    match err {
        GetItemError::ProvisionedThroughputExceededException(_)
        | GetItemError::RequestLimitExceeded(_) => {
            RepositoryError::Throttled(service_message(&err, "Throughput exceeded, please retry"))
        }
        GetItemError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed(service_message(&err, "Table not found"))
        }
        err => RepositoryError::QueryFailed(service_message(
            &err,
            &format!("GetItem failed: {:?}", err),
        )),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> RepositoryError {
    if is_transport_failure(&err) {
        return map_connection_error(DisplayErrorContext(&err));
    }
    let err = err.into_service_error();
    match err {
        QueryError::ProvisionedThroughputExceededException(_)
        | QueryError::RequestLimitExceeded(_) => {
            RepositoryError::Throttled(service_message(&err, "Throughput exceeded, please retry"))
        }
        QueryError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed(service_message(&err, "Table not found"))
        }
        // A query against an index the table does not carry fails validation.
        ref other if other.code() == Some("ValidationException")
            && other.message().is_some_and(|m| m.contains("specified index")) =>
        {
            RepositoryError::IndexNotFound(service_message(other, "Index not found"))
        }
        err => RepositoryError::QueryFailed(service_message(
            &err,
            &format!("Query failed: {:?}", err),
        )),
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> RepositoryError {
    if is_transport_failure(&err) {
        return map_connection_error(DisplayErrorContext(&err));
    }
    let err = err.into_service_error();
    match err {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            RepositoryError::ConditionalCheckFailed(service_message(
                &err,
                "The conditional request failed",
            ))
        }
        UpdateItemError::ProvisionedThroughputExceededException(_)
        | UpdateItemError::RequestLimitExceeded(_) => {
            RepositoryError::Throttled(service_message(&err, "Throughput exceeded, please retry"))
        }
        UpdateItemError::TransactionConflictException(_) => {
            RepositoryError::WriteFailed(service_message(&err, "Transaction conflict, please retry"))
        }
        UpdateItemError::ResourceNotFoundException(_) => {
            RepositoryError::WriteFailed(service_message(&err, "Table not found"))
        }
        err => RepositoryError::WriteFailed(service_message(
            &err,
            &format!("UpdateItem failed: {:?}", err),
        )),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> RepositoryError {
    if is_transport_failure(&err) {
        return map_connection_error(DisplayErrorContext(&err));
    }
    let err = err.into_service_error();
    match err {
        DeleteItemError::ConditionalCheckFailedException(_) => {
            RepositoryError::ConditionalCheckFailed(service_message(
                &err,
                "The conditional request failed",
            ))
        }
        DeleteItemError::ProvisionedThroughputExceededException(_)
        | DeleteItemError::RequestLimitExceeded(_) => {
            RepositoryError::Throttled(service_message(&err, "Throughput exceeded, please retry"))
        }
        DeleteItemError::ResourceNotFoundException(_) => {
            RepositoryError::WriteFailed(service_message(&err, "Table not found"))
        }
        err => RepositoryError::WriteFailed(service_message(
            &err,
            &format!("DeleteItem failed: {:?}", err),
        )),
    }
}

/// Map a DescribeTable SDK error to RepositoryError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
) -> RepositoryError {
    if is_transport_failure(&err) {
        return map_connection_error(DisplayErrorContext(&err));
    }
    let err = err.into_service_error();
    match err {
        DescribeTableError::ResourceNotFoundException(_) => {
            RepositoryError::IndexNotFound(service_message(&err, "Table not found"))
        }
        err => RepositoryError::QueryFailed(service_message(
            &err,
            &format!("DescribeTable failed: {:?}", err),
        )),
    }
}

/// Map a generic connection/config error to RepositoryError.
pub fn map_connection_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::ConnectionFailed(err.to_string())
}
