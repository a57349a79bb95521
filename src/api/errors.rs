//! API error types
//!
//! Ingress failures that happen before a request reaches the executor. They
//! are reported in the same `{data, errors}` envelope as execution results.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::executor::{ErrorKind, ExecutionResult, GraphQLError};

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request body is not a valid GraphQL request object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No document was supplied
    #[error("Must provide query string.")]
    MissingQuery,

    /// `variables` query parameter is not a JSON object
    #[error("Variables are invalid JSON: {0}")]
    InvalidVariables(String),

    /// Mutations may only run over POST
    #[error("Can only perform a {0} operation from a POST request.")]
    MethodNotAllowed(String),

    /// The execution task failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingQuery => StatusCode::BAD_REQUEST,
            ApiError::InvalidVariables(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Internal(_) => ErrorKind::Internal,
            ApiError::MethodNotAllowed(_) => ErrorKind::Validation,
            _ => ErrorKind::Parse,
        }
    }
}

impl From<ApiError> for ExecutionResult {
    fn from(err: ApiError) -> Self {
        ExecutionResult::request_error(GraphQLError::new(err.kind(), err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ExecutionResult::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingQuery.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MethodNotAllowed("mutation".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::Internal("join".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope() {
        let result = ExecutionResult::from(ApiError::MissingQuery);
        let json = result.to_json();
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"][0]["message"], "Must provide query string.");
        assert_eq!(json["errors"][0]["extensions"]["code"], "GRAPHQL_PARSE_FAILED");
    }
}
