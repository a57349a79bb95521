//! HTTP rendering of execution results

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::executor::ExecutionResult;

impl ExecutionResult {
    /// 400 when nothing was executed, 200 otherwise
    pub fn status_code(&self) -> StatusCode {
        if self.is_request_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }
}

impl IntoResponse for ExecutionResult {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::GraphQLError;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        let ok = ExecutionResult {
            data: json!({"users": []}),
            errors: Vec::new(),
        };
        assert_eq!(ok.status_code(), StatusCode::OK);

        let failed = ExecutionResult::request_error(GraphQLError::parse("Syntax Error"));
        assert_eq!(failed.status_code(), StatusCode::BAD_REQUEST);
    }
}
