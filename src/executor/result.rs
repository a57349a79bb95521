//! Response envelope produced by the executor

use serde::Serialize;
use serde_json::Value;

use super::errors::GraphQLError;

/// `{data, errors}` envelope; `errors` is omitted when empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl ExecutionResult {
    /// A result for a request that failed before execution began
    pub fn request_error(error: GraphQLError) -> Self {
        Self {
            data: Value::Null,
            errors: vec![error],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when nothing was executed: no data and only pathless errors
    pub fn is_request_error(&self) -> bool {
        self.data.is_null()
            && !self.errors.is_empty()
            && self.errors.iter().all(|e| e.path().is_none())
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ResponsePath;
    use serde_json::json;

    #[test]
    fn test_errors_omitted_when_empty() {
        let result = ExecutionResult {
            data: json!({"users": []}),
            errors: Vec::new(),
        };
        assert!(result.is_ok());
        assert_eq!(result.to_json(), json!({"data": {"users": []}}));
    }

    #[test]
    fn test_request_error_detection() {
        let result = ExecutionResult::request_error(GraphQLError::parse("bad"));
        assert!(result.is_request_error());
        assert_eq!(result.to_json()["data"], Value::Null);

        let field_failure = ExecutionResult {
            data: Value::Null,
            errors: vec![GraphQLError::internal("x").with_path(&ResponsePath::root().field("a"))],
        };
        assert!(!field_failure.is_request_error());
    }
}
