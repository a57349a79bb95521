//! Ingress request decoding
//!
//! POST bodies are JSON request objects; GET requests carry the same fields
//! as query parameters with `variables` JSON-encoded.

use serde::Deserialize;
use serde_json::Value;

use crate::executor::Request;

use super::errors::{ApiError, ApiResult};

/// Decodes a POST body
pub fn parse_body(body: &[u8]) -> ApiResult<Request> {
    let request: Request =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    if request.query.trim().is_empty() {
        return Err(ApiError::MissingQuery);
    }
    Ok(request)
}

/// GET query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Option<String>,
}

impl QueryParams {
    /// Converts the parameters into a request
    pub fn into_request(self) -> ApiResult<Request> {
        let query = self
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or(ApiError::MissingQuery)?;

        let mut request = Request::new(query);
        request.operation_name = self.operation_name.filter(|name| !name.is_empty());

        if let Some(raw) = self.variables.filter(|v| !v.trim().is_empty()) {
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => request.variables = Some(map),
                Ok(Value::Null) => {}
                Ok(other) => {
                    return Err(ApiError::InvalidVariables(format!(
                        "expected an object, got {}",
                        other
                    )))
                }
                Err(e) => return Err(ApiError::InvalidVariables(e.to_string())),
            }
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        let request = parse_body(br#"{"query": "{ users { id } }"}"#).unwrap();
        assert_eq!(request.query, "{ users { id } }");

        assert!(matches!(parse_body(b"not json"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_body(br#"{"variables": {}}"#), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_body(br#"{"query": "  "}"#), Err(ApiError::MissingQuery)));
    }

    #[test]
    fn test_query_params() {
        let params = QueryParams {
            query: Some("query Q($id: ID!) { user(id: $id) { name } }".into()),
            operation_name: Some("Q".into()),
            variables: Some(r#"{"id": "1"}"#.into()),
        };
        let request = params.into_request().unwrap();
        assert_eq!(request.operation_name.as_deref(), Some("Q"));
        assert_eq!(request.variables.unwrap()["id"], "1");

        let params = QueryParams {
            query: Some("{ users { id } }".into()),
            variables: Some("[1]".into()),
            ..QueryParams::default()
        };
        assert!(matches!(params.into_request(), Err(ApiError::InvalidVariables(_))));

        assert!(matches!(
            QueryParams::default().into_request(),
            Err(ApiError::MissingQuery)
        ));
    }
}
