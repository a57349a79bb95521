//! Execution error types
//!
//! Error codes (reported as `extensions.code`):
//! - GRAPHQL_PARSE_FAILED: document syntax or operation selection
//! - VALIDATION_ERROR: arguments, variables, selections
//! - SCHEMA_ERROR: unknown field
//! - NOT_FOUND: update/delete target or referenced owner absent
//! - STORAGE_ERROR: the store failed
//! - INTERNAL_ERROR: a resolver produced a value its field type forbids
//!
//! Field errors carry the response path of the failed field; request
//! errors carry none.

use std::fmt;

use async_graphql_parser::Pos;
use serde::Serialize;

use crate::schema::ResolverError;

use super::path::{PathSegment, ResponsePath};

/// Error kinds surfaced in the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    Schema,
    NotFound,
    Storage,
    Internal,
}

impl ErrorKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "GRAPHQL_PARSE_FAILED",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Schema => "SCHEMA_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Storage => "STORAGE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Line and column of a document position, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Location {
    fn from(pos: Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Extensions {
    code: &'static str,
}

/// One entry of the response `errors` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQLError {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<PathSegment>>,
    extensions: Extensions,
    #[serde(skip)]
    kind: ErrorKind,
}

impl GraphQLError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: Extensions { code: kind.code() },
            kind,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Maps a resolver failure onto its error kind
    pub fn from_resolver(err: &ResolverError) -> Self {
        let kind = match err {
            ResolverError::NotFound { .. } => ErrorKind::NotFound,
            ResolverError::Storage(_) => ErrorKind::Storage,
            ResolverError::InvalidArgument { .. } => ErrorKind::Validation,
            ResolverError::UnexpectedParent { .. } => ErrorKind::Internal,
        };
        Self::new(kind, err.to_string())
    }

    pub fn at(mut self, pos: Pos) -> Self {
        self.locations.push(pos.into());
        self
    }

    pub fn with_path(mut self, path: &ResponsePath) -> Self {
        self.path = Some(path.segments().to_vec());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn path(&self) -> Option<&[PathSegment]> {
        self.path.as_deref()
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for GraphQLError {}

impl From<async_graphql_parser::Error> for GraphQLError {
    fn from(err: async_graphql_parser::Error) -> Self {
        let mut error = GraphQLError::parse(err.to_string());
        error.locations = err.positions().map(Location::from).collect();
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_json_shape() {
        let path = ResponsePath::root().field("deleteUser");
        let err = GraphQLError::from_resolver(&ResolverError::not_found("User", "42"))
            .at(Pos { line: 1, column: 12 })
            .with_path(&path);

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "message": "User with id \"42\" not found",
                "locations": [{"line": 1, "column": 12}],
                "path": ["deleteUser"],
                "extensions": {"code": "NOT_FOUND"}
            })
        );
    }

    #[test]
    fn test_request_error_has_no_path() {
        let err = GraphQLError::parse("Unknown operation named \"Missing\"");
        let value = serde_json::to_value(&err).unwrap();
        assert!(value.get("path").is_none());
        assert!(value.get("locations").is_none());
        assert_eq!(value["extensions"]["code"], "GRAPHQL_PARSE_FAILED");
    }

    #[test]
    fn test_parser_error_keeps_position() {
        let err: GraphQLError = async_graphql_parser::parse_query("{ user(id: ) }")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!err.locations().is_empty());
    }
}
