//! Schema assembly error types
//!
//! Error codes:
//! - SCHEMA_UNKNOWN_TYPE
//! - SCHEMA_DUPLICATE_FIELD
//! - SCHEMA_DUPLICATE_ARGUMENT
//! - SCHEMA_EMPTY_TYPE
//!
//! These only occur while a schema is being built; a built schema is
//! structurally valid for its whole lifetime.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// A field references an object type that is not registered
    UnknownType,
    /// Two fields of one type share a name
    DuplicateField,
    /// Two arguments of one field share a name
    DuplicateArgument,
    /// An object type declares no fields
    EmptyType,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownType => "SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::DuplicateField => "SCHEMA_DUPLICATE_FIELD",
            SchemaErrorCode::DuplicateArgument => "SCHEMA_DUPLICATE_ARGUMENT",
            SchemaErrorCode::EmptyType => "SCHEMA_EMPTY_TYPE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the offending type and field
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    type_name: String,
}

impl SchemaError {
    pub fn unknown_type(
        type_name: impl Into<String>,
        field: &str,
        referenced: &str,
    ) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::UnknownType,
            message: format!(
                "Field '{}.{}' references unknown type '{}'",
                type_name, field, referenced
            ),
            type_name,
        }
    }

    pub fn duplicate_field(type_name: impl Into<String>, field: &str) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::DuplicateField,
            message: format!("Type '{}' declares field '{}' twice", type_name, field),
            type_name,
        }
    }

    pub fn duplicate_argument(type_name: impl Into<String>, field: &str, arg: &str) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::DuplicateArgument,
            message: format!(
                "Field '{}.{}' declares argument '{}' twice",
                type_name, field, arg
            ),
            type_name,
        }
    }

    pub fn empty_type(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::EmptyType,
            message: format!("Type '{}' declares no fields", type_name),
            type_name,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the type being validated when the error was raised
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema assembly
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message() {
        let err = SchemaError::unknown_type("Post", "author", "Author");
        assert_eq!(err.code().code(), "SCHEMA_UNKNOWN_TYPE");
        assert_eq!(err.type_name(), "Post");
        assert!(err.to_string().contains("'Post.author'"));
        assert!(err.message().contains("'Author'"));
    }
}
