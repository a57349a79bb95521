//! Execution engine for hobbygraph
//!
//! Resolves a client-selected tree of fields against the schema.
//!
//! # Execution Flow
//!
//! 1. Parse the document, select the operation
//! 2. Coerce variables against their definitions
//! 3. Collect fields (fragments, `@skip`/`@include`, aliases)
//! 4. Coerce arguments, then invoke the field's resolver
//! 5. Complete the value against the declared type, recursing into
//!    sub-selections with the resolved object as parent
//!
//! # Error Handling
//!
//! Failures are field-scoped: the failed field is null, its error carries
//! the response path, and siblings keep resolving. Only parse, operation
//! selection and variable failures abort the whole request.

mod coerce;
mod collect;
mod errors;
mod executor;
mod introspection;
mod path;
mod request;
mod result;

pub use errors::{ErrorKind, GraphQLError, Location};
pub use async_graphql_parser::types::OperationType;
pub use executor::{operation_type, QueryExecutor};
pub use path::{PathSegment, ResponsePath};
pub use request::Request;
pub use result::ExecutionResult;
