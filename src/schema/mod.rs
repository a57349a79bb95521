//! Schema subsystem for hobbygraph
//!
//! The schema is assembled once at startup and shared read-only by every
//! execution.
//!
//! # Layout
//!
//! - `types`: scalar kinds, type references, field and object definitions
//! - `resolver`: the resolver capability and the values it produces
//! - `registry`: the `User`, `Hobby` and `Post` object types
//! - `assembly`: root query and mutation types, structural validation
//! - `sdl`: schema definition language output

mod assembly;
mod errors;
mod loaders;
mod registry;
mod resolver;
mod sdl;
mod types;

pub use assembly::{Schema, SchemaOptions, MUTATION_TYPE, QUERY_TYPE};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::TypeRegistry;
pub use resolver::{
    resolver_fn, Arguments, FieldValue, Resolver, ResolverContext, ResolverError,
    ResolverResult,
};
pub use sdl::print_schema;
pub use types::{ArgDef, FieldDef, NamedType, ObjectType, ScalarKind, TypeRef};
