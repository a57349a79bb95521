//! Resolver capability bound to every schema field
//!
//! A resolver computes one field's value from its parent object (absent at
//! the root) and its coerced arguments. Resolvers hold no per-request state;
//! everything request-scoped arrives through [`ResolverContext`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::Entity;
use crate::storage::{StorageError, Store};

/// Result type for resolvers
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Failure signalled by a resolver
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Update/delete target or referenced owner does not exist
    #[error("{entity} with id \"{id}\" not found")]
    NotFound { entity: &'static str, id: String },

    /// The storage collaborator failed
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// An argument passed coercion but is unusable by the resolver
    #[error("Invalid argument \"{name}\": {reason}")]
    InvalidArgument { name: String, reason: String },

    /// The resolver was handed a parent of the wrong type
    #[error("Expected a {expected} parent, got {actual}")]
    UnexpectedParent {
        expected: &'static str,
        actual: &'static str,
    },
}

impl ResolverError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ResolverError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolverError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Request-scoped collaborators handed to every resolver
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    store: &'a dyn Store,
}

impl<'a> ResolverContext<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }
}

/// Coerced field arguments, keyed by argument name.
///
/// Only arguments that were supplied (or defaulted) are present; values have
/// already been checked against their declared scalar kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// A string argument that must be present
    pub fn require_str(&self, name: &str) -> ResolverResult<&str> {
        self.str(name)
            .ok_or_else(|| ResolverError::invalid_argument(name, "expected a string"))
    }

    /// An integer argument that must be present
    pub fn require_int(&self, name: &str) -> ResolverResult<i64> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| ResolverError::invalid_argument(name, "expected an integer"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Value produced by a resolver
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    /// Leaf value, serialized according to the field's scalar kind
    Scalar(Value),
    /// Object whose child selections resolve against it
    Object(Entity),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn list<T: Into<FieldValue>>(items: impl IntoIterator<Item = T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(Value::String(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Value::String(value.to_string()))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(Value::from(value))
    }
}

impl From<Entity> for FieldValue {
    fn from(entity: Entity) -> Self {
        FieldValue::Object(entity)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// The resolver capability: one method, invoked once per field occurrence
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        ctx: &ResolverContext<'_>,
        parent: Option<&Entity>,
        args: &Arguments,
    ) -> ResolverResult<FieldValue>;
}

impl<F> Resolver for F
where
    F: Fn(&ResolverContext<'_>, Option<&Entity>, &Arguments) -> ResolverResult<FieldValue>
        + Send
        + Sync,
{
    fn resolve(
        &self,
        ctx: &ResolverContext<'_>,
        parent: Option<&Entity>,
        args: &Arguments,
    ) -> ResolverResult<FieldValue> {
        self(ctx, parent, args)
    }
}

/// Pins a closure to the resolver signature so its argument types and
/// lifetimes are inferred at the definition site.
pub fn resolver_fn<F>(f: F) -> F
where
    F: Fn(&ResolverContext<'_>, Option<&Entity>, &Arguments) -> ResolverResult<FieldValue>
        + Send
        + Sync,
{
    f
}
