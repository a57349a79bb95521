//! Query executor for hobbygraph
//!
//! Walks the selected operation against the schema and produces the
//! `{data, errors}` envelope.
//!
//! Execution flow:
//! 1. Parse the document and select the operation
//! 2. Coerce variables
//! 3. Collect the root fields and resolve them in selection order
//! 4. For every field: coerce arguments, invoke the resolver, complete the
//!    value against the declared type, recursing into sub-selections with
//!    the resolved object as parent
//! 5. Record failures as field errors and null the field
//!
//! A null in a non-null position makes the enclosing value null, up to the
//! nearest nullable field; when that reaches the root, `data` is null.
//!
//! `__schema` and `__type` on the query root are answered from the schema
//! itself (see `introspection`).

use std::collections::HashMap;

use async_graphql_parser::types::{
    DocumentOperations, ExecutableDocument, FragmentDefinition, OperationDefinition,
    OperationType, SelectionSet,
};
use async_graphql_parser::{parse_query, Positioned};
use async_graphql_value::Name;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::Entity;
use crate::schema::{
    FieldDef, FieldValue, NamedType, ObjectType, ResolverContext, ResolverError, ScalarKind,
    Schema, TypeRef,
};
use crate::storage::Store;

use super::coerce::{coerce_arguments, coerce_variables, Variables};
use super::collect::{collect_fields, CollectedField};
use super::errors::GraphQLError;
use super::introspection::{resolve_meta, type_by_name, Meta, MetaValue};
use super::path::ResponsePath;
use super::request::Request;
use super::result::ExecutionResult;

/// Marker for a null that must propagate to the nearest nullable position.
/// The error explaining it has already been recorded.
#[derive(Debug, Clone, Copy)]
struct Bubble;

type Completion = Result<Value, Bubble>;

/// Executes requests against a schema and a store
pub struct QueryExecutor<'a> {
    schema: &'a Schema,
    store: &'a dyn Store,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new executor
    pub fn new(schema: &'a Schema, store: &'a dyn Store) -> Self {
        Self { schema, store }
    }

    /// Executes one request. Never fails: every failure is reported in the
    /// returned envelope.
    pub fn execute(&self, request: &Request) -> ExecutionResult {
        let document = match parse_query(&request.query) {
            Ok(document) => document,
            Err(err) => return ExecutionResult::request_error(err.into()),
        };

        let operation = match select_operation(&document, request.operation_name.as_deref()) {
            Ok(operation) => operation,
            Err(err) => return ExecutionResult::request_error(err),
        };

        let root = match operation.node.ty {
            OperationType::Query => self.schema.query_type(),
            OperationType::Mutation => self.schema.mutation_type(),
            OperationType::Subscription => {
                return ExecutionResult::request_error(
                    GraphQLError::validation("Subscriptions are not supported").at(operation.pos),
                )
            }
        };

        let variables = match coerce_variables(
            &operation.node.variable_definitions,
            request.variables.as_ref(),
        ) {
            Ok(variables) => variables,
            Err(err) => return ExecutionResult::request_error(err),
        };

        debug!(
            operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
            root = root.name,
            "executing operation"
        );

        let mut execution = Execution {
            schema: self.schema,
            ctx: ResolverContext::new(self.store),
            fragments: &document.fragments,
            variables,
            errors: Vec::new(),
        };
        let data = execution
            .execute_selection_sets(
                root,
                None,
                &[&operation.node.selection_set.node],
                &ResponsePath::root(),
            )
            .map(Value::Object)
            .unwrap_or(Value::Null);

        if !execution.errors.is_empty() {
            debug!(errors = execution.errors.len(), "operation completed with errors");
        }

        ExecutionResult {
            data,
            errors: execution.errors,
        }
    }
}

/// The kind of operation a request would run, `None` when the document does
/// not parse or names no selectable operation
pub fn operation_type(request: &Request) -> Option<OperationType> {
    let document = parse_query(&request.query).ok()?;
    select_operation(&document, request.operation_name.as_deref())
        .ok()
        .map(|operation| operation.node.ty)
}

fn select_operation<'d>(
    document: &'d ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'d Positioned<OperationDefinition>, GraphQLError> {
    match (&document.operations, operation_name) {
        (DocumentOperations::Single(operation), _) => Ok(operation),
        (DocumentOperations::Multiple(operations), Some(name)) => operations
            .get(name)
            .ok_or_else(|| GraphQLError::parse(format!("Unknown operation named \"{}\".", name))),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => operations
            .values()
            .next()
            .ok_or_else(|| GraphQLError::parse("Document contains no operation")),
        (DocumentOperations::Multiple(_), None) => Err(GraphQLError::parse(
            "Must provide operation name if query contains multiple operations.",
        )),
    }
}

/// State of one execution: coerced variables and the errors collected so far
struct Execution<'a> {
    schema: &'a Schema,
    ctx: ResolverContext<'a>,
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    variables: Variables,
    errors: Vec<GraphQLError>,
}

impl<'a> Execution<'a> {
    /// Resolves the fields selected on `object`, serially and in selection order
    fn execute_selection_sets(
        &mut self,
        object: &'a ObjectType,
        parent: Option<&Entity>,
        selection_sets: &[&'a SelectionSet],
        path: &ResponsePath,
    ) -> Result<Map<String, Value>, Bubble> {
        let collected = collect_fields(
            object.name,
            selection_sets,
            self.fragments,
            &self.variables,
            &mut self.errors,
        );

        let mut map = Map::new();
        let mut bubbled = false;
        for group in &collected {
            let field_path = path.field(group.response_key);
            match self.execute_field(object, parent, group, &field_path) {
                Ok(value) => {
                    map.insert(group.response_key.to_string(), value);
                }
                Err(Bubble) => bubbled = true,
            }
        }

        if bubbled {
            Err(Bubble)
        } else {
            Ok(map)
        }
    }

    fn execute_field(
        &mut self,
        object: &'a ObjectType,
        parent: Option<&Entity>,
        group: &CollectedField<'a>,
        path: &ResponsePath,
    ) -> Completion {
        let field = group.first();
        let name = field.node.name.node.as_str();

        if let Some(reason) = group.conflict() {
            let err = GraphQLError::validation(reason).at(field.pos).with_path(path);
            return match object.field(name) {
                Some(definition) => self.fail(definition, err),
                None => {
                    self.errors.push(err);
                    Ok(Value::Null)
                }
            };
        }

        if name == "__typename" {
            return Ok(Value::String(object.name.to_string()));
        }

        if object.name == self.schema.query_type().name {
            let meta = match name {
                "__schema" => Some(Ok(MetaValue::Object(Meta::Schema))),
                "__type" => Some(type_by_name(self.schema, &field.node, &self.variables)),
                _ => None,
            };
            match meta {
                Some(Ok(value)) => return Ok(self.complete_meta(value, group, path)),
                Some(Err(err)) => {
                    self.errors.push(err.at(field.pos).with_path(path));
                    return Ok(Value::Null);
                }
                None => {}
            }
        }

        let Some(definition) = object.field(name) else {
            self.errors.push(
                GraphQLError::schema(format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    name, object.name
                ))
                .at(field.pos)
                .with_path(path),
            );
            return Ok(Value::Null);
        };

        if let Err(err) = check_selection(definition, group) {
            return self.fail(definition, err.at(field.pos).with_path(path));
        }

        let args = match coerce_arguments(object.name, definition, &field.node, &self.variables) {
            Ok(args) => args,
            Err(err) => {
                let err = if err.locations().is_empty() {
                    err.at(field.pos)
                } else {
                    err
                };
                return self.fail(definition, err.with_path(path));
            }
        };

        let value = match definition.resolver.resolve(&self.ctx, parent, &args) {
            Ok(value) => value,
            Err(err) => {
                if let ResolverError::Storage(storage) = &err {
                    warn!(field = %path, error = %storage, "storage failure while resolving");
                }
                let err = GraphQLError::from_resolver(&err).at(field.pos).with_path(path);
                return self.fail(definition, err);
            }
        };

        self.complete(object, definition, group, &definition.ty, value, path)
    }

    /// Records a field error; the field becomes null
    fn fail(&mut self, definition: &FieldDef, error: GraphQLError) -> Completion {
        self.errors.push(error);
        if definition.ty.is_non_null() {
            Err(Bubble)
        } else {
            Ok(Value::Null)
        }
    }

    /// Completes a value at a position of type `ty`, absorbing propagated
    /// nulls when the position is nullable
    fn complete(
        &mut self,
        object: &'a ObjectType,
        definition: &'a FieldDef,
        group: &CollectedField<'a>,
        ty: &'a TypeRef,
        value: FieldValue,
        path: &ResponsePath,
    ) -> Completion {
        match ty {
            TypeRef::NonNull(inner) => {
                match self.complete_inner(object, definition, group, inner, value, path)? {
                    Value::Null => {
                        self.errors.push(
                            GraphQLError::internal(format!(
                                "Cannot return null for non-nullable field {}.{}.",
                                object.name, definition.name
                            ))
                            .at(group.first().pos)
                            .with_path(path),
                        );
                        Err(Bubble)
                    }
                    value => Ok(value),
                }
            }
            nullable => Ok(self
                .complete_inner(object, definition, group, nullable, value, path)
                .unwrap_or(Value::Null)),
        }
    }

    fn complete_inner(
        &mut self,
        object: &'a ObjectType,
        definition: &'a FieldDef,
        group: &CollectedField<'a>,
        ty: &'a TypeRef,
        value: FieldValue,
        path: &ResponsePath,
    ) -> Completion {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match (ty, value) {
            (TypeRef::NonNull(_), value) => self.complete(object, definition, group, ty, value, path),
            (TypeRef::List(item_type), FieldValue::List(items)) => {
                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    completed.push(self.complete(
                        object,
                        definition,
                        group,
                        item_type,
                        item,
                        &path.index(index),
                    )?);
                }
                Ok(Value::Array(completed))
            }
            (TypeRef::Scalar(kind), FieldValue::Scalar(scalar)) => {
                match serialize_scalar(*kind, scalar) {
                    Ok(value) => Ok(value),
                    Err(reason) => self.bubble(group, path, reason),
                }
            }
            (TypeRef::Object(type_name), FieldValue::Object(entity)) => {
                if entity.type_name() != *type_name {
                    let reason = format!(
                        "Expected a {} value for {}.{}, got {}",
                        type_name,
                        object.name,
                        definition.name,
                        entity.type_name()
                    );
                    return self.bubble(group, path, reason);
                }
                let Some(child_type) = self.schema.object(type_name) else {
                    let reason = format!("Unknown type \"{}\"", type_name);
                    return self.bubble(group, path, reason);
                };
                self.execute_selection_sets(
                    child_type,
                    Some(&entity),
                    &group.selection_sets(),
                    path,
                )
                .map(Value::Object)
            }
            (ty, _) => {
                let reason = format!(
                    "Resolver for {}.{} returned a value that is not a {}",
                    object.name, definition.name, ty
                );
                self.bubble(group, path, reason)
            }
        }
    }

    /// Resolves the fields selected on an introspection object
    fn execute_meta_selection(
        &mut self,
        meta: &Meta<'a>,
        selection_sets: &[&'a SelectionSet],
        path: &ResponsePath,
    ) -> Map<String, Value> {
        let collected = collect_fields(
            meta.type_name(),
            selection_sets,
            self.fragments,
            &self.variables,
            &mut self.errors,
        );

        let mut map = Map::new();
        for group in &collected {
            let field = group.first();
            let name = field.node.name.node.as_str();
            let field_path = path.field(group.response_key);

            let value = if let Some(reason) = group.conflict() {
                self.errors.push(
                    GraphQLError::validation(reason)
                        .at(field.pos)
                        .with_path(&field_path),
                );
                Value::Null
            } else if name == "__typename" {
                Value::String(meta.type_name().to_string())
            } else {
                match resolve_meta(self.schema, meta, name) {
                    Some(value) => self.complete_meta(value, group, &field_path),
                    None => {
                        self.errors.push(
                            GraphQLError::schema(format!(
                                "Cannot query field \"{}\" on type \"{}\".",
                                name,
                                meta.type_name()
                            ))
                            .at(field.pos)
                            .with_path(&field_path),
                        );
                        Value::Null
                    }
                }
            };
            map.insert(group.response_key.to_string(), value);
        }
        map
    }

    fn complete_meta(
        &mut self,
        value: MetaValue<'a>,
        group: &CollectedField<'a>,
        path: &ResponsePath,
    ) -> Value {
        let has_selection = !group.first().node.selection_set.node.items.is_empty();
        let misplaced = match &value {
            MetaValue::Leaf(_) => has_selection,
            MetaValue::Object(_) => !has_selection,
            _ => false,
        };

        if misplaced {
            let field = group.first();
            let message = if has_selection {
                format!(
                    "Field \"{}\" must not have a selection since it is a leaf.",
                    field.node.name.node
                )
            } else {
                format!(
                    "Field \"{}\" must have a selection of subfields.",
                    field.node.name.node
                )
            };
            self.errors
                .push(GraphQLError::validation(message).at(field.pos).with_path(path));
            return Value::Null;
        }

        match value {
            MetaValue::Null => Value::Null,
            MetaValue::Leaf(value) => value,
            MetaValue::Object(meta) => {
                Value::Object(self.execute_meta_selection(&meta, &group.selection_sets(), path))
            }
            MetaValue::List(items) => {
                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    completed.push(self.complete_meta(item, group, &path.index(index)));
                }
                Value::Array(completed)
            }
        }
    }

    /// Records an internal error for a value the declared type forbids
    fn bubble(
        &mut self,
        group: &CollectedField<'a>,
        path: &ResponsePath,
        reason: String,
    ) -> Completion {
        self.errors.push(
            GraphQLError::internal(reason)
                .at(group.first().pos)
                .with_path(path),
        );
        Err(Bubble)
    }
}

/// Rejects sub-selections on scalars and bare object fields
fn check_selection(definition: &FieldDef, group: &CollectedField<'_>) -> Result<(), GraphQLError> {
    let has_selection = !group.first().node.selection_set.node.items.is_empty();
    match definition.ty.named() {
        NamedType::Scalar(kind) if has_selection => Err(GraphQLError::validation(format!(
            "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
            definition.name,
            kind.type_name()
        ))),
        NamedType::Object(type_name) if !has_selection => Err(GraphQLError::validation(format!(
            "Field \"{}\" of type \"{}\" must have a selection of subfields.",
            definition.name, type_name
        ))),
        _ => Ok(()),
    }
}

/// Serializes a resolved leaf according to its scalar kind
fn serialize_scalar(kind: ScalarKind, value: Value) -> Result<Value, String> {
    match (kind, value) {
        (ScalarKind::Id | ScalarKind::String, Value::String(s)) => Ok(Value::String(s)),
        (ScalarKind::Id, Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(Value::String(n.to_string()))
        }
        (ScalarKind::Int, Value::Number(n)) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => Ok(Value::Number(n)),
            _ => Err(format!(
                "Int cannot represent non 32-bit signed integer value: {}",
                n
            )),
        },
        (kind, other) => Err(format!(
            "{} cannot represent value: {}",
            kind.type_name(),
            other
        )),
    }
}
