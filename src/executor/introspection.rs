//! Schema introspection: the `__schema` and `__type` root meta fields
//!
//! Introspection objects are read straight from the assembled [`Schema`]
//! rather than through resolvers. The exposed type set is the root types,
//! the entity types and the built-in scalars; directives are `@skip` and
//! `@include`.

use async_graphql_parser::types::Field;
use async_graphql_value::ConstValue;
use serde_json::Value;

use crate::schema::{FieldDef, ObjectType, Schema, TypeRef};

use super::coerce::{resolve_value, Variables};
use super::errors::GraphQLError;

/// Built-in scalars with their descriptions
static SCALARS: [(&str, &str); 4] = [
    (
        "Boolean",
        "The `Boolean` scalar type represents `true` or `false`.",
    ),
    (
        "ID",
        "The `ID` scalar type represents a unique identifier, serialized as a String.",
    ),
    (
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values \
         between -(2^31) and 2^31 - 1.",
    ),
    (
        "String",
        "The `String` scalar type represents textual data as UTF-8 character sequences.",
    ),
];

/// A directive the executor understands
#[derive(Debug)]
pub(super) struct DirectiveDef {
    name: &'static str,
    description: &'static str,
    locations: &'static [&'static str],
}

const FIELD_LOCATIONS: &[&str] = &["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"];

static DIRECTIVES: [DirectiveDef; 2] = [
    DirectiveDef {
        name: "include",
        description: "Directs the executor to include this field or fragment only when \
                      the `if` argument is true.",
        locations: FIELD_LOCATIONS,
    },
    DirectiveDef {
        name: "skip",
        description: "Directs the executor to skip this field or fragment when the `if` \
                      argument is true.",
        locations: FIELD_LOCATIONS,
    },
];

/// A type reference as introspection exposes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TypeView {
    Named(&'static str),
    List(Box<TypeView>),
    NonNull(Box<TypeView>),
}

impl From<&TypeRef> for TypeView {
    fn from(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Scalar(kind) => TypeView::Named(kind.type_name()),
            TypeRef::Object(name) => TypeView::Named(*name),
            TypeRef::List(inner) => TypeView::List(Box::new(TypeView::from(inner.as_ref()))),
            TypeRef::NonNull(inner) => TypeView::NonNull(Box::new(TypeView::from(inner.as_ref()))),
        }
    }
}

/// An argument as introspection exposes it
#[derive(Debug, Clone)]
pub(super) struct InputView {
    name: &'static str,
    ty: TypeView,
}

/// An introspection object
#[derive(Debug, Clone)]
pub(super) enum Meta<'a> {
    Schema,
    Type(TypeView),
    Field(&'a FieldDef),
    InputValue(InputView),
    Directive(&'static DirectiveDef),
}

impl Meta<'_> {
    /// The introspection type this object is an instance of
    pub(super) fn type_name(&self) -> &'static str {
        match self {
            Meta::Schema => "__Schema",
            Meta::Type(_) => "__Type",
            Meta::Field(_) => "__Field",
            Meta::InputValue(_) => "__InputValue",
            Meta::Directive(_) => "__Directive",
        }
    }
}

/// Value of one introspection field before completion
#[derive(Debug, Clone)]
pub(super) enum MetaValue<'a> {
    Null,
    Leaf(Value),
    Object(Meta<'a>),
    List(Vec<MetaValue<'a>>),
}

impl<'a> MetaValue<'a> {
    fn text(value: &str) -> Self {
        MetaValue::Leaf(Value::String(value.to_string()))
    }

    fn optional_text(value: Option<&str>) -> Self {
        value.map_or(MetaValue::Null, MetaValue::text)
    }

    fn flag(value: bool) -> Self {
        MetaValue::Leaf(Value::Bool(value))
    }

    fn of_type(ty: TypeView) -> Self {
        MetaValue::Object(Meta::Type(ty))
    }
}

/// Resolves `__type(name:)`; null when no such type is exposed
pub(super) fn type_by_name<'a>(
    schema: &'a Schema,
    field: &Field,
    variables: &Variables,
) -> Result<MetaValue<'a>, GraphQLError> {
    let argument = field
        .arguments
        .iter()
        .find(|(name, _)| name.node.as_str() == "name")
        .map(|(_, value)| resolve_value(&value.node, variables));

    let name = match argument {
        Some(ConstValue::String(name)) => name,
        _ => {
            return Err(GraphQLError::validation(
                "Field \"__type\" argument \"name\" of type \"String!\" is required, but it was not provided.",
            ))
        }
    };

    Ok(named_type(schema, &name).map_or(MetaValue::Null, |name| {
        MetaValue::of_type(TypeView::Named(name))
    }))
}

/// Resolves one field of an introspection object, `None` when the
/// introspection type has no such field
pub(super) fn resolve_meta<'a>(
    schema: &'a Schema,
    meta: &Meta<'a>,
    field: &str,
) -> Option<MetaValue<'a>> {
    match meta {
        Meta::Schema => schema_field(schema, field),
        Meta::Type(ty) => type_field(schema, ty, field),
        Meta::Field(definition) => field_field(definition, field),
        Meta::InputValue(input) => input_field(input, field),
        Meta::Directive(directive) => directive_field(directive, field),
    }
}

fn schema_field<'a>(schema: &'a Schema, field: &str) -> Option<MetaValue<'a>> {
    let value = match field {
        "description" => MetaValue::Null,
        "queryType" => MetaValue::of_type(TypeView::Named(schema.query_type().name)),
        "mutationType" => MetaValue::of_type(TypeView::Named(schema.mutation_type().name)),
        "subscriptionType" => MetaValue::Null,
        "types" => MetaValue::List(
            objects(schema)
                .map(|object| object.name)
                .chain(SCALARS.iter().map(|(name, _)| *name))
                .map(|name| MetaValue::of_type(TypeView::Named(name)))
                .collect(),
        ),
        "directives" => MetaValue::List(
            DIRECTIVES
                .iter()
                .map(|directive| MetaValue::Object(Meta::Directive(directive)))
                .collect(),
        ),
        _ => return None,
    };
    Some(value)
}

fn type_field<'a>(schema: &'a Schema, ty: &TypeView, field: &str) -> Option<MetaValue<'a>> {
    let object = match ty {
        TypeView::Named(name) => schema.object(name),
        _ => None,
    };

    let value = match (field, ty) {
        ("kind", TypeView::Named(_)) if object.is_some() => MetaValue::text("OBJECT"),
        ("kind", TypeView::Named(_)) => MetaValue::text("SCALAR"),
        ("kind", TypeView::List(_)) => MetaValue::text("LIST"),
        ("kind", TypeView::NonNull(_)) => MetaValue::text("NON_NULL"),
        ("name", TypeView::Named(name)) => MetaValue::text(name),
        ("description", TypeView::Named(name)) => match object {
            Some(object) => MetaValue::optional_text(object.description),
            None => MetaValue::optional_text(scalar_description(name)),
        },
        ("fields", _) => match object {
            Some(object) => MetaValue::List(
                object
                    .fields
                    .iter()
                    .map(|definition| MetaValue::Object(Meta::Field(definition)))
                    .collect(),
            ),
            None => MetaValue::Null,
        },
        ("interfaces", _) => match object {
            Some(_) => MetaValue::List(Vec::new()),
            None => MetaValue::Null,
        },
        ("ofType", TypeView::List(inner) | TypeView::NonNull(inner)) => {
            MetaValue::of_type(inner.as_ref().clone())
        }
        (
            "name" | "description" | "ofType" | "possibleTypes" | "enumValues" | "inputFields"
            | "specifiedByURL" | "specifiedByUrl" | "isOneOf",
            _,
        ) => MetaValue::Null,
        _ => return None,
    };
    Some(value)
}

fn field_field<'a>(definition: &'a FieldDef, field: &str) -> Option<MetaValue<'a>> {
    let value = match field {
        "name" => MetaValue::text(definition.name),
        "description" => MetaValue::optional_text(definition.description),
        "args" => MetaValue::List(
            definition
                .args
                .iter()
                .map(|arg| {
                    MetaValue::Object(Meta::InputValue(InputView {
                        name: arg.name,
                        ty: TypeView::from(&arg.type_ref()),
                    }))
                })
                .collect(),
        ),
        "type" => MetaValue::of_type(TypeView::from(&definition.ty)),
        "isDeprecated" => MetaValue::flag(false),
        "deprecationReason" => MetaValue::Null,
        _ => return None,
    };
    Some(value)
}

fn input_field<'a>(input: &InputView, field: &str) -> Option<MetaValue<'a>> {
    let value = match field {
        "name" => MetaValue::text(input.name),
        "type" => MetaValue::of_type(input.ty.clone()),
        "isDeprecated" => MetaValue::flag(false),
        "description" | "defaultValue" | "deprecationReason" => MetaValue::Null,
        _ => return None,
    };
    Some(value)
}

fn directive_field<'a>(directive: &'static DirectiveDef, field: &str) -> Option<MetaValue<'a>> {
    let value = match field {
        "name" => MetaValue::text(directive.name),
        "description" => MetaValue::text(directive.description),
        "locations" => MetaValue::List(
            directive
                .locations
                .iter()
                .map(|location| MetaValue::text(location))
                .collect(),
        ),
        "args" => MetaValue::List(vec![MetaValue::Object(Meta::InputValue(InputView {
            name: "if",
            ty: TypeView::NonNull(Box::new(TypeView::Named("Boolean"))),
        }))]),
        "isRepeatable" => MetaValue::flag(false),
        _ => return None,
    };
    Some(value)
}

fn objects(schema: &Schema) -> impl Iterator<Item = &ObjectType> {
    std::iter::once(schema.query_type())
        .chain(std::iter::once(schema.mutation_type()))
        .chain(schema.types().iter())
}

fn named_type(schema: &Schema, name: &str) -> Option<&'static str> {
    objects(schema)
        .map(|object| object.name)
        .chain(SCALARS.iter().map(|(name, _)| *name))
        .find(|candidate| *candidate == name)
}

fn scalar_description(name: &str) -> Option<&'static str> {
    SCALARS
        .iter()
        .find(|(scalar, _)| *scalar == name)
        .map(|(_, description)| *description)
}
