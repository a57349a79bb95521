//! Input coercion for variables, field arguments and directive arguments
//!
//! Input scalars:
//! - `ID`: a non-blank string, or an integer which is converted to its
//!   decimal string
//! - `String`: a string
//! - `Int`: an integer within the signed 32-bit range
//! - `Boolean`: only used by `@skip` / `@include`

use std::collections::HashMap;
use std::convert::Infallible;

use async_graphql_parser::types::{BaseType, Directive, Field, Type, VariableDefinition};
use async_graphql_parser::Positioned;
use async_graphql_value::{ConstValue, Name, Value as InputValue};
use serde_json::{Map, Value};

use crate::schema::{Arguments, FieldDef};

use super::errors::GraphQLError;

/// Coerced operation variables
pub type Variables = HashMap<Name, ConstValue>;

/// Coerces request variables against the operation's definitions.
///
/// Undeclared request variables are ignored. Declared variables absent from
/// the request take their default, or stay undefined when nullable.
pub fn coerce_variables(
    definitions: &[Positioned<VariableDefinition>],
    input: Option<&Map<String, Value>>,
) -> Result<Variables, GraphQLError> {
    let mut variables = Variables::new();

    for definition in definitions {
        let name = &definition.node.name.node;
        let ty = &definition.node.var_type.node;

        let supplied = input.and_then(|vars| vars.get(name.as_str()));
        let value = match (supplied, &definition.node.default_value) {
            (Some(json), _) => ConstValue::from_json(json.clone()).map_err(|e| {
                GraphQLError::validation(format!(
                    "Variable \"${}\" got invalid value: {}",
                    name, e
                ))
                .at(definition.pos)
            })?,
            (None, Some(default)) => default.node.clone(),
            (None, None) if !ty.nullable => {
                return Err(GraphQLError::validation(format!(
                    "Variable \"${}\" of required type \"{}\" was not provided.",
                    name, ty
                ))
                .at(definition.pos));
            }
            (None, None) => continue,
        };

        let value = coerce_input(ty, value).map_err(|reason| {
            GraphQLError::validation(format!(
                "Variable \"${}\" got invalid value; {}",
                name, reason
            ))
            .at(definition.pos)
        })?;
        variables.insert(name.clone(), value);
    }

    Ok(variables)
}

/// Coerces a literal or variable-bearing input value against a declared type
fn coerce_input(ty: &Type, value: ConstValue) -> Result<ConstValue, String> {
    if let ConstValue::Null = value {
        return if ty.nullable {
            Ok(ConstValue::Null)
        } else {
            Err(format!("Expected non-nullable type \"{}\" not to be null.", ty))
        };
    }

    match &ty.base {
        BaseType::Named(name) => coerce_scalar(name.as_str(), value),
        BaseType::List(inner) => match value {
            ConstValue::List(items) => items
                .into_iter()
                .map(|item| coerce_input(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(ConstValue::List),
            single => coerce_input(inner, single).map(|item| ConstValue::List(vec![item])),
        },
    }
}

/// Coerces a non-null value to a named input scalar
pub fn coerce_scalar(type_name: &str, value: ConstValue) -> Result<ConstValue, String> {
    match (type_name, value) {
        ("ID", ConstValue::String(s)) if s.trim().is_empty() => {
            Err("ID cannot represent an empty value".to_string())
        }
        ("ID", ConstValue::String(s)) => Ok(ConstValue::String(s)),
        ("ID", ConstValue::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(ConstValue::String(n.to_string()))
        }
        ("String", ConstValue::String(s)) => Ok(ConstValue::String(s)),
        ("Int", ConstValue::Number(n)) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => Ok(ConstValue::Number(n)),
            _ => Err(format!(
                "Int cannot represent non 32-bit signed integer value: {}",
                n
            )),
        },
        ("Boolean", ConstValue::Boolean(b)) => Ok(ConstValue::Boolean(b)),
        ("ID" | "String" | "Int" | "Boolean", other) => Err(format!(
            "{} cannot represent value: {}",
            type_name, other
        )),
        (unknown, _) => Err(format!("Unknown type \"{}\".", unknown)),
    }
}

/// Replaces variable references, undefined variables becoming null
pub fn resolve_value(value: &InputValue, variables: &Variables) -> ConstValue {
    value
        .clone()
        .into_const_with(|name| {
            Ok::<_, Infallible>(variables.get(&name).cloned().unwrap_or(ConstValue::Null))
        })
        .unwrap_or_else(|never| match never {})
}

/// Coerces the arguments of one field occurrence against its definition
pub fn coerce_arguments(
    type_name: &str,
    definition: &FieldDef,
    field: &Field,
    variables: &Variables,
) -> Result<Arguments, GraphQLError> {
    let mut arguments = Arguments::new();

    for (name, value) in &field.arguments {
        let Some(arg) = definition.arg(name.node.as_str()) else {
            return Err(GraphQLError::validation(format!(
                "Unknown argument \"{}\" on field \"{}.{}\".",
                name.node, type_name, definition.name
            ))
            .at(name.pos));
        };

        let resolved = resolve_value(&value.node, variables);
        if let ConstValue::Null = resolved {
            if arg.required {
                return Err(GraphQLError::validation(format!(
                    "Argument \"{}\" of non-null type \"{}\" must not be null.",
                    arg.name,
                    arg.type_ref()
                ))
                .at(value.pos));
            }
            continue;
        }

        let coerced = coerce_scalar(arg.kind.type_name(), resolved)
            .and_then(|v| v.into_json().map_err(|e| e.to_string()))
            .map_err(|reason| {
                GraphQLError::validation(format!(
                    "Argument \"{}\" has invalid value: {}",
                    arg.name, reason
                ))
                .at(value.pos)
            })?;
        arguments.insert(arg.name, coerced);
    }

    for arg in definition.args.iter().filter(|a| a.required) {
        if arguments.get(arg.name).is_none() {
            return Err(GraphQLError::validation(format!(
                "Field \"{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                definition.name,
                arg.name,
                arg.type_ref()
            )));
        }
    }

    Ok(arguments)
}

/// Evaluates `@skip(if:)` and `@include(if:)` on a selection
pub fn should_include(
    directives: &[Positioned<Directive>],
    variables: &Variables,
) -> Result<bool, GraphQLError> {
    for directive in directives {
        let name = directive.node.name.node.as_str();
        if name != "skip" && name != "include" {
            continue;
        }

        let flag = directive
            .node
            .get_argument("if")
            .map(|value| resolve_value(&value.node, variables));
        let flag = match flag {
            Some(ConstValue::Boolean(flag)) => flag,
            _ => {
                return Err(GraphQLError::validation(format!(
                    "Directive \"@{}\" argument \"if\" of type \"Boolean!\" is required.",
                    name
                ))
                .at(directive.pos))
            }
        };

        if (name == "skip" && flag) || (name == "include" && !flag) {
            return Ok(false);
        }
    }

    Ok(true)
}
