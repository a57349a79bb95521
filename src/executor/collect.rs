//! Field collection: flattens fragments and directives of one or more
//! selection sets into response keys, in first-appearance order.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::types::{Field, FragmentDefinition, Selection, SelectionSet};
use async_graphql_parser::Positioned;
use async_graphql_value::Name;

use super::coerce::{should_include, Variables};
use super::errors::GraphQLError;

/// Every occurrence of one response key
#[derive(Debug)]
pub struct CollectedField<'a> {
    pub response_key: &'a str,
    pub fields: Vec<&'a Positioned<Field>>,
}

impl<'a> CollectedField<'a> {
    /// The occurrence whose name, arguments and position represent the key
    pub fn first(&self) -> &'a Positioned<Field> {
        self.fields[0]
    }

    /// Sub-selections of every occurrence, merged
    pub fn selection_sets(&self) -> Vec<&'a SelectionSet> {
        self.fields
            .iter()
            .map(|field| &field.node.selection_set.node)
            .collect()
    }

    /// Why the occurrences cannot be merged: they name different fields or
    /// pass different arguments
    pub fn conflict(&self) -> Option<String> {
        let first = &self.first().node;
        let first_args = argument_text(first);

        self.fields[1..].iter().find_map(|other| {
            let other = &other.node;
            if other.name.node != first.name.node {
                Some(format!(
                    "Fields \"{}\" conflict because \"{}\" and \"{}\" are different fields. \
                     Use different aliases on the fields to fetch both if this was intentional.",
                    self.response_key, first.name.node, other.name.node
                ))
            } else if argument_text(other) != first_args {
                Some(format!(
                    "Fields \"{}\" conflict because they have differing arguments. \
                     Use different aliases on the fields to fetch both if this was intentional.",
                    self.response_key
                ))
            } else {
                None
            }
        })
    }
}

/// Arguments as sorted `(name, literal)` pairs
fn argument_text(field: &Field) -> Vec<(String, String)> {
    let mut args: Vec<_> = field
        .arguments
        .iter()
        .map(|(name, value)| (name.node.to_string(), value.node.to_string()))
        .collect();
    args.sort();
    args
}

/// Collects fields selected on the object type named `type_name`.
///
/// Selections excluded by `@skip`/`@include` or by a fragment type condition
/// naming another type are dropped. Directive and fragment lookup failures
/// are appended to `errors` and the offending selection is dropped.
pub fn collect_fields<'a>(
    type_name: &str,
    selection_sets: &[&'a SelectionSet],
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &Variables,
    errors: &mut Vec<GraphQLError>,
) -> Vec<CollectedField<'a>> {
    let mut collector = Collector {
        type_name,
        fragments,
        variables,
        errors,
        visited: HashSet::new(),
        collected: Vec::new(),
    };
    for selection_set in selection_sets {
        collector.collect(selection_set);
    }
    collector.collected
}

struct Collector<'a, 'b> {
    type_name: &'b str,
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &'b Variables,
    errors: &'b mut Vec<GraphQLError>,
    visited: HashSet<&'a str>,
    collected: Vec<CollectedField<'a>>,
}

impl<'a, 'b> Collector<'a, 'b> {
    fn collect(&mut self, selection_set: &'a SelectionSet) {
        for selection in &selection_set.items {
            let directives = match &selection.node {
                Selection::Field(field) => &field.node.directives,
                Selection::FragmentSpread(spread) => &spread.node.directives,
                Selection::InlineFragment(inline) => &inline.node.directives,
            };
            match should_include(directives, self.variables) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    self.errors.push(err);
                    continue;
                }
            }

            match &selection.node {
                Selection::Field(field) => self.push(field),
                Selection::FragmentSpread(spread) => {
                    let name = spread.node.fragment_name.node.as_str();
                    if !self.visited.insert(name) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(name) else {
                        self.errors.push(
                            GraphQLError::validation(format!("Unknown fragment \"{}\".", name))
                                .at(spread.pos),
                        );
                        continue;
                    };
                    if self.applies(Some(fragment.node.type_condition.node.on.node.as_str())) {
                        self.collect(&fragment.node.selection_set.node);
                    }
                }
                Selection::InlineFragment(inline) => {
                    let condition = inline
                        .node
                        .type_condition
                        .as_ref()
                        .map(|c| c.node.on.node.as_str());
                    if self.applies(condition) {
                        self.collect(&inline.node.selection_set.node);
                    }
                }
            }
        }
    }

    fn applies(&self, type_condition: Option<&str>) -> bool {
        type_condition.map_or(true, |name| name == self.type_name)
    }

    fn push(&mut self, field: &'a Positioned<Field>) {
        let key = field.node.response_key().node.as_str();
        match self.collected.iter_mut().find(|c| c.response_key == key) {
            Some(existing) => existing.fields.push(field),
            None => self.collected.push(CollectedField {
                response_key: key,
                fields: vec![field],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql_parser::parse_query;
    use async_graphql_parser::types::{DocumentOperations, ExecutableDocument};

    fn with_collected<T>(
        query: &str,
        type_name: &str,
        f: impl FnOnce(&[CollectedField<'_>], usize) -> T,
    ) -> T {
        let document: ExecutableDocument = parse_query(query).unwrap();
        let op = match &document.operations {
            DocumentOperations::Single(op) => op,
            DocumentOperations::Multiple(_) => panic!("expected one operation"),
        };
        let mut errors = Vec::new();
        let collected = collect_fields(
            type_name,
            &[&op.node.selection_set.node],
            &document.fragments,
            &Variables::new(),
            &mut errors,
        );
        f(&collected, errors.len())
    }

    fn keys(query: &str, type_name: &str) -> (Vec<String>, usize) {
        with_collected(query, type_name, |collected, errors| {
            (
                collected.iter().map(|c| c.response_key.to_string()).collect(),
                errors,
            )
        })
    }

    fn conflicts(query: &str) -> Vec<Option<String>> {
        with_collected(query, "Mutation", |collected, _| {
            collected.iter().map(CollectedField::conflict).collect()
        })
    }

    #[test]
    fn test_aliases_and_merging() {
        let (keys, errors) = keys("{ users { id } everyone: users { name } users { age } }", "RootQueryType");
        assert_eq!(keys, vec!["users", "everyone"]);
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_fragments_and_directives() {
        let query = r#"
            { ...Roots posts @skip(if: true) ... on RootQueryType { hobby(id: "1") { id } } }
            fragment Roots on RootQueryType { users { id } }
        "#;
        let (keys, _) = keys(query, "RootQueryType");
        assert_eq!(keys, vec!["users", "hobby"]);
    }

    #[test]
    fn test_type_condition_mismatch_is_dropped() {
        let (keys, _) = keys("{ users { id } ... on Mutation { deleteUser(id: \"1\") { id } } }", "RootQueryType");
        assert_eq!(keys, vec!["users"]);
    }

    #[test]
    fn test_unknown_fragment_is_reported() {
        let (keys, errors) = keys("{ users { id } ...Missing }", "RootQueryType");
        assert_eq!(keys, vec!["users"]);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_identical_occurrences_merge_cleanly() {
        let found = conflicts(
            r#"mutation { deleteHobby(id: "1") { id } deleteHobby(id: "1") { title } }"#,
        );
        assert_eq!(found, vec![None]);
    }

    #[test]
    fn test_differing_arguments_conflict() {
        let found = conflicts(
            r#"mutation { deleteHobby(id: "1") { id } deleteHobby(id: "2") { id } }"#,
        );
        assert!(found[0].as_ref().unwrap().contains("differing arguments"));
    }

    #[test]
    fn test_argument_order_does_not_conflict() {
        let found = conflicts(
            r#"mutation {
                updatePost(id: "1", comment: "x") { id }
                updatePost(comment: "x", id: "1") { id }
            }"#,
        );
        assert_eq!(found, vec![None]);
    }

    #[test]
    fn test_different_fields_under_one_alias_conflict() {
        let found = conflicts(
            r#"mutation { gone: deletePost(id: "1") { id } gone: deleteHobby(id: "1") { id } }"#,
        );
        assert!(found[0].as_ref().unwrap().contains("\"deletePost\" and \"deleteHobby\""));
    }
}
