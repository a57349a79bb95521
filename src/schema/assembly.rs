//! Schema assembly: root query and mutation types over the registered
//! entity types
//!
//! Read entry points return null for a missing id; write entry points that
//! target an existing record (`update*`, `delete*`) fail with NotFound when
//! the record is absent.

use std::collections::HashSet;

use serde_json::json;
use tracing::info;

use crate::model::{fields, Entity};
use crate::storage::{Collection, Fields, Filter};

use super::errors::{SchemaError, SchemaResult};
use super::loaders::{find_many, find_one, type_name};
use super::registry::TypeRegistry;
use super::resolver::{resolver_fn, FieldValue, ResolverContext, ResolverError, ResolverResult};
use super::types::{ArgDef, FieldDef, NamedType, ObjectType, ScalarKind, TypeRef};

/// Root query type name
pub const QUERY_TYPE: &str = "RootQueryType";
/// Root mutation type name
pub const MUTATION_TYPE: &str = "Mutation";

/// Build-time switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Reject `createHobby`/`createPost` whose `userId` names no user
    pub strict_references: bool,
}

/// The assembled schema: the only contract surface of the engine
#[derive(Debug, Clone)]
pub struct Schema {
    query: ObjectType,
    mutation: ObjectType,
    types: Vec<ObjectType>,
    options: SchemaOptions,
}

impl Schema {
    /// Assembles and validates the schema
    pub fn build(options: SchemaOptions) -> SchemaResult<Self> {
        Self::from_parts(
            query_root(),
            mutation_root(options),
            TypeRegistry::new().into_types(),
            options,
        )
    }

    /// Assembles a schema from explicit root and object types
    pub fn from_parts(
        query: ObjectType,
        mutation: ObjectType,
        types: Vec<ObjectType>,
        options: SchemaOptions,
    ) -> SchemaResult<Self> {
        let schema = Self {
            query,
            mutation,
            types,
            options,
        };
        schema.validate_structure()?;
        Ok(schema)
    }

    pub fn query_type(&self) -> &ObjectType {
        &self.query
    }

    pub fn mutation_type(&self) -> &ObjectType {
        &self.mutation
    }

    /// Entity object types
    pub fn types(&self) -> &[ObjectType] {
        &self.types
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    /// Looks up any object type, roots included
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        if name == self.query.name {
            return Some(&self.query);
        }
        if name == self.mutation.name {
            return Some(&self.mutation);
        }
        self.types.iter().find(|t| t.name == name)
    }

    /// Checks that every referenced type exists and names are unique
    fn validate_structure(&self) -> SchemaResult<()> {
        let all = std::iter::once(&self.query)
            .chain(std::iter::once(&self.mutation))
            .chain(self.types.iter());

        for object in all {
            if object.fields.is_empty() {
                return Err(SchemaError::empty_type(object.name));
            }

            let mut field_names = HashSet::new();
            for field in &object.fields {
                if !field_names.insert(field.name) {
                    return Err(SchemaError::duplicate_field(object.name, field.name));
                }

                let mut arg_names = HashSet::new();
                for arg in &field.args {
                    if !arg_names.insert(arg.name) {
                        return Err(SchemaError::duplicate_argument(
                            object.name,
                            field.name,
                            arg.name,
                        ));
                    }
                }

                if let NamedType::Object(referenced) = field.ty.named() {
                    if self.object(referenced).is_none() {
                        return Err(SchemaError::unknown_type(
                            object.name,
                            field.name,
                            referenced,
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

fn query_root() -> ObjectType {
    ObjectType::new(QUERY_TYPE)
        .with_description("Root Query Type")
        .with_field(
            FieldDef::new(
                "user",
                TypeRef::object("User"),
                resolver_fn(|ctx, _, args| {
                    Ok(find_one(ctx, Collection::Users, args.require_str("id")?)?.into())
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
        .with_field(FieldDef::new(
            "users",
            TypeRef::object("User").list(),
            resolver_fn(|ctx, _, _| find_many(ctx, Collection::Users, &Filter::All)),
        ))
        .with_field(
            FieldDef::new(
                "hobby",
                TypeRef::object("Hobby"),
                resolver_fn(|ctx, _, args| {
                    Ok(find_one(ctx, Collection::Hobbies, args.require_str("id")?)?.into())
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "hobbies",
                TypeRef::object("Hobby").list(),
                resolver_fn(|ctx, _, args| {
                    let filter = Filter::eq("userId", args.require_str("userId")?);
                    find_many(ctx, Collection::Hobbies, &filter)
                }),
            )
            .with_arg(ArgDef::required("userId", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "post",
                TypeRef::object("Post"),
                resolver_fn(|ctx, _, args| {
                    Ok(find_one(ctx, Collection::Posts, args.require_str("id")?)?.into())
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
        .with_field(FieldDef::new(
            "posts",
            TypeRef::object("Post").list(),
            resolver_fn(|ctx, _, _| find_many(ctx, Collection::Posts, &Filter::All)),
        ))
}

fn mutation_root(options: SchemaOptions) -> ObjectType {
    let strict = options.strict_references;

    ObjectType::new(MUTATION_TYPE)
        .with_description("Create, update and delete entry points")
        .with_field(
            FieldDef::new(
                "createUser",
                TypeRef::object("User"),
                resolver_fn(|ctx, _, args| {
                    let values = fields([
                        ("name", json!(args.require_str("name")?)),
                        ("age", json!(args.require_int("age")?)),
                        ("profession", json!(args.require_str("profession")?)),
                    ]);
                    create(ctx, Collection::Users, values)
                }),
            )
            .with_arg(ArgDef::required("name", ScalarKind::String))
            .with_arg(ArgDef::required("age", ScalarKind::Int))
            .with_arg(ArgDef::required("profession", ScalarKind::String)),
        )
        .with_field(
            FieldDef::new(
                "updateUser",
                TypeRef::object("User"),
                resolver_fn(|ctx, _, args| {
                    let values = fields([
                        ("name", json!(args.require_str("name")?)),
                        ("age", json!(args.require_int("age")?)),
                        ("profession", json!(args.require_str("profession")?)),
                    ]);
                    update(ctx, Collection::Users, args.require_str("id")?, values)
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id))
            .with_arg(ArgDef::required("name", ScalarKind::String))
            .with_arg(ArgDef::required("age", ScalarKind::Int))
            .with_arg(ArgDef::required("profession", ScalarKind::String)),
        )
        .with_field(
            FieldDef::new(
                "deleteUser",
                TypeRef::object("User"),
                resolver_fn(|ctx, _, args| {
                    delete(ctx, Collection::Users, args.require_str("id")?)
                }),
            )
            .with_description("Removes the user only; hobbies and posts are kept")
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "createPost",
                TypeRef::object("Post"),
                resolver_fn(move |ctx, _, args| {
                    let user_id = args.require_str("userId")?;
                    if strict {
                        require_owner(ctx, user_id)?;
                    }
                    let values = fields([
                        ("comment", json!(args.require_str("comment")?)),
                        ("userId", json!(user_id)),
                    ]);
                    create(ctx, Collection::Posts, values)
                }),
            )
            .with_arg(ArgDef::required("comment", ScalarKind::String))
            .with_arg(ArgDef::required("userId", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "updatePost",
                TypeRef::object("Post"),
                resolver_fn(|ctx, _, args| {
                    let values = fields([("comment", json!(args.require_str("comment")?))]);
                    update(ctx, Collection::Posts, args.require_str("id")?, values)
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id))
            .with_arg(ArgDef::required("comment", ScalarKind::String)),
        )
        .with_field(
            FieldDef::new(
                "deletePost",
                TypeRef::object("Post"),
                resolver_fn(|ctx, _, args| {
                    delete(ctx, Collection::Posts, args.require_str("id")?)
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "createHobby",
                TypeRef::object("Hobby"),
                resolver_fn(move |ctx, _, args| {
                    let user_id = args.require_str("userId")?;
                    if strict {
                        require_owner(ctx, user_id)?;
                    }
                    let values = fields([
                        ("title", json!(args.require_str("title")?)),
                        ("description", json!(args.require_str("description")?)),
                        ("userId", json!(user_id)),
                    ]);
                    create(ctx, Collection::Hobbies, values)
                }),
            )
            .with_arg(ArgDef::required("title", ScalarKind::String))
            .with_arg(ArgDef::required("description", ScalarKind::String))
            .with_arg(ArgDef::required("userId", ScalarKind::Id)),
        )
        .with_field(
            FieldDef::new(
                "updateHobby",
                TypeRef::object("Hobby"),
                resolver_fn(|ctx, _, args| {
                    let values = fields([
                        ("title", json!(args.require_str("title")?)),
                        ("description", json!(args.require_str("description")?)),
                    ]);
                    update(ctx, Collection::Hobbies, args.require_str("id")?, values)
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id))
            .with_arg(ArgDef::required("title", ScalarKind::String))
            .with_arg(ArgDef::required("description", ScalarKind::String)),
        )
        .with_field(
            FieldDef::new(
                "deleteHobby",
                TypeRef::object("Hobby"),
                resolver_fn(|ctx, _, args| {
                    delete(ctx, Collection::Hobbies, args.require_str("id")?)
                }),
            )
            .with_arg(ArgDef::required("id", ScalarKind::Id)),
        )
}

fn require_owner(ctx: &ResolverContext<'_>, user_id: &str) -> ResolverResult<()> {
    match find_one(ctx, Collection::Users, user_id)? {
        Some(_) => Ok(()),
        None => Err(ResolverError::not_found("User", user_id)),
    }
}

fn create(
    ctx: &ResolverContext<'_>,
    collection: Collection,
    values: Fields,
) -> ResolverResult<FieldValue> {
    let record = ctx.store().insert(collection, values)?;
    info!(collection = %collection, id = %record.id, "created record");
    Ok(Entity::from_record(collection, record)?.into())
}

fn update(
    ctx: &ResolverContext<'_>,
    collection: Collection,
    id: &str,
    values: Fields,
) -> ResolverResult<FieldValue> {
    match ctx.store().update_by_id(collection, id, values)? {
        Some(record) => {
            info!(collection = %collection, id = %record.id, "updated record");
            Ok(Entity::from_record(collection, record)?.into())
        }
        None => Err(ResolverError::not_found(type_name(collection), id)),
    }
}

fn delete(
    ctx: &ResolverContext<'_>,
    collection: Collection,
    id: &str,
) -> ResolverResult<FieldValue> {
    match ctx.store().delete_by_id(collection, id)? {
        Some(record) => {
            info!(collection = %collection, id = %record.id, "deleted record");
            Ok(Entity::from_record(collection, record)?.into())
        }
        None => Err(ResolverError::not_found(type_name(collection), id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builds() {
        let schema = Schema::build(SchemaOptions::default()).unwrap();
        assert_eq!(schema.query_type().name, QUERY_TYPE);
        assert!(schema.object("User").is_some());
        assert!(schema.object(MUTATION_TYPE).is_some());
        assert!(!schema.options().strict_references);
    }

    #[test]
    fn test_root_entry_points() {
        let schema = Schema::build(SchemaOptions::default()).unwrap();

        let queries: Vec<_> = schema.query_type().fields.iter().map(|f| f.name).collect();
        assert_eq!(
            queries,
            vec!["user", "users", "hobby", "hobbies", "post", "posts"]
        );

        let mutations: Vec<_> = schema.mutation_type().fields.iter().map(|f| f.name).collect();
        assert_eq!(
            mutations,
            vec![
                "createUser",
                "updateUser",
                "deleteUser",
                "createPost",
                "updatePost",
                "deletePost",
                "createHobby",
                "updateHobby",
                "deleteHobby",
            ]
        );
    }

    #[test]
    fn test_create_arguments_are_required() {
        let schema = Schema::build(SchemaOptions::default()).unwrap();
        let create_user = schema.mutation_type().field("createUser").unwrap();
        assert!(create_user.args.iter().all(|a| a.required));

        let update_post = schema.mutation_type().field("updatePost").unwrap();
        assert!(update_post.arg("userId").is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let mut schema = Schema::build(SchemaOptions::default()).unwrap();
        schema.types.retain(|t| t.name != "Hobby");

        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code().code(), "SCHEMA_UNKNOWN_TYPE");
    }

    #[test]
    fn test_validate_rejects_duplicate_field() {
        let mut schema = Schema::build(SchemaOptions::default()).unwrap();
        let users = schema.query.fields[1].clone();
        schema.query.fields.push(users);

        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code().code(), "SCHEMA_DUPLICATE_FIELD");
    }
}
