//! Type registry: the entity object types and their field resolvers
//!
//! Scalar fields read the already-resolved parent. Relational fields go to
//! the store:
//! - `User.posts` / `User.hobbies`: children whose `userId` is the parent's id
//! - `Hobby.user` / `Post.user`: the user named by the parent's `userId`

use crate::storage::{Collection, Filter};

use super::loaders::{find_many, find_one, parent_hobby, parent_post, parent_user};
use super::resolver::{resolver_fn, FieldValue};
use super::types::{FieldDef, ObjectType, TypeRef};

/// Registered entity types, in declaration order
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<ObjectType>,
}

impl TypeRegistry {
    /// Registry holding `User`, `Hobby` and `Post`
    pub fn new() -> Self {
        Self {
            types: vec![user_type(), hobby_type(), post_type()],
        }
    }

    /// Looks up a type by name
    pub fn get(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter()
    }

    pub fn into_types(self) -> Vec<ObjectType> {
        self.types
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn user_type() -> ObjectType {
    ObjectType::new("User")
        .with_description("A person who owns hobbies and posts")
        .with_field(FieldDef::new(
            "id",
            TypeRef::id().non_null(),
            resolver_fn(|_, parent, _| Ok(parent_user(parent)?.id.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "name",
            TypeRef::string(),
            resolver_fn(|_, parent, _| Ok(parent_user(parent)?.name.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "age",
            TypeRef::int(),
            resolver_fn(|_, parent, _| Ok(parent_user(parent)?.age.into())),
        ))
        .with_field(FieldDef::new(
            "profession",
            TypeRef::string(),
            resolver_fn(|_, parent, _| Ok(parent_user(parent)?.profession.as_str().into())),
        ))
        .with_field(
            FieldDef::new(
                "posts",
                TypeRef::object("Post").list(),
                resolver_fn(|ctx, parent, _| {
                    let user = parent_user(parent)?;
                    find_many(ctx, Collection::Posts, &Filter::eq("userId", user.id.as_str()))
                }),
            )
            .with_description("Posts whose userId is this user's id"),
        )
        .with_field(
            FieldDef::new(
                "hobbies",
                TypeRef::object("Hobby").list(),
                resolver_fn(|ctx, parent, _| {
                    let user = parent_user(parent)?;
                    find_many(ctx, Collection::Hobbies, &Filter::eq("userId", user.id.as_str()))
                }),
            )
            .with_description("Hobbies whose userId is this user's id"),
        )
}

fn hobby_type() -> ObjectType {
    ObjectType::new("Hobby")
        .with_description("A pastime belonging to one user")
        .with_field(FieldDef::new(
            "id",
            TypeRef::id().non_null(),
            resolver_fn(|_, parent, _| Ok(parent_hobby(parent)?.id.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "title",
            TypeRef::string(),
            resolver_fn(|_, parent, _| Ok(parent_hobby(parent)?.title.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "description",
            TypeRef::string(),
            resolver_fn(|_, parent, _| Ok(parent_hobby(parent)?.description.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "userId",
            TypeRef::id(),
            resolver_fn(|_, parent, _| Ok(parent_hobby(parent)?.user_id.as_str().into())),
        ))
        .with_field(
            FieldDef::new(
                "user",
                TypeRef::object("User"),
                resolver_fn(|ctx, parent, _| {
                    let hobby = parent_hobby(parent)?;
                    Ok(FieldValue::from(find_one(ctx, Collection::Users, &hobby.user_id)?))
                }),
            )
            .with_description("The owner, or null when the referenced user does not exist"),
        )
}

fn post_type() -> ObjectType {
    ObjectType::new("Post")
        .with_description("A comment written by one user")
        .with_field(FieldDef::new(
            "id",
            TypeRef::id().non_null(),
            resolver_fn(|_, parent, _| Ok(parent_post(parent)?.id.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "comment",
            TypeRef::string(),
            resolver_fn(|_, parent, _| Ok(parent_post(parent)?.comment.as_str().into())),
        ))
        .with_field(FieldDef::new(
            "userId",
            TypeRef::id(),
            resolver_fn(|_, parent, _| Ok(parent_post(parent)?.user_id.as_str().into())),
        ))
        .with_field(
            FieldDef::new(
                "user",
                TypeRef::object("User"),
                resolver_fn(|ctx, parent, _| {
                    let post = parent_post(parent)?;
                    Ok(FieldValue::from(find_one(ctx, Collection::Users, &post.user_id)?))
                }),
            )
            .with_description("The owner, or null when the referenced user does not exist"),
        )
}
