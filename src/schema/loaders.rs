//! Storage access shared by entity and root resolvers

use crate::model::{Entity, Hobby, Post, User};
use crate::storage::{Collection, Filter};

use super::resolver::{FieldValue, ResolverContext, ResolverError, ResolverResult};

/// Object type name exposed for a collection's entities
pub(crate) fn type_name(collection: Collection) -> &'static str {
    match collection {
        Collection::Users => "User",
        Collection::Hobbies => "Hobby",
        Collection::Posts => "Post",
    }
}

/// Loads one entity, `None` when absent
pub(crate) fn find_one(
    ctx: &ResolverContext<'_>,
    collection: Collection,
    id: &str,
) -> ResolverResult<Option<Entity>> {
    ctx.store()
        .find_by_id(collection, id)?
        .map(|record| Entity::from_record(collection, record))
        .transpose()
        .map_err(ResolverError::from)
}

/// Loads every entity matching the filter, in storage order
pub(crate) fn find_many(
    ctx: &ResolverContext<'_>,
    collection: Collection,
    filter: &Filter,
) -> ResolverResult<FieldValue> {
    let entities = ctx
        .store()
        .find(collection, filter)?
        .into_iter()
        .map(|record| Entity::from_record(collection, record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FieldValue::list(entities))
}

pub(crate) fn parent_user(parent: Option<&Entity>) -> ResolverResult<&User> {
    match parent {
        Some(Entity::User(user)) => Ok(user),
        other => Err(unexpected_parent("User", other)),
    }
}

pub(crate) fn parent_hobby(parent: Option<&Entity>) -> ResolverResult<&Hobby> {
    match parent {
        Some(Entity::Hobby(hobby)) => Ok(hobby),
        other => Err(unexpected_parent("Hobby", other)),
    }
}

pub(crate) fn parent_post(parent: Option<&Entity>) -> ResolverResult<&Post> {
    match parent {
        Some(Entity::Post(post)) => Ok(post),
        other => Err(unexpected_parent("Post", other)),
    }
}

fn unexpected_parent(expected: &'static str, actual: Option<&Entity>) -> ResolverError {
    ResolverError::UnexpectedParent {
        expected,
        actual: actual.map_or("root", Entity::type_name),
    }
}
