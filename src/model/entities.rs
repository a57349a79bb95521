use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{Collection, Fields, Record, StorageError, StorageResult};

/// A person owning hobbies and posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub profession: String,
}

/// A hobby, owned by one user through `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hobby {
    pub id: String,
    pub title: String,
    pub description: String,
    pub user_id: String,
}

/// A post, owned by one user through `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub comment: String,
    pub user_id: String,
}

fn decode<T: DeserializeOwned>(record: Record) -> StorageResult<T> {
    let id = record.id.clone();
    let mut fields = record.fields;
    fields.insert("id".to_string(), Value::String(record.id));
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| StorageError::invalid_record(&id, e.to_string()))
}

impl TryFrom<Record> for User {
    type Error = StorageError;

    fn try_from(record: Record) -> StorageResult<Self> {
        decode(record)
    }
}

impl TryFrom<Record> for Hobby {
    type Error = StorageError;

    fn try_from(record: Record) -> StorageResult<Self> {
        decode(record)
    }
}

impl TryFrom<Record> for Post {
    type Error = StorageError;

    fn try_from(record: Record) -> StorageResult<Self> {
        decode(record)
    }
}

/// Any resolved object that can act as a parent for child selections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    User(User),
    Hobby(Hobby),
    Post(Post),
}

impl Entity {
    /// Decodes a record of the given collection
    pub fn from_record(collection: Collection, record: Record) -> StorageResult<Self> {
        Ok(match collection {
            Collection::Users => Entity::User(record.try_into()?),
            Collection::Hobbies => Entity::Hobby(record.try_into()?),
            Collection::Posts => Entity::Post(record.try_into()?),
        })
    }

    /// Name of the object type this entity is exposed as
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::User(_) => "User",
            Entity::Hobby(_) => "Hobby",
            Entity::Post(_) => "Post",
        }
    }

    /// Identifier of the underlying record
    pub fn id(&self) -> &str {
        match self {
            Entity::User(u) => &u.id,
            Entity::Hobby(h) => &h.id,
            Entity::Post(p) => &p.id,
        }
    }
}

/// Builds a field map from `(name, value)` pairs
pub(crate) fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_record() {
        let record = Record::new(
            "u1",
            fields([
                ("name", json!("Ann")),
                ("age", json!(30)),
                ("profession", json!("Engineer")),
            ]),
        );

        let user = User::try_from(record).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.age, 30);
    }

    #[test]
    fn test_post_reads_camel_case_owner() {
        let record = Record::new("p1", fields([("comment", json!("hi")), ("userId", json!("u1"))]));

        match Entity::from_record(Collection::Posts, record).unwrap() {
            Entity::Post(post) => assert_eq!(post.user_id, "u1"),
            other => panic!("expected post, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_record_is_invalid_record_error() {
        let record = Record::new("h1", fields([("title", json!(7))]));
        let err = Entity::from_record(Collection::Hobbies, record).unwrap_err();
        assert_eq!(err.code().code(), "STORAGE_INVALID_RECORD");
    }
}
