//! The storage collaborator contract consumed by resolvers
//!
//! A store keeps three collections of records. Each record is an identifier
//! plus a flat JSON field map; typed entities are decoded from records by the
//! `model` layer.

use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::StorageResult;

/// The record kinds a store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Hobbies,
    Posts,
}

impl Collection {
    /// All collections, in a fixed order
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Hobbies, Collection::Posts];

    /// Returns the collection name used on disk and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Hobbies => "hobbies",
            Collection::Posts => "posts",
        }
    }

    /// Parses a collection name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field map of a record, excluding the identifier
pub type Fields = Map<String, Value>;

/// A stored record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Immutable identifier, unique within the collection
    pub id: String,
    /// Field values
    pub fields: Fields,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns a field value; `id` resolves to the identifier
    pub fn get(&self, field: &str) -> Option<Value> {
        if field == "id" {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(field).cloned()
    }

    /// Merges `fields` into this record. Keys not present in `fields` are
    /// left untouched.
    pub fn merge(&mut self, fields: Fields) {
        for (key, value) in fields {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }
}

/// Record filter for `Store::find`
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every record of the collection
    All,
    /// Records whose field equals the value
    Eq { field: String, value: Value },
}

impl Filter {
    /// Equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if the record satisfies the filter
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => record.get(field).as_ref() == Some(value),
        }
    }
}

/// Storage collaborator used by resolvers.
///
/// Implementations must be safe to share across threads; every method is a
/// single atomic step with respect to other callers.
pub trait Store: Send + Sync {
    /// Looks up one record by identifier
    fn find_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>>;

    /// Returns matching records in the store's natural (insertion) order
    fn find(&self, collection: Collection, filter: &Filter) -> StorageResult<Vec<Record>>;

    /// Persists a new record, assigning a fresh identifier
    fn insert(&self, collection: Collection, fields: Fields) -> StorageResult<Record>;

    /// Merges `fields` into the record with the given identifier.
    /// Returns `None` when no such record exists.
    fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StorageResult<Option<Record>>;

    /// Removes the record with the given identifier, returning it.
    /// Returns `None` when no such record exists.
    fn delete_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>>;
}

/// Generates a fresh record identifier
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: &str, user_id: &str) -> Record {
        let fields = json!({"comment": "hi", "userId": user_id});
        Record::new(id, fields.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn test_collection_names_roundtrip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
        }
        assert_eq!(Collection::from_name("comments"), None);
    }

    #[test]
    fn test_filter_eq_on_field() {
        let record = post("p1", "u1");
        assert!(Filter::eq("userId", "u1").matches(&record));
        assert!(!Filter::eq("userId", "u2").matches(&record));
        assert!(Filter::All.matches(&record));
    }

    #[test]
    fn test_filter_eq_on_id() {
        let record = post("p1", "u1");
        assert!(Filter::eq("id", "p1").matches(&record));
    }

    #[test]
    fn test_merge_keeps_unlisted_fields_and_id() {
        let mut record = post("p1", "u1");
        let update = json!({"comment": "edited", "id": "other"});
        record.merge(update.as_object().cloned().unwrap_or_default());

        assert_eq!(record.id, "p1");
        assert_eq!(record.get("comment"), Some(json!("edited")));
        assert_eq!(record.get("userId"), Some(json!("u1")));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
