//! In-memory store
//!
//! `Collections` is the shared record state; `MemoryStore` wraps it in a
//! lock, and `FileStore` rebuilds it from the log on open.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{StorageError, StorageResult};
use super::store::{generate_id, Collection, Fields, Filter, Record, Store};

/// Insertion-ordered records of every collection
#[derive(Debug, Default)]
pub(crate) struct Collections {
    records: HashMap<Collection, Vec<Record>>,
}

impl Collections {
    fn records(&self, collection: Collection) -> &[Record] {
        self.records
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn position(&self, collection: Collection, id: &str) -> Option<usize> {
        self.records(collection).iter().position(|r| r.id == id)
    }

    pub(crate) fn get(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.records(collection).iter().find(|r| r.id == id)
    }

    pub(crate) fn find(&self, collection: Collection, filter: &Filter) -> Vec<Record> {
        self.records(collection)
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Inserts or replaces a record. A replaced record keeps its position.
    pub(crate) fn upsert(&mut self, collection: Collection, record: Record) {
        match self.position(collection, &record.id) {
            Some(index) => self.records.entry(collection).or_default()[index] = record,
            None => self.records.entry(collection).or_default().push(record),
        }
    }

    pub(crate) fn remove(&mut self, collection: Collection, id: &str) -> Option<Record> {
        let index = self.position(collection, id)?;
        self.records
            .get_mut(&collection)
            .map(|records| records.remove(index))
    }

    pub(crate) fn len(&self, collection: Collection) -> usize {
        self.records(collection).len()
    }
}

/// A store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn count(&self, collection: Collection) -> StorageResult<usize> {
        Ok(self.read()?.len(collection))
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Collections>> {
        self.state
            .read()
            .map_err(|_| StorageError::data_corruption("memory store lock poisoned"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Collections>> {
        self.state
            .write()
            .map_err(|_| StorageError::data_corruption("memory store lock poisoned"))
    }
}

impl Store for MemoryStore {
    fn find_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>> {
        Ok(self.read()?.get(collection, id).cloned())
    }

    fn find(&self, collection: Collection, filter: &Filter) -> StorageResult<Vec<Record>> {
        Ok(self.read()?.find(collection, filter))
    }

    fn insert(&self, collection: Collection, fields: Fields) -> StorageResult<Record> {
        let record = Record::new(generate_id(), fields);
        self.write()?.upsert(collection, record.clone());
        Ok(record)
    }

    fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StorageResult<Option<Record>> {
        let mut state = self.write()?;
        let Some(mut record) = state.get(collection, id).cloned() else {
            return Ok(None);
        };
        record.merge(fields);
        state.upsert(collection, record.clone());
        Ok(Some(record))
    }

    fn delete_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>> {
        Ok(self.write()?.remove(collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_insert_then_find_by_id() {
        let store = MemoryStore::new();
        let inserted = store
            .insert(Collection::Users, fields(json!({"name": "Ann"})))
            .unwrap();

        let found = store.find_by_id(Collection::Users, &inserted.id).unwrap();
        assert_eq!(found, Some(inserted));
        assert!(store.find_by_id(Collection::Posts, "missing").unwrap().is_none());
    }

    #[test]
    fn test_find_preserves_insertion_order() {
        let store = MemoryStore::new();
        let a = store
            .insert(Collection::Posts, fields(json!({"comment": "a", "userId": "u1"})))
            .unwrap();
        store
            .insert(Collection::Posts, fields(json!({"comment": "b", "userId": "u2"})))
            .unwrap();
        let c = store
            .insert(Collection::Posts, fields(json!({"comment": "c", "userId": "u1"})))
            .unwrap();

        let found = store
            .find(Collection::Posts, &Filter::eq("userId", "u1"))
            .unwrap();
        assert_eq!(found, vec![a, c]);
    }

    #[test]
    fn test_update_keeps_position_and_unlisted_fields() {
        let store = MemoryStore::new();
        let first = store
            .insert(Collection::Posts, fields(json!({"comment": "a", "userId": "u1"})))
            .unwrap();
        store
            .insert(Collection::Posts, fields(json!({"comment": "b", "userId": "u1"})))
            .unwrap();

        let updated = store
            .update_by_id(Collection::Posts, &first.id, fields(json!({"comment": "z"})))
            .unwrap()
            .unwrap();
        assert_eq!(updated.get("userId"), Some(json!("u1")));

        let all = store.find(Collection::Posts, &Filter::All).unwrap();
        assert_eq!(all[0].get("comment"), Some(json!("z")));
    }

    #[test]
    fn test_update_and_delete_missing_return_none() {
        let store = MemoryStore::new();
        assert!(store
            .update_by_id(Collection::Users, "nope", Fields::new())
            .unwrap()
            .is_none());
        assert!(store.delete_by_id(Collection::Users, "nope").unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_once() {
        let store = MemoryStore::new();
        let hobby = store
            .insert(Collection::Hobbies, fields(json!({"title": "chess"})))
            .unwrap();

        assert!(store.delete_by_id(Collection::Hobbies, &hobby.id).unwrap().is_some());
        assert!(store.delete_by_id(Collection::Hobbies, &hobby.id).unwrap().is_none());
        assert_eq!(store.count(Collection::Hobbies).unwrap(), 0);
    }
}
