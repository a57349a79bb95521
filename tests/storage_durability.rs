//! Document log durability tests
//!
//! Acknowledged writes survive a reopen, and a damaged log is refused
//! rather than partially served.

use std::fs;
use std::sync::Arc;

use hobbygraph::api::ApiHandler;
use hobbygraph::schema::{Schema, SchemaOptions};
use hobbygraph::storage::{Collection, FileStore, Filter, Severity, StorageErrorCode, Store};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn user_fields(name: &str, age: i64) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!(name));
    fields.insert("age".to_string(), json!(age));
    fields.insert("profession".to_string(), json!("Engineer"));
    fields
}

fn handler(store: FileStore) -> ApiHandler {
    let schema = Schema::build(SchemaOptions::default()).unwrap();
    ApiHandler::new(schema, Arc::new(store))
}

// =============================================================================
// Durability
// =============================================================================

#[test]
fn test_writes_survive_reopen() {
    let temp_dir = create_temp_data_dir();

    let (kept, removed) = {
        let store = FileStore::open(temp_dir.path()).unwrap();
        let kept = store.insert(Collection::Users, user_fields("Ann", 30)).unwrap();
        let removed = store.insert(Collection::Users, user_fields("Bob", 41)).unwrap();

        let mut update = Map::new();
        update.insert("age".to_string(), json!(31));
        store.update_by_id(Collection::Users, &kept.id, update).unwrap();
        store.delete_by_id(Collection::Users, &removed.id).unwrap();
        (kept, removed)
    };

    let store = FileStore::open(temp_dir.path()).unwrap();
    let user = store.find_by_id(Collection::Users, &kept.id).unwrap().unwrap();
    assert_eq!(user.get("name"), Some(json!("Ann")));
    assert_eq!(user.get("age"), Some(json!(31)));
    assert!(store.find_by_id(Collection::Users, &removed.id).unwrap().is_none());
}

#[test]
fn test_graphql_writes_survive_reopen() {
    let temp_dir = create_temp_data_dir();

    let user_id = {
        let handler = handler(FileStore::open(temp_dir.path()).unwrap());
        let created = handler.handle(
            br#"{"query": "mutation { createUser(name: \"Ann\", age: 30, profession: \"Engineer\") { id } }"}"#,
        );
        let user_id = created.data["createUser"]["id"].as_str().unwrap().to_string();
        let body = json!({
            "query": "mutation($u: ID!) { createPost(comment: \"hi\", userId: $u) { id } }",
            "variables": {"u": user_id},
        });
        assert!(handler.handle(body.to_string().as_bytes()).is_ok());
        user_id
    };

    let handler = handler(FileStore::open(temp_dir.path()).unwrap());
    let body = json!({
        "query": "query($id: ID!) { user(id: $id) { name posts { comment } } }",
        "variables": {"id": user_id},
    });
    let result = handler.handle(body.to_string().as_bytes());
    assert_eq!(
        result.data,
        json!({"user": {"name": "Ann", "posts": [{"comment": "hi"}]}})
    );
}

#[test]
fn test_replay_preserves_insertion_order() {
    let temp_dir = create_temp_data_dir();
    let owner = "u1";

    let ids: Vec<String> = {
        let store = FileStore::open(temp_dir.path()).unwrap();
        (0..5)
            .map(|i| {
                let mut fields = Map::new();
                fields.insert("comment".to_string(), json!(format!("post {}", i)));
                fields.insert("userId".to_string(), json!(owner));
                store.insert(Collection::Posts, fields).unwrap().id
            })
            .collect()
    };

    let store = FileStore::open(temp_dir.path()).unwrap();
    let replayed: Vec<String> = store
        .find(Collection::Posts, &Filter::eq("userId", owner))
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(replayed, ids);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_flipped_byte_refuses_open() {
    let temp_dir = create_temp_data_dir();
    let storage_path = temp_dir.path().join("data/documents.dat");

    {
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(Collection::Users, user_fields("Ann", 30)).unwrap();
    }

    {
        let mut contents = fs::read(&storage_path).unwrap();
        let mid = contents.len() / 2;
        contents[mid] ^= 0xFF;
        fs::write(&storage_path, contents).unwrap();
    }

    let err = match FileStore::open(temp_dir.path()) {
        Ok(_) => panic!("corrupted log must not open"),
        Err(err) => err,
    };
    assert_eq!(err.code(), StorageErrorCode::DataCorruption);
    assert_eq!(err.code().code(), "STORAGE_DATA_CORRUPTION");
    assert_eq!(err.severity(), Severity::Fatal);
    assert!(err.is_fatal());
}

#[test]
fn test_truncated_tail_refuses_open() {
    let temp_dir = create_temp_data_dir();
    let storage_path = temp_dir.path().join("data/documents.dat");

    {
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(Collection::Users, user_fields("Ann", 30)).unwrap();
        store.insert(Collection::Users, user_fields("Bob", 41)).unwrap();
    }

    let contents = fs::read(&storage_path).unwrap();
    fs::write(&storage_path, &contents[..contents.len() - 3]).unwrap();

    let err = match FileStore::open(temp_dir.path()) {
        Ok(_) => panic!("truncated log must not open"),
        Err(err) => err,
    };
    assert_eq!(err.code(), StorageErrorCode::DataCorruption);
}
