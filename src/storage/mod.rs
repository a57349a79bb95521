//! Storage collaborator for hobbygraph
//!
//! Resolvers see storage only through the [`Store`] trait: lookup by id,
//! lookup by equality filter, insert, update by id, delete by id over the
//! `users`, `hobbies` and `posts` collections.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: process-local, used by tests and `storage: "memory"`
//! - [`FileStore`]: append-only, checksummed, fsync-per-write document log
//!   replayed into memory on open
//!
//! # Log Properties
//!
//! - Append-only (no in-place updates)
//! - CRC32 checksum verified on every read
//! - Latest record wins for the same document
//! - Deletes are tombstones

mod checksum;
mod errors;
mod file;
mod memory;
mod reader;
mod record;
mod store;
mod writer;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use store::{generate_id, Collection, Fields, Filter, Record, Store};
pub use writer::{StorageWriter, STORAGE_FILE};
