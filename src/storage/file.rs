//! Durable store over the append-only document log
//!
//! On open the whole log is replayed into memory: live records upsert,
//! tombstones remove, latest record wins. Reads are served from memory;
//! writes append to the log (with fsync) before the in-memory state changes,
//! so an acknowledged write is always on disk.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::errors::{StorageError, StorageResult};
use super::memory::Collections;
use super::reader::StorageReader;
use super::record::DocumentRecord;
use super::store::{generate_id, Collection, Fields, Filter, Record, Store};
use super::writer::StorageWriter;

struct Inner {
    writer: StorageWriter,
    state: Collections,
}

/// File-backed store rooted at a data directory
pub struct FileStore {
    inner: Mutex<Inner>,
}

impl FileStore {
    /// Opens the store at `data_dir`, replaying the existing log.
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_DATA_CORRUPTION` if any record fails its checksum.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let writer = StorageWriter::open(data_dir)?;
        let state = Self::replay(writer.path())?;

        info!(
            path = %writer.path().display(),
            users = state.len(Collection::Users),
            hobbies = state.len(Collection::Hobbies),
            posts = state.len(Collection::Posts),
            "opened document log"
        );

        Ok(Self {
            inner: Mutex::new(Inner { writer, state }),
        })
    }

    fn replay(path: &Path) -> StorageResult<Collections> {
        let mut state = Collections::default();
        let mut reader = StorageReader::open(path)?;
        let mut replayed = 0usize;

        while let Some(record) = reader.read_next()? {
            if record.is_tombstone {
                state.remove(record.collection, &record.document_id);
            } else {
                state.upsert(record.collection, record.to_record()?);
            }
            replayed += 1;
        }

        debug!(records = replayed, "replayed document log");
        Ok(state)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::data_corruption("file store lock poisoned"))
    }
}

impl Store for FileStore {
    fn find_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>> {
        Ok(self.lock()?.state.get(collection, id).cloned())
    }

    fn find(&self, collection: Collection, filter: &Filter) -> StorageResult<Vec<Record>> {
        Ok(self.lock()?.state.find(collection, filter))
    }

    fn insert(&self, collection: Collection, fields: Fields) -> StorageResult<Record> {
        let record = Record::new(generate_id(), fields);
        let mut inner = self.lock()?;

        inner
            .writer
            .append(&DocumentRecord::live(collection, &record)?)?;
        inner.state.upsert(collection, record.clone());

        Ok(record)
    }

    fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StorageResult<Option<Record>> {
        let mut inner = self.lock()?;
        let Some(mut record) = inner.state.get(collection, id).cloned() else {
            return Ok(None);
        };
        record.merge(fields);

        inner
            .writer
            .append(&DocumentRecord::live(collection, &record)?)?;
        inner.state.upsert(collection, record.clone());

        Ok(Some(record))
    }

    fn delete_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Record>> {
        let mut inner = self.lock()?;
        if inner.state.get(collection, id).is_none() {
            return Ok(None);
        }

        inner
            .writer
            .append(&DocumentRecord::tombstone(collection, id))?;
        Ok(inner.state.remove(collection, id))
    }
}
