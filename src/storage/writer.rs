//! Append-only storage writer
//!
//! Records are never rewritten in place. An update appends a new full record
//! for the same document, a delete appends a tombstone; on replay the latest
//! record per document wins.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::error;

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// File name of the document log inside `<data_dir>/data`
pub const STORAGE_FILE: &str = "documents.dat";

/// Storage writer that maintains the documents.dat file.
///
/// Every append is followed by an fsync before it is acknowledged.
pub struct StorageWriter {
    /// Path to the storage file
    storage_path: PathBuf,
    /// Underlying file handle
    file: File,
    /// Current end-of-file offset
    current_offset: u64,
}

impl StorageWriter {
    /// Opens or creates `<data_dir>/data/documents.dat`.
    ///
    /// Creates parent directories if needed.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let storage_path = Self::storage_path(data_dir);
        let data_subdir = data_dir.join("data");

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
        })
    }

    /// Returns the log path for a data directory
    pub fn storage_path(data_dir: &Path) -> PathBuf {
        data_dir.join("data").join(STORAGE_FILE)
    }

    /// Returns the path to the storage file.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current end-of-file offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs it.
    ///
    /// Returns the byte offset where the record was written. On failure the
    /// log is cut back to its previous end so no partial record remains.
    pub fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.file.write_all(&serialized) {
            self.truncate_to(offset);
            return Err(StorageError::write_failed(
                format!(
                    "Failed to write document: {}:{}",
                    record.collection, record.document_id
                ),
                e,
            ));
        }

        if let Err(e) = self.file.sync_all() {
            self.truncate_to(offset);
            return Err(StorageError::write_failed(
                format!(
                    "fsync failed after writing document: {}:{}",
                    record.collection, record.document_id
                ),
                e,
            ));
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    /// Drops everything past `offset`
    fn truncate_to(&mut self, offset: u64) {
        let result = self.file.set_len(offset).and_then(|_| self.file.sync_all());
        if let Err(e) = result {
            error!(
                path = %self.storage_path.display(),
                offset,
                error = %e,
                "failed to truncate partial append"
            );
        }
    }
}
