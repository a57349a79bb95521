//! Sequential reader over the document log
//!
//! Every record is checksum-validated as it is read. Any failure is reported
//! as `STORAGE_DATA_CORRUPTION` with the byte offset of the bad record.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Storage reader for sequential scans.
pub struct StorageReader {
    /// Path to the storage file
    storage_path: PathBuf,
    /// Buffered reader
    reader: BufReader<File>,
    /// Current byte offset
    current_offset: u64,
    /// Total file size
    file_size: u64,
}

impl StorageReader {
    /// Opens the storage file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Returns the storage file path.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current read offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record.
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(STORAGE_DATA_CORRUPTION)` on a truncated or corrupt record
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated storage: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, bytes_consumed) = DocumentRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += bytes_consumed as u64;

        Ok(Some(record))
    }

    /// Reads all remaining records. Any corruption causes immediate failure.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::{Collection, Record};
    use super::super::writer::StorageWriter;
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn live(id: &str) -> DocumentRecord {
        let fields = json!({"title": "chess", "description": "board game", "userId": "u1"});
        let record = Record::new(id, fields.as_object().cloned().unwrap_or_default());
        DocumentRecord::live(Collection::Hobbies, &record).unwrap()
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = StorageWriter::open(temp_dir.path()).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_read_records_in_append_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.append(&live("h1")).unwrap();
        writer.append(&DocumentRecord::tombstone(Collection::Hobbies, "h1")).unwrap();
        writer.append(&live("h2")).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let records = reader.read_all().unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.document_id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "h1", "h2"]);
        assert!(records[1].is_tombstone);
        assert_eq!(reader.current_offset(), writer.current_offset());
    }

    #[test]
    fn test_truncated_tail_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.append(&live("h1")).unwrap();
            writer.path().to_path_buf()
        };

        let contents = std::fs::read(&path).unwrap();
        std::fs::write(&path, &contents[..contents.len() - 2]).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some("byte_offset: 0"));
    }
}
