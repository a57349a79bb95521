//! On-disk document record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Collection       | (length-prefixed string)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Cursor, Read};

use super::checksum::compute_checksum;
use super::errors::{StorageError, StorageResult};
use super::store::{Collection, Fields, Record};

/// Smallest possible record: length + 2 empty strings + flag + empty body + checksum
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 1 + 4 + 4;

/// One entry of the append-only log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Collection the document belongs to
    pub collection: Collection,
    /// Document identifier
    pub document_id: String,
    /// Whether this is a tombstone (deleted document)
    pub is_tombstone: bool,
    /// JSON field map (empty for tombstones)
    pub document_body: Vec<u8>,
}

impl DocumentRecord {
    /// Builds a live record from a store record
    pub fn live(collection: Collection, record: &Record) -> StorageResult<Self> {
        let document_body = serde_json::to_vec(&record.fields)
            .map_err(|e| StorageError::invalid_record(&record.id, e.to_string()))?;

        Ok(Self {
            collection,
            document_id: record.id.clone(),
            is_tombstone: false,
            document_body,
        })
    }

    /// Builds a tombstone for a deleted document
    pub fn tombstone(collection: Collection, document_id: impl Into<String>) -> Self {
        Self {
            collection,
            document_id: document_id.into(),
            is_tombstone: true,
            document_body: Vec::new(),
        }
    }

    /// Decodes the body back into a store record
    pub fn to_record(&self) -> StorageResult<Record> {
        let fields: Fields = serde_json::from_slice(&self.document_body)
            .map_err(|e| StorageError::invalid_record(&self.document_id, e.to_string()))?;
        Ok(Record::new(self.document_id.clone(), fields))
    }

    /// Serializes everything between the length prefix and the checksum.
    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        let collection = self.collection.name();
        buf.extend_from_slice(&(collection.len() as u32).to_le_bytes());
        buf.extend_from_slice(collection.as_bytes());

        buf.extend_from_slice(&(self.document_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.document_id.as_bytes());

        buf.push(if self.is_tombstone { 1 } else { 0 });

        buf.extend_from_slice(&(self.document_body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.document_body);

        buf
    }

    /// Serializes the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserializes a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[0..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);

        let collection_name = read_string(&mut cursor)?;
        let collection = Collection::from_name(&collection_name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown collection: {}", collection_name),
            )
        })?;
        let document_id = read_string(&mut cursor)?;

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;
        let is_tombstone = tombstone_buf[0] != 0;

        let document_body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                collection,
                document_id,
                is_tombstone,
                document_body,
            },
            record_length,
        ))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    String::from_utf8(read_bytes(reader)?)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}
