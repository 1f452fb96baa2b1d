//! Key/value records over a [`BlobSet`]
//!
//! Each record is one blob:
//!
//! ```text
//! ┌──────────────────┬───────────┬─────────────┐
//! │ key_len (4, LE)  │ key bytes │ value bytes │
//! └──────────────────┴───────────┴─────────────┘
//! ```
//!
//! The set only sees whole records, so `(k, v1)` and `(k, v2)` are distinct
//! entries. Lookup by key alone scans the live records.

use crate::config::Config;
use crate::error::{FlatError, Result};
use crate::set::BlobSet;

/// Size of the key length prefix
pub const KEY_LEN_SIZE: usize = 4;

/// Combine `key` and `value` into one record blob
pub fn encode_record(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let key_len = u32::try_from(key.len()).map_err(|_| {
        FlatError::InvalidArgument(format!("key of {} bytes is too long", key.len()))
    })?;

    let mut record = Vec::new();
    record.try_reserve_exact(KEY_LEN_SIZE + key.len() + value.len())?;
    record.extend_from_slice(&key_len.to_le_bytes());
    record.extend_from_slice(key);
    record.extend_from_slice(value);
    Ok(record)
}

/// Split a record blob back into `(key, value)`
pub fn decode_record(record: &[u8]) -> Result<(&[u8], &[u8])> {
    if record.len() < KEY_LEN_SIZE {
        return Err(FlatError::InvalidArgument(format!(
            "record of {} bytes has no key length prefix",
            record.len()
        )));
    }

    let (prefix, rest) = record.split_at(KEY_LEN_SIZE);
    let mut len_bytes = [0u8; KEY_LEN_SIZE];
    len_bytes.copy_from_slice(prefix);
    let key_len = u32::from_le_bytes(len_bytes) as usize;

    if rest.len() < key_len {
        return Err(FlatError::InvalidArgument(format!(
            "record key length {} exceeds remaining {} bytes",
            key_len,
            rest.len()
        )));
    }
    Ok(rest.split_at(key_len))
}

/// Set of `(key, value)` records
#[derive(Debug)]
pub struct RecordSet {
    records: BlobSet,
}

impl RecordSet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            records: BlobSet::new()?,
        })
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        Ok(Self {
            records: BlobSet::with_config(config)?,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Underlying blob set of encoded records
    pub fn as_set(&self) -> &BlobSet {
        &self.records
    }

    /// Insert a record; `Ok(false)` if the identical record exists
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        self.records.insert(&encode_record(key, value)?)
    }

    pub fn contains(&self, key: &[u8], value: &[u8]) -> Result<bool> {
        Ok(self.records.contains(&encode_record(key, value)?))
    }

    pub fn remove(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        Ok(self.records.remove(&encode_record(key, value)?))
    }

    /// Value of some record with this key
    ///
    /// Which one is unspecified when several records share the key.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.iter()
            .find(|(stored, _)| *stored == key)
            .map(|(_, value)| value)
    }

    /// Iterate over `(key, value)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        // Every stored blob came from encode_record.
        self.records
            .iter()
            .filter_map(|record| decode_record(record).ok())
    }
}
