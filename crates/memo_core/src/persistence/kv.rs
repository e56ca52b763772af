//! Key-value storage contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the minimal slot API the gateway depends on.
//! - Provide a map-backed store with an optional byte quota.

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing a durable slot.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite transport or schema failure.
    Db(DbError),
    /// Value does not fit into the remaining quota.
    QuotaExceeded { needed: usize, quota: usize },
    /// Collection could not be serialized.
    Serialize(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { needed, quota } => {
                write!(f, "storage quota exceeded: need {needed} bytes, quota {quota}")
            }
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Durable string slots addressed by key.
pub trait KvStorage {
    /// Reads a slot; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites a slot.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Map-backed slots for tests and ephemeral sessions.
///
/// With a quota set, writes that would push the total stored bytes (keys
/// plus values) above it fail with [`StorageError::QuotaExceeded`].
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStorage {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKvStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KvStorage for MemoryKvStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
