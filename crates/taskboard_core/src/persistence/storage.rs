//! Key-value slot contract shared by every backend.

use crate::config::ConfigError;
use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-level failure while reading or writing a slot.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    /// Write would exceed the backend's byte budget.
    QuotaExceeded {
        key: String,
        limit_bytes: usize,
        requested_bytes: usize,
    },
    InvalidKey(ConfigError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "slot io failed: {err}"),
            Self::Db(err) => write!(f, "slot database failed: {err}"),
            Self::QuotaExceeded {
                key,
                limit_bytes,
                requested_bytes,
            } => write!(
                f,
                "slot `{key}` quota exceeded: {requested_bytes} bytes requested, limit {limit_bytes}"
            ),
            Self::InvalidKey(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidKey(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
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

impl From<ConfigError> for StorageError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidKey(value)
    }
}

/// Durable named string slots, in the manner of a browser key-value store.
pub trait SlotStorage {
    /// Returns the slot value, or `None` when the slot was never written.
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites the slot with `value`.
    fn write_slot(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read_slot(key)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write_slot(key, value)
    }
}
