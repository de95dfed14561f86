//! Load/save cycle between the store and one durable slot.

use super::storage::{SlotStorage, StorageError};
use crate::config::StoreConfig;
use crate::model::task::Task;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Which half of the persistence cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistencePhase {
    Load,
    Save,
}

/// Recoverable persistence failure.
///
/// Load failures make the store start empty; save failures leave the
/// in-memory collection authoritative for the rest of the session.
#[derive(Debug)]
pub enum PersistenceError {
    /// Backend could not read the slot.
    ReadFailed { key: String, source: StorageError },
    /// Slot content is not a valid task array.
    Malformed {
        key: String,
        source: serde_json::Error,
    },
    /// Collection could not be serialized.
    EncodeFailed {
        key: String,
        source: serde_json::Error,
    },
    /// Backend rejected the write (unavailable, quota exceeded, ...).
    WriteFailed { key: String, source: StorageError },
}

impl PersistenceError {
    pub fn phase(&self) -> PersistencePhase {
        match self {
            Self::ReadFailed { .. } | Self::Malformed { .. } => PersistencePhase::Load,
            Self::EncodeFailed { .. } | Self::WriteFailed { .. } => PersistencePhase::Save,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::ReadFailed { .. } => "slot_read_failed",
            Self::Malformed { .. } => "slot_malformed",
            Self::EncodeFailed { .. } => "slot_encode_failed",
            Self::WriteFailed { .. } => "slot_write_failed",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { key, source } => {
                write!(f, "failed to read task slot `{key}`: {source}")
            }
            Self::Malformed { key, source } => {
                write!(f, "task slot `{key}` holds malformed data: {source}")
            }
            Self::EncodeFailed { key, source } => {
                write!(f, "failed to encode tasks for slot `{key}`: {source}")
            }
            Self::WriteFailed { key, source } => {
                write!(f, "failed to write task slot `{key}`: {source}")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } | Self::WriteFailed { source, .. } => Some(source),
            Self::Malformed { source, .. } | Self::EncodeFailed { source, .. } => Some(source),
        }
    }
}

/// Serializes a collection into the slot wire format.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Parses the slot wire format.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Owns a slot backend and the key the collection lives under.
pub struct PersistenceAdapter<S: SlotStorage> {
    storage: S,
    config: StoreConfig,
}

impl<S: SlotStorage> PersistenceAdapter<S> {
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self { storage, config }
    }

    /// Adapter over the default `"tasks"` slot.
    pub fn with_default_slot(storage: S) -> Self {
        Self::new(storage, StoreConfig::default())
    }

    pub fn slot_key(&self) -> &str {
        self.config.slot_key()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reads the persisted collection; an absent slot is an empty collection.
    ///
    /// # Errors
    /// - `ReadFailed` when the backend fails.
    /// - `Malformed` when the slot is not a JSON task array.
    pub fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        let started_at = Instant::now();
        let key = self.slot_key();

        let raw = self.storage.read_slot(key).map_err(|source| {
            let err = PersistenceError::ReadFailed {
                key: key.to_string(),
                source,
            };
            log_failure("slot_load", &err, started_at);
            err
        })?;

        let Some(raw) = raw else {
            info!(
                "event=slot_load module=persistence status=ok slot={key} found=false duration_ms={}",
                started_at.elapsed().as_millis()
            );
            return Ok(Vec::new());
        };

        let tasks = decode_tasks(&raw).map_err(|source| {
            let err = PersistenceError::Malformed {
                key: key.to_string(),
                source,
            };
            log_failure("slot_load", &err, started_at);
            err
        })?;

        info!(
            "event=slot_load module=persistence status=ok slot={key} found=true task_count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    /// Overwrites the slot with the full collection.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let started_at = Instant::now();
        let key = self.config.slot_key();

        let encoded = encode_tasks(tasks).map_err(|source| {
            let err = PersistenceError::EncodeFailed {
                key: key.to_string(),
                source,
            };
            log_failure("slot_save", &err, started_at);
            err
        })?;

        self.storage.write_slot(key, &encoded).map_err(|source| {
            let err = PersistenceError::WriteFailed {
                key: key.to_string(),
                source,
            };
            log_failure("slot_save", &err, started_at);
            err
        })?;

        info!(
            "event=slot_save module=persistence status=ok slot={key} task_count={} bytes={} duration_ms={}",
            tasks.len(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn log_failure(event: &str, err: &PersistenceError, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis();
    match err.phase() {
        PersistencePhase::Load => warn!(
            "event={event} module=persistence status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
        PersistencePhase::Save => error!(
            "event={event} module=persistence status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
}
