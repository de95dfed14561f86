//! Directory-backed slot storage: one `<key>.json` file per slot.
//!
//! # Invariants
//! - Writes go to a sibling temp file which is then renamed over the slot
//!   file, so a reader sees either the old or the new value, never a mix.
//! - A failed write removes its temp file.
//! - Keys are validated before they become file names.

use super::storage::{SlotStorage, StorageError};
use crate::config::validate_slot_key;
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// Uses `dir` for slot files, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_slot_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        // Dropping the temp file on any error path deletes it.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|err| err.error)?;
        debug!(
            "event=slot_write module=persistence status=ok backend=file bytes={}",
            value.len()
        );
        Ok(())
    }
}
