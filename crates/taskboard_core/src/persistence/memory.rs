//! In-process slot storage.
//!
//! Used by tests and embedders that do not need durability. An optional byte
//! quota mimics browser storage limits.

use super::storage::{SlotStorage, StorageError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects any single slot value larger than `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Seeds a slot directly, bypassing the quota.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    /// Raw slot value, for inspection.
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit_bytes) = self.quota_bytes {
            if value.len() > limit_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit_bytes,
                    requested_bytes: value.len(),
                });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
