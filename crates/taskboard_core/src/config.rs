//! Store configuration.
//!
//! # Invariants
//! - Slot keys are non-empty and limited to `[A-Za-z0-9_-]` so every
//!   backend (including file-per-slot storage) can address them safely.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when no other slot is configured.
pub const DEFAULT_SLOT_KEY: &str = "tasks";

const MAX_SLOT_KEY_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSlotKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlotKey(key) => write!(
                f,
                "invalid slot key `{key}`; expected 1-{MAX_SLOT_KEY_CHARS} chars of [A-Za-z0-9_-]"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Where the persistence adapter keeps the serialized collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    slot_key: String,
}

impl StoreConfig {
    /// Builds a config for `slot_key` after validating it.
    pub fn new(slot_key: impl Into<String>) -> Result<Self, ConfigError> {
        let slot_key = slot_key.into();
        validate_slot_key(&slot_key)?;
        Ok(Self { slot_key })
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

/// Checks the character set shared by all slot backends.
pub fn validate_slot_key(key: &str) -> Result<(), ConfigError> {
    let valid = !key.is_empty()
        && key.chars().count() <= MAX_SLOT_KEY_CHARS
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidSlotKey(key.to_string()))
    }
}
