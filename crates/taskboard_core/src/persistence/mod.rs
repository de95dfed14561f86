//! Persistence adapter and slot storage backends.
//!
//! # Responsibility
//! - Load the serialized task collection once at startup.
//! - Save the full collection after every applied change.
//! - Hide backend details behind the `SlotStorage` key-value contract.
//!
//! # Invariants
//! - The slot value is a JSON array of tasks with no version field.
//! - Save always overwrites the whole slot; there are no partial writes.
//! - Persistence failures are reported, never panicked on.

mod adapter;
mod file;
mod memory;
mod sqlite;
mod storage;

pub use adapter::{decode_tasks, encode_tasks, PersistenceAdapter, PersistenceError, PersistencePhase};
pub use file::FileSlotStorage;
pub use memory::MemorySlotStorage;
pub use sqlite::SqliteSlotStorage;
pub use storage::{SlotStorage, StorageError};
