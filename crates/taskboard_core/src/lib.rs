//! Core task state for Taskboard.
//! This crate is the single source of truth for the task collection, the
//! actions that mutate it, the views derived from it and its persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod reorder;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigError, StoreConfig, DEFAULT_SLOT_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::task::{validate_title, Priority, Task, TaskId, TaskValidationError};
pub use persistence::{
    FileSlotStorage, MemorySlotStorage, PersistenceAdapter, PersistenceError, PersistencePhase,
    SlotStorage, SqliteSlotStorage, StorageError,
};
pub use reorder::{plan_reorder, verify_permutation, PermutationViolation, ReorderError};
pub use service::task_service::{
    ActionReceipt, ServiceError, ServiceResult, TaskDraft, TaskService,
};
pub use store::{
    DispatchEffect, DispatchReport, LoadOutcome, NoOpReason, Reduction, StoreError,
    SubscriptionId, TaskAction, TaskSnapshot, TaskStore,
};
pub use view::{
    count_tasks, project, FilterMode, ParseViewError, SortKey, TaskCounts, ViewQuery,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
