//! Task store: the single owner of the canonical task collection.
//!
//! # Responsibility
//! - Model the five mutations as a closed `TaskAction` set.
//! - Apply actions through one pure reducer and one `dispatch` channel.
//! - Persist and broadcast every applied change.
//!
//! # Invariants
//! - Readers only ever hold complete `TaskSnapshot`s; a mutation swaps in a
//!   new snapshot, it never edits the current one.
//! - Missing ids are no-ops, not errors.
//! - `Reorder` must be a permutation of the current collection or it is
//!   rejected without touching state.

mod action;
mod reducer;
mod task_store;

pub use action::TaskAction;
pub use reducer::{reduce, NoOpReason, Reduction, StoreError};
pub use task_store::{
    DispatchEffect, DispatchReport, LoadOutcome, SubscriptionId, TaskSnapshot, TaskStore,
};
