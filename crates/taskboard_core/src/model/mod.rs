//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, persistence and views.
//! - Own the wire shape persisted in the durable task slot.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` that is never reused.
//! - `created_at` is captured once at creation and never edited.

pub mod task;
