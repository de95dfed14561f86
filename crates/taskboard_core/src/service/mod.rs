//! Use-case services for UI-facing callers.
//!
//! # Responsibility
//! - Validate form-style input before it reaches the store.
//! - Turn user intents (create, edit, drag) into store actions.
//! - Keep presentation layers decoupled from store/persistence details.

pub mod task_service;
