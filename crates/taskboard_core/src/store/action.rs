use crate::model::task::{Task, TaskId};

/// Every way the canonical collection may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Append a task with a fresh id.
    Add(Task),
    /// Replace the task with the same id, keeping its position.
    Update(Task),
    /// Remove the task with this id.
    Delete(TaskId),
    /// Flip `completed` on the task with this id.
    ToggleComplete(TaskId),
    /// Replace the whole canonical order with a permutation of it.
    Reorder(Vec<Task>),
}

impl TaskAction {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::ToggleComplete(_) => "toggle_complete",
            Self::Reorder(_) => "reorder",
        }
    }
}
