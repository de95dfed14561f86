//! Pure reducer: `next = reduce(previous, action)`.

use super::action::TaskAction;
use crate::model::task::{Task, TaskId};
use crate::reorder::{verify_permutation, PermutationViolation};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an action left the collection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Update/Delete/ToggleComplete named an id that is not present.
    NotFound(TaskId),
}

/// Result of reducing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    /// The next canonical collection.
    Changed(Vec<Task>),
    Unchanged(NoOpReason),
}

/// Actions the store refuses to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Proposed order is not a permutation of the current collection.
    InvalidReorder(PermutationViolation),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReorder(violation) => write!(f, "invalid reorder: {violation}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReorder(violation) => Some(violation),
        }
    }
}

impl From<PermutationViolation> for StoreError {
    fn from(value: PermutationViolation) -> Self {
        Self::InvalidReorder(value)
    }
}

/// Applies `action` to `tasks` without mutating them.
///
/// # Contract
/// - `Add` appends unconditionally; a fresh id is the caller's job.
/// - `Update` keeps the stored `created_at`; every other field comes from
///   the payload.
/// - `Update`, `Delete` and `ToggleComplete` on a missing id return
///   `Reduction::Unchanged(NoOpReason::NotFound)`.
///
/// # Errors
/// - `StoreError::InvalidReorder` when a reorder drops, repeats, injects or
///   edits tasks.
pub fn reduce(tasks: &[Task], action: TaskAction) -> Result<Reduction, StoreError> {
    let reduction = match action {
        TaskAction::Add(task) => {
            if tasks.iter().any(|existing| existing.id == task.id) {
                warn!(
                    "event=store_add module=store status=warn error_code=duplicate_id task_id={}",
                    task.id
                );
            }
            let mut next = Vec::with_capacity(tasks.len() + 1);
            next.extend_from_slice(tasks);
            next.push(task);
            Reduction::Changed(next)
        }
        TaskAction::Update(task) => {
            let id = task.id;
            replace_matching(tasks, id, |existing| Task {
                created_at: existing.created_at,
                ..task.clone()
            })
        }
        TaskAction::Delete(id) => {
            let next: Vec<Task> = tasks.iter().filter(|task| task.id != id).cloned().collect();
            if next.len() == tasks.len() {
                Reduction::Unchanged(NoOpReason::NotFound(id))
            } else {
                Reduction::Changed(next)
            }
        }
        TaskAction::ToggleComplete(id) => replace_matching(tasks, id, Task::toggled),
        TaskAction::Reorder(order) => {
            verify_permutation(tasks, &order)?;
            Reduction::Changed(order)
        }
    };
    Ok(reduction)
}

fn replace_matching(tasks: &[Task], id: TaskId, replace: impl Fn(&Task) -> Task) -> Reduction {
    if !tasks.iter().any(|task| task.id == id) {
        return Reduction::Unchanged(NoOpReason::NotFound(id));
    }
    let next = tasks
        .iter()
        .map(|task| if task.id == id { replace(task) } else { task.clone() })
        .collect();
    Reduction::Changed(next)
}
