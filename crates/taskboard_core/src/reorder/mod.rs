//! Drag-and-drop reorder engine.
//!
//! # Responsibility
//! - Translate a drag gesture (dragged task dropped on target task) into a
//!   full replacement order for the store's `Reorder` action.
//! - Verify that a proposed order is a permutation of the current one.
//!
//! # Invariants
//! - A planned order is always one remove plus one insert of the same task,
//!   so it is a permutation by construction.
//! - Dropping a task on itself is a no-op.

use crate::model::task::{Task, TaskId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from planning a drag reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Dragged or target id is not in the canonical order.
    UnknownTask(TaskId),
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "task not in canonical order: {id}"),
        }
    }
}

impl Error for ReorderError {}

/// Reason a proposed order is not a permutation of the current order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermutationViolation {
    /// Proposed order drops or adds tasks.
    LengthMismatch { expected: usize, actual: usize },
    /// Proposed order repeats an id more often than the current order has it.
    DuplicateId(TaskId),
    /// Proposed order contains an id the current order does not know.
    UnknownId(TaskId),
    /// Proposed order carries a task whose fields differ from the stored one.
    ModifiedTask(TaskId),
}

impl Display for PermutationViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "reorder must keep {expected} task(s), got {actual}"
            ),
            Self::DuplicateId(id) => write!(f, "reorder repeats task {id}"),
            Self::UnknownId(id) => write!(f, "reorder injects unknown task {id}"),
            Self::ModifiedTask(id) => write!(f, "reorder modifies task {id}"),
        }
    }
}

impl Error for PermutationViolation {}

/// Plans the order produced by dropping `dragged` onto `target`.
///
/// Returns `Ok(None)` when `dragged == target`. Otherwise the dragged task is
/// removed and re-inserted at the index the target held before removal:
/// dragging downwards lands after the target, dragging upwards lands before it.
///
/// # Errors
/// - `ReorderError::UnknownTask` when either id is missing from `order`.
pub fn plan_reorder(
    order: &[Task],
    dragged: TaskId,
    target: TaskId,
) -> Result<Option<Vec<Task>>, ReorderError> {
    if dragged == target {
        return Ok(None);
    }

    let from = position_of(order, dragged)?;
    let to = position_of(order, target)?;

    let mut next = order.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(Some(next))
}

/// Checks that `proposed` holds exactly the tasks of `current`, in any order.
pub fn verify_permutation(current: &[Task], proposed: &[Task]) -> Result<(), PermutationViolation> {
    if current.len() != proposed.len() {
        return Err(PermutationViolation::LengthMismatch {
            expected: current.len(),
            actual: proposed.len(),
        });
    }

    let mut remaining: HashMap<TaskId, Vec<&Task>> = HashMap::with_capacity(current.len());
    for task in current {
        remaining.entry(task.id).or_default().push(task);
    }

    for task in proposed {
        let Some(candidates) = remaining.get_mut(&task.id) else {
            return Err(PermutationViolation::UnknownId(task.id));
        };
        let Some(index) = candidates.iter().position(|stored| *stored == task) else {
            return Err(if candidates.is_empty() {
                PermutationViolation::DuplicateId(task.id)
            } else {
                PermutationViolation::ModifiedTask(task.id)
            });
        };
        candidates.swap_remove(index);
    }

    Ok(())
}

fn position_of(order: &[Task], id: TaskId) -> Result<usize, ReorderError> {
    order
        .iter()
        .position(|task| task.id == id)
        .ok_or(ReorderError::UnknownTask(id))
}

#[cfg(test)]
mod tests {
    use super::{plan_reorder, verify_permutation, PermutationViolation, ReorderError};
    use crate::model::task::{Priority, Task};
    use uuid::Uuid;

    fn tasks(titles: &[&str]) -> Vec<Task> {
        titles
            .iter()
            .map(|title| Task::new(*title, "", Priority::Medium))
            .collect()
    }

    fn titles(order: &[Task]) -> Vec<&str> {
        order.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn dragging_upwards_lands_before_target() {
        let order = tasks(&["a", "b", "c", "d"]);
        let next = plan_reorder(&order, order[3].id, order[1].id)
            .unwrap()
            .unwrap();
        assert_eq!(titles(&next), ["a", "d", "b", "c"]);
    }

    #[test]
    fn dragging_downwards_lands_after_target() {
        let order = tasks(&["a", "b", "c", "d"]);
        let next = plan_reorder(&order, order[0].id, order[2].id)
            .unwrap()
            .unwrap();
        assert_eq!(titles(&next), ["b", "c", "a", "d"]);
    }

    #[test]
    fn adjacent_swap_works_in_both_directions() {
        let order = tasks(&["a", "b"]);
        let down = plan_reorder(&order, order[0].id, order[1].id)
            .unwrap()
            .unwrap();
        assert_eq!(titles(&down), ["b", "a"]);
        let up = plan_reorder(&order, order[1].id, order[0].id)
            .unwrap()
            .unwrap();
        assert_eq!(titles(&up), ["b", "a"]);
    }

    #[test]
    fn dropping_on_self_is_noop() {
        let order = tasks(&["a", "b"]);
        assert_eq!(plan_reorder(&order, order[0].id, order[0].id), Ok(None));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let order = tasks(&["a"]);
        let missing = Uuid::new_v4();
        assert_eq!(
            plan_reorder(&order, missing, order[0].id),
            Err(ReorderError::UnknownTask(missing))
        );
    }

    #[test]
    fn planned_orders_are_permutations() {
        let order = tasks(&["a", "b", "c", "d", "e"]);
        for dragged in &order {
            for target in &order {
                if let Some(next) = plan_reorder(&order, dragged.id, target.id).unwrap() {
                    assert_eq!(verify_permutation(&order, &next), Ok(()));
                }
            }
        }
    }

    #[test]
    fn verify_permutation_reports_each_violation() {
        let order = tasks(&["a", "b"]);

        let dropped = vec![order[0].clone()];
        assert_eq!(
            verify_permutation(&order, &dropped),
            Err(PermutationViolation::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );

        let duplicated = vec![order[0].clone(), order[0].clone()];
        assert_eq!(
            verify_permutation(&order, &duplicated),
            Err(PermutationViolation::DuplicateId(order[0].id))
        );

        let stranger = Task::new("x", "", Priority::Low);
        let injected = vec![order[0].clone(), stranger.clone()];
        assert_eq!(
            verify_permutation(&order, &injected),
            Err(PermutationViolation::UnknownId(stranger.id))
        );

        let mut edited = order[1].clone();
        edited.title = "b2".to_string();
        let modified = vec![edited, order[0].clone()];
        assert_eq!(
            verify_permutation(&order, &modified),
            Err(PermutationViolation::ModifiedTask(order[1].id))
        );
    }
}
