//! Task use-case service.
//!
//! # Responsibility
//! - Build new tasks (fresh id, `completed=false`, `created_at=now`).
//! - Build edits that keep id, creation time and completion state.
//! - Resolve drag gestures through the reorder engine.
//! - Resolve user-typed id prefixes.
//!
//! # Invariants
//! - Titles are rejected when blank after trim; accepted titles are stored
//!   exactly as submitted.
//! - Store no-ops surface here as `ServiceError::TaskNotFound`.

use crate::model::task::{validate_title, Priority, Task, TaskId, TaskValidationError};
use crate::persistence::{PersistenceError, SlotStorage};
use crate::reorder::{plan_reorder, ReorderError};
use crate::store::{DispatchEffect, DispatchReport, NoOpReason, StoreError, TaskStore};
use crate::view::{count_tasks, TaskCounts, ViewQuery};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Form input failed boundary validation.
    InvalidInput(TaskValidationError),
    TaskNotFound(TaskId),
    /// No task id starts with the given text.
    UnknownIdPrefix(String),
    /// More than one task id starts with the given text.
    AmbiguousIdPrefix { prefix: String, matches: usize },
    Reorder(ReorderError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::UnknownIdPrefix(prefix) => write!(f, "no task id starts with `{prefix}`"),
            Self::AmbiguousIdPrefix { prefix, matches } => write!(
                f,
                "task id prefix `{prefix}` is ambiguous ({matches} matches)"
            ),
            Self::Reorder(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Reorder(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<ReorderError> for ServiceError {
    fn from(value: ReorderError) -> Self {
        Self::Reorder(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Form payload for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    /// Draft with an empty description and `medium` priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Draft pre-filled from an existing task, as an edit form opens.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
        }
    }
}

/// Outcome of a use-case that changed (or tried to change) the store.
#[derive(Debug)]
pub struct ActionReceipt {
    pub task_id: TaskId,
    /// `false` when the action resolved to a no-op (drop onto self).
    pub changed: bool,
    /// Non-blocking warning: the change is live but was not persisted.
    pub save_error: Option<PersistenceError>,
}

/// Use-case facade over a borrowed store.
pub struct TaskService<'store, S: SlotStorage> {
    store: &'store mut TaskStore<S>,
}

impl<'store, S: SlotStorage> TaskService<'store, S> {
    pub fn new(store: &'store mut TaskStore<S>) -> Self {
        Self { store }
    }

    /// Creates a task from a submitted draft.
    ///
    /// # Errors
    /// - `InvalidInput` when the title is blank after trim.
    pub fn create_task(&mut self, draft: TaskDraft) -> ServiceResult<ActionReceipt> {
        validate_title(&draft.title)?;
        let task = Task::new(draft.title, draft.description, draft.priority);
        let task_id = task.id;
        let report = self.store.add(task)?;
        receipt(task_id, report)
    }

    /// Replaces title, description and priority of an existing task.
    pub fn edit_task(&mut self, id: TaskId, draft: TaskDraft) -> ServiceResult<ActionReceipt> {
        validate_title(&draft.title)?;
        let existing = self.store.get(id).ok_or(ServiceError::TaskNotFound(id))?;
        let edited = Task {
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            ..existing.clone()
        };
        let report = self.store.update(edited)?;
        receipt(id, report)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> ServiceResult<ActionReceipt> {
        let report = self.store.toggle_complete(id)?;
        receipt(id, report)
    }

    pub fn delete_task(&mut self, id: TaskId) -> ServiceResult<ActionReceipt> {
        let report = self.store.delete(id)?;
        receipt(id, report)
    }

    /// Drops `dragged` onto `target` in canonical order.
    ///
    /// Dropping a task onto itself succeeds with `changed == false`.
    pub fn move_task(&mut self, dragged: TaskId, target: TaskId) -> ServiceResult<ActionReceipt> {
        let Some(order) = plan_reorder(self.store.tasks(), dragged, target)? else {
            return Ok(ActionReceipt {
                task_id: dragged,
                changed: false,
                save_error: None,
            });
        };
        let report = self.store.reorder(order)?;
        receipt(dragged, report)
    }

    pub fn get_task(&self, id: TaskId) -> ServiceResult<Task> {
        self.store
            .get(id)
            .cloned()
            .ok_or(ServiceError::TaskNotFound(id))
    }

    /// Presentation list for the given filter and sort.
    pub fn visible_tasks(&self, query: ViewQuery) -> Vec<Task> {
        self.store.project(query)
    }

    pub fn counts(&self) -> TaskCounts {
        count_tasks(self.store.tasks())
    }

    /// Resolves a full UUID or a unique, case-insensitive id prefix.
    pub fn resolve_id(&self, text: &str) -> ServiceResult<TaskId> {
        let needle = text.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }
        if needle.is_empty() {
            return Err(ServiceError::UnknownIdPrefix(needle));
        }

        let matches: Vec<TaskId> = self
            .store
            .tasks()
            .iter()
            .map(|task| task.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(ServiceError::UnknownIdPrefix(needle)),
            _ => Err(ServiceError::AmbiguousIdPrefix {
                prefix: needle,
                matches: matches.len(),
            }),
        }
    }
}

fn receipt(task_id: TaskId, report: DispatchReport) -> ServiceResult<ActionReceipt> {
    match report.effect {
        DispatchEffect::Applied => Ok(ActionReceipt {
            task_id,
            changed: true,
            save_error: report.save_error,
        }),
        DispatchEffect::NoOp(NoOpReason::NotFound(id)) => Err(ServiceError::TaskNotFound(id)),
    }
}
