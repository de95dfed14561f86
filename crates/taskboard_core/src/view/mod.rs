//! View projector: filtered and sorted presentation lists.
//!
//! # Responsibility
//! - Derive the list a UI renders from the canonical collection.
//! - Parse and print filter/sort options using their wire names.
//!
//! # Invariants
//! - Projection is a pure function of `(tasks, query)`; canonical order is
//!   never touched.
//! - Filter runs before sort, and both sorts are stable.

use crate::model::task::Task;
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks pass into the projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `task` passes this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Highest priority first.
    Priority,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Priority => "priority",
        }
    }
}

/// Unrecognized filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseViewError {
    UnknownFilter(String),
    UnknownSort(String),
}

impl Display for ParseViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFilter(value) => write!(
                f,
                "unknown filter `{value}`; expected all|active|completed"
            ),
            Self::UnknownSort(value) => {
                write!(f, "unknown sort `{value}`; expected createdAt|priority")
            }
        }
    }
}

impl Error for ParseViewError {}

impl FromStr for FilterMode {
    type Err = ParseViewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseViewError::UnknownFilter(other.to_string())),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseViewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "createdat" | "created_at" | "created-at" => Ok(Self::CreatedAt),
            "priority" => Ok(Self::Priority),
            other => Err(ParseViewError::UnknownSort(other.to_string())),
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Projection parameters. Defaults to every task, newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: FilterMode,
    pub sort: SortKey,
}

impl ViewQuery {
    pub fn new(filter: FilterMode, sort: SortKey) -> Self {
        Self { filter, sort }
    }
}

/// Per-state task counts for header/summary rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Keeps tasks matching `mode`, preserving canonical relative order.
pub fn filter_tasks<'a>(tasks: &'a [Task], mode: FilterMode) -> Vec<&'a Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

/// Stable in-place sort of an already filtered list.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::CreatedAt => tasks.sort_by_key(|task| Reverse(task.created_at)),
        SortKey::Priority => tasks.sort_by_key(|task| Reverse(task.priority.rank())),
    }
}

/// Computes the presentation list: filter first, then sort.
pub fn project(tasks: &[Task], query: ViewQuery) -> Vec<Task> {
    let mut visible = filter_tasks(tasks, query.filter);
    sort_tasks(&mut visible, query.sort);
    visible.into_iter().cloned().collect()
}

/// Counts tasks by completion state.
pub fn count_tasks(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskCounts {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::{count_tasks, project, FilterMode, ParseViewError, SortKey, ViewQuery};
    use crate::model::task::{Priority, Task};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn task_at(title: &str, minute: u32, priority: Priority) -> Task {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap();
        Task::with_id(Uuid::new_v4(), title, "", priority, created_at)
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn created_at_sort_is_newest_first_and_stable() {
        let tasks = vec![
            task_at("t1", 1, Priority::Low),
            task_at("t3", 3, Priority::Low),
            task_at("t2a", 2, Priority::Low),
            task_at("t2b", 2, Priority::Low),
        ];
        let view = project(&tasks, ViewQuery::default());
        assert_eq!(titles(&view), ["t3", "t2a", "t2b", "t1"]);
        assert_eq!(titles(&tasks), ["t1", "t3", "t2a", "t2b"]);
    }

    #[test]
    fn filter_modes_select_by_completion() {
        let mut done = task_at("done", 1, Priority::Low);
        done.completed = true;
        let open = task_at("open", 2, Priority::Low);
        let tasks = vec![done, open];

        let active = project(&tasks, ViewQuery::new(FilterMode::Active, SortKey::CreatedAt));
        assert_eq!(titles(&active), ["open"]);
        let completed = project(
            &tasks,
            ViewQuery::new(FilterMode::Completed, SortKey::CreatedAt),
        );
        assert_eq!(titles(&completed), ["done"]);

        let counts = count_tasks(&tasks);
        assert_eq!((counts.total, counts.active, counts.completed), (2, 1, 1));
    }

    #[test]
    fn names_parse_from_wire_values() {
        assert_eq!("createdAt".parse::<SortKey>(), Ok(SortKey::CreatedAt));
        assert_eq!("Priority".parse::<SortKey>(), Ok(SortKey::Priority));
        assert_eq!("ACTIVE".parse::<FilterMode>(), Ok(FilterMode::Active));
        assert_eq!(
            "done".parse::<FilterMode>(),
            Err(ParseViewError::UnknownFilter("done".into()))
        );
        assert_eq!(SortKey::CreatedAt.to_string(), "createdAt");
    }

    #[test]
    fn names_display_with_padding() {
        assert_eq!(format!("{:<10}|", FilterMode::Active), "active    |");
        assert_eq!(format!("{:>9}|", SortKey::Priority), " priority|");
    }
}
