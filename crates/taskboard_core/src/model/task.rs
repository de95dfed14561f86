//! Task entity and priority enumeration.
//!
//! # Responsibility
//! - Define the canonical task record and its default lifecycle values.
//! - Provide boundary validation helpers used by form-style callers.
//!
//! # Invariants
//! - `id` is a UUID v4 generated at creation and immutable afterwards.
//! - `created_at` has millisecond precision so it survives the ISO-8601
//!   wire format unchanged.
//! - The store itself never rejects a title; blank-title checks happen at
//!   the service boundary through `validate_title`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for every task in the collection.
pub type TaskId = Uuid;

/// Ordered task priority. Declaration order is the rank order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Numeric rank used by priority sorting (`high=3`, `medium=2`, `low=1`).
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Wire name persisted in the task slot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// Boundary validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
    /// Priority text is not one of `low|medium|high`.
    UnknownPriority(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::UnknownPriority(value) => write!(
                f,
                "unknown priority `{value}`; expected low|medium|high"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Field names serialize in camelCase to match the persisted slot schema:
/// `{id, title, description, completed, createdAt, priority}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub priority: Priority,
}

impl Task {
    /// Creates a new open task with a fresh id and `created_at = now`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, priority, Utc::now())
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by import paths and tests where identity already exists. The
    /// timestamp is truncated to milliseconds.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: created_at.trunc_subsecs(3),
            priority,
        }
    }

    /// Returns a copy with `completed` flipped and every other field kept.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Whether this task still shows up under the `active` filter.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Rejects titles that are empty after trimming.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Timelike, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Millisecond values keep the `.123Z` shape; finer values are written
    /// at full precision so they survive a round trip.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let format = if value.nanosecond() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        serializer.serialize_str(&value.to_rfc3339_opts(format, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| {
                serde::de::Error::custom(format!("invalid createdAt `{text}`: {err}"))
            })
    }
}
