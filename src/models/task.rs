use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "To Do" => Some(Self::Todo),
            "In Progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Status constraint for task listings. Unrecognized tokens are kept as
/// literal equality filters (they match nothing) rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Any,
    Equals(String),
}

impl StatusFilter {
    /// `None`, empty, and the `all` sentinel all mean "no constraint".
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("") | Some("all") => Self::Any,
            Some(value) => Self::Equals(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    DueDate,
    Priority,
    #[default]
    Newest,
}

impl SortKey {
    /// Unrecognized sort keys fall back to newest-first, never an error.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("dueDate") => Self::DueDate,
            Some("priority") => Self::Priority,
            _ => Self::Newest,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub sort: SortKey,
}

impl TaskListQuery {
    pub fn from_params(status: Option<&str>, search: Option<&str>, sort_by: Option<&str>) -> Self {
        Self {
            status: StatusFilter::from_param(status),
            search: search.filter(|s| !s.is_empty()).map(str::to_string),
            sort: SortKey::from_param(sort_by),
        }
    }
}
