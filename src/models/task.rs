//! Task model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ProjectId, TaskId, UserId};
use super::resource::{Document, ResourceKind};
use super::status::{TaskPriority, TaskStatus};

/// A unit of work, optionally attached to a project and assigned to a crew member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,

    pub title: String,

    #[serde(default)]
    pub project: Option<ProjectId>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    #[serde(default)]
    pub assigned_to: Option<UserId>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            project: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assigned_to: None,
            due_date: None,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task is past due on `today` and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        let open = !matches!(self.status, TaskStatus::Done | TaskStatus::Cancelled);
        open && self.due_date.map(|d| d < today).unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        if self.title.len() > 200 {
            return Err(TaskValidationError::TitleTooLong(self.title.len()));
        }

        Ok(())
    }
}

impl Document for Task {
    type Id = TaskId;

    const KIND: ResourceKind = ResourceKind::Task;

    fn id(&self) -> TaskId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}/{}]", self.title, self.status, self.priority)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    TitleTooLong(usize),
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Task title cannot be empty"),
            Self::TitleTooLong(len) => write!(f, "Task title too long ({} chars, max 200)", len),
        }
    }
}

impl std::error::Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut task = Task::new("Load truck");
        assert!(!task.is_overdue(today));

        task.due_date = NaiveDate::from_ymd_opt(2025, 6, 14);
        assert!(task.is_overdue(today));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Task::new("  ").validate(),
            Err(TaskValidationError::EmptyTitle)
        );
        assert!(Task::new("Patch stage box").validate().is_ok());
    }
}
