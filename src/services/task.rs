//! Task service

use chrono::NaiveDate;

use crate::audit::RequestContext;
use crate::cache::{keys, Cache};
use crate::error::{AdminError, AdminResult};
use crate::models::{Document, ProjectId, Task, TaskId, TaskPriority, TaskStatus, UserId};
use crate::storage::Storage;

use super::effects::Effects;
use super::QueryString;

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub project: Option<ProjectId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub description: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub project: Option<ProjectId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TaskPatch {
    fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(project) = self.project {
            task.project = Some(project);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(user) = self.assigned_to {
            task.assigned_to = Some(user);
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(description) = self.description {
            task.description = description;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project: Option<ProjectId>,
    pub assigned_to: Option<UserId>,
}

impl TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.project.map_or(true, |p| task.project == Some(p))
            && self.assigned_to.map_or(true, |u| task.assigned_to == Some(u))
    }

    fn query(&self) -> String {
        QueryString::default()
            .param("status", self.status.map(|s| s.as_str()))
            .param("priority", self.priority.map(|p| p.as_str()))
            .param("project", self.project.map(|p| p.to_string()).as_deref())
            .param("assignedTo", self.assigned_to.map(|u| u.to_string()).as_deref())
            .finish()
    }
}

/// Service for task management
pub struct TaskService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> TaskService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    pub(crate) fn validate(&self, task: &Task) -> AdminResult<()> {
        task.validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        if let Some(project) = task.project {
            if !self.storage.projects.exists(project)? {
                return Err(AdminError::not_found("Project", project.to_string()));
            }
        }

        Ok(())
    }

    pub fn create(&self, input: NewTask, ctx: &RequestContext) -> AdminResult<Task> {
        let mut task = Task::new(input.title.trim());
        task.project = input.project;
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        task.assigned_to = input.assigned_to;
        task.due_date = input.due_date;
        task.description = input.description;

        self.validate(&task)?;

        self.storage.tasks.upsert(task.clone())?;
        self.storage.tasks.save()?;

        tracing::info!(id = %task.id, title = %task.title, "task created");
        self.effects().created(&task, ctx);

        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> AdminResult<Task> {
        let key = keys::document_key(Task::KIND, id);
        self.cache.get_or_load(&key, || {
            self.storage
                .tasks
                .get(id)?
                .ok_or_else(|| AdminError::not_found("Task", id.to_string()))
        })
    }

    pub fn list(&self, filter: &TaskFilter) -> AdminResult<Vec<Task>> {
        let key = keys::list_key(Task::KIND, &filter.query());
        self.cache
            .get_or_load(&key, || self.storage.tasks.find(|t| filter.matches(t)))
    }

    /// Open tasks past their due date
    pub fn overdue(&self, today: NaiveDate) -> AdminResult<Vec<Task>> {
        self.storage.tasks.find(|t| t.is_overdue(today))
    }

    pub fn update(&self, id: TaskId, patch: TaskPatch, ctx: &RequestContext) -> AdminResult<Task> {
        let before = self
            .storage
            .tasks
            .get(id)?
            .ok_or_else(|| AdminError::not_found("Task", id.to_string()))?;

        let mut task = before.clone();
        patch.apply(&mut task);
        self.validate(&task)?;
        task.touch();

        self.storage.tasks.upsert(task.clone())?;
        self.storage.tasks.save()?;

        self.effects().updated(&before, &task, ctx, None);

        Ok(task)
    }

    pub fn set_status(&self, id: TaskId, status: TaskStatus, ctx: &RequestContext) -> AdminResult<Task> {
        let patch = TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        };
        self.update(id, patch, ctx)
    }

    pub fn delete(&self, id: TaskId, ctx: &RequestContext) -> AdminResult<Task> {
        let task = self
            .storage
            .tasks
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Task", id.to_string()))?;
        self.storage.tasks.save()?;

        tracing::info!(id = %id, "task deleted");
        self.effects().deleted(&task, ctx);

        Ok(task)
    }
}
