//! Project service
//!
//! Projects reference a client and a set of equipment; both must exist.

use chrono::NaiveDate;

use crate::audit::RequestContext;
use crate::cache::{keys, Cache};
use crate::error::{AdminError, AdminResult};
use crate::models::{ClientId, Document, EquipmentId, Money, Project, ProjectId, ProjectStatus, UserId};
use crate::storage::Storage;

use super::effects::Effects;
use super::QueryString;

/// Fields for a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub client: Option<ClientId>,
    pub status: Option<ProjectStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: Option<String>,
    pub budget: Money,
    pub equipment: Vec<EquipmentId>,
    pub team: Vec<UserId>,
    pub description: String,
}

impl NewProject {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            client: None,
            status: None,
            start_date,
            end_date,
            location: None,
            budget: Money::zero(),
            equipment: Vec::new(),
            team: Vec::new(),
            description: String::new(),
        }
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client: Option<ClientId>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub budget: Option<Money>,
    /// Replaces the assigned equipment list
    pub equipment: Option<Vec<EquipmentId>>,
    pub team: Option<Vec<UserId>>,
    pub description: Option<String>,
}

impl ProjectPatch {
    fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name.trim().to_string();
        }
        if let Some(client) = self.client {
            project.client = Some(client);
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(start) = self.start_date {
            project.start_date = start;
        }
        if let Some(end) = self.end_date {
            project.end_date = end;
        }
        if let Some(location) = self.location {
            project.location = Some(location);
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(equipment) = self.equipment {
            project.equipment = equipment;
        }
        if let Some(team) = self.team {
            project.team = team;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub client: Option<ClientId>,
    /// Only projects overlapping this date
    pub active_on: Option<NaiveDate>,
}

impl ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status {
            if project.status != status {
                return false;
            }
        }
        if let Some(client) = self.client {
            if project.client != Some(client) {
                return false;
            }
        }
        if let Some(day) = self.active_on {
            if !project.overlaps(day, day) {
                return false;
            }
        }
        true
    }

    fn query(&self) -> String {
        QueryString::default()
            .param("status", self.status.map(|s| s.as_str()))
            .param("client", self.client.map(|c| c.to_string()).as_deref())
            .param("activeOn", self.active_on.map(|d| d.to_string()).as_deref())
            .finish()
    }
}

/// Service for project management
pub struct ProjectService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> ProjectService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    pub(crate) fn validate(&self, project: &Project) -> AdminResult<()> {
        project
            .validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        if let Some(client) = project.client {
            if !self.storage.clients.exists(client)? {
                return Err(AdminError::not_found("Client", client.to_string()));
            }
        }

        for equipment in &project.equipment {
            if !self.storage.equipment.exists(*equipment)? {
                return Err(AdminError::not_found("Equipment", equipment.to_string()));
            }
        }

        Ok(())
    }

    pub fn create(&self, input: NewProject, ctx: &RequestContext) -> AdminResult<Project> {
        let mut project = Project::new(input.name.trim(), input.start_date, input.end_date);
        project.client = input.client;
        if let Some(status) = input.status {
            project.status = status;
        }
        project.location = input.location;
        project.budget = input.budget;
        project.equipment = input.equipment;
        project.team = input.team;
        project.description = input.description;

        self.validate(&project)?;

        self.storage.projects.upsert(project.clone())?;
        self.storage.projects.save()?;

        tracing::info!(id = %project.id, name = %project.name, "project created");
        self.effects().created(&project, ctx);

        Ok(project)
    }

    pub fn get(&self, id: ProjectId) -> AdminResult<Project> {
        let key = keys::document_key(Project::KIND, id);
        self.cache.get_or_load(&key, || {
            self.storage
                .projects
                .get(id)?
                .ok_or_else(|| AdminError::not_found("Project", id.to_string()))
        })
    }

    pub fn list(&self, filter: &ProjectFilter) -> AdminResult<Vec<Project>> {
        let key = keys::list_key(Project::KIND, &filter.query());
        self.cache
            .get_or_load(&key, || self.storage.projects.find(|p| filter.matches(p)))
    }

    pub fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
        ctx: &RequestContext,
    ) -> AdminResult<Project> {
        let before = self
            .storage
            .projects
            .get(id)?
            .ok_or_else(|| AdminError::not_found("Project", id.to_string()))?;

        let mut project = before.clone();
        patch.apply(&mut project);
        self.validate(&project)?;
        project.touch();

        self.storage.projects.upsert(project.clone())?;
        self.storage.projects.save()?;

        self.effects().updated(&before, &project, ctx, None);

        Ok(project)
    }

    pub fn set_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        ctx: &RequestContext,
    ) -> AdminResult<Project> {
        let patch = ProjectPatch {
            status: Some(status),
            ..ProjectPatch::default()
        };
        self.update(id, patch, ctx)
    }

    /// Delete a project; its tasks are kept but detached
    pub fn delete(&self, id: ProjectId, ctx: &RequestContext) -> AdminResult<Project> {
        let project = self
            .storage
            .projects
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Project", id.to_string()))?;
        self.storage.projects.save()?;

        tracing::info!(id = %id, "project deleted");
        self.effects().deleted(&project, ctx);

        Ok(project)
    }
}
