//! Project model
//!
//! A production project (event, tour date, installation) scheduled for a client,
//! with the equipment and crew assigned to it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, EquipmentId, ProjectId, UserId};
use super::money::Money;
use super::resource::{Document, ResourceKind};
use super::status::ProjectStatus;

/// A production project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,

    pub name: String,

    #[serde(default)]
    pub client: Option<ClientId>,

    #[serde(default)]
    pub status: ProjectStatus,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub budget: Money,

    /// Equipment booked for the project
    #[serde(default)]
    pub equipment: Vec<EquipmentId>,

    /// Crew members assigned to the project
    #[serde(default)]
    pub team: Vec<UserId>,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project in planning
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            client: None,
            status: ProjectStatus::Planning,
            start_date,
            end_date,
            location: None,
            budget: Money::zero(),
            equipment: Vec::new(),
            team: Vec::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the project date range overlaps `[start, end]`
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Whether the project is still open (neither completed nor cancelled)
    pub fn is_active(&self) -> bool {
        !matches!(
            self.status,
            ProjectStatus::Completed | ProjectStatus::Cancelled
        )
    }

    /// Validate the project
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }

        if self.end_date < self.start_date {
            return Err(ProjectValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }

        if self.budget.is_negative() {
            return Err(ProjectValidationError::NegativeBudget);
        }

        Ok(())
    }
}

impl Document for Project {
    type Id = ProjectId;

    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {}) [{}]",
            self.name, self.start_date, self.end_date, self.status
        )
    }
}

/// Validation errors for projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    NegativeBudget,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Project name cannot be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "Project ends ({}) before it starts ({})", end, start)
            }
            Self::NegativeBudget => write!(f, "Project budget cannot be negative"),
        }
    }
}

impl std::error::Error for ProjectValidationError {}
