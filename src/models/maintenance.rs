//! Maintenance model
//!
//! Scheduled or ad-hoc work on a piece of equipment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EquipmentId, MaintenanceId};
use super::money::Money;
use super::resource::{Document, ResourceKind};
use super::status::{MaintenanceStatus, MaintenanceType};

/// A maintenance record for one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    #[serde(rename = "_id")]
    pub id: MaintenanceId,

    pub equipment: EquipmentId,

    #[serde(rename = "type", default)]
    pub maintenance_type: MaintenanceType,

    #[serde(default)]
    pub status: MaintenanceStatus,

    pub scheduled_date: NaiveDate,

    #[serde(default)]
    pub completed_date: Option<NaiveDate>,

    #[serde(default)]
    pub cost: Money,

    #[serde(default)]
    pub technician: Option<String>,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Maintenance {
    pub fn new(
        equipment: EquipmentId,
        maintenance_type: MaintenanceType,
        scheduled_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MaintenanceId::new(),
            equipment,
            maintenance_type,
            status: MaintenanceStatus::Scheduled,
            scheduled_date,
            completed_date: None,
            cost: Money::zero(),
            technician: None,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark as completed, stamping `completed_date` if it is not already set
    pub fn complete(&mut self, on: NaiveDate) {
        self.status = MaintenanceStatus::Completed;
        if self.completed_date.is_none() {
            self.completed_date = Some(on);
        }
        self.updated_at = Utc::now();
    }

    /// Whether the record still needs doing
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            MaintenanceStatus::Scheduled | MaintenanceStatus::InProgress
        )
    }

    pub fn validate(&self) -> Result<(), MaintenanceValidationError> {
        if self.cost.is_negative() {
            return Err(MaintenanceValidationError::NegativeCost);
        }

        if let Some(done) = self.completed_date {
            if self.status != MaintenanceStatus::Completed {
                return Err(MaintenanceValidationError::CompletedDateOnOpenRecord(done));
            }
        }

        Ok(())
    }
}

impl Document for Maintenance {
    type Id = MaintenanceId;

    const KIND: ResourceKind = ResourceKind::Maintenance;

    fn id(&self) -> MaintenanceId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Maintenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} [{}]",
            self.maintenance_type, self.scheduled_date, self.status
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceValidationError {
    NegativeCost,
    CompletedDateOnOpenRecord(NaiveDate),
}

impl fmt::Display for MaintenanceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCost => write!(f, "Maintenance cost cannot be negative"),
            Self::CompletedDateOnOpenRecord(date) => write!(
                f,
                "Completed date {} set on a maintenance record that is not completed",
                date
            ),
        }
    }
}

impl std::error::Error for MaintenanceValidationError {}
