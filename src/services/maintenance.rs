//! Maintenance service
//!
//! Scheduling a record can take equipment out of service; completing it
//! returns equipment in MAINTENANCE to AVAILABLE.

use chrono::NaiveDate;

use crate::audit::RequestContext;
use crate::cache::{keys, Cache};
use crate::error::{AdminError, AdminResult};
use crate::models::{
    Document, EquipmentId, EquipmentStatus, Maintenance, MaintenanceId, MaintenanceStatus,
    MaintenanceType, Money,
};
use crate::storage::Storage;

use super::effects::Effects;
use super::equipment::{EquipmentPatch, EquipmentService};
use super::QueryString;

/// Fields for a new maintenance record
#[derive(Debug, Clone)]
pub struct NewMaintenance {
    pub equipment: EquipmentId,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: NaiveDate,
    pub cost: Money,
    pub technician: Option<String>,
    pub description: String,
    /// Move the equipment to MAINTENANCE status right away
    pub take_out_of_service: bool,
}

impl NewMaintenance {
    pub fn new(
        equipment: EquipmentId,
        maintenance_type: MaintenanceType,
        scheduled_date: NaiveDate,
    ) -> Self {
        Self {
            equipment,
            maintenance_type,
            scheduled_date,
            cost: Money::zero(),
            technician: None,
            description: String::new(),
            take_out_of_service: false,
        }
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct MaintenancePatch {
    pub maintenance_type: Option<MaintenanceType>,
    pub status: Option<MaintenanceStatus>,
    pub scheduled_date: Option<NaiveDate>,
    pub cost: Option<Money>,
    pub technician: Option<String>,
    pub description: Option<String>,
}

impl MaintenancePatch {
    fn apply(self, record: &mut Maintenance) {
        if let Some(kind) = self.maintenance_type {
            record.maintenance_type = kind;
        }
        if let Some(status) = self.status {
            record.status = status;
            if status != MaintenanceStatus::Completed {
                record.completed_date = None;
            }
        }
        if let Some(date) = self.scheduled_date {
            record.scheduled_date = date;
        }
        if let Some(cost) = self.cost {
            record.cost = cost;
        }
        if let Some(technician) = self.technician {
            record.technician = Some(technician);
        }
        if let Some(description) = self.description {
            record.description = description;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceFilter {
    pub equipment: Option<EquipmentId>,
    pub status: Option<MaintenanceStatus>,
    /// Only scheduled or in-progress records
    pub pending_only: bool,
}

impl MaintenanceFilter {
    fn matches(&self, record: &Maintenance) -> bool {
        self.equipment.map_or(true, |e| record.equipment == e)
            && self.status.map_or(true, |s| record.status == s)
            && (!self.pending_only || record.is_pending())
    }

    fn query(&self) -> String {
        QueryString::default()
            .param("equipment", self.equipment.map(|e| e.to_string()).as_deref())
            .param("status", self.status.map(|s| s.as_str()))
            .param("pending", self.pending_only.then_some("true"))
            .finish()
    }
}

/// Service for maintenance records
pub struct MaintenanceService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    pub(crate) fn validate(&self, record: &Maintenance) -> AdminResult<()> {
        record
            .validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;
        if !self.storage.equipment.exists(record.equipment)? {
            return Err(AdminError::not_found("Equipment", record.equipment.to_string()));
        }
        Ok(())
    }

    pub fn create(&self, input: NewMaintenance, ctx: &RequestContext) -> AdminResult<Maintenance> {
        let mut record = Maintenance::new(input.equipment, input.maintenance_type, input.scheduled_date);
        record.cost = input.cost;
        record.technician = input.technician;
        record.description = input.description;

        self.validate(&record)?;

        self.storage.maintenance.upsert(record.clone())?;
        self.storage.maintenance.save()?;

        tracing::info!(id = %record.id, equipment = %record.equipment, "maintenance scheduled");
        self.effects().created(&record, ctx);

        if input.take_out_of_service {
            EquipmentService::new(self.storage, self.cache).update_with_comment(
                record.equipment,
                EquipmentPatch::status(EquipmentStatus::Maintenance),
                ctx,
                Some(format!("Maintenance {} scheduled", record.id)),
            )?;
        }

        Ok(record)
    }

    pub fn get(&self, id: MaintenanceId) -> AdminResult<Maintenance> {
        let key = keys::document_key(Maintenance::KIND, id);
        self.cache.get_or_load(&key, || {
            self.storage
                .maintenance
                .get(id)?
                .ok_or_else(|| AdminError::not_found("Maintenance", id.to_string()))
        })
    }

    pub fn list(&self, filter: &MaintenanceFilter) -> AdminResult<Vec<Maintenance>> {
        let key = keys::list_key(Maintenance::KIND, &filter.query());
        self.cache
            .get_or_load(&key, || self.storage.maintenance.find(|m| filter.matches(m)))
    }

    /// Pending records scheduled on or before a date
    pub fn due(&self, on_or_before: NaiveDate) -> AdminResult<Vec<Maintenance>> {
        let mut due = self
            .storage
            .maintenance
            .find(|m| m.is_pending() && m.scheduled_date <= on_or_before)?;
        due.sort_by_key(|m| m.scheduled_date);
        Ok(due)
    }

    pub fn update(
        &self,
        id: MaintenanceId,
        patch: MaintenancePatch,
        ctx: &RequestContext,
    ) -> AdminResult<Maintenance> {
        self.update_record(id, |record| patch.apply(record), ctx, None)
    }

    fn update_record<F>(
        &self,
        id: MaintenanceId,
        change: F,
        ctx: &RequestContext,
        comment: Option<String>,
    ) -> AdminResult<Maintenance>
    where
        F: FnOnce(&mut Maintenance),
    {
        let before = self
            .storage
            .maintenance
            .get(id)?
            .ok_or_else(|| AdminError::not_found("Maintenance", id.to_string()))?;

        let mut record = before.clone();
        change(&mut record);
        self.validate(&record)?;
        record.touch();

        self.storage.maintenance.upsert(record.clone())?;
        self.storage.maintenance.save()?;

        self.effects().updated(&before, &record, ctx, comment);

        Ok(record)
    }

    /// Mark a record completed
    ///
    /// Stamps `completedDate` when unset. Equipment still in MAINTENANCE goes
    /// back to AVAILABLE through the regular equipment update path.
    pub fn complete(
        &self,
        id: MaintenanceId,
        completed_on: NaiveDate,
        ctx: &RequestContext,
    ) -> AdminResult<Maintenance> {
        let record = self.update_record(
            id,
            |record| record.complete(completed_on),
            ctx,
            Some("Maintenance completed".to_string()),
        )?;

        self.release_equipment(&record, ctx)?;

        Ok(record)
    }

    /// Return the record's equipment to AVAILABLE if it is still in MAINTENANCE
    pub(crate) fn release_equipment(
        &self,
        record: &Maintenance,
        ctx: &RequestContext,
    ) -> AdminResult<()> {
        let equipment = self
            .storage
            .equipment
            .get(record.equipment)?
            .ok_or_else(|| AdminError::not_found("Equipment", record.equipment.to_string()))?;

        if equipment.status == EquipmentStatus::Maintenance {
            EquipmentService::new(self.storage, self.cache).update_with_comment(
                equipment.id,
                EquipmentPatch::status(EquipmentStatus::Available),
                ctx,
                Some(format!("Maintenance {} completed", record.id)),
            )?;
        }

        Ok(())
    }

    pub fn delete(&self, id: MaintenanceId, ctx: &RequestContext) -> AdminResult<Maintenance> {
        let record = self
            .storage
            .maintenance
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Maintenance", id.to_string()))?;
        self.storage.maintenance.save()?;

        tracing::info!(id = %id, "maintenance record deleted");
        self.effects().deleted(&record, ctx);

        Ok(record)
    }
}
