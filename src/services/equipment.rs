//! Equipment service
//!
//! Inventory CRUD with serial-number uniqueness, QR lookup and status changes.

use chrono::NaiveDate;

use crate::audit::RequestContext;
use crate::cache::{keys, Cache};
use crate::error::{AdminError, AdminResult};
use crate::models::{Document, Equipment, EquipmentId, EquipmentStatus, Money};
use crate::storage::Storage;

use super::effects::Effects;
use super::QueryString;

/// Fields for a new piece of equipment
#[derive(Debug, Clone, Default)]
pub struct NewEquipment {
    pub name: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Money,
    pub notes: String,
}

impl NewEquipment {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub(crate) fn build(self) -> Equipment {
        let mut equipment = Equipment::new(self.name.trim(), self.category.trim());
        equipment.serial_number = self.serial_number.map(|s| s.trim().to_string());
        if let Some(status) = self.status {
            equipment.status = status;
        }
        equipment.location = self.location;
        equipment.purchase_date = self.purchase_date;
        equipment.purchase_price = self.purchase_price;
        equipment.notes = self.notes;
        equipment
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Money>,
    pub notes: Option<String>,
}

impl EquipmentPatch {
    pub fn status(status: EquipmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    fn apply(self, equipment: &mut Equipment) {
        if let Some(name) = self.name {
            equipment.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            equipment.category = category.trim().to_string();
        }
        if let Some(serial) = self.serial_number {
            equipment.serial_number = Some(serial.trim().to_string());
        }
        if let Some(status) = self.status {
            equipment.status = status;
        }
        if let Some(location) = self.location {
            equipment.location = Some(location);
        }
        if let Some(date) = self.purchase_date {
            equipment.purchase_date = Some(date);
        }
        if let Some(price) = self.purchase_price {
            equipment.purchase_price = price;
        }
        if let Some(notes) = self.notes {
            equipment.notes = notes;
        }
    }
}

/// List filter
#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    pub status: Option<EquipmentStatus>,
    pub category: Option<String>,
    /// Case-insensitive match on name, serial number or QR code
    pub search: Option<String>,
}

impl EquipmentFilter {
    fn matches(&self, equipment: &Equipment) -> bool {
        if let Some(status) = self.status {
            if equipment.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !equipment.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = equipment.name.to_lowercase().contains(&needle)
                || equipment.qr_code.to_lowercase().contains(&needle)
                || equipment
                    .serial_number
                    .as_deref()
                    .map(|s| s.to_lowercase().contains(&needle))
                    .unwrap_or(false);
            if !hit {
                return false;
            }
        }
        true
    }

    fn query(&self) -> String {
        QueryString::default()
            .param("status", self.status.map(|s| s.as_str()))
            .param("category", self.category.as_deref())
            .param("search", self.search.as_deref())
            .finish()
    }
}

/// Service for equipment management
pub struct EquipmentService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> EquipmentService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    pub(crate) fn validate(&self, equipment: &Equipment) -> AdminResult<()> {
        equipment
            .validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        if let Some(serial) = &equipment.serial_number {
            let id = equipment.id;
            let taken = self.storage.equipment.any(|other| {
                other.id != id
                    && other
                        .serial_number
                        .as_deref()
                        .map(|s| s.eq_ignore_ascii_case(serial))
                        .unwrap_or(false)
            })?;
            if taken {
                return Err(AdminError::Duplicate {
                    entity_type: "Equipment",
                    identifier: serial.clone(),
                });
            }
        }

        Ok(())
    }

    /// Create a piece of equipment
    pub fn create(&self, input: NewEquipment, ctx: &RequestContext) -> AdminResult<Equipment> {
        let equipment = input.build();
        self.validate(&equipment)?;

        self.storage.equipment.upsert(equipment.clone())?;
        self.storage.equipment.save()?;

        tracing::info!(id = %equipment.id, name = %equipment.name, "equipment created");
        self.effects().created(&equipment, ctx);

        Ok(equipment)
    }

    /// Get equipment by id (cached)
    pub fn get(&self, id: EquipmentId) -> AdminResult<Equipment> {
        let key = keys::document_key(Equipment::KIND, id);
        self.cache.get_or_load(&key, || {
            self.storage
                .equipment
                .get(id)?
                .ok_or_else(|| AdminError::not_found("Equipment", id.to_string()))
        })
    }

    /// Find equipment by the reference printed on its QR label
    pub fn find_by_qr_code(&self, code: &str) -> AdminResult<Option<Equipment>> {
        let code = code.trim();
        Ok(self
            .storage
            .equipment
            .find(|e| e.qr_code.eq_ignore_ascii_case(code))?
            .into_iter()
            .next())
    }

    /// List equipment, newest first (cached per filter)
    pub fn list(&self, filter: &EquipmentFilter) -> AdminResult<Vec<Equipment>> {
        let key = keys::list_key(Equipment::KIND, &filter.query());
        self.cache
            .get_or_load(&key, || self.storage.equipment.find(|e| filter.matches(e)))
    }

    /// Apply a partial update
    pub fn update(
        &self,
        id: EquipmentId,
        patch: EquipmentPatch,
        ctx: &RequestContext,
    ) -> AdminResult<Equipment> {
        self.update_with_comment(id, patch, ctx, None)
    }

    pub(crate) fn update_with_comment(
        &self,
        id: EquipmentId,
        patch: EquipmentPatch,
        ctx: &RequestContext,
        comment: Option<String>,
    ) -> AdminResult<Equipment> {
        let before = self
            .storage
            .equipment
            .get(id)?
            .ok_or_else(|| AdminError::not_found("Equipment", id.to_string()))?;

        let mut equipment = before.clone();
        patch.apply(&mut equipment);
        self.validate(&equipment)?;
        equipment.touch();

        self.storage.equipment.upsert(equipment.clone())?;
        self.storage.equipment.save()?;

        self.effects().updated(&before, &equipment, ctx, comment);

        Ok(equipment)
    }

    /// Change the status
    pub fn set_status(
        &self,
        id: EquipmentId,
        status: EquipmentStatus,
        ctx: &RequestContext,
    ) -> AdminResult<Equipment> {
        self.update(id, EquipmentPatch::status(status), ctx)
    }

    /// Delete equipment
    ///
    /// Equipment with open maintenance records cannot be deleted.
    pub fn delete(&self, id: EquipmentId, ctx: &RequestContext) -> AdminResult<Equipment> {
        if self
            .storage
            .maintenance
            .any(|m| m.equipment == id && m.is_pending())?
        {
            return Err(AdminError::Validation(format!(
                "Equipment {} has open maintenance records",
                id
            )));
        }

        let equipment = self
            .storage
            .equipment
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Equipment", id.to_string()))?;
        self.storage.equipment.save()?;

        tracing::info!(id = %id, "equipment deleted");
        self.effects().deleted(&equipment, ctx);

        Ok(equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, AuditFilter, FieldChange};
    use crate::config::SkpPaths;
    use crate::models::ResourceKind;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage, Cache::memory(Duration::from_secs(60)))
    }

    #[test]
    fn test_create_generates_qr_code() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);

        let eq = service
            .create(NewEquipment::new("Sharpy", "Lighting"), &RequestContext::system())
            .unwrap();

        assert_eq!(eq.qr_code, format!("SKP-EQ-{}", eq.id.to_hex().to_uppercase()));
        assert_eq!(
            service.find_by_qr_code(&eq.qr_code.to_lowercase()).unwrap().unwrap().id,
            eq.id
        );
    }

    #[test]
    fn test_status_update_scenario() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);
        let user = crate::models::UserId::new();
        let ctx = RequestContext::for_user(user);

        let e1 = service.create(NewEquipment::new("E1", "Audio"), &ctx).unwrap();
        service.set_status(e1.id, EquipmentStatus::InUse, &ctx).unwrap();

        let updates = storage
            .audit
            .get_audit_logs(&AuditFilter {
                action: Some(AuditAction::Update),
                ..AuditFilter::for_resource(ResourceKind::Equipment, e1.id.to_string())
            })
            .unwrap();
        assert_eq!(updates.total, 1);
        assert_eq!(updates.logs[0].user, Some(user));

        let v2 = storage
            .versions
            .get(ResourceKind::Equipment, &e1.id.to_string(), 2)
            .unwrap()
            .unwrap();
        assert_eq!(
            v2.changes,
            vec![FieldChange::new("status", json!("AVAILABLE"), json!("IN_USE"))]
        );
        assert_eq!(v2.changed_by, Some(user));
    }

    #[test]
    fn test_duplicate_serial_rejected() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let mut first = NewEquipment::new("Mixer", "Audio");
        first.serial_number = Some("SN-100".into());
        service.create(first, &ctx).unwrap();

        let mut second = NewEquipment::new("Mixer 2", "Audio");
        second.serial_number = Some("sn-100".into());
        let err = service.create(second, &ctx).unwrap_err();
        assert!(matches!(err, AdminError::Duplicate { .. }));
        assert_eq!(storage.equipment.count().unwrap(), 1);
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);

        let err = service
            .create(NewEquipment::new("   ", "Audio"), &RequestContext::system())
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(storage.audit.entry_count().unwrap(), 0);
        assert_eq!(storage.versions.count().unwrap(), 0);
    }

    #[test]
    fn test_list_is_invalidated_by_writes() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);
        let ctx = RequestContext::system();
        let filter = EquipmentFilter {
            status: Some(EquipmentStatus::Available),
            ..EquipmentFilter::default()
        };

        let a = service.create(NewEquipment::new("A", "Rigging"), &ctx).unwrap();
        assert_eq!(service.list(&filter).unwrap().len(), 1);

        service.create(NewEquipment::new("B", "Rigging"), &ctx).unwrap();
        let listed = service.list(&filter).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, a.id);

        service.set_status(a.id, EquipmentStatus::Broken, &ctx).unwrap();
        assert_eq!(service.list(&filter).unwrap().len(), 1);
        assert_eq!(service.get(a.id).unwrap().status, EquipmentStatus::Broken);
    }

    #[test]
    fn test_delete() {
        let (_temp, storage, cache) = setup();
        let service = EquipmentService::new(&storage, &cache);
        let ctx = RequestContext::system();
        let eq = service.create(NewEquipment::new("Case", "Transport"), &ctx).unwrap();

        service.delete(eq.id, &ctx).unwrap();

        assert!(service.get(eq.id).unwrap_err().is_not_found());
        assert!(service.delete(eq.id, &ctx).unwrap_err().is_not_found());
        // Create wrote version 1; delete writes no version
        assert_eq!(storage.versions.count().unwrap(), 1);
        assert_eq!(storage.audit.entry_count().unwrap(), 2);
    }
}
