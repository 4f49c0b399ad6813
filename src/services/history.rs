//! Version history service
//!
//! Lists, compares and rolls back document versions across every versioned
//! resource kind.

use serde::Serialize;
use serde_json::Value;

use crate::audit::{is_internal_field, AuditAction, FieldChange, RequestContext};
use crate::cache::Cache;
use crate::error::{AdminError, AdminResult};
use crate::history::VersionHistory;
use crate::models::{Client, Equipment, Maintenance, Project, ResourceKind, Task};
use crate::storage::{Storage, StoredDocument};

use super::effects::{snapshot, Effects, Mutation};
use super::{EquipmentService, MaintenanceService, ProjectService, TaskService};

/// Result of a rollback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackOutcome {
    pub resource: ResourceKind,
    pub resource_id: String,
    /// Version whose snapshot was restored
    pub restored_version: u32,
    /// Version recorded for the rollback itself
    pub new_version: Option<u32>,
    /// Document state after the rollback
    pub data: Value,
}

pub struct HistoryService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> HistoryService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn ensure_versioned(kind: ResourceKind) -> AdminResult<()> {
        if kind.is_versioned() {
            Ok(())
        } else {
            Err(AdminError::Validation(format!("{} is not versioned", kind)))
        }
    }

    /// All versions of a document, newest first
    pub fn list_versions(
        &self,
        kind: ResourceKind,
        resource_id: &str,
    ) -> AdminResult<Vec<VersionHistory>> {
        Self::ensure_versioned(kind)?;
        self.storage.versions.list(kind, resource_id)
    }

    pub fn get_version(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        version: u32,
    ) -> AdminResult<VersionHistory> {
        Self::ensure_versioned(kind)?;
        self.storage
            .versions
            .get(kind, resource_id, version)?
            .ok_or_else(|| AdminError::version_not_found(resource_id, version))
    }

    /// Field differences going from version `from` to version `to`
    pub fn compare_versions(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        from: u32,
        to: u32,
    ) -> AdminResult<Vec<FieldChange>> {
        Self::ensure_versioned(kind)?;
        self.storage
            .versions
            .compare_versions(kind, resource_id, from, to)
    }

    /// Restore a document to the state captured in `version`
    ///
    /// Every non-internal field present in the snapshot overwrites the live
    /// document. The rollback is recorded as a new version, the target version
    /// is flagged as rolled back to, and a ROLLBACK audit entry is written.
    pub fn rollback_to_version(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        version: u32,
        ctx: &RequestContext,
    ) -> AdminResult<RollbackOutcome> {
        let (storage, cache) = (self.storage, self.cache);
        match kind {
            ResourceKind::Equipment => {
                let service = EquipmentService::new(storage, cache);
                self.rollback::<Equipment, _>(resource_id, version, ctx, |e| service.validate(e))
            }
            ResourceKind::Project => {
                let service = ProjectService::new(storage, cache);
                self.rollback::<Project, _>(resource_id, version, ctx, |p| service.validate(p))
            }
            ResourceKind::Task => {
                let service = TaskService::new(storage, cache);
                self.rollback::<Task, _>(resource_id, version, ctx, |t| service.validate(t))
            }
            ResourceKind::Client => self.rollback::<Client, _>(resource_id, version, ctx, |c| {
                c.validate()
                    .map_err(|e| AdminError::Validation(e.to_string()))
            }),
            ResourceKind::Maintenance => {
                let service = MaintenanceService::new(storage, cache);
                self.rollback::<Maintenance, _>(resource_id, version, ctx, |m| service.validate(m))
            }
            ResourceKind::Widget => Err(AdminError::Validation(format!("{} is not versioned", kind))),
        }
    }

    /// Restore a snapshot; `validate` applies the same rules as a regular update
    fn rollback<T, V>(
        &self,
        resource_id: &str,
        version: u32,
        ctx: &RequestContext,
        validate: V,
    ) -> AdminResult<RollbackOutcome>
    where
        T: StoredDocument,
        V: Fn(&T) -> AdminResult<()>,
    {
        let kind = T::KIND;
        let id: T::Id = resource_id.parse()?;
        let resource_id = id.to_string();

        let target = self
            .storage
            .versions
            .get(kind, &resource_id, version)?
            .ok_or_else(|| AdminError::version_not_found(&resource_id, version))?;

        let collection = T::collection(self.storage);
        let current = collection
            .get(id)?
            .ok_or_else(|| AdminError::not_found(kind.name(), resource_id.clone()))?;

        let before = snapshot(&current);
        let mut merged = before.clone();
        if let (Some(live), Some(restored)) = (merged.as_object_mut(), target.data.as_object()) {
            for (field, value) in restored {
                if !is_internal_field(field) {
                    live.insert(field.clone(), value.clone());
                }
            }
        }

        let mut document: T = serde_json::from_value(merged).map_err(|e| {
            AdminError::Storage(format!(
                "Version {} of {} {} cannot be restored: {}",
                version, kind, resource_id, e
            ))
        })?;
        document.touch();

        // A reference that has since been deleted is a conflict, not a missing resource
        validate(&document).map_err(|e| match e {
            AdminError::NotFound {
                entity_type,
                identifier,
            } => AdminError::Validation(format!(
                "Version {} of {} {} references missing {} {}",
                version, kind, resource_id, entity_type, identifier
            )),
            other => other,
        })?;

        collection.upsert(document.clone())?;
        collection.save()?;

        let after = snapshot(&document);
        let ctx = ctx.or_request(
            "POST",
            &format!("{}/{}/rollback/{}", kind.api_path(), resource_id, version),
        );
        let new_version = Effects::new(self.storage, self.cache).record(Mutation {
            kind,
            resource_id: resource_id.clone(),
            action: AuditAction::Rollback,
            before,
            after: after.clone(),
            ctx: &ctx,
            comment: Some(format!("Rolled back to version {}", version)),
            versioned: true,
        });

        if let Err(e) = self
            .storage
            .versions
            .mark_rolled_back(kind, &resource_id, version)
        {
            tracing::warn!(
                resource = %kind,
                resource_id = %resource_id,
                version,
                error = %e,
                "failed to flag rolled-back version"
            );
        }

        tracing::info!(resource = %kind, resource_id = %resource_id, version, "rolled back");

        Ok(RollbackOutcome {
            resource: kind,
            resource_id,
            restored_version: version,
            new_version: new_version.map(|v| v.version),
            data: after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditFilter;
    use crate::config::SkpPaths;
    use crate::models::{EquipmentStatus, ProjectStatus};
    use crate::services::{
        EquipmentPatch, EquipmentService, NewEquipment, NewProject, ProjectPatch, ProjectService,
    };
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage, Cache::memory(Duration::from_secs(60)))
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let (_temp, storage, cache) = setup();
        let equipment = EquipmentService::new(&storage, &cache);
        let history = HistoryService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let eq = equipment.create(NewEquipment::new("Console", "Audio"), &ctx).unwrap();
        let patch = EquipmentPatch {
            name: Some("Console MKII".into()),
            status: Some(EquipmentStatus::Broken),
            ..EquipmentPatch::default()
        };
        equipment.update(eq.id, patch, &ctx).unwrap();
        // Warm the cache so the rollback has something to invalidate
        assert_eq!(equipment.get(eq.id).unwrap().name, "Console MKII");

        let id = eq.id.to_string();
        let outcome = history
            .rollback_to_version(ResourceKind::Equipment, &id, 1, &ctx)
            .unwrap();

        assert_eq!(outcome.new_version, Some(3));
        let restored = equipment.get(eq.id).unwrap();
        assert_eq!(restored.name, "Console");
        assert_eq!(restored.status, EquipmentStatus::Available);
        assert_eq!(restored.created_at, eq.created_at);
        assert!(restored.updated_at >= eq.updated_at);

        let v1 = history.get_version(ResourceKind::Equipment, &id, 1).unwrap();
        assert!(v1.is_rolled_back);
        let v3 = history.get_version(ResourceKind::Equipment, &id, 3).unwrap();
        assert_eq!(v3.comment.as_deref(), Some("Rolled back to version 1"));

        let rollbacks = storage
            .audit
            .get_audit_logs(&AuditFilter {
                action: Some(AuditAction::Rollback),
                ..AuditFilter::default()
            })
            .unwrap();
        assert_eq!(rollbacks.total, 1);
        assert_eq!(rollbacks.logs[0].changes.len(), 2);
    }

    #[test]
    fn test_rollback_missing_version_or_resource() {
        let (_temp, storage, cache) = setup();
        let projects = ProjectService::new(&storage, &cache);
        let history = HistoryService::new(&storage, &cache);
        let ctx = RequestContext::system();
        let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        let project = projects.create(NewProject::new("Expo", day, day), &ctx).unwrap();
        let id = project.id.to_string();

        let err = history
            .rollback_to_version(ResourceKind::Project, &id, 7, &ctx)
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        projects.set_status(project.id, ProjectStatus::Cancelled, &ctx).unwrap();
        projects.delete(project.id, &ctx).unwrap();
        let err = history
            .rollback_to_version(ResourceKind::Project, &id, 1, &ctx)
            .unwrap_err();
        assert!(err.is_not_found());

        let err = history
            .rollback_to_version(ResourceKind::Project, "nope", 1, &ctx)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_rollback_rejects_serial_taken_since() {
        let (_temp, storage, cache) = setup();
        let equipment = EquipmentService::new(&storage, &cache);
        let history = HistoryService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let mut first = NewEquipment::new("Amp", "Audio");
        first.serial_number = Some("SN-X".into());
        let e1 = equipment.create(first, &ctx).unwrap();
        let patch = EquipmentPatch {
            serial_number: Some("SN-Y".into()),
            ..EquipmentPatch::default()
        };
        equipment.update(e1.id, patch, &ctx).unwrap();

        let mut second = NewEquipment::new("Amp 2", "Audio");
        second.serial_number = Some("sn-x".into());
        equipment.create(second, &ctx).unwrap();

        let id = e1.id.to_string();
        let err = history
            .rollback_to_version(ResourceKind::Equipment, &id, 1, &ctx)
            .unwrap_err();
        assert!(matches!(err, AdminError::Duplicate { .. }));

        let taken = storage
            .equipment
            .find(|e| {
                e.serial_number
                    .as_deref()
                    .map(|s| s.eq_ignore_ascii_case("SN-X"))
                    .unwrap_or(false)
            })
            .unwrap();
        assert_eq!(taken.len(), 1);
        assert_eq!(equipment.get(e1.id).unwrap().serial_number.as_deref(), Some("SN-Y"));
        assert_eq!(history.list_versions(ResourceKind::Equipment, &id).unwrap().len(), 2);
        assert!(!history.get_version(ResourceKind::Equipment, &id, 1).unwrap().is_rolled_back);
    }

    #[test]
    fn test_rollback_rejects_deleted_reference() {
        let (_temp, storage, cache) = setup();
        let equipment = EquipmentService::new(&storage, &cache);
        let projects = ProjectService::new(&storage, &cache);
        let history = HistoryService::new(&storage, &cache);
        let ctx = RequestContext::system();
        let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        let truss = equipment.create(NewEquipment::new("Truss", "Rigging"), &ctx).unwrap();
        let mut input = NewProject::new("Open Air", day, day);
        input.equipment = vec![truss.id];
        let project = projects.create(input, &ctx).unwrap();

        let patch = ProjectPatch {
            equipment: Some(Vec::new()),
            ..ProjectPatch::default()
        };
        projects.update(project.id, patch, &ctx).unwrap();
        equipment.delete(truss.id, &ctx).unwrap();

        let err = history
            .rollback_to_version(ResourceKind::Project, &project.id.to_string(), 1, &ctx)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(projects.get(project.id).unwrap().equipment.is_empty());
    }

    #[test]
    fn test_compare_and_widgets_unversioned() {
        let (_temp, storage, cache) = setup();
        let equipment = EquipmentService::new(&storage, &cache);
        let history = HistoryService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let eq = equipment.create(NewEquipment::new("Truss", "Rigging"), &ctx).unwrap();
        equipment.set_status(eq.id, EquipmentStatus::InUse, &ctx).unwrap();
        equipment.set_status(eq.id, EquipmentStatus::Retired, &ctx).unwrap();

        let id = eq.id.to_string();
        let diff = history
            .compare_versions(ResourceKind::Equipment, &id, 1, 3)
            .unwrap();
        assert_eq!(
            diff,
            vec![FieldChange::new("status", json!("AVAILABLE"), json!("RETIRED"))]
        );
        assert_eq!(history.list_versions(ResourceKind::Equipment, &id).unwrap().len(), 3);

        assert!(history
            .list_versions(ResourceKind::Widget, &id)
            .unwrap_err()
            .is_validation());
    }
}
