//! Bulk operations
//!
//! Each id is processed on its own; an invalid or missing id is reported in
//! the result and does not stop the batch.

use serde::Serialize;

use crate::audit::{AuditAction, RequestContext};
use crate::cache::Cache;
use crate::error::{AdminError, AdminResult};
use crate::models::{
    ClientId, Equipment, EquipmentId, EquipmentStatus, Maintenance, MaintenanceId,
    MaintenanceStatus, Project, ProjectId, ProjectStatus, ResourceKind, Task, TaskId, TaskStatus,
};
use crate::storage::{Storage, StoredDocument};

use super::effects::{snapshot, Effects, Mutation};
use super::{ClientService, EquipmentService, MaintenanceService, ProjectService, TaskService};

/// One id that could not be processed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a bulk operation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkResult {
    fn push<T>(&mut self, id: &str, outcome: AdminResult<T>) {
        match outcome {
            Ok(_) => self.succeeded.push(id.to_string()),
            Err(e) => self.failed.push(BulkFailure {
                id: id.to_string(),
                error: e.to_string(),
            }),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct BulkService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> BulkService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    /// Set the status of many documents of one kind
    ///
    /// Each change is versioned and audited as BULK_UPDATE. The status string
    /// is parsed against the kind's status enum before anything is touched.
    pub fn update_status(
        &self,
        kind: ResourceKind,
        ids: &[String],
        status: &str,
        ctx: &RequestContext,
    ) -> AdminResult<BulkResult> {
        let invalid = |expected: String| {
            AdminError::Validation(format!(
                "Invalid {} status '{}'. Expected one of: {}",
                kind, status, expected
            ))
        };

        let ctx = ctx.or_request("PATCH", &format!("{}/bulk", kind.api_path()));
        let mut result = BulkResult::default();

        match kind {
            ResourceKind::Equipment => {
                let status = EquipmentStatus::parse(status)
                    .ok_or_else(|| invalid(EquipmentStatus::expected()))?;
                for id in ids {
                    result.push(id, self.set_one::<Equipment>(id, &ctx, |e| e.status = status));
                }
            }
            ResourceKind::Project => {
                let status = ProjectStatus::parse(status)
                    .ok_or_else(|| invalid(ProjectStatus::expected()))?;
                for id in ids {
                    result.push(id, self.set_one::<Project>(id, &ctx, |p| p.status = status));
                }
            }
            ResourceKind::Task => {
                let status = TaskStatus::parse(status)
                    .ok_or_else(|| invalid(TaskStatus::expected()))?;
                for id in ids {
                    result.push(id, self.set_one::<Task>(id, &ctx, |t| t.status = status));
                }
            }
            ResourceKind::Maintenance => {
                let status = MaintenanceStatus::parse(status)
                    .ok_or_else(|| invalid(MaintenanceStatus::expected()))?;
                let today = chrono::Utc::now().date_naive();
                let maintenance = MaintenanceService::new(self.storage, self.cache);
                for id in ids {
                    let outcome = self
                        .set_one::<Maintenance>(id, &ctx, |m| {
                            if status == MaintenanceStatus::Completed {
                                m.complete(today);
                            } else {
                                m.status = status;
                                m.completed_date = None;
                            }
                        })
                        .and_then(|record| {
                            if status == MaintenanceStatus::Completed {
                                maintenance.release_equipment(&record, &ctx)
                            } else {
                                Ok(())
                            }
                        });
                    result.push(id, outcome);
                }
            }
            ResourceKind::Client | ResourceKind::Widget => {
                return Err(AdminError::Validation(format!("{} has no status", kind)));
            }
        }

        tracing::info!(
            resource = %kind,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "bulk status update"
        );
        Ok(result)
    }

    fn set_one<T: StoredDocument>(
        &self,
        id: &str,
        ctx: &RequestContext,
        change: impl FnOnce(&mut T),
    ) -> AdminResult<T> {
        let parsed: T::Id = id.parse()?;
        let collection = T::collection(self.storage);
        let before = collection
            .get(parsed)?
            .ok_or_else(|| AdminError::not_found(T::KIND.name(), id.to_string()))?;

        let mut after = before.clone();
        change(&mut after);
        after.touch();

        collection.upsert(after.clone())?;
        collection.save()?;

        Effects::new(self.storage, self.cache).record(Mutation {
            kind: T::KIND,
            resource_id: parsed.to_string(),
            action: AuditAction::BulkUpdate,
            before: snapshot(&before),
            after: snapshot(&after),
            ctx,
            comment: Some("Bulk status update".to_string()),
            versioned: true,
        });
        Ok(after)
    }

    /// Delete many documents of one kind through the regular delete path
    pub fn delete(
        &self,
        kind: ResourceKind,
        ids: &[String],
        ctx: &RequestContext,
    ) -> AdminResult<BulkResult> {
        if kind == ResourceKind::Widget {
            return Err(AdminError::Validation("Widgets are deleted per user".into()));
        }

        let mut result = BulkResult::default();

        for id in ids {
            let outcome = match kind {
                ResourceKind::Equipment => id
                    .parse::<EquipmentId>()
                    .and_then(|id| EquipmentService::new(self.storage, self.cache).delete(id, ctx))
                    .map(|_| ()),
                ResourceKind::Project => id
                    .parse::<ProjectId>()
                    .and_then(|id| ProjectService::new(self.storage, self.cache).delete(id, ctx))
                    .map(|_| ()),
                ResourceKind::Task => id
                    .parse::<TaskId>()
                    .and_then(|id| TaskService::new(self.storage, self.cache).delete(id, ctx))
                    .map(|_| ()),
                ResourceKind::Client => id
                    .parse::<ClientId>()
                    .and_then(|id| ClientService::new(self.storage, self.cache).delete(id, ctx))
                    .map(|_| ()),
                ResourceKind::Maintenance => id
                    .parse::<MaintenanceId>()
                    .and_then(|id| MaintenanceService::new(self.storage, self.cache).delete(id, ctx))
                    .map(|_| ()),
                ResourceKind::Widget => Err(AdminError::Validation(
                    "Widgets are deleted per user".into(),
                )),
            };
            result.push(id, outcome);
        }

        tracing::info!(
            resource = %kind,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "bulk delete"
        );
        Ok(result)
    }
}
