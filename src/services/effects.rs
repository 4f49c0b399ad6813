//! Side effects shared by every mutation
//!
//! After the primary write succeeds a service diffs the old and new state,
//! appends a version snapshot, writes an audit entry and invalidates the
//! resource's cache keys. None of these steps can fail the mutation: problems
//! are logged and the remaining steps still run.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::audit::{extract_changes, AuditAction, RequestContext};
use crate::cache::Cache;
use crate::history::VersionHistory;
use crate::models::{Document, ResourceKind};
use crate::storage::Storage;

/// JSON snapshot of a document, or `Null` if it cannot be serialized
pub(crate) fn snapshot<T: Serialize>(doc: &T) -> Value {
    match serde_json::to_value(doc) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "document could not be snapshotted");
            Value::Null
        }
    }
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

/// One mutation to record
pub(crate) struct Mutation<'c> {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub action: AuditAction,
    pub before: Value,
    pub after: Value,
    pub ctx: &'c RequestContext,
    pub comment: Option<String>,
    /// Whether a version snapshot should be appended
    pub versioned: bool,
}

/// Runs the post-write side effects against storage and cache
pub(crate) struct Effects<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> Effects<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    /// Record a mutation; returns the appended version, if any
    pub fn record(&self, mutation: Mutation<'_>) -> Option<VersionHistory> {
        let Mutation {
            kind,
            resource_id,
            action,
            before,
            after,
            ctx,
            comment,
            versioned,
        } = mutation;

        let changes = extract_changes(&before, &after);

        let version = if versioned && kind.is_versioned() {
            match self.storage.versions.create_version_history(
                kind,
                &resource_id,
                &before,
                &after,
                ctx.user,
                comment,
            ) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(
                        resource = %kind,
                        resource_id = %resource_id,
                        error = %e,
                        "failed to record version"
                    );
                    None
                }
            }
        } else {
            None
        };

        self.storage
            .audit
            .log_action(ctx, action, kind, &resource_id, changes);

        self.cache.invalidate(kind);

        version
    }

    pub fn created<T: Document>(&self, doc: &T, ctx: &RequestContext) -> Option<VersionHistory> {
        let ctx = ctx.or_request("POST", T::KIND.api_path());
        self.record(Mutation {
            kind: T::KIND,
            resource_id: doc.id().to_string(),
            action: AuditAction::Create,
            before: empty_document(),
            after: snapshot(doc),
            ctx: &ctx,
            comment: None,
            versioned: true,
        })
    }

    pub fn updated<T: Document>(
        &self,
        before: &T,
        after: &T,
        ctx: &RequestContext,
        comment: Option<String>,
    ) -> Option<VersionHistory> {
        let id = after.id().to_string();
        let ctx = ctx.or_request("PUT", &format!("{}/{}", T::KIND.api_path(), id));
        self.record(Mutation {
            kind: T::KIND,
            resource_id: id,
            action: AuditAction::Update,
            before: snapshot(before),
            after: snapshot(after),
            ctx: &ctx,
            comment,
            versioned: true,
        })
    }

    /// Deletes are audited with the full prior state but not versioned
    pub fn deleted<T: Document>(&self, before: &T, ctx: &RequestContext) {
        let id = before.id().to_string();
        let ctx = ctx.or_request("DELETE", &format!("{}/{}", T::KIND.api_path(), id));
        self.record(Mutation {
            kind: T::KIND,
            resource_id: id,
            action: AuditAction::Delete,
            before: snapshot(before),
            after: empty_document(),
            ctx: &ctx,
            comment: None,
            versioned: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditFilter;
    use crate::config::SkpPaths;
    use crate::models::{Equipment, EquipmentStatus, Widget, WidgetType, UserId};
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage, Cache::memory(Duration::from_secs(60)))
    }

    #[test]
    fn test_created_records_version_one_and_audit() {
        let (_temp, storage, cache) = setup();
        let effects = Effects::new(&storage, &cache);
        let eq = Equipment::new("Moving Head", "Lighting");
        cache.set_cache("api:/api/equipment?", &1, None);

        let version = effects.created(&eq, &RequestContext::system()).unwrap();

        assert_eq!(version.version, 1);
        assert!(version.changes.iter().any(|c| c.field == "name"));
        assert!(version.changes.iter().all(|c| c.field != "_id"));

        let logs = storage.audit.read_all().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, AuditAction::Create);
        assert_eq!(logs[0].metadata.method.as_deref(), Some("POST"));
        assert!(cache.get_cache::<i32>("api:/api/equipment?").is_none());
    }

    #[test]
    fn test_deleted_is_audited_not_versioned() {
        let (_temp, storage, cache) = setup();
        let effects = Effects::new(&storage, &cache);
        let eq = Equipment::new("Fog Machine", "Effects");

        effects.deleted(&eq, &RequestContext::system());

        assert_eq!(storage.versions.count().unwrap(), 0);
        let page = storage
            .audit
            .get_audit_logs(&AuditFilter::for_resource(ResourceKind::Equipment, eq.id.to_string()))
            .unwrap();
        assert_eq!(page.total, 1);
        let status = page.logs[0].changes.iter().find(|c| c.field == "status").unwrap();
        assert_eq!(status.old_value, "AVAILABLE");
        assert_eq!(status.new_value, Value::Null);
    }

    #[test]
    fn test_version_failure_does_not_stop_audit() {
        let (temp, storage, cache) = setup();
        // Turning the versions file into a directory breaks every version write
        std::fs::create_dir_all(temp.path().join("data/versions.json")).unwrap();
        let effects = Effects::new(&storage, &cache);

        let before = Equipment::new("Dimmer", "Power");
        let mut after = before.clone();
        after.set_status(EquipmentStatus::Broken);

        assert!(effects.updated(&before, &after, &RequestContext::system(), None).is_none());
        assert_eq!(storage.audit.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_widgets_are_not_versioned() {
        let (_temp, storage, cache) = setup();
        let effects = Effects::new(&storage, &cache);
        let widget = Widget::new(UserId::new(), WidgetType::Stats);

        assert!(effects.created(&widget, &RequestContext::system()).is_none());
        assert_eq!(storage.versions.count().unwrap(), 0);
        assert_eq!(storage.audit.entry_count().unwrap(), 1);
    }
}
