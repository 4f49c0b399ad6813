//! Audit logger for the append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.
//! Logging an action is best-effort: an invalid resource id or a failed write
//! is reported through `tracing` and never surfaces to the caller.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AdminResult;
use crate::models::{is_valid_object_id, ResourceKind, UserId};
use crate::storage::file_io::{append_json_line, read_json_lines};

use super::context::RequestContext;
use super::diff::FieldChange;
use super::entry::{AuditAction, AuditLog};

/// Filters for querying the audit log
#[derive(Debug, Clone)]
pub struct AuditFilter {
    pub user: Option<UserId>,
    pub resource: Option<ResourceKind>,
    pub resource_id: Option<String>,
    pub action: Option<AuditAction>,
    /// Inclusive lower bound on `createdAt`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`
    pub end_date: Option<DateTime<Utc>>,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            user: None,
            resource: None,
            resource_id: None,
            action: None,
            start_date: None,
            end_date: None,
            page: 1,
            limit: 20,
        }
    }
}

impl AuditFilter {
    /// Filter for every entry about one document
    pub fn for_resource(resource: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            resource: Some(resource),
            resource_id: Some(resource_id.into()),
            ..Self::default()
        }
    }

    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    fn matches(&self, entry: &AuditLog) -> bool {
        if let Some(user) = self.user {
            if entry.user != Some(user) {
                return false;
            }
        }
        if let Some(resource) = self.resource {
            if entry.resource != resource {
                return false;
            }
        }
        if let Some(resource_id) = &self.resource_id {
            if !entry.resource_id.eq_ignore_ascii_case(resource_id) {
                return false;
            }
        }
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if entry.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if entry.created_at > end {
                return false;
            }
        }
        true
    }
}

/// One page of audit results, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub logs: Vec<AuditLog>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

/// Handles writing and querying the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry, returning any write error
    pub fn append(&self, entry: &AuditLog) -> AdminResult<()> {
        append_json_line(&self.log_path, entry)
    }

    /// Record an action on a resource
    ///
    /// Returns the written entry, or `None` when nothing was written: either the
    /// resource id is not a 24-hex ObjectId, or the write failed. Neither case
    /// is an error for the caller.
    pub fn log_action(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        resource: ResourceKind,
        resource_id: &str,
        changes: Vec<FieldChange>,
    ) -> Option<AuditLog> {
        if !is_valid_object_id(resource_id) {
            tracing::warn!(
                %action,
                %resource,
                resource_id,
                "skipping audit log for invalid resource id"
            );
            return None;
        }

        let entry = AuditLog::new(
            ctx.user,
            action,
            resource,
            resource_id.to_lowercase(),
            changes,
            ctx.metadata(),
        );

        match self.append(&entry) {
            Ok(()) => {
                tracing::debug!(%action, %resource, resource_id, "audit entry written");
                Some(entry)
            }
            Err(e) => {
                tracing::error!(
                    %action,
                    %resource,
                    resource_id,
                    error = %e,
                    "failed to write audit entry"
                );
                None
            }
        }
    }

    /// Read all audit entries, oldest first
    pub fn read_all(&self) -> AdminResult<Vec<AuditLog>> {
        read_json_lines(&self.log_path)
    }

    /// Query the log with filters and offset pagination, newest first
    pub fn get_audit_logs(&self, filter: &AuditFilter) -> AdminResult<AuditPage> {
        let page = filter.page.max(1);
        let limit = filter.limit.max(1);

        // Reverse first so entries sharing a timestamp stay newest-first
        let mut matching: Vec<AuditLog> = self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|e| filter.matches(e))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let logs = matching
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(AuditPage {
            logs,
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        })
    }

    /// Get the number of entries in the audit log
    pub fn entry_count(&self) -> AdminResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EquipmentId;
    use chrono::Duration;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_action_and_read() {
        let (logger, _temp) = create_test_logger();
        let id = EquipmentId::new().to_string();
        let ctx = RequestContext::for_user(UserId::new())
            .with_ip("10.0.0.5")
            .with_user_agent("skp-test")
            .with_request("PUT", format!("/api/equipment/{}", id));

        let written = logger
            .log_action(
                &ctx,
                AuditAction::Update,
                ResourceKind::Equipment,
                &id,
                vec![FieldChange::new("status", json!("AVAILABLE"), json!("IN_USE"))],
            )
            .unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, written.id);
        assert_eq!(entries[0].user, ctx.user);
        assert_eq!(entries[0].metadata.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(entries[0].metadata.user_agent.as_deref(), Some("skp-test"));
        assert_eq!(entries[0].changes.len(), 1);
    }

    #[test]
    fn test_invalid_resource_id_writes_nothing() {
        let (logger, _temp) = create_test_logger();

        let result = logger.log_action(
            &RequestContext::system(),
            AuditAction::Delete,
            ResourceKind::Task,
            "not-an-object-id",
            Vec::new(),
        );

        assert!(result.is_none());
        assert!(!logger.path().exists());
        assert_eq!(logger.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the log file should be makes every append fail
        let logger = AuditLogger::new(temp_dir.path().to_path_buf());

        let result = logger.log_action(
            &RequestContext::system(),
            AuditAction::Create,
            ResourceKind::Client,
            &EquipmentId::new().to_string(),
            Vec::new(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_system_action_has_no_user() {
        let (logger, _temp) = create_test_logger();
        let entry = logger
            .log_action(
                &RequestContext::system(),
                AuditAction::Create,
                ResourceKind::Project,
                &EquipmentId::new().to_string(),
                Vec::new(),
            )
            .unwrap();
        assert!(entry.user.is_none());
    }

    #[test]
    fn test_filter_by_resource_and_id_newest_first() {
        let (logger, _temp) = create_test_logger();
        let target = EquipmentId::new().to_string();
        let other = EquipmentId::new().to_string();
        let ctx = RequestContext::system();

        for _ in 0..3 {
            logger.log_action(&ctx, AuditAction::Update, ResourceKind::Equipment, &target, vec![]);
        }
        logger.log_action(&ctx, AuditAction::Update, ResourceKind::Equipment, &other, vec![]);
        logger.log_action(&ctx, AuditAction::Update, ResourceKind::Task, &target, vec![]);

        let page = logger
            .get_audit_logs(&AuditFilter::for_resource(ResourceKind::Equipment, target.clone()))
            .unwrap();

        assert_eq!(page.total, 3);
        assert!(page
            .logs
            .iter()
            .all(|e| e.resource == ResourceKind::Equipment && e.resource_id == target));
        assert!(page
            .logs
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_pagination() {
        let (logger, _temp) = create_test_logger();
        let ctx = RequestContext::system();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let id = EquipmentId::new().to_string();
            logger.log_action(&ctx, AuditAction::Create, ResourceKind::Equipment, &id, vec![]);
            ids.push(id);
        }

        let first = logger
            .get_audit_logs(&AuditFilter::default().page(1, 2))
            .unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.pages, 3);
        assert_eq!(first.logs.len(), 2);
        assert_eq!(first.logs[0].resource_id, ids[4]);

        let last = logger
            .get_audit_logs(&AuditFilter::default().page(3, 2))
            .unwrap();
        assert_eq!(last.logs.len(), 1);
        assert_eq!(last.logs[0].resource_id, ids[0]);

        let beyond = logger
            .get_audit_logs(&AuditFilter::default().page(9, 2))
            .unwrap();
        assert!(beyond.logs.is_empty());
    }

    #[test]
    fn test_filter_by_action_user_and_dates() {
        let (logger, _temp) = create_test_logger();
        let alice = UserId::new();
        let id = EquipmentId::new().to_string();

        logger.log_action(
            &RequestContext::for_user(alice),
            AuditAction::Delete,
            ResourceKind::Client,
            &id,
            vec![],
        );
        logger.log_action(
            &RequestContext::system(),
            AuditAction::Create,
            ResourceKind::Client,
            &id,
            vec![],
        );

        let by_action = AuditFilter {
            action: Some(AuditAction::Delete),
            ..AuditFilter::default()
        };
        assert_eq!(logger.get_audit_logs(&by_action).unwrap().total, 1);

        let by_user = AuditFilter {
            user: Some(alice),
            ..AuditFilter::default()
        };
        assert_eq!(logger.get_audit_logs(&by_user).unwrap().total, 1);

        let future = AuditFilter {
            start_date: Some(Utc::now() + Duration::hours(1)),
            ..AuditFilter::default()
        };
        assert_eq!(logger.get_audit_logs(&future).unwrap().total, 0);

        let past = AuditFilter {
            end_date: Some(Utc::now() - Duration::hours(1)),
            ..AuditFilter::default()
        };
        assert_eq!(logger.get_audit_logs(&past).unwrap().total, 0);
    }
}
