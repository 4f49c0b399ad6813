//! Audit, version history and summary display formatting

use tabled::Tabled;

use crate::audit::{summarize_changes, AuditPage, FieldChange};
use crate::history::VersionHistory;
use crate::services::{BulkResult, DashboardStats, ImportResult};

use super::{table, truncate};

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "ID")]
    resource_id: String,
    #[tabled(rename = "Changes")]
    changes: String,
}

/// Format one page of audit entries with a page footer
pub fn format_audit_page(page: &AuditPage) -> String {
    let rows = page
        .logs
        .iter()
        .map(|log| AuditRow {
            when: log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            user: log
                .user
                .map(|u| u.to_string())
                .unwrap_or_else(|| "system".into()),
            action: log.action.to_string(),
            resource: log.resource.to_string(),
            resource_id: log.resource_id.clone(),
            changes: summarize_changes(&log.changes)
                .map(|s| truncate(&s, 60))
                .unwrap_or_default(),
        })
        .collect();

    let mut output = table(rows, "No audit entries found.");
    if page.total > 0 {
        output.push_str(&format!(
            "Page {} of {} ({} entries)\n",
            page.page, page.pages, page.total
        ));
    }
    output
}

/// Format the version list of one document, newest first
pub fn format_version_list(versions: &[VersionHistory]) -> String {
    if versions.is_empty() {
        return "No versions found.\n".to_string();
    }

    let mut output = String::new();
    for version in versions {
        output.push_str(&version.describe());
        output.push('\n');
    }
    output
}

/// Format the field differences between two versions
pub fn format_version_changes(from: u32, to: u32, changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return format!("No differences between v{} and v{}.\n", from, to);
    }

    let mut output = format!("Changes from v{} to v{}:\n", from, to);
    for change in changes {
        output.push_str(&format!(
            "  {}: {} -> {}\n",
            change.field, change.old_value, change.new_value
        ));
    }
    output
}

/// Format dashboard statistics
pub fn format_dashboard(stats: &DashboardStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Equipment: {}\n", stats.equipment_total));
    for (status, count) in &stats.equipment_by_status {
        output.push_str(&format!("  {:<12} {:>5}\n", status, count));
    }
    output.push_str(&format!("\nProjects: {}\n", stats.projects_total));
    for (status, count) in &stats.projects_by_status {
        output.push_str(&format!("  {:<12} {:>5}\n", status, count));
    }
    output.push_str(&format!("\nTasks: {}\n", stats.tasks_total));
    for (status, count) in &stats.tasks_by_status {
        output.push_str(&format!("  {:<12} {:>5}\n", status, count));
    }
    output.push_str(&format!("\nClients: {}\n", stats.clients_total));
    output.push_str(&format!("Pending maintenance: {}\n", stats.maintenance_pending));

    output
}

/// Format the outcome of a bulk operation
pub fn format_bulk_result(operation: &str, result: &BulkResult) -> String {
    let mut output = format!(
        "{}: {} succeeded, {} failed\n",
        operation,
        result.succeeded.len(),
        result.failed.len()
    );
    for failure in &result.failed {
        output.push_str(&format!("  {}: {}\n", failure.id, failure.error));
    }
    output
}

/// Format the outcome of a CSV import
pub fn format_import_result(result: &ImportResult) -> String {
    let mut output = format!(
        "Imported {} equipment item(s), {} row(s) with errors\n",
        result.imported_count(),
        result.error_count()
    );
    for error in &result.errors {
        output.push_str(&format!("  line {}: {}\n", error.line, error.message));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, AuditLog, RequestMetadata};
    use crate::models::ResourceKind;
    use crate::services::BulkFailure;
    use serde_json::json;

    #[test]
    fn test_format_audit_page() {
        let log = AuditLog::new(
            None,
            AuditAction::Update,
            ResourceKind::Equipment,
            "64b7f0c2a1b2c3d4e5f60718",
            vec![FieldChange::new("status", json!("AVAILABLE"), json!("IN_USE"))],
            RequestMetadata::default(),
        );
        let page = AuditPage {
            logs: vec![log],
            total: 21,
            page: 2,
            limit: 20,
            pages: 2,
        };

        let output = format_audit_page(&page);
        assert!(output.contains("UPDATE"));
        assert!(output.contains("system"));
        assert!(output.contains("Page 2 of 2 (21 entries)"));
    }

    #[test]
    fn test_format_version_changes() {
        let changes = vec![FieldChange::new("name", json!("Old"), json!("New"))];
        let output = format_version_changes(1, 3, &changes);
        assert!(output.contains("Changes from v1 to v3"));
        assert!(output.contains("name: \"Old\" -> \"New\""));
        assert!(format_version_changes(2, 2, &[]).contains("No differences"));
    }

    #[test]
    fn test_format_bulk_result() {
        let result = BulkResult {
            succeeded: vec!["a".into()],
            failed: vec![BulkFailure {
                id: "bad".into(),
                error: "Invalid id: bad".into(),
            }],
        };
        let output = format_bulk_result("Status update", &result);
        assert!(output.contains("1 succeeded, 1 failed"));
        assert!(output.contains("bad: Invalid id"));
    }
}
