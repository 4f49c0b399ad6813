//! Audit entry data structures
//!
//! Defines the structure of audit log entries: the action performed, the
//! resource it was performed on, the field changes and the request metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AuditLogId, ResourceKind, UserId};

use super::diff::{summarize_changes, FieldChange};

/// Types of actions that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    /// Document restored from a version snapshot
    Rollback,
    /// Document created by a bulk import
    Import,
    /// Document changed by a bulk operation
    BulkUpdate,
}

impl AuditAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "ROLLBACK" => Some(Self::Rollback),
            "IMPORT" => Some(Self::Import),
            "BULK_UPDATE" => Some(Self::BulkUpdate),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Rollback => write!(f, "ROLLBACK"),
            AuditAction::Import => write!(f, "IMPORT"),
            AuditAction::BulkUpdate => write!(f, "BULK_UPDATE"),
        }
    }
}

/// Where the request that caused an action came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub method: Option<String>,
    pub endpoint: Option<String>,
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[serde(rename = "_id")]
    pub id: AuditLogId,

    /// Acting user; `None` for system actions
    pub user: Option<UserId>,

    pub action: AuditAction,

    pub resource: ResourceKind,

    pub resource_id: String,

    #[serde(default)]
    pub changes: Vec<FieldChange>,

    #[serde(default)]
    pub metadata: RequestMetadata,

    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        user: Option<UserId>,
        action: AuditAction,
        resource: ResourceKind,
        resource_id: impl Into<String>,
        changes: Vec<FieldChange>,
        metadata: RequestMetadata,
    ) -> Self {
        Self {
            id: AuditLogId::new(),
            user,
            action,
            resource,
            resource_id: resource_id.into(),
            changes,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let actor = self
            .user
            .map(|u| u.to_string())
            .unwrap_or_else(|| "system".to_string());

        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.resource,
            self.resource_id,
            actor
        );

        if let (Some(method), Some(endpoint)) = (&self.metadata.method, &self.metadata.endpoint) {
            output.push_str(&format!(" via {} {}", method, endpoint));
        }

        if let Some(summary) = summarize_changes(&self.changes) {
            output.push_str(&format!("\n  Changes: {}", summary));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entry() -> AuditLog {
        AuditLog::new(
            None,
            AuditAction::Update,
            ResourceKind::Equipment,
            "64b7f0c2a1b2c3d4e5f60718",
            vec![FieldChange::new("status", json!("AVAILABLE"), json!("IN_USE"))],
            RequestMetadata {
                method: Some("PUT".into()),
                endpoint: Some("/api/equipment/64b7f0c2a1b2c3d4e5f60718".into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_action_display_and_parse() {
        assert_eq!(AuditAction::BulkUpdate.to_string(), "BULK_UPDATE");
        assert_eq!(AuditAction::parse("bulk-update"), Some(AuditAction::BulkUpdate));
        assert_eq!(AuditAction::parse("update"), Some(AuditAction::Update));
        assert_eq!(AuditAction::parse("login"), None);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(value["action"], "UPDATE");
        assert_eq!(value["resource"], "Equipment");
        assert_eq!(value["resourceId"], "64b7f0c2a1b2c3d4e5f60718");
        assert_eq!(value["changes"][0]["oldValue"], "AVAILABLE");
        assert_eq!(value["metadata"]["method"], "PUT");
        assert!(value["user"].is_null());
    }

    #[test]
    fn test_human_readable_format() {
        let formatted = sample_entry().format_human_readable();
        assert!(formatted.contains("UPDATE Equipment 64b7f0c2a1b2c3d4e5f60718 by system"));
        assert!(formatted.contains("via PUT /api/equipment/"));
        assert!(formatted.contains("status: \"AVAILABLE\" -> \"IN_USE\""));
    }
}
