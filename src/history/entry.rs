//! Version history entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::{summarize_changes, FieldChange};
use crate::models::{ResourceKind, UserId, VersionId};

/// A full snapshot of a document at one version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    #[serde(rename = "_id")]
    pub id: VersionId,

    pub resource: ResourceKind,

    pub resource_id: String,

    /// Per-document version number, starting at 1
    pub version: u32,

    /// Full document state after the change
    pub data: Value,

    /// Fields that changed relative to the previous state
    #[serde(default)]
    pub changes: Vec<FieldChange>,

    pub changed_by: Option<UserId>,

    pub changed_at: DateTime<Utc>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Set on a version once the document has been rolled back to it
    #[serde(default)]
    pub is_rolled_back: bool,
}

impl VersionHistory {
    /// One-line description for listings
    pub fn describe(&self) -> String {
        let mut line = format!(
            "v{} {} by {}",
            self.version,
            self.changed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.changed_by
                .map(|u| u.to_string())
                .unwrap_or_else(|| "system".to_string())
        );
        if let Some(comment) = &self.comment {
            line.push_str(&format!(" - {}", comment));
        }
        if self.is_rolled_back {
            line.push_str(" (rolled back to)");
        }
        if let Some(summary) = summarize_changes(&self.changes) {
            line.push_str(&format!("\n  {}", summary));
        }
        line
    }
}
