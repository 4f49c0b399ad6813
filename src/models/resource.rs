//! Resource kinds and the `Document` trait
//!
//! `ResourceKind` names each collection the way audit and version records refer
//! to it (`"Equipment"`, `"Project"`, ...) and owns the key-prefix conventions
//! used for cache invalidation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::AdminError;

/// Types of resources managed by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Equipment,
    Project,
    Task,
    Client,
    Maintenance,
    Widget,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Equipment,
        ResourceKind::Project,
        ResourceKind::Task,
        ResourceKind::Client,
        ResourceKind::Maintenance,
        ResourceKind::Widget,
    ];

    /// Collection (file) name
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Project => "projects",
            Self::Task => "tasks",
            Self::Client => "clients",
            Self::Maintenance => "maintenance",
            Self::Widget => "widgets",
        }
    }

    /// Prefix for per-document cache keys (`equipment:<id>`)
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Project => "project",
            Self::Task => "task",
            Self::Client => "client",
            Self::Maintenance => "maintenance",
            Self::Widget => "widget",
        }
    }

    /// REST path of the resource family
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Equipment => "/api/equipment",
            Self::Project => "/api/projects",
            Self::Task => "/api/tasks",
            Self::Client => "/api/clients",
            Self::Maintenance => "/api/maintenance",
            Self::Widget => "/api/widgets",
        }
    }

    /// Name used in audit and version records (`"Equipment"`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equipment => "Equipment",
            Self::Project => "Project",
            Self::Task => "Task",
            Self::Client => "Client",
            Self::Maintenance => "Maintenance",
            Self::Widget => "Widget",
        }
    }

    /// Whether mutations of this kind append version snapshots
    pub fn is_versioned(&self) -> bool {
        !matches!(self, Self::Widget)
    }

    /// Parse a resource kind (case-insensitive, accepts collection names)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Some(Self::Equipment),
            "project" | "projects" => Some(Self::Project),
            "task" | "tasks" => Some(Self::Task),
            "client" | "clients" => Some(Self::Client),
            "maintenance" => Some(Self::Maintenance),
            "widget" | "widgets" => Some(Self::Widget),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted document stored in a `Collection`
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + FromStr<Err = AdminError> + Send + Sync;

    const KIND: ResourceKind;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    /// Stamp the document as modified now
    fn touch(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_model_name() {
        assert_eq!(
            serde_json::to_string(&ResourceKind::Equipment).unwrap(),
            "\"Equipment\""
        );
        assert_eq!(ResourceKind::Maintenance.to_string(), "Maintenance");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ResourceKind::parse("projects"), Some(ResourceKind::Project));
        assert_eq!(ResourceKind::parse("TASK"), Some(ResourceKind::Task));
        assert_eq!(ResourceKind::parse("user"), None);
    }

    #[test]
    fn test_key_conventions() {
        assert_eq!(ResourceKind::Equipment.cache_prefix(), "equipment");
        assert_eq!(ResourceKind::Project.api_path(), "/api/projects");
        assert!(!ResourceKind::Widget.is_versioned());
        assert!(ResourceKind::Client.is_versioned());
    }
}
