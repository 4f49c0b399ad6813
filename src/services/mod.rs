//! Service layer for SK Production Admin
//!
//! Services add validation, reference checks and cache-through reads on top of
//! the storage layer. Every successful mutation runs the shared side effects
//! in `effects`: version snapshot, audit entry and cache invalidation.

pub mod bulk;
pub mod client;
pub mod dashboard;
mod effects;
pub mod equipment;
pub mod history;
pub mod import;
pub mod maintenance;
pub mod project;
pub mod task;
pub mod widget;

pub use bulk::{BulkFailure, BulkResult, BulkService};
pub use client::{ClientFilter, ClientPatch, ClientService, NewClient};
pub use dashboard::{DashboardService, DashboardStats};
pub use equipment::{EquipmentFilter, EquipmentPatch, EquipmentService, NewEquipment};
pub use history::{HistoryService, RollbackOutcome};
pub use import::{ImportResult, ImportRowError, ImportService, EQUIPMENT_CSV_HEADER};
pub use maintenance::{MaintenanceFilter, MaintenancePatch, MaintenanceService, NewMaintenance};
pub use project::{NewProject, ProjectFilter, ProjectPatch, ProjectService};
pub use task::{NewTask, TaskFilter, TaskPatch, TaskService};
pub use widget::{WidgetPatch, WidgetService};

/// Builds the query part of list cache keys in a stable order
#[derive(Default)]
pub(crate) struct QueryString {
    parts: Vec<String>,
}

impl QueryString {
    pub fn param(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.parts.push(format!("{}={}", name, value));
        }
        self
    }

    pub fn finish(self) -> String {
        self.parts.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_skips_unset() {
        let query = QueryString::default()
            .param("status", Some("AVAILABLE"))
            .param("category", None)
            .param("search", Some("mic"))
            .finish();
        assert_eq!(query, "status=AVAILABLE&search=mic");
        assert_eq!(QueryString::default().finish(), "");
    }
}
