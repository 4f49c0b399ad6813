//! Dashboard statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::{keys, Cache};
use crate::error::AdminResult;
use crate::models::{EquipmentStatus, ProjectStatus, TaskStatus};
use crate::storage::Storage;

/// Counts shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub equipment_total: usize,
    /// Equipment count per status wire name
    pub equipment_by_status: BTreeMap<String, usize>,
    pub projects_total: usize,
    pub projects_by_status: BTreeMap<String, usize>,
    pub tasks_total: usize,
    pub tasks_by_status: BTreeMap<String, usize>,
    pub clients_total: usize,
    /// Scheduled or in-progress maintenance records
    pub maintenance_pending: usize,
}

fn tally<'s>(statuses: impl Iterator<Item = &'s str>, all: &[&str]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = all.iter().map(|s| (s.to_string(), 0)).collect();
    for status in statuses {
        *counts.entry(status.to_string()).or_insert(0) += 1;
    }
    counts
}

pub struct DashboardService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    /// Current statistics, cached under `dashboard:stats`
    pub fn stats(&self) -> AdminResult<DashboardStats> {
        self.cache
            .get_or_load(keys::DASHBOARD_STATS_KEY, || self.compute())
    }

    fn compute(&self) -> AdminResult<DashboardStats> {
        let equipment = self.storage.equipment.get_all()?;
        let projects = self.storage.projects.get_all()?;
        let tasks = self.storage.tasks.get_all()?;

        let equipment_statuses: Vec<&str> = EquipmentStatus::ALL.iter().map(|s| s.as_str()).collect();
        let project_statuses: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();
        let task_statuses: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();

        Ok(DashboardStats {
            equipment_total: equipment.len(),
            equipment_by_status: tally(
                equipment.iter().map(|e| e.status.as_str()),
                &equipment_statuses,
            ),
            projects_total: projects.len(),
            projects_by_status: tally(projects.iter().map(|p| p.status.as_str()), &project_statuses),
            tasks_total: tasks.len(),
            tasks_by_status: tally(tasks.iter().map(|t| t.status.as_str()), &task_statuses),
            clients_total: self.storage.clients.count()?,
            maintenance_pending: self
                .storage
                .maintenance
                .find(|m| m.is_pending())?
                .len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RequestContext;
    use crate::config::SkpPaths;
    use crate::services::{EquipmentService, NewEquipment};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_stats_are_cached_and_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let cache = Cache::memory(Duration::from_secs(60));
        let dashboard = DashboardService::new(&storage, &cache);
        let equipment = EquipmentService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let empty = dashboard.stats().unwrap();
        assert_eq!(empty.equipment_total, 0);
        assert_eq!(empty.equipment_by_status["AVAILABLE"], 0);

        // Writing behind the services' back leaves the cached value in place
        storage
            .equipment
            .upsert(crate::models::Equipment::new("Ghost", "Misc"))
            .unwrap();
        assert_eq!(dashboard.stats().unwrap().equipment_total, 0);

        // A service mutation invalidates dashboard:*
        let eq = equipment.create(NewEquipment::new("Mixer", "Audio"), &ctx).unwrap();
        equipment.set_status(eq.id, EquipmentStatus::InUse, &ctx).unwrap();

        let stats = dashboard.stats().unwrap();
        assert_eq!(stats.equipment_total, 2);
        assert_eq!(stats.equipment_by_status["IN_USE"], 1);
        assert_eq!(stats.equipment_by_status["AVAILABLE"], 1);
    }
}
