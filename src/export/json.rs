//! JSON Export functionality
//!
//! Exports every collection to one JSON document with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};
use crate::models::{Client, Equipment, Maintenance, Project, Task, Widget};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Version of `skp` that wrote the export
    pub app_version: String,

    pub equipment: Vec<Equipment>,

    pub projects: Vec<Project>,

    pub tasks: Vec<Task>,

    pub clients: Vec<Client>,

    pub maintenance: Vec<Maintenance>,

    pub widgets: Vec<Widget>,

    pub metadata: ExportMetadata,
}

/// Counts recorded alongside the export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub equipment_count: usize,
    pub project_count: usize,
    pub task_count: usize,
    pub client_count: usize,
    pub maintenance_count: usize,
    pub widget_count: usize,
    /// Version snapshots at export time (not included in the export)
    pub version_count: usize,
    /// Audit entries at export time (not included in the export)
    pub audit_entry_count: usize,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> AdminResult<Self> {
        let equipment = storage.equipment.get_all()?;
        let projects = storage.projects.get_all()?;
        let tasks = storage.tasks.get_all()?;
        let clients = storage.clients.get_all()?;
        let maintenance = storage.maintenance.get_all()?;
        let widgets = storage.widgets.get_all()?;

        let metadata = ExportMetadata {
            equipment_count: equipment.len(),
            project_count: projects.len(),
            task_count: tasks.len(),
            client_count: clients.len(),
            maintenance_count: maintenance.len(),
            widget_count: widgets.len(),
            version_count: storage.versions.count()?,
            audit_entry_count: storage.audit.entry_count()?,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            equipment,
            projects,
            tasks,
            clients,
            maintenance,
            widgets,
            metadata,
        })
    }

    /// Check schema version and cross-document references
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let equipment_ids: HashSet<_> = self.equipment.iter().map(|e| e.id).collect();
        let client_ids: HashSet<_> = self.clients.iter().map(|c| c.id).collect();
        let project_ids: HashSet<_> = self.projects.iter().map(|p| p.id).collect();

        for project in &self.projects {
            if let Some(client) = project.client {
                if !client_ids.contains(&client) {
                    return Err(format!(
                        "Project {} references unknown client {}",
                        project.id, client
                    ));
                }
            }
            if let Some(missing) = project.equipment.iter().find(|e| !equipment_ids.contains(e)) {
                return Err(format!(
                    "Project {} references unknown equipment {}",
                    project.id, missing
                ));
            }
        }

        for task in &self.tasks {
            if let Some(project) = task.project {
                if !project_ids.contains(&project) {
                    return Err(format!(
                        "Task {} references unknown project {}",
                        task.id, project
                    ));
                }
            }
        }

        for record in &self.maintenance {
            if !equipment_ids.contains(&record.equipment) {
                return Err(format!(
                    "Maintenance {} references unknown equipment {}",
                    record.id, record.equipment
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> AdminResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| AdminError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> AdminResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| AdminError::Import(e.to_string()))?;

    export.validate().map_err(AdminError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkpPaths;
    use crate::models::{ClientId, MaintenanceType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SkpPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();

        let equipment = Equipment::new("Beam", "Lighting");
        storage.equipment.upsert(equipment.clone()).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        storage
            .maintenance
            .upsert(Maintenance::new(equipment.id, MaintenanceType::Inspection, day))
            .unwrap();

        let mut buf = Vec::new();
        export_full_json(&storage, &mut buf, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"schemaVersion\": \"1.0.0\""));
        assert!(text.contains(&equipment.qr_code));

        let parsed = import_from_json(&text).unwrap();
        assert_eq!(parsed.metadata.equipment_count, 1);
        assert_eq!(parsed.maintenance[0].equipment, equipment.id);
    }

    #[test]
    fn test_validate_detects_dangling_references() {
        let (_temp_dir, storage) = create_test_storage();
        let day = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let mut project = Project::new("Orphan", day, day);
        project.client = Some(ClientId::new());
        storage.projects.upsert(project).unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        let err = export.validate().unwrap_err();
        assert!(err.contains("unknown client"));
    }

    #[test]
    fn test_schema_mismatch() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().unwrap_err().contains("mismatch"));
    }
}
