//! CSV Export functionality
//!
//! The equipment export uses the same columns as the CSV import, so an export
//! can be edited and imported into another data directory.

use std::io::Write;

use crate::audit::{summarize_changes, AuditLog};
use crate::error::{AdminError, AdminResult};
use crate::services::EQUIPMENT_CSV_HEADER;
use crate::storage::Storage;

fn export_err(e: csv::Error) -> AdminError {
    AdminError::Export(e.to_string())
}

/// Export all equipment in import format
pub fn export_equipment_csv<W: Write>(storage: &Storage, writer: W) -> AdminResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EQUIPMENT_CSV_HEADER).map_err(export_err)?;

    for equipment in storage.equipment.get_all()? {
        let price = equipment.purchase_price.to_string();
        csv.write_record([
            equipment.name.as_str(),
            equipment.category.as_str(),
            equipment.serial_number.as_deref().unwrap_or(""),
            equipment.status.as_str(),
            equipment.location.as_deref().unwrap_or(""),
            price.as_str(),
            equipment.notes.as_str(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(|e| AdminError::Export(e.to_string()))?;
    Ok(())
}

/// Export projects with their client name
pub fn export_projects_csv<W: Write>(storage: &Storage, writer: W) -> AdminResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "id", "name", "status", "client", "startDate", "endDate", "location", "budget",
        "equipmentCount",
    ])
    .map_err(export_err)?;

    for project in storage.projects.get_all()? {
        let client = match project.client {
            Some(id) => storage
                .clients
                .get(id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            None => String::new(),
        };
        csv.write_record([
            project.id.to_string(),
            project.name.clone(),
            project.status.to_string(),
            client,
            project.start_date.to_string(),
            project.end_date.to_string(),
            project.location.clone().unwrap_or_default(),
            project.budget.to_string(),
            project.equipment.len().to_string(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(|e| AdminError::Export(e.to_string()))?;
    Ok(())
}

/// Export audit entries, one row per entry with a change summary
pub fn export_audit_csv<W: Write>(logs: &[AuditLog], writer: W) -> AdminResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "createdAt", "user", "action", "resource", "resourceId", "changes", "ip", "endpoint",
    ])
    .map_err(export_err)?;

    for log in logs {
        csv.write_record([
            log.created_at.to_rfc3339(),
            log.user.map(|u| u.to_string()).unwrap_or_else(|| "system".into()),
            log.action.to_string(),
            log.resource.to_string(),
            log.resource_id.clone(),
            summarize_changes(&log.changes).unwrap_or_default(),
            log.metadata.ip.clone().unwrap_or_default(),
            log.metadata.endpoint.clone().unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(|e| AdminError::Export(e.to_string()))?;
    Ok(())
}
