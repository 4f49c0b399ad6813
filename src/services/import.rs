//! CSV import of equipment
//!
//! Expected header: `name,category,serialNumber,status,location,purchasePrice,notes`.
//! Only `name` is required. Every row is validated first; rows with errors are
//! reported by line and the valid rows are committed together.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditAction, RequestContext};
use crate::cache::Cache;
use crate::error::{AdminError, AdminResult};
use crate::models::{Document, Equipment, EquipmentStatus, Money};
use crate::storage::Storage;

use super::effects::{snapshot, Effects, Mutation};
use super::equipment::NewEquipment;

/// Columns of the import file
pub const EQUIPMENT_CSV_HEADER: &[&str] = &[
    "name",
    "category",
    "serialNumber",
    "status",
    "location",
    "purchasePrice",
    "notes",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentRow {
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    serial_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    purchase_price: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EquipmentRow {
    fn into_equipment(self) -> Result<Equipment, String> {
        let status = match non_empty(self.status) {
            Some(raw) => Some(EquipmentStatus::parse(&raw).ok_or_else(|| {
                format!(
                    "Invalid status '{}'. Expected one of: {}",
                    raw,
                    EquipmentStatus::expected()
                )
            })?),
            None => None,
        };

        let purchase_price = match non_empty(self.purchase_price) {
            Some(raw) => Money::parse(&raw).map_err(|e| e.to_string())?,
            None => Money::zero(),
        };

        let equipment = NewEquipment {
            name: self.name,
            category: non_empty(self.category).unwrap_or_default(),
            serial_number: non_empty(self.serial_number),
            status,
            location: non_empty(self.location),
            purchase_date: None,
            purchase_price,
            notes: non_empty(self.notes).unwrap_or_default(),
        }
        .build();

        equipment.validate().map_err(|e| e.to_string())?;
        Ok(equipment)
    }
}

/// A row that was not imported
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    /// Line in the file, counting the header as line 1
    pub line: usize,
    pub message: String,
}

/// Result of an import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    pub imported: Vec<Equipment>,
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    /// Import equipment from a CSV file on disk
    pub fn import_equipment_file(&self, path: &Path, ctx: &RequestContext) -> AdminResult<ImportResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            AdminError::Import(format!("Cannot open {}: {}", path.display(), e))
        })?;
        self.import_equipment_csv(file, ctx)
    }

    /// Import equipment rows from any CSV reader
    pub fn import_equipment_csv<R: Read>(
        &self,
        input: R,
        ctx: &RequestContext,
    ) -> AdminResult<ImportResult> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| AdminError::Import(format!("Cannot read header: {}", e)))?
            .clone();
        if !headers.iter().any(|h| h == "name") {
            return Err(AdminError::Import(format!(
                "Missing 'name' column. Expected header: {}",
                EQUIPMENT_CSV_HEADER.join(",")
            )));
        }

        let mut known_serials: HashSet<String> = self
            .storage
            .equipment
            .get_all()?
            .into_iter()
            .filter_map(|e| e.serial_number.map(|s| s.to_lowercase()))
            .collect();

        let mut result = ImportResult::default();

        for (idx, row) in reader.deserialize::<EquipmentRow>().enumerate() {
            let line = idx + 2;
            let parsed = row
                .map_err(|e| format!("Unreadable row: {}", e))
                .and_then(EquipmentRow::into_equipment)
                .and_then(|equipment| match &equipment.serial_number {
                    Some(serial) if !known_serials.insert(serial.to_lowercase()) => {
                        Err(format!("Duplicate serial number '{}'", serial))
                    }
                    _ => Ok(equipment),
                });

            match parsed {
                Ok(equipment) => result.imported.push(equipment),
                Err(message) => {
                    tracing::debug!(line, %message, "import row rejected");
                    result.errors.push(ImportRowError { line, message });
                }
            }
        }

        if !result.imported.is_empty() {
            self.storage.equipment.upsert_many(result.imported.clone())?;
            self.storage.equipment.save()?;

            let ctx = ctx.or_request("POST", "/api/equipment/import");
            let effects = Effects::new(self.storage, self.cache);
            for equipment in &result.imported {
                effects.record(Mutation {
                    kind: Equipment::KIND,
                    resource_id: equipment.id.to_string(),
                    action: AuditAction::Import,
                    before: serde_json::Value::Object(Default::default()),
                    after: snapshot(equipment),
                    ctx: &ctx,
                    comment: Some("Imported from CSV".to_string()),
                    versioned: true,
                });
            }
        }

        tracing::info!(
            imported = result.imported_count(),
            rejected = result.error_count(),
            "equipment import finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditFilter;
    use crate::config::SkpPaths;
    use crate::models::ResourceKind;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage, Cache::memory(Duration::from_secs(60)))
    }

    const CSV: &str = "\
name,category,serialNumber,status,location,purchasePrice,notes
Par 64,Lighting,SN-1,available,Warehouse A,\"1,250.00\",
Wireless Mic,Audio,SN-2,IN_USE,,300,Channel 5
,Audio,SN-3,,,,
Spare Mic,Audio,sn-2,,,,
Hazer,Effects,,exploded,,,
Truss 3m,Rigging,,,,abc,
";

    #[test]
    fn test_import_reports_bad_rows_and_commits_good_ones() {
        let (_temp, storage, cache) = setup();
        let service = ImportService::new(&storage, &cache);

        let result = service
            .import_equipment_csv(CSV.as_bytes(), &RequestContext::system())
            .unwrap();

        assert_eq!(result.imported_count(), 2);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4, 5, 6, 7]);
        assert!(result.errors[1].message.contains("Duplicate serial"));

        let par = &result.imported[0];
        assert_eq!(par.purchase_price, Money::from_cents(125_000));
        assert_eq!(par.location.as_deref(), Some("Warehouse A"));
        assert_eq!(result.imported[1].status, EquipmentStatus::InUse);
        assert_eq!(result.imported[1].notes, "Channel 5");

        assert_eq!(storage.equipment.count().unwrap(), 2);
    }

    #[test]
    fn test_each_import_is_versioned_and_audited() {
        let (_temp, storage, cache) = setup();
        let service = ImportService::new(&storage, &cache);

        let result = service
            .import_equipment_csv(CSV.as_bytes(), &RequestContext::system())
            .unwrap();

        for equipment in &result.imported {
            let id = equipment.id.to_string();
            assert_eq!(
                storage.versions.latest_version(ResourceKind::Equipment, &id).unwrap(),
                Some(1)
            );
        }
        let imports = storage
            .audit
            .get_audit_logs(&AuditFilter {
                action: Some(AuditAction::Import),
                ..AuditFilter::default()
            })
            .unwrap();
        assert_eq!(imports.total, 2);
    }

    #[test]
    fn test_serial_clash_with_existing_equipment() {
        let (_temp, storage, cache) = setup();
        let mut existing = Equipment::new("Old Mic", "Audio");
        existing.serial_number = Some("SN-9".into());
        storage.equipment.upsert(existing).unwrap();

        let csv = "name,serialNumber\nNew Mic,sn-9\n";
        let result = ImportService::new(&storage, &cache)
            .import_equipment_csv(csv.as_bytes(), &RequestContext::system())
            .unwrap();
        assert_eq!(result.imported_count(), 0);
        assert_eq!(result.errors[0].line, 2);
        assert_eq!(storage.audit.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_missing_name_column() {
        let (_temp, storage, cache) = setup();
        let err = ImportService::new(&storage, &cache)
            .import_equipment_csv("title,category\nx,y\n".as_bytes(), &RequestContext::system())
            .unwrap_err();
        assert!(matches!(err, AdminError::Import(_)));
    }
}
