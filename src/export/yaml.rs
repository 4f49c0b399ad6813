//! YAML Export functionality
//!
//! Same content as the JSON export, for human-readable backups.

use std::io::Write;

use crate::error::{AdminError, AdminResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> AdminResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# SK Production Admin export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| AdminError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| AdminError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> AdminResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| AdminError::Import(e.to_string()))?;

    export.validate().map_err(AdminError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkpPaths;
    use crate::models::{Client, Equipment};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.equipment.upsert(Equipment::new("Dolly", "Transport")).unwrap();
        storage.clients.upsert(Client::new("Broadcast AG")).unwrap();

        let mut buf = Vec::new();
        export_full_yaml(&storage, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# SK Production Admin export"));
        let parsed = import_from_yaml(&text).unwrap();
        assert_eq!(parsed.equipment[0].name, "Dolly");
        assert_eq!(parsed.metadata.client_count, 1);
    }
}
