//! Export module for SK Production Admin
//!
//! - CSV: equipment (import-compatible), projects and audit entries
//! - JSON: machine-readable full export
//! - YAML: human-readable full export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_audit_csv, export_equipment_csv, export_projects_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
