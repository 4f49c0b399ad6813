//! CLI command handler for CSV import

use std::path::Path;

use crate::display::format_import_result;
use crate::error::{AdminError, AdminResult};
use crate::services::ImportService;

use super::Session;

/// Import equipment from a CSV file
pub fn handle_import_command(session: &Session, file: &Path) -> AdminResult<()> {
    if !file.exists() {
        return Err(AdminError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let service = ImportService::new(session.storage, session.cache);
    let result = service.import_equipment_file(file, &session.ctx)?;

    session.emit(&result, || format_import_result(&result))
}
