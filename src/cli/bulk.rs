//! Bulk operation CLI commands

use clap::Subcommand;

use crate::display::format_bulk_result;
use crate::error::AdminResult;
use crate::services::BulkService;

use super::{parse_resource, Session};

/// Bulk subcommands
#[derive(Subcommand)]
pub enum BulkCommands {
    /// Set the status of many documents
    Status {
        /// Resource kind (equipment, project, task, maintenance)
        resource: String,
        /// New status
        status: String,
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete many documents
    Delete {
        /// Resource kind (equipment, project, task, client, maintenance)
        resource: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle a bulk command
///
/// Per-id failures are reported but do not fail the command.
pub fn handle_bulk_command(session: &Session, cmd: BulkCommands) -> AdminResult<()> {
    let service = BulkService::new(session.storage, session.cache);

    match cmd {
        BulkCommands::Status {
            resource,
            status,
            ids,
        } => {
            let result =
                service.update_status(parse_resource(&resource)?, &ids, &status, &session.ctx)?;
            session.emit(&result, || format_bulk_result("Status update", &result))?;
        }

        BulkCommands::Delete { resource, ids } => {
            let result = service.delete(parse_resource(&resource)?, &ids, &session.ctx)?;
            session.emit(&result, || format_bulk_result("Delete", &result))?;
        }
    }

    Ok(())
}
