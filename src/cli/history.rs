//! Version history CLI commands

use clap::Subcommand;

use crate::display::{format_version_changes, format_version_list};
use crate::error::AdminResult;
use crate::services::HistoryService;

use super::{parse_resource, Session};

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List the versions of a document
    List {
        /// Resource kind (equipment, project, task, client, maintenance)
        resource: String,
        id: String,
    },
    /// Show the snapshot stored for one version
    Show {
        resource: String,
        id: String,
        version: u32,
    },
    /// Show field differences between two versions
    Compare {
        resource: String,
        id: String,
        from: u32,
        to: u32,
    },
    /// Restore a document to an earlier version
    Rollback {
        resource: String,
        id: String,
        version: u32,
    },
}

/// Handle a history command
pub fn handle_history_command(session: &Session, cmd: HistoryCommands) -> AdminResult<()> {
    let service = HistoryService::new(session.storage, session.cache);

    match cmd {
        HistoryCommands::List { resource, id } => {
            let versions = service.list_versions(parse_resource(&resource)?, &id)?;
            session.emit(&versions, || format_version_list(&versions))?;
        }

        HistoryCommands::Show {
            resource,
            id,
            version,
        } => {
            let entry = service.get_version(parse_resource(&resource)?, &id, version)?;
            let snapshot = serde_json::to_string_pretty(&entry.data)?;
            session.emit(&entry, || format!("{}\n\n{}\n", entry.describe(), snapshot))?;
        }

        HistoryCommands::Compare {
            resource,
            id,
            from,
            to,
        } => {
            let changes = service.compare_versions(parse_resource(&resource)?, &id, from, to)?;
            session.emit(&changes, || format_version_changes(from, to, &changes))?;
        }

        HistoryCommands::Rollback {
            resource,
            id,
            version,
        } => {
            let outcome =
                service.rollback_to_version(parse_resource(&resource)?, &id, version, &session.ctx)?;
            session.emit(&outcome, || {
                let mut output = format!(
                    "Rolled back {} {} to version {}\n",
                    outcome.resource, outcome.resource_id, outcome.restored_version
                );
                if let Some(new_version) = outcome.new_version {
                    output.push_str(&format!("  Recorded as version {}\n", new_version));
                }
                output
            })?;
        }
    }

    Ok(())
}
