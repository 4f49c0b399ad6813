//! Maintenance CLI commands

use std::collections::HashMap;

use chrono::Local;
use clap::Subcommand;

use crate::display::format_maintenance_list;
use crate::error::AdminResult;
use crate::models::{EquipmentId, Maintenance, MaintenanceStatus, MaintenanceType};
use crate::services::{MaintenanceFilter, MaintenancePatch, MaintenanceService, NewMaintenance};

use super::{parse_choice, parse_date, parse_money, parse_optional_date, Session};

/// Maintenance subcommands
#[derive(Subcommand)]
pub enum MaintenanceCommands {
    /// Schedule maintenance for a piece of equipment
    Schedule {
        /// Equipment ID
        equipment: String,
        /// Scheduled date (YYYY-MM-DD)
        date: String,
        /// Type (preventive, repair, inspection)
        #[arg(short = 't', long = "type", default_value = "preventive")]
        maintenance_type: String,
        #[arg(short, long)]
        cost: Option<String>,
        #[arg(long)]
        technician: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Set the equipment to MAINTENANCE now
        #[arg(long)]
        out_of_service: bool,
    },
    /// List maintenance records
    List {
        /// Filter by equipment ID
        #[arg(short, long)]
        equipment: Option<String>,
        /// Filter by status (scheduled, in_progress, completed, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        /// Only scheduled or in-progress records
        #[arg(long)]
        pending: bool,
    },
    /// List pending maintenance due on or before a date (default: today)
    Due { date: Option<String> },
    /// Edit a maintenance record
    Edit {
        id: String,
        #[arg(short = 't', long = "type")]
        maintenance_type: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        cost: Option<String>,
        #[arg(long)]
        technician: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Mark maintenance completed
    Complete {
        id: String,
        /// Completion date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a maintenance record
    Delete { id: String },
}

fn parse_type(value: &str) -> AdminResult<MaintenanceType> {
    parse_choice("type", value, MaintenanceType::parse, MaintenanceType::expected())
}

fn parse_status(value: &str) -> AdminResult<MaintenanceStatus> {
    parse_choice("status", value, MaintenanceStatus::parse, MaintenanceStatus::expected())
}

fn print_records(session: &Session, records: &[Maintenance]) -> AdminResult<()> {
    let names: HashMap<EquipmentId, String> = session
        .storage
        .equipment
        .get_all()?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    session.emit(&records, || format_maintenance_list(records, &names))
}

/// Handle a maintenance command
pub fn handle_maintenance_command(session: &Session, cmd: MaintenanceCommands) -> AdminResult<()> {
    let service = MaintenanceService::new(session.storage, session.cache);
    let ctx = &session.ctx;
    let today = Local::now().date_naive();

    match cmd {
        MaintenanceCommands::Schedule {
            equipment,
            date,
            maintenance_type,
            cost,
            technician,
            description,
            out_of_service,
        } => {
            let mut input = NewMaintenance::new(
                equipment.parse()?,
                parse_type(&maintenance_type)?,
                parse_date(&date)?,
            );
            input.cost = cost.as_deref().map(parse_money).transpose()?.unwrap_or_default();
            input.technician = technician;
            input.description = description;
            input.take_out_of_service = out_of_service;

            let record = service.create(input, ctx)?;
            session.emit(&record, || {
                format!(
                    "Scheduled {} maintenance on {}\n  ID: {}\n",
                    record.maintenance_type, record.scheduled_date, record.id
                )
            })?;
        }

        MaintenanceCommands::List {
            equipment,
            status,
            pending,
        } => {
            let filter = MaintenanceFilter {
                equipment: equipment.as_deref().map(str::parse::<EquipmentId>).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                pending_only: pending,
            };
            print_records(session, &service.list(&filter)?)?;
        }

        MaintenanceCommands::Due { date } => {
            let on_or_before = parse_optional_date(date.as_deref())?.unwrap_or(today);
            print_records(session, &service.due(on_or_before)?)?;
        }

        MaintenanceCommands::Edit {
            id,
            maintenance_type,
            status,
            date,
            cost,
            technician,
            description,
        } => {
            let patch = MaintenancePatch {
                maintenance_type: maintenance_type.as_deref().map(parse_type).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                scheduled_date: parse_optional_date(date.as_deref())?,
                cost: cost.as_deref().map(parse_money).transpose()?,
                technician,
                description,
            };
            let record = service.update(id.parse()?, patch, ctx)?;
            session.emit(&record, || format!("Updated maintenance {}\n", record.id))?;
        }

        MaintenanceCommands::Complete { id, date } => {
            let completed_on = parse_optional_date(date.as_deref())?.unwrap_or(today);
            let record = service.complete(id.parse()?, completed_on, ctx)?;
            session.emit(&record, || {
                format!("Completed maintenance {} on {}\n", record.id, completed_on)
            })?;
        }

        MaintenanceCommands::Delete { id } => {
            let record = service.delete(id.parse()?, ctx)?;
            session.emit(&record, || format!("Deleted maintenance {}\n", record.id))?;
        }
    }

    Ok(())
}
