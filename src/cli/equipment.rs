//! Equipment CLI commands

use clap::Subcommand;

use crate::display::{format_equipment_details, format_equipment_list};
use crate::error::{AdminError, AdminResult};
use crate::models::{EquipmentId, EquipmentStatus};
use crate::services::{EquipmentFilter, EquipmentPatch, EquipmentService, NewEquipment};

use super::{parse_choice, parse_money, parse_optional_date, Session};

/// Equipment subcommands
#[derive(Subcommand)]
pub enum EquipmentCommands {
    /// Add a piece of equipment
    Add {
        /// Equipment name
        name: String,
        /// Category (e.g. Lighting, Audio, Rigging)
        #[arg(short, long, default_value = "")]
        category: String,
        /// Manufacturer serial number
        #[arg(long)]
        serial: Option<String>,
        /// Initial status (available, in_use, maintenance, broken, retired)
        #[arg(short, long)]
        status: Option<String>,
        /// Storage location
        #[arg(short, long)]
        location: Option<String>,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        purchased: Option<String>,
        /// Purchase price (e.g. "1250.00")
        #[arg(short, long)]
        price: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List equipment
    List {
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Match name, serial number or QR code
        #[arg(long)]
        search: Option<String>,
    },
    /// Show equipment details
    Show {
        /// Equipment ID or QR code
        equipment: String,
    },
    /// Edit equipment
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        purchased: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change equipment status
    Status {
        id: String,
        /// New status (available, in_use, maintenance, broken, retired)
        status: String,
    },
    /// Delete equipment
    Delete { id: String },
}

fn parse_status(value: &str) -> AdminResult<EquipmentStatus> {
    parse_choice("status", value, EquipmentStatus::parse, EquipmentStatus::expected())
}

/// Handle an equipment command
pub fn handle_equipment_command(session: &Session, cmd: EquipmentCommands) -> AdminResult<()> {
    let service = EquipmentService::new(session.storage, session.cache);
    let ctx = &session.ctx;

    match cmd {
        EquipmentCommands::Add {
            name,
            category,
            serial,
            status,
            location,
            purchased,
            price,
            notes,
        } => {
            let input = NewEquipment {
                name,
                category,
                serial_number: serial,
                status: status.as_deref().map(parse_status).transpose()?,
                location,
                purchase_date: parse_optional_date(purchased.as_deref())?,
                purchase_price: price.as_deref().map(parse_money).transpose()?.unwrap_or_default(),
                notes,
            };
            let equipment = service.create(input, ctx)?;

            session.emit(&equipment, || {
                format!(
                    "Created equipment: {}\n  QR Code: {}\n  ID: {}\n",
                    equipment.name, equipment.qr_code, equipment.id
                )
            })?;
        }

        EquipmentCommands::List {
            status,
            category,
            search,
        } => {
            let filter = EquipmentFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                category,
                search,
            };
            let items = service.list(&filter)?;
            session.emit(&items, || format_equipment_list(&items))?;
        }

        EquipmentCommands::Show { equipment } => {
            let found = match equipment.parse::<EquipmentId>() {
                Ok(id) => service.get(id)?,
                Err(_) => service
                    .find_by_qr_code(&equipment)?
                    .ok_or_else(|| AdminError::not_found("Equipment", equipment.clone()))?,
            };
            session.emit(&found, || format_equipment_details(&found))?;
        }

        EquipmentCommands::Edit {
            id,
            name,
            category,
            serial,
            location,
            purchased,
            price,
            notes,
        } => {
            let patch = EquipmentPatch {
                name,
                category,
                serial_number: serial,
                status: None,
                location,
                purchase_date: parse_optional_date(purchased.as_deref())?,
                purchase_price: price.as_deref().map(parse_money).transpose()?,
                notes,
            };
            let equipment = service.update(id.parse()?, patch, ctx)?;
            session.emit(&equipment, || format!("Updated equipment: {}\n", equipment.name))?;
        }

        EquipmentCommands::Status { id, status } => {
            let equipment = service.set_status(id.parse()?, parse_status(&status)?, ctx)?;
            session.emit(&equipment, || {
                format!("{} is now {}\n", equipment.name, equipment.status)
            })?;
        }

        EquipmentCommands::Delete { id } => {
            let equipment = service.delete(id.parse()?, ctx)?;
            session.emit(&equipment, || format!("Deleted equipment: {}\n", equipment.name))?;
        }
    }

    Ok(())
}
