//! Project CLI commands

use clap::Subcommand;

use crate::display::{format_project_details, format_project_list};
use crate::error::AdminResult;
use crate::models::{ClientId, EquipmentId, ProjectStatus, UserId};
use crate::services::{NewProject, ProjectFilter, ProjectPatch, ProjectService};

use super::{parse_choice, parse_date, parse_money, parse_optional_date, Session};

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        name: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Client ID
        #[arg(short, long)]
        client: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        budget: Option<String>,
        /// Equipment ID to book (repeatable)
        #[arg(short, long = "equipment")]
        equipment: Vec<String>,
        /// Crew member user ID (repeatable)
        #[arg(short, long = "team")]
        team: Vec<String>,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List projects
    List {
        /// Filter by status (planning, confirmed, in_progress, completed, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by client ID
        #[arg(short, long)]
        client: Option<String>,
        /// Only projects running on this date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,
    },
    /// Show project details
    Show { id: String },
    /// Edit a project
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        budget: Option<String>,
        /// Replace the booked equipment (repeatable)
        #[arg(short, long = "equipment")]
        equipment: Vec<String>,
        /// Replace the crew (repeatable)
        #[arg(short, long = "team")]
        team: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change project status
    Status { id: String, status: String },
    /// Delete a project
    Delete { id: String },
}

fn parse_status(value: &str) -> AdminResult<ProjectStatus> {
    parse_choice("status", value, ProjectStatus::parse, ProjectStatus::expected())
}

fn parse_ids<T: std::str::FromStr<Err = crate::error::AdminError>>(
    values: &[String],
) -> AdminResult<Vec<T>> {
    values.iter().map(|v| v.parse()).collect()
}

/// Handle a project command
pub fn handle_project_command(session: &Session, cmd: ProjectCommands) -> AdminResult<()> {
    let service = ProjectService::new(session.storage, session.cache);
    let ctx = &session.ctx;

    match cmd {
        ProjectCommands::Create {
            name,
            start,
            end,
            client,
            location,
            budget,
            equipment,
            team,
            description,
        } => {
            let mut input = NewProject::new(name, parse_date(&start)?, parse_date(&end)?);
            input.client = client.as_deref().map(str::parse::<ClientId>).transpose()?;
            input.location = location;
            input.budget = budget.as_deref().map(parse_money).transpose()?.unwrap_or_default();
            input.equipment = parse_ids::<EquipmentId>(&equipment)?;
            input.team = parse_ids::<UserId>(&team)?;
            input.description = description;

            let project = service.create(input, ctx)?;
            session.emit(&project, || {
                format!("Created project: {}\n  ID: {}\n", project.name, project.id)
            })?;
        }

        ProjectCommands::List { status, client, on } => {
            let filter = ProjectFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                client: client.as_deref().map(str::parse::<ClientId>).transpose()?,
                active_on: parse_optional_date(on.as_deref())?,
            };
            let projects = service.list(&filter)?;
            session.emit(&projects, || format_project_list(&projects))?;
        }

        ProjectCommands::Show { id } => {
            let project = service.get(id.parse()?)?;
            let client_name = match project.client {
                Some(client) => session.storage.clients.get(client)?.map(|c| c.name),
                None => None,
            };
            session.emit(&project, || {
                format_project_details(&project, client_name.as_deref())
            })?;
        }

        ProjectCommands::Edit {
            id,
            name,
            client,
            start,
            end,
            location,
            budget,
            equipment,
            team,
            description,
        } => {
            let patch = ProjectPatch {
                name,
                client: client.as_deref().map(str::parse::<ClientId>).transpose()?,
                status: None,
                start_date: parse_optional_date(start.as_deref())?,
                end_date: parse_optional_date(end.as_deref())?,
                location,
                budget: budget.as_deref().map(parse_money).transpose()?,
                equipment: if equipment.is_empty() {
                    None
                } else {
                    Some(parse_ids::<EquipmentId>(&equipment)?)
                },
                team: if team.is_empty() {
                    None
                } else {
                    Some(parse_ids::<UserId>(&team)?)
                },
                description,
            };
            let project = service.update(id.parse()?, patch, ctx)?;
            session.emit(&project, || format!("Updated project: {}\n", project.name))?;
        }

        ProjectCommands::Status { id, status } => {
            let project = service.set_status(id.parse()?, parse_status(&status)?, ctx)?;
            session.emit(&project, || {
                format!("{} is now {}\n", project.name, project.status)
            })?;
        }

        ProjectCommands::Delete { id } => {
            let project = service.delete(id.parse()?, ctx)?;
            session.emit(&project, || format!("Deleted project: {}\n", project.name))?;
        }
    }

    Ok(())
}
