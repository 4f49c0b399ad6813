//! Client CLI commands

use clap::Subcommand;

use crate::display::format_client_list;
use crate::error::AdminResult;
use crate::services::{ClientFilter, ClientPatch, ClientService, NewClient};

use super::Session;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a client
    Add {
        name: String,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        company: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List clients
    List {
        /// Match name, company or email
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a client
    Show { id: String },
    /// Edit a client
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        company: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a client
    Delete { id: String },
}

/// Handle a client command
pub fn handle_client_command(session: &Session, cmd: ClientCommands) -> AdminResult<()> {
    let service = ClientService::new(session.storage, session.cache);
    let ctx = &session.ctx;

    match cmd {
        ClientCommands::Add {
            name,
            email,
            phone,
            company,
            address,
            notes,
        } => {
            let input = NewClient {
                name,
                email,
                phone,
                company,
                address,
                notes,
            };
            let client = service.create(input, ctx)?;
            session.emit(&client, || {
                format!("Created client: {}\n  ID: {}\n", client.name, client.id)
            })?;
        }

        ClientCommands::List { search } => {
            let clients = service.list(&ClientFilter { search })?;
            session.emit(&clients, || format_client_list(&clients))?;
        }

        ClientCommands::Show { id } => {
            let client = service.get(id.parse()?)?;
            session.emit(&client, || {
                let mut output = format!("Client: {}\n  ID: {}\n", client.name, client.id);
                for (label, value) in [
                    ("Company", &client.company),
                    ("Email", &client.email),
                    ("Phone", &client.phone),
                    ("Address", &client.address),
                ] {
                    if let Some(value) = value {
                        output.push_str(&format!("  {:<9}{}\n", format!("{}:", label), value));
                    }
                }
                if !client.notes.is_empty() {
                    output.push_str(&format!("\n  Notes: {}\n", client.notes));
                }
                output
            })?;
        }

        ClientCommands::Edit {
            id,
            name,
            email,
            phone,
            company,
            address,
            notes,
        } => {
            let patch = ClientPatch {
                name,
                email,
                phone,
                company,
                address,
                notes,
            };
            let client = service.update(id.parse()?, patch, ctx)?;
            session.emit(&client, || format!("Updated client: {}\n", client.name))?;
        }

        ClientCommands::Delete { id } => {
            let client = service.delete(id.parse()?, ctx)?;
            session.emit(&client, || format!("Deleted client: {}\n", client.name))?;
        }
    }

    Ok(())
}
