//! Audit log CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};

use crate::audit::{AuditAction, AuditFilter};
use crate::display::format_audit_page;
use crate::error::{AdminError, AdminResult};
use crate::export::export_audit_csv;
use crate::models::UserId;

use super::{parse_choice, parse_optional_date, parse_resource, Session};

/// Filters shared by the audit subcommands
#[derive(Args, Debug, Default)]
pub struct AuditFilterArgs {
    /// Acting user ID
    #[arg(long)]
    actor: Option<String>,
    /// Resource kind (equipment, project, task, client, maintenance, widget)
    #[arg(short, long)]
    resource: Option<String>,
    /// Resource ID
    #[arg(long)]
    id: Option<String>,
    /// Action (create, update, delete, rollback, import, bulk_update)
    #[arg(short, long)]
    action: Option<String>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

impl AuditFilterArgs {
    fn to_filter(&self) -> AdminResult<AuditFilter> {
        let action = self
            .action
            .as_deref()
            .map(|a| {
                parse_choice(
                    "action",
                    a,
                    AuditAction::parse,
                    "create, update, delete, rollback, import, bulk_update".to_string(),
                )
            })
            .transpose()?;

        let start_date = parse_optional_date(self.from.as_deref())?.map(start_of_day);
        let end_date = parse_optional_date(self.to.as_deref())?.map(end_of_day);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AdminError::Validation(
                    "--from must not be after --to".to_string(),
                ));
            }
        }

        Ok(AuditFilter {
            user: self.actor.as_deref().map(str::parse::<UserId>).transpose()?,
            resource: self.resource.as_deref().map(parse_resource).transpose()?,
            resource_id: self.id.as_ref().map(|id| id.trim().to_lowercase()),
            action,
            start_date,
            end_date,
            ..AuditFilter::default()
        })
    }
}

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit entries, newest first
    List {
        #[command(flatten)]
        filter: AuditFilterArgs,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Entries per page
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Export matching audit entries to CSV
    Export {
        /// Output file path
        output: PathBuf,
        #[command(flatten)]
        filter: AuditFilterArgs,
    },
}

/// Handle an audit command
pub fn handle_audit_command(session: &Session, cmd: AuditCommands) -> AdminResult<()> {
    let logger = &session.storage.audit;

    match cmd {
        AuditCommands::List {
            filter,
            page,
            limit,
        } => {
            let limit = session.settings.audit_page_size(limit);
            let query = filter.to_filter()?.page(page, limit);
            let result = logger.get_audit_logs(&query)?;
            session.emit(&result, || format_audit_page(&result))?;
        }

        AuditCommands::Export { output, filter } => {
            let query = filter.to_filter()?.page(1, usize::MAX);
            let result = logger.get_audit_logs(&query)?;

            let file = File::create(&output).map_err(|e| {
                AdminError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            export_audit_csv(&result.logs, BufWriter::new(file))?;
            println!(
                "Exported {} audit entries to: {}",
                result.logs.len(),
                output.display()
            );
        }
    }

    Ok(())
}
