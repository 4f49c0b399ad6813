//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod bulk;
pub mod cache;
pub mod client;
pub mod equipment;
pub mod export;
pub mod history;
pub mod import;
pub mod maintenance;
pub mod project;
pub mod task;
pub mod widget;

pub use audit::{handle_audit_command, AuditCommands};
pub use bulk::{handle_bulk_command, BulkCommands};
pub use cache::{handle_cache_command, CacheCommands};
pub use client::{handle_client_command, ClientCommands};
pub use equipment::{handle_equipment_command, EquipmentCommands};
pub use export::{handle_export_command, ExportCommands};
pub use history::{handle_history_command, HistoryCommands};
pub use import::handle_import_command;
pub use maintenance::{handle_maintenance_command, MaintenanceCommands};
pub use project::{handle_project_command, ProjectCommands};
pub use task::{handle_task_command, TaskCommands};
pub use widget::{handle_widget_command, WidgetCommands};

use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::RequestContext;
use crate::cache::Cache;
use crate::config::Settings;
use crate::error::{AdminError, AdminResult};
use crate::models::{Money, ResourceKind, UserId};
use crate::storage::Storage;

/// Everything a command handler needs for one invocation
pub struct Session<'a> {
    pub storage: &'a Storage,
    pub cache: &'a Cache,
    pub settings: &'a Settings,
    /// Attribution for mutations made by this invocation
    pub ctx: RequestContext,
    /// Print JSON instead of tables
    pub json: bool,
}

impl<'a> Session<'a> {
    /// Print `value` as JSON, or the text produced by `text`
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> AdminResult<()> {
        if self.json {
            let out = serde_json::to_string_pretty(value)?;
            println!("{}", out);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    /// The acting user, required for per-user resources
    pub fn require_user(&self) -> AdminResult<UserId> {
        self.ctx.user.ok_or_else(|| {
            AdminError::Validation(
                "This command needs a user; pass --user or set SKP_USER".to_string(),
            )
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> AdminResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        AdminError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD format", s))
    })
}

pub fn parse_optional_date(s: Option<&str>) -> AdminResult<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

/// Parse an amount like `1250.50` or `$1250`
pub fn parse_money(s: &str) -> AdminResult<Money> {
    Money::parse(s).map_err(|e| {
        AdminError::Validation(format!(
            "Invalid amount: '{}'. Use format like '1250.00' or '1250'. Error: {}",
            s, e
        ))
    })
}

pub fn parse_resource(s: &str) -> AdminResult<ResourceKind> {
    ResourceKind::parse(s).ok_or_else(|| {
        AdminError::Validation(format!(
            "Unknown resource: '{}'. Valid resources: equipment, project, task, client, maintenance, widget",
            s
        ))
    })
}

/// Parse a closed-enum value, reporting the accepted values on failure
pub fn parse_choice<T>(
    what: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
    expected: String,
) -> AdminResult<T> {
    parse(value).ok_or_else(|| {
        AdminError::Validation(format!(
            "Invalid {}: '{}'. Expected one of: {}",
            what, value, expected
        ))
    })
}
