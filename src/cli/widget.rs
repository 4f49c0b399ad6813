//! Dashboard widget CLI commands
//!
//! Widgets belong to the acting user, so every command needs `--user`.

use clap::{Args, Subcommand};
use serde_json::Value;

use crate::error::{AdminError, AdminResult};
use crate::models::{Widget, WidgetId, WidgetPosition, WidgetType};
use crate::services::{WidgetPatch, WidgetService};

use super::{parse_choice, Session};

/// Grid placement flags; unset values keep their current (or default) value
#[derive(Args, Debug, Default)]
pub struct PositionArgs {
    #[arg(long)]
    x: Option<u32>,
    #[arg(long)]
    y: Option<u32>,
    #[arg(long)]
    w: Option<u32>,
    #[arg(long)]
    h: Option<u32>,
}

impl PositionArgs {
    fn is_set(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.w.is_some() || self.h.is_some()
    }

    fn apply_to(&self, base: WidgetPosition) -> WidgetPosition {
        WidgetPosition {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            w: self.w.unwrap_or(base.w),
            h: self.h.unwrap_or(base.h),
        }
    }
}

/// Widget subcommands
#[derive(Subcommand)]
pub enum WidgetCommands {
    /// List your widgets in display order
    List,
    /// Add a widget to your dashboard
    Add {
        /// Widget type (stats, equipment_status, upcoming_projects, tasks, maintenance_due, recent_activity)
        widget_type: String,
        #[command(flatten)]
        position: PositionArgs,
        /// Settings as a JSON object
        #[arg(long)]
        settings: Option<String>,
    },
    /// Change a widget
    Update {
        id: String,
        #[arg(short = 't', long = "type")]
        widget_type: Option<String>,
        #[command(flatten)]
        position: PositionArgs,
        #[arg(long)]
        settings: Option<String>,
    },
    /// Remove a widget
    Remove { id: String },
    /// Put widgets in the given order
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn parse_type(value: &str) -> AdminResult<WidgetType> {
    parse_choice("widget type", value, WidgetType::parse, WidgetType::expected())
}

fn parse_settings(raw: &str) -> AdminResult<Value> {
    serde_json::from_str(raw)
        .map_err(|e| AdminError::Validation(format!("Invalid settings JSON: {}", e)))
}

fn format_widgets(widgets: &[Widget]) -> String {
    if widgets.is_empty() {
        return "No widgets configured.\n".to_string();
    }
    let mut output = String::new();
    for widget in widgets {
        let p = widget.position;
        output.push_str(&format!(
            "{:>3}. {:<18} at ({}, {}) size {}x{}  [{}]\n",
            widget.order, widget.widget_type.as_str(), p.x, p.y, p.w, p.h, widget.id
        ));
    }
    output
}

/// Handle a widget command
pub fn handle_widget_command(session: &Session, cmd: WidgetCommands) -> AdminResult<()> {
    let service = WidgetService::new(session.storage, session.cache);
    let user = session.require_user()?;
    let ctx = &session.ctx;

    match cmd {
        WidgetCommands::List => {
            let widgets = service.list_for_user(user)?;
            session.emit(&widgets, || format_widgets(&widgets))?;
        }

        WidgetCommands::Add {
            widget_type,
            position,
            settings,
        } => {
            let position = position
                .is_set()
                .then(|| position.apply_to(WidgetPosition::default()));
            let settings = settings.as_deref().map(parse_settings).transpose()?;
            let widget = service.create(user, parse_type(&widget_type)?, position, settings, ctx)?;
            session.emit(&widget, || {
                format!("Added {} widget\n  ID: {}\n", widget.widget_type, widget.id)
            })?;
        }

        WidgetCommands::Update {
            id,
            widget_type,
            position,
            settings,
        } => {
            let id: WidgetId = id.parse()?;
            let new_position = if position.is_set() {
                let current = service
                    .list_for_user(user)?
                    .into_iter()
                    .find(|w| w.id == id)
                    .ok_or_else(|| AdminError::not_found("Widget", id.to_string()))?;
                Some(position.apply_to(current.position))
            } else {
                None
            };
            let patch = WidgetPatch {
                widget_type: widget_type.as_deref().map(parse_type).transpose()?,
                position: new_position,
                settings: settings.as_deref().map(parse_settings).transpose()?,
            };
            let widget = service.update(user, id, patch, ctx)?;
            session.emit(&widget, || format!("Updated widget {}\n", widget.id))?;
        }

        WidgetCommands::Remove { id } => {
            let widget = service.delete(user, id.parse()?, ctx)?;
            session.emit(&widget, || format!("Removed {} widget\n", widget.widget_type))?;
        }

        WidgetCommands::Reorder { ids } => {
            let ids = ids
                .iter()
                .map(|id| id.parse())
                .collect::<AdminResult<Vec<WidgetId>>>()?;
            let widgets = service.reorder(user, &ids, ctx)?;
            session.emit(&widgets, || format_widgets(&widgets))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_args_keep_unset_values() {
        let args = PositionArgs {
            x: Some(6),
            h: Some(3),
            ..PositionArgs::default()
        };
        assert!(args.is_set());
        let moved = args.apply_to(WidgetPosition { x: 0, y: 2, w: 4, h: 2 });
        assert_eq!(moved, WidgetPosition { x: 6, y: 2, w: 4, h: 3 });
        assert!(!PositionArgs::default().is_set());
    }

    #[test]
    fn test_settings_must_be_json() {
        assert!(parse_settings("{\"limit\": 5}").is_ok());
        assert!(parse_settings("limit=5").unwrap_err().is_validation());
    }
}
