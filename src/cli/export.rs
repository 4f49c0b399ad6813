//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{AdminError, AdminResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (full database)
    Json,
    /// YAML format (full database, human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all collections to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export equipment to CSV (same columns as `skp import`)
    Equipment {
        /// Output file path
        output: PathBuf,
    },

    /// Export projects to CSV
    Projects {
        /// Output file path
        output: PathBuf,
    },

    /// Check an export file without importing it
    Verify {
        /// JSON or YAML export file
        input: PathBuf,
    },
}

fn create_file(output: &Path) -> AdminResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        AdminError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> AdminResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_file(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Equipment { output } => {
            csv::export_equipment_csv(storage, create_file(&output)?)?;
            println!(
                "Exported {} equipment item(s) to: {}",
                storage.equipment.count()?,
                output.display()
            );
        }

        ExportCommands::Projects { output } => {
            csv::export_projects_csv(storage, create_file(&output)?)?;
            println!(
                "Exported {} project(s) to: {}",
                storage.projects.count()?,
                output.display()
            );
        }

        ExportCommands::Verify { input } => {
            let contents = std::fs::read_to_string(&input).map_err(|e| {
                AdminError::Import(format!("Failed to read {}: {}", input.display(), e))
            })?;
            let is_yaml = matches!(
                input.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            let export = if is_yaml {
                yaml::import_from_yaml(&contents)?
            } else {
                json::import_from_json(&contents)?
            };

            let m = &export.metadata;
            println!("Export is valid (schema {}, written by skp {})", export.schema_version, export.app_version);
            println!("  Exported at:  {}", export.exported_at.format("%Y-%m-%d %H:%M UTC"));
            println!("  Equipment:    {}", m.equipment_count);
            println!("  Projects:     {}", m.project_count);
            println!("  Tasks:        {}", m.task_count);
            println!("  Clients:      {}", m.client_count);
            println!("  Maintenance:  {}", m.maintenance_count);
            println!("  Widgets:      {}", m.widget_count);
        }
    }

    Ok(())
}
