//! Display formatting for terminal output
//!
//! List views are rendered as `tabled` tables; detail views are plain
//! aligned key/value blocks.

pub mod audit;
pub mod equipment;
pub mod project;

pub use audit::{
    format_audit_page, format_bulk_result, format_dashboard, format_import_result,
    format_version_changes, format_version_list,
};
pub use equipment::{format_equipment_details, format_equipment_list, format_maintenance_list};
pub use project::{format_client_list, format_project_details, format_project_list, format_task_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn table<R: Tabled>(rows: Vec<R>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("{}\n", empty);
    }
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Truncate a string to at most `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Moving head spot", 10), "Moving ...");
        assert_eq!(truncate("Lautsprecherbox groß", 18), "Lautsprecherbox...");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Hall B")), "Hall B");
    }
}
