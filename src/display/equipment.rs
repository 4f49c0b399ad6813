//! Equipment and maintenance display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{Equipment, EquipmentId, Maintenance};

use super::{or_dash, table, truncate};

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
}

/// Format equipment as a table
pub fn format_equipment_list(items: &[Equipment]) -> String {
    let rows = items
        .iter()
        .map(|e| EquipmentRow {
            id: e.id.to_string(),
            name: truncate(&e.name, 30),
            category: e.category.clone(),
            serial: or_dash(e.serial_number.as_deref()),
            status: e.status.to_string(),
            location: or_dash(e.location.as_deref()),
        })
        .collect();
    table(rows, "No equipment found.")
}

/// Format a single piece of equipment
pub fn format_equipment_details(equipment: &Equipment) -> String {
    let mut output = String::new();

    output.push_str(&format!("Equipment: {}\n", equipment.name));
    output.push_str(&format!("  ID:             {}\n", equipment.id));
    output.push_str(&format!("  QR Code:        {}\n", equipment.qr_code));
    output.push_str(&format!("  Category:       {}\n", equipment.category));
    output.push_str(&format!("  Status:         {}\n", equipment.status));
    output.push_str(&format!(
        "  Serial Number:  {}\n",
        or_dash(equipment.serial_number.as_deref())
    ));
    output.push_str(&format!(
        "  Location:       {}\n",
        or_dash(equipment.location.as_deref())
    ));
    if let Some(date) = equipment.purchase_date {
        output.push_str(&format!("  Purchased:      {}\n", date));
    }
    output.push_str(&format!("  Purchase Price: {}\n", equipment.purchase_price));

    if !equipment.notes.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", equipment.notes));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        equipment.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        equipment.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[derive(Tabled)]
struct MaintenanceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Equipment")]
    equipment: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
    #[tabled(rename = "Completed")]
    completed: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

/// Format maintenance records, resolving equipment names where known
pub fn format_maintenance_list(
    records: &[Maintenance],
    equipment_names: &HashMap<EquipmentId, String>,
) -> String {
    let rows = records
        .iter()
        .map(|m| MaintenanceRow {
            id: m.id.to_string(),
            equipment: equipment_names
                .get(&m.equipment)
                .map(|n| truncate(n, 24))
                .unwrap_or_else(|| m.equipment.to_string()),
            kind: m.maintenance_type.to_string(),
            status: m.status.to_string(),
            scheduled: m.scheduled_date.to_string(),
            completed: m
                .completed_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            cost: m.cost.to_string(),
        })
        .collect();
    table(rows, "No maintenance records found.")
}
