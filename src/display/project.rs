//! Project, task and client display formatting

use tabled::Tabled;

use crate::models::{Client, Project, Task};

use super::{or_dash, table, truncate};

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Equipment")]
    equipment: usize,
    #[tabled(rename = "Budget")]
    budget: String,
}

/// Format projects as a table
pub fn format_project_list(projects: &[Project]) -> String {
    let rows = projects
        .iter()
        .map(|p| ProjectRow {
            id: p.id.to_string(),
            name: truncate(&p.name, 30),
            status: p.status.to_string(),
            start: p.start_date.to_string(),
            end: p.end_date.to_string(),
            equipment: p.equipment.len(),
            budget: p.budget.to_string(),
        })
        .collect();
    table(rows, "No projects found.")
}

/// Format a single project with its client name
pub fn format_project_details(project: &Project, client_name: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Project: {}\n", project.name));
    output.push_str(&format!("  ID:        {}\n", project.id));
    output.push_str(&format!("  Status:    {}\n", project.status));
    output.push_str(&format!("  Client:    {}\n", or_dash(client_name)));
    output.push_str(&format!(
        "  Dates:     {} to {}\n",
        project.start_date, project.end_date
    ));
    output.push_str(&format!(
        "  Location:  {}\n",
        or_dash(project.location.as_deref())
    ));
    output.push_str(&format!("  Budget:    {}\n", project.budget));

    if !project.equipment.is_empty() {
        output.push_str(&format!("\n  Equipment ({}):\n", project.equipment.len()));
        for id in &project.equipment {
            output.push_str(&format!("    {}\n", id));
        }
    }
    if !project.team.is_empty() {
        output.push_str(&format!("\n  Team ({}):\n", project.team.len()));
        for user in &project.team {
            output.push_str(&format!("    {}\n", user));
        }
    }
    if !project.description.is_empty() {
        output.push('\n');
        output.push_str(&format!("  {}\n", project.description));
    }

    output
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
}

/// Format tasks as a table
pub fn format_task_list(tasks: &[Task]) -> String {
    let rows = tasks
        .iter()
        .map(|t| TaskRow {
            id: t.id.to_string(),
            title: truncate(&t.title, 40),
            status: t.status.to_string(),
            priority: t.priority.to_string(),
            due: t
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
        })
        .collect();
    table(rows, "No tasks found.")
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

/// Format clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    let rows = clients
        .iter()
        .map(|c| ClientRow {
            id: c.id.to_string(),
            name: truncate(&c.name, 30),
            company: or_dash(c.company.as_deref()),
            email: or_dash(c.email.as_deref()),
            phone: or_dash(c.phone.as_deref()),
        })
        .collect();
    table(rows, "No clients found.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentId, TaskPriority};
    use chrono::NaiveDate;

    #[test]
    fn test_format_project_details() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let mut project = Project::new("Open Air", start, end);
        project.equipment.push(EquipmentId::new());

        let output = format_project_details(&project, Some("Festival GmbH"));
        assert!(output.contains("Project: Open Air"));
        assert!(output.contains("Festival GmbH"));
        assert!(output.contains("2026-08-01 to 2026-08-03"));
        assert!(output.contains("Equipment (1)"));
        assert!(format_project_list(&[project]).contains("PLANNING"));
    }

    #[test]
    fn test_format_task_list() {
        let mut task = Task::new("Load truck");
        task.priority = TaskPriority::Urgent;
        let output = format_task_list(&[task]);
        assert!(output.contains("Load truck"));
        assert!(output.contains("URGENT"));
        assert!(format_task_list(&[]).contains("No tasks found"));
    }

    #[test]
    fn test_format_client_list() {
        let mut client = Client::new("Stadthalle");
        client.email = Some("events@stadthalle.example".into());
        let output = format_client_list(&[client]);
        assert!(output.contains("Stadthalle"));
        assert!(output.contains("events@stadthalle.example"));
    }
}
