//! Task CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::display::format_task_list;
use crate::error::AdminResult;
use crate::models::{ProjectId, TaskPriority, TaskStatus, UserId};
use crate::services::{NewTask, TaskFilter, TaskPatch, TaskService};

use super::{parse_choice, parse_optional_date, Session};

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        title: String,
        /// Project ID
        #[arg(short, long)]
        project: Option<String>,
        /// Priority (low, medium, high, urgent)
        #[arg(long)]
        priority: Option<String>,
        /// Assignee user ID
        #[arg(short, long)]
        assign: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List tasks
    List {
        /// Filter by status (todo, in_progress, review, done, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(short, long)]
        project: Option<String>,
        /// Filter by assignee user ID
        #[arg(short, long)]
        assigned: Option<String>,
    },
    /// List open tasks past their due date
    Overdue,
    /// Edit a task
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(short, long)]
        assign: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change task status
    Status { id: String, status: String },
    /// Delete a task
    Delete { id: String },
}

fn parse_status(value: &str) -> AdminResult<TaskStatus> {
    parse_choice("status", value, TaskStatus::parse, TaskStatus::expected())
}

fn parse_priority(value: &str) -> AdminResult<TaskPriority> {
    parse_choice("priority", value, TaskPriority::parse, TaskPriority::expected())
}

/// Handle a task command
pub fn handle_task_command(session: &Session, cmd: TaskCommands) -> AdminResult<()> {
    let service = TaskService::new(session.storage, session.cache);
    let ctx = &session.ctx;

    match cmd {
        TaskCommands::Add {
            title,
            project,
            priority,
            assign,
            due,
            description,
        } => {
            let input = NewTask {
                title,
                project: project.as_deref().map(str::parse::<ProjectId>).transpose()?,
                status: None,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                assigned_to: assign.as_deref().map(str::parse::<UserId>).transpose()?,
                due_date: parse_optional_date(due.as_deref())?,
                description,
            };
            let task = service.create(input, ctx)?;
            session.emit(&task, || format!("Created task: {}\n  ID: {}\n", task.title, task.id))?;
        }

        TaskCommands::List {
            status,
            priority,
            project,
            assigned,
        } => {
            let filter = TaskFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                project: project.as_deref().map(str::parse::<ProjectId>).transpose()?,
                assigned_to: assigned.as_deref().map(str::parse::<UserId>).transpose()?,
            };
            let tasks = service.list(&filter)?;
            session.emit(&tasks, || format_task_list(&tasks))?;
        }

        TaskCommands::Overdue => {
            let tasks = service.overdue(Local::now().date_naive())?;
            session.emit(&tasks, || format_task_list(&tasks))?;
        }

        TaskCommands::Edit {
            id,
            title,
            project,
            priority,
            assign,
            due,
            description,
        } => {
            let patch = TaskPatch {
                title,
                project: project.as_deref().map(str::parse::<ProjectId>).transpose()?,
                status: None,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                assigned_to: assign.as_deref().map(str::parse::<UserId>).transpose()?,
                due_date: parse_optional_date(due.as_deref())?,
                description,
            };
            let task = service.update(id.parse()?, patch, ctx)?;
            session.emit(&task, || format!("Updated task: {}\n", task.title))?;
        }

        TaskCommands::Status { id, status } => {
            let task = service.set_status(id.parse()?, parse_status(&status)?, ctx)?;
            session.emit(&task, || format!("{} is now {}\n", task.title, task.status))?;
        }

        TaskCommands::Delete { id } => {
            let task = service.delete(id.parse()?, ctx)?;
            session.emit(&task, || format!("Deleted task: {}\n", task.title))?;
        }
    }

    Ok(())
}
