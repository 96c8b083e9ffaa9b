//! Task management commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use tasko_core::storage::Database;
use tasko_core::{Priority, Task};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Category name
        #[arg(long)]
        category: Option<String>,
        /// Priority: low, medium or high (default: medium)
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date (RFC3339)
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated blocked-resource ids
        #[arg(long)]
        block: Option<String>,
    },
    /// List tasks
    List {
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
        /// Only completed (true) or only open (false) tasks
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category name
        #[arg(long)]
        category: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
        /// New due date (RFC3339)
        #[arg(long)]
        due: Option<String>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Start the task's work timer
    Start {
        /// Task ID
        id: String,
        /// Timer length in minutes (default: 25)
        #[arg(long, default_value = "25")]
        minutes: u32,
    },
    /// Pause the task's work timer
    Pause {
        /// Task ID
        id: String,
    },
    /// Finish the task's work timer (marks the task done)
    Finish {
        /// Task ID
        id: String,
    },
    /// Abandon the task's work timer
    Fail {
        /// Task ID
        id: String,
    },
}

fn parse_due(value: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn require_task(db: &Database, id: &str) -> Result<Task, Box<dyn std::error::Error>> {
    db.get_task(id)?
        .ok_or_else(|| format!("no task with id {id}").into())
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Create {
            title,
            description,
            category,
            priority,
            due,
            block,
        } => {
            let mut task = Task::new(title);
            task.description = description;
            task.category = category;
            task.priority = priority.parse::<Priority>()?;
            task.due_date = due.as_deref().map(parse_due).transpose()?;
            task.blocked_resources = block
                .map(|b| b.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            db.create_task(&task)?;
            eprintln!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List {
            category,
            completed,
        } => {
            let tasks: Vec<Task> = db
                .list_tasks()?
                .into_iter()
                .filter(|t| {
                    category
                        .as_ref()
                        .map_or(true, |c| t.category.as_ref() == Some(c))
                })
                .filter(|t| completed.map_or(true, |done| t.completed == done))
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => {
            let task = require_task(&db, &id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            category,
            priority,
            due,
            completed,
        } => {
            let mut task = require_task(&db, &id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(category) = category {
                task.category = Some(category);
            }
            if let Some(priority) = priority {
                task.priority = priority.parse::<Priority>()?;
            }
            if let Some(due) = due {
                task.due_date = Some(parse_due(&due)?);
            }
            if let Some(completed) = completed {
                task.completed = completed;
            }
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            if db.delete_task(&id)? {
                eprintln!("Task deleted: {id}");
            } else {
                return Err(format!("no task with id {id}").into());
            }
        }
        TaskAction::Start { id, minutes } => {
            let mut task = require_task(&db, &id)?;
            match task.timer_status {
                tasko_core::TimerStatus::Paused => task.resume_timer()?,
                _ => task.start_timer(minutes * 60)?,
            }
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Pause { id } => {
            let mut task = require_task(&db, &id)?;
            task.pause_timer()?;
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Finish { id } => {
            let mut task = require_task(&db, &id)?;
            task.finish_timer()?;
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Fail { id } => {
            let mut task = require_task(&db, &id)?;
            task.fail_timer()?;
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }

    Ok(())
}
