//! Task types and the task-level timer state machine.
//!
//! Each task can carry its own simple work timer, independent of the
//! standalone focus countdown. The surrounding application reads these
//! status transitions to decide when site blocking applies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of a task's own work timer.
///
/// Valid transitions:
/// - NOT_STARTED → RUNNING (start)
/// - RUNNING → PAUSED (pause)
/// - RUNNING → COMPLETED (finish)
/// - RUNNING → FAILED (give up / deadline hit)
/// - PAUSED → RUNNING (resume)
/// - PAUSED → FAILED (abandon)
///
/// COMPLETED and FAILED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    NotStarted,
    Running,
    Paused,
    Completed,
    Failed,
}

impl TimerStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TimerStatus) -> bool {
        match self {
            TimerStatus::NotStarted => matches!(to, TimerStatus::Running),
            TimerStatus::Running => matches!(
                to,
                TimerStatus::Paused | TimerStatus::Completed | TimerStatus::Failed
            ),
            TimerStatus::Paused => matches!(to, TimerStatus::Running | TimerStatus::Failed),
            TimerStatus::Completed | TimerStatus::Failed => false,
        }
    }

    /// Get valid next statuses for this status.
    pub fn valid_transitions(&self) -> &[TimerStatus] {
        match self {
            TimerStatus::NotStarted => &[TimerStatus::Running],
            TimerStatus::Running => &[
                TimerStatus::Paused,
                TimerStatus::Completed,
                TimerStatus::Failed,
            ],
            TimerStatus::Paused => &[TimerStatus::Running, TimerStatus::Failed],
            TimerStatus::Completed | TimerStatus::Failed => &[],
        }
    }
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::NotStarted
    }
}

/// Rejected task timer transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid timer transition for task {task_id}: {from:?} -> {to:?}")]
pub struct TaskTransitionError {
    pub task_id: String,
    pub from: TimerStatus,
    pub to: TimerStatus,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(crate::error::ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority: {other} (expected low, medium or high)"),
            }),
        }
    }
}

/// A task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the task is done
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// Category name
    pub category: Option<String>,
    /// Priority (low/medium/high)
    pub priority: Priority,
    /// Length of the task's work timer, in seconds
    pub timer_duration_secs: Option<u32>,
    /// When the task timer last entered RUNNING
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Task timer status
    pub timer_status: TimerStatus,
    /// Accumulated work-session time, in seconds
    #[serde(default)]
    pub work_session_secs: u32,
    /// Ids of blocked resources enforced while this task's timer runs
    #[serde(default)]
    pub blocked_resources: Vec<String>,
}

impl Task {
    /// Create a new task with default values.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            completed: false,
            created_at: Utc::now(),
            due_date: None,
            category: None,
            priority: Priority::Medium,
            timer_duration_secs: None,
            timer_started_at: None,
            timer_status: TimerStatus::NotStarted,
            work_session_secs: 0,
            blocked_resources: Vec::new(),
        }
    }

    fn transition(&mut self, to: TimerStatus) -> Result<(), TaskTransitionError> {
        if !self.timer_status.can_transition_to(&to) {
            return Err(TaskTransitionError {
                task_id: self.id.clone(),
                from: self.timer_status,
                to,
            });
        }
        self.timer_status = to;
        Ok(())
    }

    /// Start the task timer for `duration_secs`.
    pub fn start_timer(&mut self, duration_secs: u32) -> Result<(), TaskTransitionError> {
        self.transition(TimerStatus::Running)?;
        self.timer_duration_secs = Some(duration_secs);
        self.timer_started_at = Some(Utc::now());
        Ok(())
    }

    /// Resume a paused task timer.
    pub fn resume_timer(&mut self) -> Result<(), TaskTransitionError> {
        self.transition(TimerStatus::Running)?;
        self.timer_started_at = Some(Utc::now());
        Ok(())
    }

    /// Pause the task timer.
    pub fn pause_timer(&mut self) -> Result<(), TaskTransitionError> {
        self.transition(TimerStatus::Paused)
    }

    /// Finish the task timer successfully. Also marks the task done.
    pub fn finish_timer(&mut self) -> Result<(), TaskTransitionError> {
        self.transition(TimerStatus::Completed)?;
        self.completed = true;
        Ok(())
    }

    /// Abandon the task timer.
    pub fn fail_timer(&mut self) -> Result<(), TaskTransitionError> {
        self.transition(TimerStatus::Failed)
    }

    /// Whether the task is past due and not done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.due_date, Some(due) if due < now && !self.completed)
    }
}

/// A task category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }
}

/// The category set seeded into a fresh database.
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Work", "#8b5cf6"),
    ("Personal", "#3b82f6"),
    ("Shopping", "#f59e0b"),
    ("Health", "#10b981"),
];
