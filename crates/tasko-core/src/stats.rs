//! Dashboard and weekly-view aggregates.
//!
//! Pure calculators over task slices; rendering is someone else's job.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TimerStatus};

/// Per-day task activity for the weekly chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub added: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskOverview {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
    pub completion_rate_pct: u64,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

fn day_of(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Headline dashboard numbers.
pub fn overview(tasks: &[Task], now: DateTime<Utc>) -> TaskOverview {
    let total = tasks.len() as u64;
    let completed = tasks.iter().filter(|t| t.completed).count() as u64;
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count() as u64;
    let completion_rate_pct = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u64
    } else {
        0
    };
    TaskOverview {
        total,
        completed,
        pending: total - completed,
        overdue,
        completion_rate_pct,
    }
}

/// Added/completed/failed counts for each day of the week starting at
/// `start` (normally a Monday; tasks are bucketed by creation day).
pub fn weekly_activity(tasks: &[Task], start: NaiveDate) -> Vec<DayActivity> {
    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let day_tasks: Vec<&Task> = tasks
                .iter()
                .filter(|t| day_of(t.created_at) == date)
                .collect();
            DayActivity {
                date,
                added: day_tasks.len() as u64,
                completed: day_tasks.iter().filter(|t| t.completed).count() as u64,
                failed: day_tasks
                    .iter()
                    .filter(|t| t.timer_status == TimerStatus::Failed)
                    .count() as u64,
            }
        })
        .collect()
}

/// Completion percentage of the tasks due on `date` (0 when none are).
pub fn day_progress_pct(tasks: &[Task], date: NaiveDate) -> f64 {
    let due: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.due_date.map(day_of) == Some(date))
        .collect();
    if due.is_empty() {
        return 0.0;
    }
    let done = due.iter().filter(|t| t.completed).count();
    done as f64 / due.len() as f64 * 100.0
}

/// True when `date` is in the Monday-started week of `today`.
pub fn in_current_week(date: NaiveDate, today: NaiveDate) -> bool {
    let start = week_start(today);
    date >= start && date < start + Duration::days(7)
}
