//! Dashboard statistics commands.

use chrono::Utc;
use clap::Subcommand;
use tasko_core::stats;
use tasko_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Headline task numbers
    Overview,
    /// Added/completed/failed counts for the current week
    Weekly,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tasks = db.list_tasks()?;

    match action {
        StatsAction::Overview => {
            let overview = stats::overview(&tasks, Utc::now());
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        StatsAction::Weekly => {
            let start = stats::week_start(Utc::now().date_naive());
            let week = stats::weekly_activity(&tasks, start);
            println!("{}", serde_json::to_string_pretty(&week)?);
        }
    }

    Ok(())
}
