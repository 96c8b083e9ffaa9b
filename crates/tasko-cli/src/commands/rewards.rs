//! Cosmic reward ledger commands.

use chrono::Utc;
use clap::Subcommand;
use tasko_core::storage::Database;
use tasko_core::Event;

#[derive(Subcommand)]
pub enum RewardsAction {
    /// Print the total focus minutes and every reward tier as JSON
    List,
    /// Unlock one reward regardless of its threshold
    Unlock {
        /// Reward id (dust, nebula, planet, rings, galaxy)
        id: String,
    },
}

pub fn run(action: RewardsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut ledger = db.load_reward_ledger();

    match action {
        RewardsAction::List => {
            println!("{}", serde_json::to_string_pretty(&ledger.snapshot())?);
        }
        RewardsAction::Unlock { id } => {
            if ledger.unlock_manually(&id) {
                db.save_reward_ledger(&ledger)?;
                let event = Event::RewardUnlocked {
                    reward_id: id,
                    at: Utc::now(),
                };
                eprintln!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                eprintln!("Unknown reward id: {id} (nothing changed)");
            }
            println!("{}", serde_json::to_string_pretty(&ledger.snapshot())?);
        }
    }

    Ok(())
}
