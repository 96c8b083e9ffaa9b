//! Focus timer commands.
//!
//! The timer and the reward ledger are loaded from the key-value store
//! before every action and saved back after it, so each operation -- and
//! each tick -- persists. The one-second wait in `run` lives here; the
//! core never blocks.

use clap::Subcommand;
use tasko_core::storage::Database;
use tasko_core::{Event, FocusTimer, RewardLedger};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Set the cycle length in minutes (also resets remaining time)
    Set {
        /// New duration in minutes
        minutes: u32,
    },
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Reset to a full idle cycle
    Reset,
    /// Add or remove remaining minutes (negative values allowed)
    Adjust {
        /// Signed delta in minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Apply countdown ticks without waiting (simulation/scripting)
    Tick {
        /// Number of one-second ticks to apply
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Run the countdown in the foreground until it expires or is paused
    Run,
    /// Print current timer state as JSON
    Status,
}

fn load(db: &Database) -> (FocusTimer, RewardLedger) {
    (db.load_focus_timer(), db.load_reward_ledger())
}

fn save(
    db: &Database,
    timer: &FocusTimer,
    ledger: &RewardLedger,
) -> Result<(), Box<dyn std::error::Error>> {
    db.save_focus_timer(timer)?;
    db.save_reward_ledger(ledger)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let (mut timer, mut ledger) = load(&db);

    match action {
        TimerAction::Set { minutes } => {
            let event = timer.set_duration(u64::from(minutes) * 60);
            save(&db, &timer, &ledger)?;
            print_event(&event)?;
        }
        TimerAction::Start => {
            match timer.start() {
                Some(event) => print_event(&event)?,
                None => print_event(&timer.snapshot())?,
            }
            save(&db, &timer, &ledger)?;
        }
        TimerAction::Pause => {
            match timer.pause() {
                Some(event) => print_event(&event)?,
                None => print_event(&timer.snapshot())?,
            }
            save(&db, &timer, &ledger)?;
        }
        TimerAction::Reset => {
            let event = timer.reset();
            save(&db, &timer, &ledger)?;
            print_event(&event)?;
        }
        TimerAction::Adjust { minutes } => {
            let event = timer.adjust_time(minutes);
            save(&db, &timer, &ledger)?;
            print_event(&event)?;
        }
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if let Some(event) = timer.tick(&mut ledger) {
                    print_event(&event)?;
                }
                save(&db, &timer, &ledger)?;
            }
            print_event(&timer.snapshot())?;
        }
        TimerAction::Run => {
            if timer.start().is_some() {
                save(&db, &timer, &ledger)?;
            }
            while timer.is_running() {
                std::thread::sleep(std::time::Duration::from_secs(1));
                if let Some(event) = timer.tick(&mut ledger) {
                    print_event(&event)?;
                }
                save(&db, &timer, &ledger)?;
            }
            print_event(&timer.snapshot())?;
        }
        TimerAction::Status => {
            print_event(&timer.snapshot())?;
        }
    }

    Ok(())
}
