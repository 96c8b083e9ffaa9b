use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::TimerPhase;

/// Every state change in the focus core produces an Event.
/// The CLI prints these; a GUI would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time edited by the user (and the baseline with it, when idle).
    TimerAdjusted {
        remaining_secs: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero during an active run. Fires exactly once
    /// per expiry; `focus_minutes` were credited to the reward ledger.
    TimerCompleted {
        focus_minutes: u64,
        newly_unlocked: Vec<String>,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        phase: TimerPhase,
        duration_secs: u64,
        remaining_secs: u64,
        running: bool,
        progress: f64,
        at: DateTime<Utc>,
    },
    /// A reward was unlocked outside normal accumulation.
    RewardUnlocked {
        reward_id: String,
        at: DateTime<Utc>,
    },
}
