mod rewards;
mod timer;

pub use rewards::{LedgerSnapshot, Reward, RewardLedger, RewardTier, REWARD_TIERS};
pub use timer::{FocusTimer, TimerPhase, DEFAULT_DURATION_SECS};
