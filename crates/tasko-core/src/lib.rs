//! # Tasko Core Library
//!
//! This library provides the core business logic for Tasko, a personal
//! task manager with a pomodoro-style focus timer and a gamified reward
//! system. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary; any GUI is a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Focus Timer**: a cooperative countdown state machine that requires
//!   the caller to invoke `tick()` once per second while running
//! - **Reward Ledger**: accumulated focus minutes and the derived unlock
//!   state of the fixed cosmic reward tiers
//! - **Tasks**: task records with a simpler per-task timer state machine
//! - **Storage**: SQLite-based task/resource storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: countdown timer for focus sessions
//! - [`RewardLedger`]: focus-minute accumulator and reward tiers
//! - [`Database`]: task, category and blocked-resource persistence
//! - [`Config`]: application configuration management

pub mod blocklist;
pub mod error;
pub mod events;
pub mod focus;
pub mod stats;
pub mod storage;
pub mod task;

pub use blocklist::{BlockFilter, BlockUpdate, BlockedResource, ResourceKind};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use focus::{FocusTimer, LedgerSnapshot, Reward, RewardLedger, TimerPhase};
pub use stats::{DayActivity, TaskOverview};
pub use storage::{Config, Database};
pub use task::{Category, Priority, Task, TaskTransitionError, TimerStatus};
