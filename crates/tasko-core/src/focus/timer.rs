//! Focus countdown timer.
//!
//! The timer is a cooperative state machine. It owns no thread and never
//! blocks -- the caller schedules `tick()` once per second while the timer
//! is running. The decrementing counter is the single source of truth for
//! remaining time; the start timestamp is kept only as an audit field.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused -> Running -> (Paused | Expired)
//! any state --reset()--> Idle
//! ```
//!
//! On the tick that reaches zero the timer reports the completed whole
//! minutes of the cycle to the [`RewardLedger`] and stops. That is the
//! sole automatic transition out of the running state, and it fires
//! exactly once per expiry.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::rewards::RewardLedger;
use crate::events::Event;

/// Default cycle length: 25 minutes.
pub const DEFAULT_DURATION_SECS: u64 = 25 * 60;

/// Derived phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Resumable single countdown for focus sessions.
///
/// All operations are total over valid inputs: out-of-range values are
/// clamped at this boundary, never surfaced as errors. Persistence is the
/// caller's concern -- the struct serializes whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    /// Configured full length of one cycle, in seconds. Always >= 1.
    duration_secs: u64,
    /// Seconds left in the current cycle. Never exceeds `duration_secs`.
    remaining_secs: u64,
    running: bool,
    /// Epoch millis of the last idle->running transition. Audit field only;
    /// remaining time is never recomputed from it.
    #[serde(default)]
    started_at_epoch_ms: Option<u64>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTimer {
    /// Fresh timer at the default 25-minute duration, idle.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_SECS)
    }

    /// Fresh idle timer with the given cycle length.
    ///
    /// Zero is clamped to one second; a zero-length cycle would make the
    /// idle and expired phases indistinguishable.
    pub fn with_duration(duration_secs: u64) -> Self {
        let duration_secs = duration_secs.max(1);
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            started_at_epoch_ms: None,
        }
    }

    /// Deserialize a persisted timer, falling back to the defaults on
    /// malformed input and clamping out-of-range fields.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str::<Self>(json)
            .map(Self::sanitized)
            .unwrap_or_default()
    }

    fn sanitized(mut self) -> Self {
        self.duration_secs = self.duration_secs.max(1);
        self.remaining_secs = self.remaining_secs.min(self.duration_secs);
        if self.remaining_secs == 0 {
            self.running = false;
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn started_at_epoch_ms(&self) -> Option<u64> {
        self.started_at_epoch_ms
    }

    pub fn phase(&self) -> TimerPhase {
        if self.remaining_secs == 0 {
            TimerPhase::Expired
        } else if self.running {
            TimerPhase::Running
        } else if self.remaining_secs == self.duration_secs {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// 0.0 .. 1.0 progress through the current cycle.
    pub fn progress(&self) -> f64 {
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            phase: self.phase(),
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            running: self.running,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the cycle length and reset remaining time to it.
    ///
    /// Applies immediately even while running, truncating or extending the
    /// countdown in progress. Non-positive input is clamped to one second.
    pub fn set_duration(&mut self, duration_secs: u64) -> Event {
        self.duration_secs = duration_secs.max(1);
        self.remaining_secs = self.duration_secs;
        Event::TimerAdjusted {
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Start (or resume) the countdown.
    ///
    /// Returns `None` without side effects when there is nothing to count
    /// down (already running, or remaining time is zero).
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        self.started_at_epoch_ms = Some(Utc::now().timestamp_millis() as u64);
        Some(Event::TimerStarted {
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop decrementing. Idempotent; remaining time is kept.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to a full idle cycle.
    pub fn reset(&mut self) -> Event {
        self.remaining_secs = self.duration_secs;
        self.running = false;
        self.started_at_epoch_ms = None;
        Event::TimerReset {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Add (or remove) whole minutes of remaining time, floored at zero.
    ///
    /// While idle, paused or expired this edits the baseline: the cycle
    /// length follows the new remaining value (floored at one second).
    /// While running the remaining time is capped at the cycle length.
    pub fn adjust_time(&mut self, delta_minutes: i64) -> Event {
        let delta_secs = delta_minutes.saturating_mul(60);
        let adjusted = if delta_secs >= 0 {
            self.remaining_secs.saturating_add(delta_secs as u64)
        } else {
            self.remaining_secs.saturating_sub(delta_secs.unsigned_abs())
        };

        if self.running {
            self.remaining_secs = adjusted.min(self.duration_secs);
        } else {
            self.remaining_secs = adjusted;
            self.duration_secs = adjusted.max(1);
        }
        Event::TimerAdjusted {
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Apply one second of countdown. Call once per second while running.
    ///
    /// A stray tick while paused or already expired is a no-op, even if it
    /// was scheduled before the pause. The tick that reaches zero credits
    /// `duration_secs / 60` whole minutes to `ledger` synchronously, stops
    /// the timer, and returns the completion event; its snapshot reflects
    /// the new totals before the next tick can be scheduled.
    pub fn tick(&mut self, ledger: &mut RewardLedger) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }

        self.running = false;
        let focus_minutes = self.duration_secs / 60;
        let newly_unlocked = ledger.accumulate(focus_minutes as i64);
        Some(Event::TimerCompleted {
            focus_minutes,
            newly_unlocked: newly_unlocked.into_iter().map(|r| r.id).collect(),
            at: Utc::now(),
        })
    }
}
