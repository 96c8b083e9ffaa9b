//! Cosmic reward ledger.
//!
//! Tracks the total number of focused minutes and derives the unlock state
//! of a fixed ladder of cosmic milestones from it. The ledger is the only
//! component the focus timer reports into; everything else reads snapshots.
//!
//! Unlock state is not stored. It is recomputed from
//! `(required_minutes, total_focus_minutes)` plus a per-reward manual
//! override set, so the flag can never drift from the threshold table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One tier of the fixed cosmic progression.
#[derive(Debug, Clone, Copy)]
pub struct RewardTier {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required_minutes: u64,
}

/// The fixed reward ladder, ascending by threshold. Insertion order is the
/// canonical cosmic-progression order.
pub const REWARD_TIERS: [RewardTier; 5] = [
    RewardTier {
        id: "dust",
        name: "Stardust",
        description: "The first fragments of your universe begin to shine",
        required_minutes: 10,
    },
    RewardTier {
        id: "nebula",
        name: "Violet Nebula",
        description: "A magnificent nebula forms inside your galaxy",
        required_minutes: 30,
    },
    RewardTier {
        id: "planet",
        name: "Newborn Planet",
        description: "A new planet emerges from the cosmic dust",
        required_minutes: 60,
    },
    RewardTier {
        id: "rings",
        name: "Planetary Rings",
        description: "Majestic rings form around your planet",
        required_minutes: 180,
    },
    RewardTier {
        id: "galaxy",
        name: "Complete Galaxy",
        description: "Your galaxy reaches its final form, a dazzling cosmic sight",
        required_minutes: 300,
    },
];

/// Materialized view of one reward tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub required_minutes: u64,
    pub unlocked: bool,
}

/// Read-only snapshot of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub total_focus_minutes: u64,
    pub rewards: Vec<Reward>,
}

/// Accumulator of focused minutes plus the manual-unlock overlay.
///
/// Constructed once at startup and passed by handle to whoever needs it;
/// there is no ambient global. The total is monotonically non-decreasing
/// and manual unlocks are only ever added, so no reward ever re-locks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardLedger {
    total_focus_minutes: u64,
    /// Ids unlocked by the override path, independent of their threshold.
    #[serde(default)]
    manual_unlocks: BTreeSet<String>,
}

impl RewardLedger {
    /// Fresh ledger: zero minutes, every reward locked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize a persisted ledger, falling back to the defaults on
    /// malformed input. Unknown ids in the override set are dropped.
    pub fn from_json(json: &str) -> Self {
        let mut ledger: Self = serde_json::from_str(json).unwrap_or_default();
        ledger
            .manual_unlocks
            .retain(|id| REWARD_TIERS.iter().any(|t| t.id == id));
        ledger
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_focus_minutes(&self) -> u64 {
        self.total_focus_minutes
    }

    pub fn is_unlocked(&self, reward_id: &str) -> bool {
        REWARD_TIERS.iter().any(|t| {
            t.id == reward_id
                && (t.required_minutes <= self.total_focus_minutes
                    || self.manual_unlocks.contains(t.id))
        })
    }

    /// Number of unlocked rewards (badge counts).
    pub fn unlocked_count(&self) -> usize {
        REWARD_TIERS.iter().filter(|t| self.is_unlocked(t.id)).count()
    }

    /// Materialize the full reward list in canonical order.
    pub fn rewards(&self) -> Vec<Reward> {
        REWARD_TIERS
            .iter()
            .map(|t| Reward {
                id: t.id.to_string(),
                name: t.name.to_string(),
                description: t.description.to_string(),
                required_minutes: t.required_minutes,
                unlocked: self.is_unlocked(t.id),
            })
            .collect()
    }

    /// Read-only snapshot of the total and the reward list. No side effects.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            total_focus_minutes: self.total_focus_minutes,
            rewards: self.rewards(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add completed focus minutes to the total and recompute unlocks.
    ///
    /// Negative input is clamped to zero -- the total never decreases.
    /// A zero-minute call is a legal no-op. Returns the rewards whose
    /// unlock state flipped on this call, in canonical order.
    pub fn accumulate(&mut self, minutes: i64) -> Vec<Reward> {
        let before = self.total_focus_minutes;
        self.total_focus_minutes = before.saturating_add(minutes.max(0) as u64);

        REWARD_TIERS
            .iter()
            .filter(|t| {
                before < t.required_minutes
                    && t.required_minutes <= self.total_focus_minutes
                    && !self.manual_unlocks.contains(t.id)
            })
            .map(|t| Reward {
                id: t.id.to_string(),
                name: t.name.to_string(),
                description: t.description.to_string(),
                required_minutes: t.required_minutes,
                unlocked: true,
            })
            .collect()
    }

    /// Unlock exactly one reward regardless of its threshold.
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    /// Does not affect `total_focus_minutes` or any other reward.
    pub fn unlock_manually(&mut self, reward_id: &str) -> bool {
        let known = REWARD_TIERS.iter().any(|t| t.id == reward_id);
        if known {
            self.manual_unlocks.insert(reward_id.to_string());
        }
        known
    }
}
