//! Schedule quality scoring.
//!
//! Four independent sub-scores, each in [0, 100], combined as a weighted
//! sum. Higher is better; an empty schedule is perfect by definition. The
//! engine is deterministic and side-effect-free for a fixed event list,
//! which the local optimizer relies on for its termination guarantee.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::energy::event_load;
use crate::error::ValidationError;
use crate::event::{Event, EventType};

/// Daily energy at or below this scores a perfect day balance.
const IDEAL_DAILY_ENERGY: f64 = 20.0;
/// Daily energy above this drops into the heavy-penalty branch.
const MAX_DAILY_ENERGY: f64 = 30.0;
/// Points lost per context switch.
const CONTEXT_SWITCH_PENALTY: f64 = 5.0;
/// Adjacent events closer than this count as back-to-back.
const BACK_TO_BACK_GAP_MINUTES: i64 = 30;
/// Minimum gap after a demanding event that counts as recovery.
const RECOVERY_GAP_MINUTES: i64 = 15;
/// Energy rating at or above which an event is demanding.
const DEMANDING_THRESHOLD: i32 = 4;

/// Weights for the four quality criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    /// Weight for energy balance across days
    pub day_balance: f64,
    /// Weight for avoiding rapid type switches
    pub context_switching: f64,
    /// Weight for recovery room after demanding events
    pub recovery_time: f64,
    /// Weight for demanding work landing in focus hours
    pub time_preference: f64,
}

impl ScoreWeights {
    /// Default balanced weights.
    pub fn balanced() -> Self {
        Self {
            day_balance: 0.40,
            context_switching: 0.25,
            recovery_time: 0.20,
            time_preference: 0.15,
        }
    }

    /// Validate that all weights are in [0.0, 1.0].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weights = [
            ("day_balance", self.day_balance),
            ("context_switching", self.context_switching),
            ("recovery_time", self.recovery_time),
            ("time_preference", self.time_preference),
        ];

        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    message: format!("must be in [0.0, 1.0], got {}", weight),
                });
            }
        }

        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Per-criterion breakdown of a schedule score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub overall: f64,
    pub day_balance: f64,
    pub context_switching: f64,
    pub recovery_time: f64,
    pub time_preference: f64,
}

/// Multi-criteria schedule scoring engine.
pub struct ScoringEngine {
    weights: ScoreWeights,
}

impl ScoringEngine {
    /// Create a new engine with the balanced weights.
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    /// Create with custom weights.
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Get current weights.
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Overall schedule score (weighted average of the four criteria).
    pub fn score_schedule(&self, events: &[Event]) -> f64 {
        score_day_balance(events) * self.weights.day_balance
            + score_context_switching(events) * self.weights.context_switching
            + score_recovery_time(events) * self.weights.recovery_time
            + score_time_preference(events) * self.weights.time_preference
    }

    /// Detailed scoring breakdown.
    pub fn breakdown(&self, events: &[Event]) -> ScoreBreakdown {
        ScoreBreakdown {
            overall: self.score_schedule(events),
            day_balance: score_day_balance(events),
            context_switching: score_context_switching(events),
            recovery_time: score_recovery_time(events),
            time_preference: score_time_preference(events),
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Events sorted by start (id as tie breaker, for determinism).
fn sorted_by_start(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    sorted
}

fn is_demanding(event: &Event) -> bool {
    event.clamped_energy_cost() >= DEMANDING_THRESHOLD
}

/// Score energy balance across days.
///
/// Each day with at least one event scores 100 up to the ideal total,
/// degrades linearly to 60 at the daily maximum, and loses 5 points per
/// excess point beyond it. Days are averaged; no events means 100.
pub fn score_day_balance(events: &[Event]) -> f64 {
    let mut day_energy: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for event in events {
        *day_energy.entry(event.day()).or_insert(0.0) += event_load(event);
    }

    if day_energy.is_empty() {
        return 100.0;
    }

    let total: f64 = day_energy
        .values()
        .map(|&energy| {
            if energy <= IDEAL_DAILY_ENERGY {
                100.0
            } else if energy <= MAX_DAILY_ENERGY {
                let over_ideal = energy - IDEAL_DAILY_ENERGY;
                100.0 - (over_ideal / (MAX_DAILY_ENERGY - IDEAL_DAILY_ENERGY)) * 40.0
            } else {
                let over_max = energy - MAX_DAILY_ENERGY;
                (60.0 - over_max * 5.0).max(0.0)
            }
        })
        .sum();

    total / day_energy.len() as f64
}

/// Score context switching.
///
/// Back-to-back same-day pairs of different type cost one switch each,
/// two if both events are demanding.
pub fn score_context_switching(events: &[Event]) -> f64 {
    if events.len() < 2 {
        return 100.0;
    }

    let sorted = sorted_by_start(events);
    let mut switches = 0u32;

    for pair in sorted.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev.day() != curr.day() {
            continue;
        }

        let gap_minutes = (curr.start - prev.end).num_minutes();
        if gap_minutes > BACK_TO_BACK_GAP_MINUTES {
            continue;
        }

        if prev.event_type != curr.event_type {
            switches += 1;
            if is_demanding(prev) && is_demanding(curr) {
                switches += 1;
            }
        }
    }

    (100.0 - switches as f64 * CONTEXT_SWITCH_PENALTY).max(0.0)
}

/// Score recovery time after demanding events.
///
/// Every demanding event followed by another event the same day needs
/// recovery; a gap of at least 15 minutes, or a BREAK next, counts as good.
pub fn score_recovery_time(events: &[Event]) -> f64 {
    if events.len() < 2 {
        return 100.0;
    }

    let sorted = sorted_by_start(events);
    let mut good_recoveries = 0u32;
    let mut needed_recoveries = 0u32;

    for pair in sorted.windows(2) {
        let (curr, next) = (pair[0], pair[1]);
        if curr.day() != next.day() {
            continue;
        }

        if is_demanding(curr) {
            needed_recoveries += 1;

            let gap_minutes = (next.start - curr.end).num_minutes();
            if gap_minutes >= RECOVERY_GAP_MINUTES || next.event_type == EventType::Break {
                good_recoveries += 1;
            }
        }
    }

    if needed_recoveries == 0 {
        return 100.0;
    }
    good_recoveries as f64 / needed_recoveries as f64 * 100.0
}

/// Score time-of-day preferences.
///
/// Demanding or FOCUS events earn 100 inside the peak focus windows
/// (09-12, 14-17), 70 inside normal working hours (08-18) and 30
/// elsewhere. Everything else always earns 100.
pub fn score_time_preference(events: &[Event]) -> f64 {
    if events.is_empty() {
        return 100.0;
    }

    let total: f64 = events
        .iter()
        .map(|event| {
            if is_demanding(event) || event.event_type == EventType::Focus {
                let hour = event.start.hour();
                if (9..12).contains(&hour) || (14..17).contains(&hour) {
                    100.0
                } else if (8..18).contains(&hour) {
                    70.0
                } else {
                    30.0
                }
            } else {
                100.0
            }
        })
        .sum();

    total / events.len() as f64
}
