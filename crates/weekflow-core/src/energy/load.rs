//! Event and day load computation.
//!
//! The same nominal energy cost drains more or less depending on the hour
//! it is spent, so every load figure is weighted by an hour-of-day
//! multiplier. All functions here are pure: given the same events and date
//! they always produce the same result, and nothing is cached or stored.

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Time-of-day energy multipliers, indexed by hour (0-23).
///
/// Deep-night hours are cheapest; the late-morning focus window peaks at
/// 1.0, with a post-lunch dip and a smaller afternoon recovery.
pub const TIME_MULTIPLIERS: [f64; 24] = [
    0.5, 0.5, 0.5, 0.5, 0.5, 0.6, // 00-05
    0.7, 0.8, 0.9, 1.0, 1.0, 1.0, // 06-11
    0.8, 0.7, 0.8, 0.9, 0.9, 0.8, // 12-17
    0.7, 0.6, 0.5, 0.5, 0.5, 0.5, // 18-23
];

/// Daily totals at or above this are at least moderate.
pub const MODERATE_THRESHOLD: f64 = 15.0;
/// Daily totals at or above this are at least heavy.
pub const HEAVY_THRESHOLD: f64 = 22.0;
/// Daily totals at or above this are burnout risk.
pub const BURNOUT_THRESHOLD: f64 = 30.0;

/// Classification of a day's aggregate energy load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Light,
    Moderate,
    Heavy,
    Burnout,
}

impl DayStatus {
    /// Classify a day's total energy.
    pub fn from_total_energy(total_energy: f64) -> Self {
        if total_energy >= BURNOUT_THRESHOLD {
            DayStatus::Burnout
        } else if total_energy >= HEAVY_THRESHOLD {
            DayStatus::Heavy
        } else if total_energy >= MODERATE_THRESHOLD {
            DayStatus::Moderate
        } else {
            DayStatus::Light
        }
    }
}

/// Aggregate load for one calendar day.
///
/// Derived and ephemeral: recomputed from the current event list on
/// demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    pub date: NaiveDate,
    pub total_energy: f64,
    pub peak_hour: u32,
    pub peak_load: f64,
    pub hourly_load: [f64; 24],
    pub status: DayStatus,
    pub events: Vec<Event>,
}

/// Weighted energy load for a single event.
///
/// Never negative, even for degenerate (zero or inverted) durations.
pub fn event_load(event: &Event) -> f64 {
    let multiplier = TIME_MULTIPLIERS[event.start.hour() as usize];
    (event.clamped_energy_cost() as f64 * event.duration_hours() * multiplier).max(0.0)
}

/// Hour-by-hour load distribution for a calendar day.
///
/// Events are attributed to every whole hour from their start hour through
/// their end hour inclusive. This is intentionally coarse: a 09:30-10:30
/// event loads both hour 9 and hour 10 in full.
pub fn hourly_load(events: &[Event], date: NaiveDate) -> [f64; 24] {
    let mut load = [0.0; 24];

    for event in events {
        if event.end.date_naive() < date || event.start.date_naive() > date {
            continue;
        }

        let start_hour = event.start.hour().min(23) as usize;
        let end_hour = event.end.hour().min(23) as usize;
        for hour in start_hour..=end_hour {
            load[hour] += event.clamped_energy_cost() as f64 * TIME_MULTIPLIERS[hour];
        }
    }

    load
}

/// Aggregate load for the given calendar day.
///
/// An event belongs to the day its start falls on; the caller's clock is
/// authoritative for what a "day" is, since all timestamps arrive already
/// shifted into the caller's reference frame.
pub fn day_load(events: &[Event], date: NaiveDate) -> DayLoad {
    let day_events: Vec<Event> = events.iter().filter(|e| e.day() == date).cloned().collect();

    let hourly = hourly_load(&day_events, date);
    let total_energy: f64 = day_events.iter().map(event_load).sum();

    let mut peak_hour = 0u32;
    let mut peak_load = 0.0f64;
    for (hour, &load) in hourly.iter().enumerate() {
        if load > peak_load {
            peak_hour = hour as u32;
            peak_load = load;
        }
    }

    DayLoad {
        date,
        total_energy,
        peak_hour,
        peak_load,
        hourly_load: hourly,
        status: DayStatus::from_total_energy(total_energy),
        events: day_events,
    }
}
