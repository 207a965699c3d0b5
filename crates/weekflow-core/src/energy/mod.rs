//! Energy load model.
//!
//! This module converts events into numeric load figures and aggregates
//! them per calendar day, weighting every figure by a fixed time-of-day
//! multiplier table.

mod load;

pub use load::{
    day_load, event_load, hourly_load, DayLoad, DayStatus, BURNOUT_THRESHOLD, HEAVY_THRESHOLD,
    MODERATE_THRESHOLD, TIME_MULTIPLIERS,
};
