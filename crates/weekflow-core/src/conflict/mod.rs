//! Conflict detection.
//!
//! Read-only passes over a week's events that surface discrete findings:
//! time overlaps, daily energy overload, and recovery fatigue.

mod detector;

pub use detector::{detect_conflicts, Conflict, ConflictDetector, ConflictKind, Severity};
