//! Conflict detection over a week's events.
//!
//! Three independent read-only passes: time overlaps, daily energy
//! overload, and recovery fatigue. The detector sorts internally, so the
//! result does not depend on input order, and none of the passes read a
//! clock. Typically run before and after an optimization pass to show the
//! difference.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::{day_load, DayStatus};
use crate::event::{format_day, Event};

/// Cognitive-load rating at or above which work counts as intense.
const HIGH_LOAD_THRESHOLD: i32 = 4;
/// Minutes of uninterrupted intense work that trigger a recovery finding.
const FATIGUE_LIMIT_MINUTES: i64 = 240;
/// A gap longer than this counts as a real break.
const BREAK_GAP_MINUTES: i64 = 30;

/// Kind of detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    /// Two events occupy the same time
    HardOverlap,
    /// A day's total energy is in the burnout range
    EnergyOverload,
    /// Too much intense work without a substantial break
    RecoveryRequired,
}

/// How urgent a conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// A discrete scheduling conflict.
///
/// Derived and ephemeral, like [`DayLoad`](crate::energy::DayLoad): ids are
/// deterministic strings built from the involved event ids or date, so the
/// same schedule always yields the same conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    pub kind: ConflictKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub event_ids: Vec<String>,
    #[serde(default)]
    pub suggested_action: Option<String>,
}

/// Detector for scheduling conflicts.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Detect hard scheduling conflicts and soft energy/fatigue conflicts.
    pub fn detect_conflicts(&self, events: &[Event]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        // Every pass walks the same start-ordered view, so the result does
        // not depend on how the caller happened to order the input
        let mut sorted: Vec<Event> = events.to_vec();
        sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

        self.detect_overlaps(&sorted, &mut conflicts);
        self.detect_overload(&sorted, &mut conflicts);
        self.detect_fatigue(&sorted, &mut conflicts);

        conflicts
    }

    /// Hard time overlaps.
    ///
    /// Only sorted-adjacent pairs are compared: a long event that fully
    /// contains two later ones can mask the second overlap. Kept that way
    /// as a performance trade-off for realistic event densities.
    fn detect_overlaps(&self, sorted: &[Event], conflicts: &mut Vec<Conflict>) {
        for pair in sorted.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if current.end > next.start {
                conflicts.push(Conflict {
                    id: format!("overlap-{}-{}", current.id, next.id),
                    kind: ConflictKind::HardOverlap,
                    severity: Severity::High,
                    title: "Double booking".to_string(),
                    description: format!(
                        "\"{}\" overlaps with \"{}\"",
                        current.title, next.title
                    ),
                    event_ids: vec![current.id.clone(), next.id.clone()],
                    suggested_action: Some("Reschedule one of the events".to_string()),
                });
            }
        }
    }

    /// Daily energy overload: any day classified burnout.
    fn detect_overload(&self, sorted: &[Event], conflicts: &mut Vec<Conflict>) {
        let distinct_dates: BTreeSet<_> = sorted.iter().map(|e| e.day()).collect();

        for date in distinct_dates {
            let load = day_load(sorted, date);
            if load.status == DayStatus::Burnout {
                conflicts.push(Conflict {
                    id: format!("burnout-{}", date),
                    kind: ConflictKind::EnergyOverload,
                    severity: Severity::High,
                    title: "Burnout risk".to_string(),
                    description: format!(
                        "Total energy load for {} is dangerous ({:.1})",
                        format_day(date),
                        load.total_energy
                    ),
                    event_ids: load.events.iter().map(|e| e.id.clone()).collect(),
                    suggested_action: Some("Move flexible tasks to another day".to_string()),
                });
            }
        }
    }

    /// Recovery fatigue: a running counter of consecutive intense minutes,
    /// reset whenever a gap longer than [`BREAK_GAP_MINUTES`] separates two
    /// intense events, and reset again after each finding so one long
    /// stretch is reported once rather than per trailing event.
    fn detect_fatigue(&self, sorted: &[Event], conflicts: &mut Vec<Conflict>) {
        let mut consecutive_minutes: i64 = 0;
        let mut last_intense_end: Option<DateTime<Utc>> = None;

        for event in sorted {
            if event.effective_cognitive_load() < HIGH_LOAD_THRESHOLD {
                continue;
            }

            if let Some(last_end) = last_intense_end {
                if event.start - last_end > Duration::minutes(BREAK_GAP_MINUTES) {
                    consecutive_minutes = 0;
                }
            }

            consecutive_minutes += event.duration_minutes().max(0);
            last_intense_end = Some(event.end);

            if consecutive_minutes > FATIGUE_LIMIT_MINUTES {
                conflicts.push(Conflict {
                    id: format!("fatigue-{}", event.id),
                    kind: ConflictKind::RecoveryRequired,
                    severity: Severity::Medium,
                    title: "Cognitive fatigue".to_string(),
                    description:
                        "More than 4 hours of intense work without a substantial break."
                            .to_string(),
                    event_ids: vec![event.id.clone()],
                    suggested_action: Some("Schedule a 15 min break".to_string()),
                });
                consecutive_minutes = 0;
            }
        }
    }
}

/// Detect conflicts in one event list.
pub fn detect_conflicts(events: &[Event]) -> Vec<Conflict> {
    ConflictDetector.detect_conflicts(events)
}
