//! Weekly insight generation.
//!
//! Read-only analysis over one user-week: daily loads, detected conflicts,
//! and human-readable warnings/suggestions for the caller's dashboard.
//! Nothing here mutates or persists anything; the report is recomputed
//! from the current event list on every call.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::{detect_conflicts, Conflict};
use crate::energy::{day_load, DayLoad, DayStatus};
use crate::event::{format_day, Event, EventType};

/// Weekly meeting hours beyond which deep work is crowded out.
const MEETING_OVERLOAD_HOURS: f64 = 20.0;
/// Fewer focus blocks than this earns a suggestion.
const MIN_FOCUS_BLOCKS: usize = 3;

/// Kind of insight surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Suggestion,
    Info,
}

/// A human-readable observation about the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekInsight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub affected_events: Vec<String>,
    #[serde(default)]
    pub suggested_action: Option<String>,
}

/// The read-only weekly report: insights, seven daily loads, conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReport {
    pub insights: Vec<WeekInsight>,
    pub daily_loads: Vec<DayLoad>,
    pub conflicts: Vec<Conflict>,
}

/// One suggested relocation for an overloaded day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleSuggestion {
    pub event_id: String,
    pub event_title: String,
    pub from_day: NaiveDate,
    pub to_day: NaiveDate,
    pub reason: String,
}

/// Assemble the full weekly report.
pub fn compute_week_report(events: &[Event], week_start: DateTime<Utc>) -> WeekReport {
    let daily_loads = week_day_loads(events, week_start);

    WeekReport {
        insights: generate_week_insights(events, week_start),
        daily_loads,
        conflicts: detect_conflicts(events),
    }
}

/// Generate insights for a week's events.
pub fn generate_week_insights(events: &[Event], week_start: DateTime<Utc>) -> Vec<WeekInsight> {
    let mut insights = Vec::new();
    let days = week_day_loads(events, week_start);

    // Burnout days
    let burnout_days: Vec<&DayLoad> = days
        .iter()
        .filter(|d| d.status == DayStatus::Burnout)
        .collect();
    if !burnout_days.is_empty() {
        insights.push(WeekInsight {
            kind: InsightKind::Warning,
            title: "Burnout Risk Detected".to_string(),
            description: format!(
                "You have {} day(s) with dangerously high cognitive load. Consider rescheduling.",
                burnout_days.len()
            ),
            affected_events: burnout_days
                .iter()
                .flat_map(|d| d.events.iter().map(|e| e.id.clone()))
                .collect(),
            suggested_action: Some("Move flexible events to lighter days".to_string()),
        });
    }

    // Back-to-back heavy days
    for pair in days.windows(2) {
        if pair[0].status == DayStatus::Heavy && pair[1].status == DayStatus::Heavy {
            insights.push(WeekInsight {
                kind: InsightKind::Warning,
                title: "Consecutive Heavy Days".to_string(),
                description: format!(
                    "{} and {} are both heavily loaded. This pattern leads to exhaustion.",
                    format_day(pair[0].date),
                    format_day(pair[1].date)
                ),
                affected_events: Vec::new(),
                suggested_action: Some("Add a buffer day between heavy workloads".to_string()),
            });
        }
    }

    // Meeting overload
    let meeting_hours: f64 = events
        .iter()
        .filter(|e| e.event_type == EventType::Meeting)
        .map(|e| e.duration_hours().max(0.0))
        .sum();
    if meeting_hours > MEETING_OVERLOAD_HOURS {
        insights.push(WeekInsight {
            kind: InsightKind::Warning,
            title: "Meeting Overload".to_string(),
            description: format!(
                "You have {:.1} hours of meetings this week. This leaves little time for deep work.",
                meeting_hours
            ),
            affected_events: Vec::new(),
            suggested_action: Some("Decline or reschedule non-essential meetings".to_string()),
        });
    }

    // Lack of focus time
    let focus_blocks = events
        .iter()
        .filter(|e| e.event_type == EventType::Focus)
        .count();
    if focus_blocks < MIN_FOCUS_BLOCKS {
        insights.push(WeekInsight {
            kind: InsightKind::Suggestion,
            title: "Insufficient Focus Time".to_string(),
            description:
                "You have very few dedicated focus blocks. Deep work requires uninterrupted time."
                    .to_string(),
            affected_events: Vec::new(),
            suggested_action: Some("Block at least 2-3 focus sessions per week".to_string()),
        });
    }

    // No breaks at all
    let break_count = events
        .iter()
        .filter(|e| e.event_type == EventType::Break)
        .count();
    if break_count == 0 {
        insights.push(WeekInsight {
            kind: InsightKind::Suggestion,
            title: "No Scheduled Breaks".to_string(),
            description: "Taking breaks improves productivity and prevents burnout.".to_string(),
            affected_events: Vec::new(),
            suggested_action: Some("Add short breaks between intensive work blocks".to_string()),
        });
    }

    // Causal chains: one cause spawning two or more follow-ups
    let mut dependents_by_cause: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for event in events {
        if let Some(cause) = event.caused_by_id.as_deref() {
            dependents_by_cause.entry(cause).or_default().push(event);
        }
    }
    for (cause_id, dependents) in dependents_by_cause {
        let Some(root) = events.iter().find(|e| e.id == cause_id) else {
            continue;
        };
        if dependents.len() >= 2 {
            let mut affected = vec![root.id.clone()];
            affected.extend(dependents.iter().map(|e| e.id.clone()));
            insights.push(WeekInsight {
                kind: InsightKind::Info,
                title: "Causal Chain Detected".to_string(),
                description: format!(
                    "\"{}\" has spawned {} follow-up events.",
                    root.title,
                    dependents.len()
                ),
                affected_events: affected,
                suggested_action: None,
            });
        }
    }

    insights
}

/// The most flexible events: best candidates for manual rescheduling.
pub fn reschedule_candidates(events: &[Event]) -> Vec<Event> {
    let mut candidates: Vec<Event> = events
        .iter()
        .filter(|e| e.flexibility >= 3)
        .cloned()
        .collect();
    candidates.sort_by(|a, b| b.flexibility.cmp(&a.flexibility).then_with(|| a.id.cmp(&b.id)));
    candidates.truncate(5);
    candidates
}

/// One relocation suggestion per overloaded day, toward the lightest days.
pub fn suggest_rescheduling(
    events: &[Event],
    week_start: DateTime<Utc>,
) -> Vec<RescheduleSuggestion> {
    let days = week_day_loads(events, week_start);

    let overloaded: Vec<&DayLoad> = days
        .iter()
        .filter(|d| d.status == DayStatus::Heavy || d.status == DayStatus::Burnout)
        .collect();
    let mut light: Vec<&DayLoad> = days
        .iter()
        .filter(|d| d.status == DayStatus::Light)
        .collect();
    light.sort_by(|a, b| a.total_energy.total_cmp(&b.total_energy));

    let mut suggestions = Vec::new();
    for heavy_day in overloaded {
        let mut flexible: Vec<&Event> = heavy_day
            .events
            .iter()
            .filter(|e| e.flexibility >= 3)
            .collect();
        flexible.sort_by(|a, b| b.flexibility.cmp(&a.flexibility).then_with(|| a.id.cmp(&b.id)));

        if let (Some(event), Some(target)) = (flexible.first(), light.first()) {
            suggestions.push(RescheduleSuggestion {
                event_id: event.id.clone(),
                event_title: event.title.clone(),
                from_day: heavy_day.date,
                to_day: target.date,
                reason: format!(
                    "Moving \"{}\" would balance your week better",
                    event.title
                ),
            });
        }
    }

    suggestions
}

/// Loads for the seven days starting at `week_start`.
fn week_day_loads(events: &[Event], week_start: DateTime<Utc>) -> Vec<DayLoad> {
    let start = week_start.date_naive();
    (0..7)
        .map(|i| day_load(events, start + Duration::days(i)))
        .collect()
}
