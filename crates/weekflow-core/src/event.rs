//! Calendar event data model.
//!
//! Events are owned by the embedding application; this crate treats them as
//! immutable values per optimization pass and clones before rearranging.
//! Wire names are camelCase to match the JSON model the surrounding
//! application exchanges with external calendars.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Floor of the 1-5 self-reported rating scales.
pub const RATING_MIN: i32 = 1;
/// Ceiling of the 1-5 self-reported rating scales.
pub const RATING_MAX: i32 = 5;

fn default_rating() -> i32 {
    3
}

/// Kind of calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Meeting,
    Task,
    Habit,
    Focus,
    Break,
    Personal,
}

/// A calendar event with self-reported energy/flexibility ratings.
///
/// `end > start` is established by the caller before events reach this
/// crate; the load model clamps rather than rejects when it is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Self-reported drain rating (1-5)
    #[serde(default = "default_rating")]
    pub energy_cost: i32,
    /// Focus/complexity rating (1-5); falls back to `energy_cost` when absent
    #[serde(default)]
    pub cognitive_load: Option<i32>,
    #[serde(default = "default_rating")]
    pub importance: i32,
    /// How freely the event can be rescheduled (1-5); 1 effectively pins it
    #[serde(default = "default_rating")]
    pub flexibility: i32,
    /// Id of the event that generated this one, if any. Dependents are
    /// never rescheduled independently of their cause.
    #[serde(default)]
    pub caused_by_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Event {
    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Duration in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }

    /// Calendar day the event belongs to, by its start.
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Energy cost clamped to the valid rating range.
    pub fn clamped_energy_cost(&self) -> i32 {
        self.energy_cost.clamp(RATING_MIN, RATING_MAX)
    }

    /// Cognitive load with the energy-cost fallback, clamped.
    pub fn effective_cognitive_load(&self) -> i32 {
        self.cognitive_load
            .unwrap_or(self.energy_cost)
            .clamp(RATING_MIN, RATING_MAX)
    }
}

/// Short display label for a calendar day, e.g. "Mon, Jan 5".
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_deserializes_with_rating_defaults() {
        let json = r#"{
            "id": "evt-1",
            "title": "Standup",
            "start": "2025-06-02T09:00:00Z",
            "end": "2025-06-02T09:15:00Z",
            "type": "MEETING"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.energy_cost, 3);
        assert_eq!(event.importance, 3);
        assert_eq!(event.flexibility, 3);
        assert_eq!(event.cognitive_load, None);
        assert!(event.caused_by_id.is_none());
        assert!(event.tags.is_empty());
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = Event {
            id: "evt-2".to_string(),
            title: "Deep work".to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap(),
            event_type: EventType::Focus,
            energy_cost: 5,
            cognitive_load: Some(5),
            importance: 4,
            flexibility: 2,
            caused_by_id: Some("evt-1".to_string()),
            tags: vec!["work".to_string()],
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"FOCUS\""));
        assert!(json.contains("\"causedById\":\"evt-1\""));
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn cognitive_load_falls_back_to_energy_cost() {
        let mut event = Event {
            id: "evt-3".to_string(),
            title: "Review".to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap(),
            event_type: EventType::Task,
            energy_cost: 4,
            cognitive_load: None,
            importance: 3,
            flexibility: 3,
            caused_by_id: None,
            tags: Vec::new(),
        };

        assert_eq!(event.effective_cognitive_load(), 4);
        event.cognitive_load = Some(2);
        assert_eq!(event.effective_cognitive_load(), 2);
        // Out-of-range ratings are clamped, not rejected
        event.energy_cost = 9;
        assert_eq!(event.clamped_energy_cost(), 5);
    }

    #[test]
    fn format_day_uses_short_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(format_day(date), "Mon, Jun 2");
    }
}
