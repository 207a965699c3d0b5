//! Integration tests for the local optimization flow.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use weekflow_core::{
    day_load, optimize_schedule, DayStatus, Event, EventType, LocalOptimizer, StrategySelection,
};

fn week_start() -> DateTime<Utc> {
    // Sunday 2025-06-01
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn make_event(
    id: &str,
    title: &str,
    day: u32,
    hour: u32,
    energy_cost: i32,
    flexibility: i32,
    event_type: EventType,
) -> Event {
    let start = Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap();
    Event {
        id: id.to_string(),
        title: title.to_string(),
        start,
        end: start + Duration::hours(1),
        event_type,
        energy_cost,
        cognitive_load: None,
        importance: 3,
        flexibility,
        caused_by_id: None,
        tags: Vec::new(),
    }
}

/// Seven cost-5 focus hours on one day push it into burnout; the optimizer
/// must move work off that day when the rest of the week has headroom.
#[test]
fn burnout_day_is_relieved_when_other_days_have_headroom() {
    let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let events: Vec<Event> = (0..7)
        .map(|i| {
            make_event(
                &format!("focus-{}", i),
                &format!("Deep work block {}", i),
                2,
                9 + i,
                5,
                3,
                EventType::Focus,
            )
        })
        .collect();

    assert_eq!(day_load(&events, monday).status, DayStatus::Burnout);

    let optimizer = LocalOptimizer::new();
    let result = optimizer.optimize(&events, Some(week_start()), now());

    assert!(!result.changes.is_empty(), "expected at least one move");
    assert!(result.score_after > result.score_before);
    assert_eq!(result.events.len(), events.len());
    assert_ne!(day_load(&result.events, monday).status, DayStatus::Burnout);

    // Moved events keep their time-of-day
    for event in &result.events {
        let original = events.iter().find(|e| e.id == event.id).unwrap();
        assert_eq!(event.start.time(), original.start.time());
        assert_eq!(event.end - event.start, original.end - original.start);
    }
}

/// One flexible task stuck on a day full of pinned meetings moves to an
/// empty future day, keeping its hour.
#[test]
fn flexible_task_escapes_a_heavy_day() {
    let mut events: Vec<Event> = (0..5)
        .map(|i| {
            make_event(
                &format!("mtg-{}", i),
                &format!("Client meeting {}", i),
                2,
                9 + i,
                5,
                1,
                EventType::Meeting,
            )
        })
        .collect();
    events.push(make_event(
        "report",
        "Write report",
        2,
        15,
        4,
        5,
        EventType::Task,
    ));

    let optimizer = LocalOptimizer::new();
    let result = optimizer.optimize(&events, Some(week_start()), now());

    assert_eq!(result.changes.len(), 1);
    assert!(result.changes[0].contains("Write report"));
    assert!(result.score_after > result.score_before);

    let moved = result.events.iter().find(|e| e.id == "report").unwrap();
    assert_ne!(moved.day(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    assert!(moved.day() >= now().date_naive());
    assert_eq!(moved.start.time(), events[5].start.time());

    // Pinned meetings stayed exactly where they were
    for i in 0..5 {
        let id = format!("mtg-{}", i);
        let after = result.events.iter().find(|e| e.id == id).unwrap();
        let before = events.iter().find(|e| e.id == id).unwrap();
        assert_eq!(after.start, before.start);
    }
}

/// A dependent event is never the one that gets moved, whatever its
/// flexibility rating says.
#[test]
fn dependents_never_appear_in_the_change_log() {
    let mut events: Vec<Event> = (0..6)
        .map(|i| {
            make_event(
                &format!("fixed-{}", i),
                &format!("Workshop part {}", i),
                2,
                9 + i,
                5,
                1,
                EventType::Meeting,
            )
        })
        .collect();

    let mut follow_up = make_event(
        "follow-up",
        "Summarize outcomes",
        2,
        16,
        4,
        5,
        EventType::Task,
    );
    follow_up.caused_by_id = Some("fixed-0".to_string());
    events.push(follow_up);

    let optimizer = LocalOptimizer::new();
    let result = optimizer.optimize(&events, Some(week_start()), now());

    assert!(result.changes.is_empty());
    assert_eq!(result.events, events);
}

/// Re-optimizing an already optimized week is a fixed point: the search
/// stops at the same local optimum it already reached.
#[test]
fn optimization_is_idempotent() {
    let events: Vec<Event> = (0..7)
        .map(|i| {
            make_event(
                &format!("focus-{}", i),
                &format!("Deep work block {}", i),
                2,
                9 + i,
                5,
                3,
                EventType::Focus,
            )
        })
        .collect();

    let optimizer = LocalOptimizer::new();
    let first = optimizer.optimize(&events, Some(week_start()), now());
    let second = optimizer.optimize(&first.events, Some(week_start()), now());

    assert!(second.changes.is_empty());
    assert!(second.score_after <= first.score_after + 1e-9);
}

/// Degenerate inputs are not errors.
#[test]
fn degenerate_inputs_return_unchanged_arrangements() {
    let optimizer = LocalOptimizer::new();

    let empty = optimizer.optimize(&[], Some(week_start()), now());
    assert!(empty.events.is_empty());
    assert!(empty.changes.is_empty());
    assert_eq!(empty.score_before, empty.score_after);
    assert_eq!(empty.score_before, 100.0);

    // A single event with nowhere better to go
    let single = vec![make_event(
        "solo",
        "Quarterly planning",
        3,
        10,
        3,
        5,
        EventType::Task,
    )];
    let result = optimizer.optimize(&single, Some(week_start()), now());
    assert!(result.changes.is_empty());
    assert_eq!(result.events, single);
}

/// The dispatch helper runs the local strategy end to end.
#[tokio::test]
async fn dispatch_runs_local_strategy() {
    let events: Vec<Event> = (0..7)
        .map(|i| {
            make_event(
                &format!("focus-{}", i),
                &format!("Deep work block {}", i),
                2,
                9 + i,
                5,
                3,
                EventType::Focus,
            )
        })
        .collect();

    let result = optimize_schedule(&events, Some(week_start()), StrategySelection::Local, now()).await;
    assert!(!result.changes.is_empty());
    assert!(result.score_after > result.score_before);
}
