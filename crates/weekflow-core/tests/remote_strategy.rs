//! Integration tests for the remote optimization strategy.
//!
//! The chat-completions endpoint is mocked; what matters here is that the
//! adapter validates every proposed move locally and that transport
//! failures degrade into a local fallback instead of an error.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockito::Server;
use serde_json::json;
use weekflow_core::{
    optimize_schedule, CoreError, Event, EventType, OptimizationStrategy, RemoteConfig,
    RemoteOptimizer, ScoringEngine, StrategyError, StrategySelection,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn make_event(id: &str, title: &str, day: u32, hour: u32, flexibility: i32) -> Event {
    let start = Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap();
    Event {
        id: id.to_string(),
        title: title.to_string(),
        start,
        end: start + Duration::hours(1),
        event_type: EventType::Task,
        energy_cost: 4,
        cognitive_load: None,
        importance: 3,
        flexibility,
        caused_by_id: None,
        tags: Vec::new(),
    }
}

fn chat_completion_body(content: &str) -> String {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn valid_moves_are_applied_and_invalid_ones_dropped() {
    let mut server = Server::new_async().await;

    // The model proposes three moves: one legal, one touching a pinned
    // event, one into the past. Only the first may survive.
    let plan = json!({
        "movedEvents": [
            {
                "id": "task",
                "newStart": "2025-06-05T09:00:00Z",
                "newEnd": "2025-06-05T10:00:00Z",
                "reason": "lighter day"
            },
            {
                "id": "pinned",
                "newStart": "2025-06-05T11:00:00Z",
                "newEnd": "2025-06-05T12:00:00Z"
            },
            {
                "id": "task-2",
                "newStart": "2025-05-20T09:00:00Z",
                "newEnd": "2025-05-20T10:00:00Z"
            }
        ],
        "explanation": "rebalanced the week"
    });

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(&plan.to_string()))
        .create_async()
        .await;

    let events = vec![
        make_event("task", "Draft proposal", 2, 9, 5),
        make_event("pinned", "Dentist", 2, 11, 1),
        make_event("task-2", "Expense report", 3, 9, 5),
    ];

    let config = RemoteConfig::new("test-key").with_base_url(server.url());
    let optimizer = RemoteOptimizer::new(config);
    let result = optimizer.optimize(&events, None, now()).await.unwrap();

    mock.assert_async().await;

    assert_eq!(result.events.len(), 3);
    assert_eq!(result.changes.len(), 1);
    assert!(result.changes[0].contains("Draft proposal"));

    let moved = result.events.iter().find(|e| e.id == "task").unwrap();
    assert_eq!(
        moved.start,
        Utc.with_ymd_and_hms(2025, 6, 5, 9, 0, 0).unwrap()
    );

    let pinned = result.events.iter().find(|e| e.id == "pinned").unwrap();
    assert_eq!(pinned.start, events[1].start);
    let past = result.events.iter().find(|e| e.id == "task-2").unwrap();
    assert_eq!(past.start, events[2].start);

    // The score is computed locally from the validated arrangement, not
    // taken from the model
    let engine = ScoringEngine::new();
    assert!((result.score_after - engine.score_schedule(&result.events)).abs() < 1e-9);
    assert!((result.score_before - engine.score_schedule(&events)).abs() < 1e-9);
}

#[tokio::test]
async fn fenced_json_responses_are_accepted() {
    let mut server = Server::new_async().await;

    let content = "```json\n{\"movedEvents\": [], \"explanation\": \"already balanced\"}\n```";
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(content))
        .create_async()
        .await;

    let events = vec![make_event("task", "Draft proposal", 2, 9, 5)];
    let config = RemoteConfig::new("test-key").with_base_url(server.url());
    let result = RemoteOptimizer::new(config)
        .optimize(&events, None, now())
        .await
        .unwrap();

    assert!(result.changes.is_empty());
    assert_eq!(result.events, events);
}

#[tokio::test]
async fn server_errors_surface_as_strategy_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let events = vec![make_event("task", "Draft proposal", 2, 9, 5)];
    let config = RemoteConfig::new("test-key").with_base_url(server.url());
    let error = RemoteOptimizer::new(config)
        .optimize(&events, None, now())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CoreError::Strategy(StrategyError::BadStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn non_json_content_is_an_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body("sure, here is a plan for you"))
        .create_async()
        .await;

    let events = vec![make_event("task", "Draft proposal", 2, 9, 5)];
    let config = RemoteConfig::new("test-key").with_base_url(server.url());
    let error = RemoteOptimizer::new(config)
        .optimize(&events, None, now())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CoreError::Strategy(StrategyError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn missing_api_key_is_rejected_before_any_request() {
    let events = vec![make_event("task", "Draft proposal", 2, 9, 5)];
    let config = RemoteConfig::new("").with_base_url("http://127.0.0.1:1");
    let error = RemoteOptimizer::new(config)
        .optimize(&events, None, now())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CoreError::Strategy(StrategyError::MissingApiKey)
    ));
}

#[tokio::test]
async fn dispatch_falls_back_to_local_when_remote_is_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("try later")
        .create_async()
        .await;

    // A burnout day the local search knows how to relieve
    let events: Vec<Event> = (0..7)
        .map(|i| {
            let mut event = make_event(
                &format!("focus-{}", i),
                &format!("Deep work block {}", i),
                2,
                9 + i,
                3,
            );
            event.energy_cost = 5;
            event.event_type = EventType::Focus;
            event
        })
        .collect();

    let config = RemoteConfig::new("test-key").with_base_url(server.url());
    let week_start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let result = optimize_schedule(
        &events,
        Some(week_start),
        StrategySelection::Remote(config),
        now(),
    )
    .await;

    // The local fallback still produced an optimization
    assert!(!result.changes.is_empty());
    assert!(result.score_after > result.score_before);
}
