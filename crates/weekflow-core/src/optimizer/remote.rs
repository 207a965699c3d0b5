//! Remote optimization strategy.
//!
//! Delegates move selection to a remote generative model behind an
//! OpenAI-compatible chat-completions endpoint. The remote service is
//! untrusted for correctness: every proposed move is re-validated locally
//! before it is applied, and the final score is recomputed here rather
//! than taken from anything the model claims.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::causal::CausalIndex;
use crate::error::{Result, StrategyError};
use crate::event::{format_day, Event, EventType};
use crate::scoring::ScoringEngine;

use super::local::{is_movable, MIN_FLEXIBILITY};
use super::{OptimizationResult, OptimizationStrategy};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SYSTEM_PROMPT: &str = "You are an expert calendar optimization assistant. \
Your goal is to reschedule flexible events to maximize productivity and minimize burnout.\n\
\n\
Rules:\n\
1. DO NOT move events marked \"fixed\": true.\n\
2. DO NOT move events to the past (before today).\n\
3. Balance daily energy load (sum of energyCost).\n\
4. Group shallow tasks together and preserve deep work blocks.\n\
\n\
Respond with a JSON object: {\"movedEvents\": [{\"id\": \"...\", \"newStart\": \"...\", \
\"newEnd\": \"...\", \"reason\": \"...\"}], \"explanation\": \"...\"}. \
Timestamps are RFC 3339.";

/// Credentials and endpoint settings for the remote strategy.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: StdDuration,
}

impl RemoteConfig {
    /// Create a config with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: StdDuration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Simplified event representation sent to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent<'a> {
    id: &'a str,
    title: &'a str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(rename = "type")]
    event_type: EventType,
    energy_cost: i32,
    flexibility: i32,
    fixed: bool,
}

/// The plan the model answers with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePlan {
    #[serde(default)]
    moved_events: Vec<RemoteMove>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteMove {
    id: String,
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
    #[serde(default)]
    reason: Option<String>,
}

/// Optimization strategy backed by a remote generative model.
pub struct RemoteOptimizer {
    config: RemoteConfig,
    engine: ScoringEngine,
    client: Client,
}

impl RemoteOptimizer {
    /// Create a new adapter for the given credentials.
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            engine: ScoringEngine::new(),
            client,
        }
    }

    /// Ask the model for a plan.
    async fn request_plan(
        &self,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> Result<RemotePlan, StrategyError> {
        if self.config.api_key.trim().is_empty() {
            return Err(StrategyError::MissingApiKey);
        }

        let correlation_id = Uuid::new_v4();
        let causal = CausalIndex::build(events);
        let wire: Vec<WireEvent> = events
            .iter()
            .map(|event| WireEvent {
                id: &event.id,
                title: &event.title,
                start: event.start,
                end: event.end,
                event_type: event.event_type,
                energy_cost: event.energy_cost,
                flexibility: event.flexibility,
                fixed: !is_movable(event, &causal, MIN_FLEXIBILITY),
            })
            .collect();

        let event_count = wire.len();
        let user_content = serde_json::to_string(&json!({
            "today": now.date_naive(),
            "events": wire,
        }))
        .unwrap_or_else(|_| "{}".to_string());

        let body = json!({
            "model": self.config.model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_content }
            ]
        });

        let endpoint = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(
            target: "weekflow::remote",
            %correlation_id,
            model = %self.config.model,
            events = event_count,
            "requesting remote plan"
        );

        let response = tokio::time::timeout(
            self.config.timeout,
            self.client
                .post(&endpoint)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send(),
        )
        .await??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                target: "weekflow::remote",
                %correlation_id,
                status = status.as_u16(),
                "remote endpoint rejected request"
            );
            return Err(StrategyError::BadStatus {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                StrategyError::InvalidResponse("missing message content".to_string())
            })?;

        parse_plan(content)
    }

    /// Apply the validated subset of the proposed moves.
    ///
    /// Moves touching fixed or dependency-linked events, moves into the
    /// past, and inverted time ranges are dropped with a warning.
    fn apply_plan(
        &self,
        events: &[Event],
        plan: RemotePlan,
        now: DateTime<Utc>,
    ) -> (Vec<Event>, Vec<String>) {
        let causal = CausalIndex::build(events);
        let today = now.date_naive();
        let mut accepted: HashMap<String, (DateTime<Utc>, DateTime<Utc>)> = HashMap::new();
        let mut changes = Vec::new();

        for proposed in plan.moved_events {
            let Some(event) = events.iter().find(|e| e.id == proposed.id) else {
                warn!(target: "weekflow::remote", event = %proposed.id, "rejected move of unknown event");
                continue;
            };
            if !is_movable(event, &causal, MIN_FLEXIBILITY) {
                warn!(
                    target: "weekflow::remote",
                    event = %proposed.id,
                    "rejected move of fixed or dependency-linked event"
                );
                continue;
            }
            if proposed.new_end <= proposed.new_start {
                warn!(target: "weekflow::remote", event = %proposed.id, "rejected move with inverted time range");
                continue;
            }
            if proposed.new_start.date_naive() < today {
                warn!(target: "weekflow::remote", event = %proposed.id, "rejected move into the past");
                continue;
            }

            changes.push(format!(
                "Moved \"{}\" from {} to {}",
                event.title,
                format_day(event.day()),
                format_day(proposed.new_start.date_naive())
            ));
            accepted.insert(proposed.id, (proposed.new_start, proposed.new_end));
            if let Some(reason) = proposed.reason {
                debug!(target: "weekflow::remote", %reason, "remote move rationale");
            }
        }

        let arranged = events
            .iter()
            .map(|event| match accepted.get(&event.id) {
                Some(&(start, end)) => {
                    let mut moved = event.clone();
                    moved.start = start;
                    moved.end = end;
                    moved
                }
                None => event.clone(),
            })
            .collect();

        (arranged, changes)
    }
}

#[async_trait]
impl OptimizationStrategy for RemoteOptimizer {
    async fn optimize(
        &self,
        events: &[Event],
        _week_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<OptimizationResult> {
        let score_before = self.engine.score_schedule(events);

        let plan = self.request_plan(events, now).await?;
        if !plan.explanation.is_empty() {
            debug!(target: "weekflow::remote", explanation = %plan.explanation, "remote plan received");
        }

        let (arranged, changes) = self.apply_plan(events, plan, now);
        let breakdown = self.engine.breakdown(&arranged);

        Ok(OptimizationResult {
            events: arranged,
            changes,
            score_before,
            score_after: breakdown.overall,
            breakdown,
        })
    }
}

/// Parse the model's message content into a plan, tolerating markdown
/// code fences around the JSON body.
fn parse_plan(content: &str) -> Result<RemotePlan, StrategyError> {
    let trimmed = content.trim();
    let cleaned = if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```JSON")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    };

    serde_json::from_str(cleaned)
        .map_err(|err| StrategyError::InvalidResponse(format!("plan is not valid JSON: {err}")))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
