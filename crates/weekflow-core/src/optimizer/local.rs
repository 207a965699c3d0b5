//! Greedy local-search optimizer.
//!
//! Bounded hill climbing over "move one flexible event to another calendar
//! day" actions, with the event's time-of-day preserved. Each round
//! evaluates every legal candidate move against the scoring engine,
//! commits the single best one if it clears the improvement threshold, and
//! recomputes all day loads from scratch before the next round. The search
//! halts when no candidate improves enough, so a threshold above the
//! floating-point noise floor doubles as the termination guarantee.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::causal::CausalIndex;
use crate::energy::event_load;
use crate::event::{format_day, Event, EventType};
use crate::scoring::ScoringEngine;

use super::OptimizationResult;

/// Minimum flexibility rating for an event to be considered movable.
pub(crate) const MIN_FLEXIBILITY: i32 = 3;

/// Titles containing these keywords mark non-negotiable events that are
/// never rescheduled, regardless of flexibility rating.
const NON_NEGOTIABLE_KEYWORDS: &[&str] = &[
    "breakfast",
    "lunch",
    "dinner",
    "meal",
    "sleep",
    "wake",
    "morning routine",
    "night routine",
    "commute",
    "school",
    "pickup",
    "drop off",
    "dropoff",
    "medication",
    "medicine",
    "pills",
    "gym",
    "workout",
    "exercise",
];

/// Tuning knobs for the local search.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Maximum number of hill-climbing rounds
    pub max_rounds: usize,
    /// Minimum score improvement required to commit a move
    pub min_improvement: f64,
    /// A move may not push the target day's total energy above this cap
    pub target_day_cap: f64,
    /// Minimum flexibility rating for a movable event
    pub min_flexibility: i32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            min_improvement: 0.5,
            target_day_cap: 28.0,
            min_flexibility: MIN_FLEXIBILITY,
        }
    }
}

/// Deterministic hill-climbing optimizer for one user-week.
pub struct LocalOptimizer {
    config: OptimizerConfig,
    engine: ScoringEngine,
}

impl LocalOptimizer {
    /// Create a new optimizer with default config and scoring weights.
    pub fn new() -> Self {
        Self {
            config: OptimizerConfig::default(),
            engine: ScoringEngine::new(),
        }
    }

    /// Create with custom config.
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            engine: ScoringEngine::new(),
        }
    }

    /// Run the bounded search and return the rebalanced arrangement.
    ///
    /// Degenerate inputs (empty list, single-day week, nothing movable)
    /// return the arrangement unchanged with an empty change log; the
    /// caller's input slice is never mutated. `now` is the caller's clock:
    /// no move ever targets a day before it.
    pub fn optimize(
        &self,
        events: &[Event],
        week_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> OptimizationResult {
        let score_before = self.engine.score_schedule(events);
        let mut working: Vec<Event> = events.to_vec();
        let mut changes = Vec::new();

        let week_days = resolve_week_days(events, week_start);
        let today = now.date_naive();

        if week_days.len() >= 2 {
            for round in 0..self.config.max_rounds {
                let current_score = self.engine.score_schedule(&working);
                let candidate = match self.best_move(&working, &week_days, today, current_score) {
                    Some(candidate) => candidate,
                    None => break,
                };
                if candidate.improvement <= self.config.min_improvement {
                    break;
                }

                working = apply_move(&working, &candidate.event_id, candidate.target);
                debug!(
                    target: "weekflow::optimizer",
                    round,
                    event = %candidate.event_id,
                    improvement = candidate.improvement,
                    "committed move"
                );
                changes.push(format!(
                    "Moved \"{}\" from {} to {}",
                    candidate.title,
                    format_day(candidate.source),
                    format_day(candidate.target)
                ));
            }
        }

        let breakdown = self.engine.breakdown(&working);
        OptimizationResult {
            events: working,
            changes,
            score_before,
            score_after: breakdown.overall,
            breakdown,
        }
    }

    /// Evaluate every legal candidate move and return the best one.
    ///
    /// Days are split into a heavier half (sources) and a lighter half
    /// (targets, lightest first), which halves the otherwise quadratic
    /// day-pair space. Targets must lie on or after `today` and must stay
    /// under the energy cap after the move.
    fn best_move(
        &self,
        events: &[Event],
        week_days: &[NaiveDate],
        today: NaiveDate,
        current_score: f64,
    ) -> Option<CandidateMove> {
        let mut day_totals: Vec<(NaiveDate, f64)> = week_days
            .iter()
            .map(|&date| (date, day_total_energy(events, date)))
            .collect();
        day_totals.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mid = day_totals.len() / 2;
        let heavier = &day_totals[..mid];
        let mut lighter: Vec<(NaiveDate, f64)> = day_totals[mid..].to_vec();
        lighter.sort_by(|a, b| a.1.total_cmp(&b.1));

        let causal = CausalIndex::build(events);
        let mut best: Option<CandidateMove> = None;

        for &(source_day, _) in heavier {
            let movable: Vec<&Event> = events
                .iter()
                .filter(|e| e.day() == source_day)
                .filter(|e| is_movable(e, &causal, self.config.min_flexibility))
                .collect();

            for event in movable {
                let load = event_load(event);

                for &(target_day, target_total) in &lighter {
                    if target_day == source_day || target_day < today {
                        continue;
                    }
                    if target_total + load > self.config.target_day_cap {
                        continue;
                    }

                    let trial = apply_move(events, &event.id, target_day);
                    let improvement = self.engine.score_schedule(&trial) - current_score;

                    let better = best
                        .as_ref()
                        .map_or(true, |current| improvement > current.improvement);
                    if better {
                        best = Some(CandidateMove {
                            event_id: event.id.clone(),
                            title: event.title.clone(),
                            source: source_day,
                            target: target_day,
                            improvement,
                        });
                    }
                }
            }
        }

        best
    }
}

impl Default for LocalOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct CandidateMove {
    event_id: String,
    title: String,
    source: NaiveDate,
    target: NaiveDate,
    improvement: f64,
}

/// Whether an event may be relocated at all.
///
/// Movable means flexible enough, free of causal links in either
/// direction, and not a non-negotiable daily activity.
pub(crate) fn is_movable(event: &Event, causal: &CausalIndex, min_flexibility: i32) -> bool {
    if event.flexibility.clamp(1, 5) < min_flexibility {
        return false;
    }
    if causal.is_dependency_linked(&event.id) {
        return false;
    }
    !is_non_negotiable(event)
}

/// Habits and routine activities stay where the user put them.
fn is_non_negotiable(event: &Event) -> bool {
    if event.event_type == EventType::Habit {
        return true;
    }
    let title = event.title.to_lowercase();
    NON_NEGOTIABLE_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword))
}

/// Relocate one event to another calendar day, keeping its time-of-day and
/// recomputing the end from the original duration.
pub(crate) fn apply_move(events: &[Event], event_id: &str, target: NaiveDate) -> Vec<Event> {
    events
        .iter()
        .map(|event| {
            if event.id != event_id {
                return event.clone();
            }

            let duration = event.end - event.start;
            let new_start = target.and_time(event.start.time()).and_utc();
            let mut moved = event.clone();
            moved.start = new_start;
            moved.end = new_start + duration;
            moved
        })
        .collect()
}

/// Total weighted energy for one calendar day.
fn day_total_energy(events: &[Event], date: NaiveDate) -> f64 {
    events
        .iter()
        .filter(|e| e.day() == date)
        .map(event_load)
        .sum()
}

/// The seven days of the optimization window.
///
/// When no explicit week start is given, it is inferred from the earliest
/// event, snapped back to the preceding Sunday. Empty days are included:
/// an empty day is a legal move target.
fn resolve_week_days(events: &[Event], week_start: Option<DateTime<Utc>>) -> Vec<NaiveDate> {
    let start = match week_start {
        Some(week_start) => week_start.date_naive(),
        None => match events.iter().map(|e| e.day()).min() {
            Some(min_day) => {
                min_day - Duration::days(min_day.weekday().num_days_from_sunday() as i64)
            }
            None => return Vec::new(),
        },
    };

    (0..7).map(|i| start + Duration::days(i)).collect()
}
