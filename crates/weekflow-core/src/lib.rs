//! # Weekflow Core Library
//!
//! Core business logic for Weekflow's week balancing: an energy/load model
//! for calendar events, a conflict detector, a multi-criteria scoring
//! engine, and a greedy local-search optimizer that relocates flexible
//! events between days. A remote-model strategy implements the same
//! optimization contract for callers that supply credentials.
//!
//! ## Architecture
//!
//! - **Energy model**: pure functions from events to per-day load figures
//!   and a light/moderate/heavy/burnout classification
//! - **Conflict detector**: overlap, overload and recovery-fatigue findings
//! - **Scoring engine**: weighted 0-100 schedule quality objective, the
//!   optimizer's objective function
//! - **Optimizers**: deterministic bounded hill climbing, plus a
//!   chat-completions adapter whose proposals are re-validated locally
//! - **Insights**: the read-only weekly report callers render
//!
//! The crate is a pure compute stage: no storage, no clock reads ("today"
//! is always an explicit parameter), no UI. Callers own persistence and
//! diff the optimizer's output against their stored events by id.
//!
//! ## Key Components
//!
//! - [`compute_week_report`]: read-only weekly analysis
//! - [`LocalOptimizer`]: bounded greedy local search
//! - [`RemoteOptimizer`]: remote-model strategy behind the same
//!   [`OptimizationStrategy`] contract
//! - [`ScoringEngine`]: the shared objective function

pub mod causal;
pub mod conflict;
pub mod energy;
pub mod error;
pub mod event;
pub mod insights;
pub mod optimizer;
pub mod scoring;

pub use causal::CausalIndex;
pub use conflict::{detect_conflicts, Conflict, ConflictDetector, ConflictKind, Severity};
pub use energy::{day_load, event_load, hourly_load, DayLoad, DayStatus};
pub use error::{CoreError, Result, StrategyError, ValidationError};
pub use event::{format_day, Event, EventType};
pub use insights::{
    compute_week_report, generate_week_insights, reschedule_candidates, suggest_rescheduling,
    InsightKind, RescheduleSuggestion, WeekInsight, WeekReport,
};
pub use optimizer::{
    optimize_schedule, LocalOptimizer, OptimizationResult, OptimizationStrategy, OptimizerConfig,
    RemoteConfig, RemoteOptimizer, StrategySelection,
};
pub use scoring::{
    score_context_switching, score_day_balance, score_recovery_time, score_time_preference,
    ScoreBreakdown, ScoreWeights, ScoringEngine,
};
