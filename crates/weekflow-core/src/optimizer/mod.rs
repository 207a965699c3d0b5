//! Schedule optimization strategies.
//!
//! One contract, two implementations: a deterministic local hill-climbing
//! search and a remote-model adapter whose proposals are re-validated
//! locally. The strategy is injected at the call site; callers that do not
//! care use [`optimize_schedule`], which falls back to the local search
//! whenever the remote strategy is unavailable.

mod local;
mod remote;

pub use local::{LocalOptimizer, OptimizerConfig};
pub use remote::{RemoteConfig, RemoteOptimizer};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::event::Event;
use crate::scoring::ScoreBreakdown;

/// Result of one optimization pass.
///
/// The arrangement has the same cardinality as the input -- events are
/// relocated, never created or deleted -- and the caller diffs it against
/// the original by id and start/end equality to find what to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub events: Vec<Event>,
    /// Human-readable descriptions of the applied moves, in order
    pub changes: Vec<String>,
    pub score_before: f64,
    pub score_after: f64,
    pub breakdown: ScoreBreakdown,
}

/// A schedule optimization strategy.
///
/// `now` is the caller's clock: moves must never target days before it,
/// and implementations must not read the wall clock themselves.
#[async_trait]
pub trait OptimizationStrategy: Send + Sync {
    /// Produce a rebalanced arrangement for one user-week.
    async fn optimize(
        &self,
        events: &[Event],
        week_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<OptimizationResult>;
}

#[async_trait]
impl OptimizationStrategy for LocalOptimizer {
    async fn optimize(
        &self,
        events: &[Event],
        week_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<OptimizationResult> {
        Ok(LocalOptimizer::optimize(self, events, week_start, now))
    }
}

/// Strategy selection for [`optimize_schedule`].
#[derive(Debug, Clone)]
pub enum StrategySelection {
    /// Deterministic local hill-climbing search
    Local,
    /// Remote generative model with the given credentials
    Remote(RemoteConfig),
}

/// Run one optimization pass with the selected strategy.
///
/// A failing remote strategy (network, timeout, bad payload) is downgraded
/// to a warning and the local optimizer runs instead, so this function
/// never surfaces a transport error for a schedule that can still be
/// optimized locally.
pub async fn optimize_schedule(
    events: &[Event],
    week_start: Option<DateTime<Utc>>,
    strategy: StrategySelection,
    now: DateTime<Utc>,
) -> OptimizationResult {
    match strategy {
        StrategySelection::Local => LocalOptimizer::new().optimize(events, week_start, now),
        StrategySelection::Remote(config) => {
            let remote = RemoteOptimizer::new(config);
            match OptimizationStrategy::optimize(&remote, events, week_start, now).await {
                Ok(result) => result,
                Err(error) => {
                    warn!(
                        target: "weekflow::optimizer",
                        %error,
                        "remote strategy unavailable, falling back to local search"
                    );
                    LocalOptimizer::new().optimize(events, week_start, now)
                }
            }
        }
    }
}
