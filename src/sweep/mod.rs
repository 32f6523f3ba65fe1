//! Hyperparameter sweeps with heuristic selection.
//!
//! Both clustering models need one hyperparameter picked before they run:
//! `k` for k-means and ε for DBSCAN. Each sweep runs the primitive across a
//! candidate range, scores every candidate, and applies a curve heuristic:
//!
//! - [`elbow`] — distortion curve over `k`, selecting the inflection point
//!   of maximum second-difference magnitude ("the elbow").
//! - [`epsilon`] — fixed-step ε candidates, selecting the ε that best
//!   balances the largest cluster against the noise set.
//!
//! Candidate runs are independent, so the sweeps fan out over `rayon`
//! workers; results are collected back in candidate order and reduced
//! sequentially, so parallelism never changes the selected value. An
//! optional wall-clock budget turns an over-long sweep into a
//! [`crate::Error::SweepTimeout`] instead of a silent partial answer.

mod elbow;
mod epsilon;

pub use elbow::{ElbowSelection, ElbowSweep};
pub use epsilon::{EpsilonSample, EpsilonSelection, EpsilonSweep};

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Fail with `SweepTimeout` once `started` is older than the budget.
pub(crate) fn check_budget(started: Instant, budget: Option<Duration>) -> Result<()> {
    if let Some(budget) = budget {
        if started.elapsed() > budget {
            return Err(Error::SweepTimeout {
                budget_ms: budget.as_millis(),
            });
        }
    }
    Ok(())
}
