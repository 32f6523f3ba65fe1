//! Delta-minimization selection of the DBSCAN radius.
//!
//! For every candidate ε (fixed step over a range, fixed `min_pts`), run
//! DBSCAN and record two sizes: the largest cluster and the noise set. A
//! radius that is too small leaves most points as noise; one that is too
//! large swallows everything into a single cluster. The sweep picks the ε
//! minimizing `|largest_cluster - noise|`, the point where the two failure
//! modes balance. Ties break toward the first occurrence, i.e. the lowest ε.
//!
//! The clustering returned for the winner is the one cached from the sweep
//! itself, so it is numerically identical to what was scored.

use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use super::check_budget;
use crate::cluster::{Dbscan, DensityFit};
use crate::error::{Error, Result};

/// Sweep of DBSCAN over a fixed-step range of ε values.
#[derive(Clone, Debug)]
pub struct EpsilonSweep {
    start: f64,
    stop: f64,
    step: f64,
    min_pts: usize,
    budget: Option<Duration>,
}

impl EpsilonSweep {
    /// Sweep ε from `start` to `stop` (inclusive) in increments of `step`.
    pub fn new(start: f64, stop: f64, step: f64, min_pts: usize) -> Self {
        Self {
            start,
            stop,
            step,
            min_pts,
            budget: None,
        }
    }

    /// Bound the whole sweep by a wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Candidate ε values, in ascending order.
    fn candidates(&self) -> Result<Vec<f64>> {
        if self.start <= 0.0 || self.step <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon_range",
                message: "start and step must be positive",
            });
        }
        if self.stop < self.start {
            return Err(Error::InsufficientRange {
                name: "epsilon",
                message: "range is empty",
            });
        }

        // Half-step slack absorbs accumulated float error at the top end.
        let mut values = Vec::new();
        let mut i = 0usize;
        loop {
            let epsilon = self.start + i as f64 * self.step;
            if epsilon > self.stop + self.step * 0.5 {
                break;
            }
            values.push(epsilon);
            i += 1;
        }
        Ok(values)
    }

    /// Run the sweep and select the delta-minimizing ε.
    pub fn run(&self, points: &[Vec<f64>]) -> Result<EpsilonSelection> {
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        let candidates = self.candidates()?;

        let started = Instant::now();
        let fits: Vec<(EpsilonSample, DensityFit)> = candidates
            .par_iter()
            .map(|&epsilon| {
                check_budget(started, self.budget)?;
                let fit = Dbscan::new(epsilon, self.min_pts).fit(points)?;
                let sample = EpsilonSample {
                    epsilon,
                    largest_cluster: fit.largest_cluster_size(),
                    noise: fit.noise.len(),
                };
                debug!(
                    "epsilon sweep: eps={epsilon:.4} largest={} noise={} delta={}",
                    sample.largest_cluster,
                    sample.noise,
                    sample.delta()
                );
                Ok((sample, fit))
            })
            .collect::<Result<_>>()?;

        let samples: Vec<EpsilonSample> = fits.iter().map(|(sample, _)| sample.clone()).collect();
        let selected = select_epsilon(&samples)?;
        let epsilon = samples[selected].epsilon;
        info!("epsilon sweep: selected eps={epsilon:.4} from {} candidates", samples.len());

        let (_, fit) = fits
            .into_iter()
            .nth(selected)
            .ok_or_else(|| Error::Other(format!("selected eps={epsilon} outside the swept range")))?;
        Ok(EpsilonSelection {
            epsilon,
            samples,
            fit,
        })
    }
}

/// Index of the delta-minimizing sample, first occurrence on ties.
pub(crate) fn select_epsilon(samples: &[EpsilonSample]) -> Result<usize> {
    if samples.is_empty() {
        return Err(Error::InsufficientRange {
            name: "epsilon",
            message: "range is empty",
        });
    }

    let mut best = 0;
    for (idx, sample) in samples.iter().enumerate().skip(1) {
        if sample.delta() < samples[best].delta() {
            best = idx;
        }
    }
    Ok(best)
}

/// Cluster/noise balance measured at one candidate ε.
#[derive(Clone, Debug, PartialEq)]
pub struct EpsilonSample {
    /// The candidate radius.
    pub epsilon: f64,
    /// Size of the largest cluster (0 when no clusters formed).
    pub largest_cluster: usize,
    /// Size of the noise set.
    pub noise: usize,
}

impl EpsilonSample {
    /// `|largest_cluster - noise|`, the quantity the sweep minimizes.
    pub fn delta(&self) -> usize {
        self.largest_cluster.abs_diff(self.noise)
    }
}

/// Result of an ε sweep.
#[derive(Clone, Debug)]
pub struct EpsilonSelection {
    /// Selected radius.
    pub epsilon: f64,
    /// Per-candidate measurements, in ascending ε order.
    pub samples: Vec<EpsilonSample>,
    /// The DBSCAN partition at the selected ε, cached from the sweep.
    pub fit: DensityFit,
}
