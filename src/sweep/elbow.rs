//! Elbow selection of the k-means cluster count.
//!
//! For every `k` in the candidate range, fit k-means and record the
//! distortion (sum of Euclidean point-to-centroid distances). The resulting
//! curve falls steeply while extra clusters still explain structure and
//! flattens once they only split real clusters apart; the bend between the
//! two regimes is the selected `k`.
//!
//! The bend is located by the second-difference magnitude: with
//! `Δ1[i] = |sse[i] - sse[i-1]|` and `Δ2[i] = |sse[i+1] - sse[i]|`, the
//! curvature at interior index `i` is `|Δ2[i] - Δ1[i]|`, and the selected
//! cluster count is `k_min + i* + 1` for the interior index `i*` of maximum
//! curvature (first occurrence on ties). The range therefore needs at least
//! three candidates.

use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use super::check_budget;
use crate::cluster::{Kmeans, KmeansFit};
use crate::error::{Error, Result};

/// Sweep of k-means over a range of cluster counts.
#[derive(Clone, Debug)]
pub struct ElbowSweep {
    k_min: usize,
    k_max: usize,
    max_iter: usize,
    seed: Option<u64>,
    budget: Option<Duration>,
}

impl ElbowSweep {
    /// Sweep `k` over the inclusive range `[k_min, k_max]`.
    pub fn new(k_min: usize, k_max: usize) -> Self {
        Self {
            k_min,
            k_max,
            max_iter: Kmeans::DEFAULT_MAX_ITER,
            seed: None,
            budget: None,
        }
    }

    /// Set the RNG seed passed to every candidate fit.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the Lloyd iteration cap per candidate fit.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Bound the whole sweep by a wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Run the sweep and select `k` at the elbow of the distortion curve.
    pub fn run(&self, points: &[Vec<f64>]) -> Result<ElbowSelection> {
        if self.k_max < self.k_min || self.k_max - self.k_min < 2 {
            return Err(Error::InsufficientRange {
                name: "k",
                message: "curvature needs at least three candidate values",
            });
        }
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }

        let started = Instant::now();
        let candidates: Vec<usize> = (self.k_min..=self.k_max).collect();

        // Each candidate fit owns its own state; results come back in
        // candidate order so the reduction below is deterministic.
        let fits: Vec<(f64, KmeansFit)> = candidates
            .par_iter()
            .map(|&k| {
                check_budget(started, self.budget)?;
                let mut model = Kmeans::new(k).with_max_iter(self.max_iter);
                if let Some(seed) = self.seed {
                    model = model.with_seed(seed);
                }
                let fit = model.fit(points)?;
                let sse = fit.distortion(points);
                debug!("elbow sweep: k={k} sse={sse:.4}");
                Ok((sse, fit))
            })
            .collect::<Result<_>>()?;

        let sse: Vec<f64> = fits.iter().map(|(sse, _)| *sse).collect();
        let k = select_k(self.k_min, &sse)?;
        info!("elbow sweep: selected k={k} over [{}, {}]", self.k_min, self.k_max);

        // In range by construction: k_min + 2 <= k <= k_max.
        let (_, fit) = fits
            .into_iter()
            .nth(k - self.k_min)
            .ok_or_else(|| Error::Other(format!("selected k={k} outside the swept range")))?;
        Ok(ElbowSelection { k, sse, fit })
    }
}

/// Locate the elbow of a distortion curve starting at `k_min`.
pub(crate) fn select_k(k_min: usize, sse: &[f64]) -> Result<usize> {
    if sse.len() < 3 {
        return Err(Error::InsufficientRange {
            name: "k",
            message: "curvature needs at least three candidate values",
        });
    }

    let mut best_index = 1;
    let mut best_curvature = f64::NEG_INFINITY;
    for i in 1..sse.len() - 1 {
        let delta1 = (sse[i] - sse[i - 1]).abs();
        let delta2 = (sse[i + 1] - sse[i]).abs();
        let curvature = (delta2 - delta1).abs();
        if curvature > best_curvature {
            best_curvature = curvature;
            best_index = i;
        }
    }

    Ok(k_min + best_index + 1)
}

/// Result of an elbow sweep.
#[derive(Clone, Debug)]
pub struct ElbowSelection {
    /// Selected cluster count.
    pub k: usize,
    /// Distortion per candidate, in candidate order (`k_min..=k_max`).
    pub sse: Vec<f64>,
    /// The k-means fit at the selected `k`, cached from the sweep.
    pub fit: KmeansFit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_k_convex_then_flat() {
        // Sharpest bend for k = 2..7 sits at k = 4.
        let sse = [100.0, 40.0, 15.0, 12.0, 11.0, 10.5];
        assert_eq!(select_k(2, &sse).unwrap(), 4);
    }

    #[test]
    fn test_select_k_tie_takes_first() {
        // Curvature is identical everywhere on a straight line; the first
        // interior index wins.
        let sse = [40.0, 30.0, 20.0, 10.0];
        assert_eq!(select_k(2, &sse).unwrap(), 4);
    }

    #[test]
    fn test_select_k_needs_three_points() {
        assert!(matches!(
            select_k(2, &[10.0, 5.0]),
            Err(Error::InsufficientRange { .. })
        ));
    }

    #[test]
    fn test_sweep_rejects_degenerate_range() {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert!(matches!(
            ElbowSweep::new(2, 3).run(&points),
            Err(Error::InsufficientRange { .. })
        ));
    }

    #[test]
    fn test_sweep_on_separated_blobs() {
        let mut points = Vec::new();
        for &(cx, cy) in &[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)] {
            for i in 0..8 {
                points.push(vec![cx + (i % 3) as f64 * 0.1, cy + (i / 3) as f64 * 0.1]);
            }
        }

        let selection = ElbowSweep::new(2, 6).with_seed(42).run(&points).unwrap();

        assert_eq!(selection.sse.len(), 5);
        assert!((2..=6).contains(&selection.k));
        assert_eq!(selection.fit.centroids.len(), selection.k);
        assert_eq!(selection.fit.labels.len(), points.len());
    }

    #[test]
    fn test_sweep_deterministic() {
        let points: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![(i % 5) as f64 * 2.0, (i / 5) as f64])
            .collect();

        let a = ElbowSweep::new(2, 6).with_seed(7).run(&points).unwrap();
        let b = ElbowSweep::new(2, 6).with_seed(7).run(&points).unwrap();

        assert_eq!(a.k, b.k);
        assert_eq!(a.sse, b.sse);
        assert_eq!(a.fit.labels, b.fit.labels);
    }

    #[test]
    fn test_sweep_budget_exceeded() {
        let points: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, 0.0]).collect();
        let result = ElbowSweep::new(2, 8)
            .with_budget(Duration::ZERO)
            .run(&points);
        assert!(matches!(result, Err(Error::SweepTimeout { .. })));
    }
}
