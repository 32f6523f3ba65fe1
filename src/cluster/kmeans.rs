//! K-means: k-means++ seeding followed by Lloyd iterations.
//!
//! The classic centroid algorithm: assign each point to its nearest
//! centroid, move each centroid to the mean of its points, repeat until the
//! assignment stops changing or the iteration cap is hit.
//!
//! ## Determinism
//!
//! Seeding is the only random step. With [`Kmeans::with_seed`] the whole fit
//! is reproducible, which the hyperparameter sweeps rely on: the same seed,
//! data, and `k` always produce the same centroids and labels.
//!
//! ## Iteration budget
//!
//! Lloyd iterations are capped (default 100 passes, the budget the distortion
//! sweeps run with). Hitting the cap is not an error; the fit at that point is
//! returned as-is.

use rand::prelude::*;

use super::traits::Clustering;
use super::util::{check_dims, euclidean, squared_euclidean};
use crate::error::{Error, Result};

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum number of Lloyd passes.
    max_iter: usize,
    /// Optional RNG seed for reproducible seeding.
    seed: Option<u64>,
}

impl Kmeans {
    /// Default cap on Lloyd passes.
    pub const DEFAULT_MAX_ITER: usize = 100;

    /// Create a new k-means clusterer for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: Self::DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set the RNG seed used by k-means++ seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the maximum number of Lloyd passes.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Fit the model, returning labels and centroids.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        let dim = check_dims(data)?;

        let mut centroids = self.seed_centroids(data);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            let mut changed = false;
            for (idx, point) in data.iter().enumerate() {
                let nearest = nearest_centroid(point, &centroids);
                if labels[idx] != nearest {
                    labels[idx] = nearest;
                    changed = true;
                }
            }

            // Move each centroid to the mean of its members; a cluster that
            // lost all members keeps its previous position.
            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.iter().zip(&labels) {
                counts[label] += 1;
                for (s, v) in sums[label].iter_mut().zip(point) {
                    *s += v;
                }
            }
            for (cluster, count) in counts.iter().enumerate() {
                if *count > 0 {
                    for (c, s) in centroids[cluster].iter_mut().zip(&sums[cluster]) {
                        *c = s / *count as f64;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        // Final assignment against the settled centroids.
        for (idx, point) in data.iter().enumerate() {
            labels[idx] = nearest_centroid(point, &centroids);
        }

        Ok(KmeansFit { labels, centroids })
    }

    /// K-means++ seeding: the first centroid is uniform, each further one is
    /// drawn with probability proportional to its squared distance from the
    /// nearest centroid chosen so far.
    fn seed_centroids(&self, data: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(self.k);
        centroids.push(data[rng.random_range(0..data.len())].clone());

        while centroids.len() < self.k {
            let weights: Vec<f64> = data
                .iter()
                .map(|point| {
                    centroids
                        .iter()
                        .map(|c| squared_euclidean(point, c))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let chosen = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut pick = data.len() - 1;
                for (idx, w) in weights.iter().enumerate() {
                    target -= w;
                    if target <= 0.0 {
                        pick = idx;
                        break;
                    }
                }
                pick
            } else {
                // Every point already coincides with a centroid.
                rng.random_range(0..data.len())
            };

            centroids.push(data[chosen].clone());
        }

        centroids
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

/// A fitted k-means model.
#[derive(Clone, Debug)]
pub struct KmeansFit {
    /// Cluster label per input point.
    pub labels: Vec<usize>,
    /// Final centroid positions.
    pub centroids: Vec<Vec<f64>>,
}

impl KmeansFit {
    /// Member point indices per cluster.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.centroids.len()];
        for (idx, &label) in self.labels.iter().enumerate() {
            clusters[label].push(idx);
        }
        clusters
    }

    /// Distortion of the fit over `data`: the sum over all points of the
    /// Euclidean distance to their assigned centroid.
    pub fn distortion(&self, data: &[Vec<f64>]) -> f64 {
        data.iter()
            .zip(&self.labels)
            .map(|(point, &label)| euclidean(point, &self.centroids[label]))
            .sum()
    }
}
