//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! Groups points by neighborhood density (Ester et al., 1996). Unlike
//! k-means it discovers the number of clusters itself and leaves points in
//! sparse regions unassigned as noise, which is exactly what the epsilon
//! sweep measures: how the largest cluster and the noise set trade off as
//! the radius grows.
//!
//! ## Core concepts
//!
//! - **Epsilon (ε)**: maximum distance between two points to be neighbors.
//! - **MinPts**: minimum neighbors within ε (the point itself included) for
//!   a point to be *core*.
//! - A cluster grows by iterative expansion from core points; points within
//!   ε of a core point but not core themselves become border points.
//!
//! Distances are Euclidean, matching the rest of the pipeline. The
//! neighborhood query is the naive O(n²) scan; the projected datasets this
//! crate targets are small enough that a spatial index would not pay off.

use super::traits::Clustering;
use super::util::{check_dims, euclidean};
use crate::error::{Error, Result};

/// Per-point assignment state during expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Unvisited,
    /// Visited but not density-reachable from any core point so far; may
    /// still be promoted to a border point later.
    Noise,
    Assigned(usize),
}

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points (self included) for core point classification.
    min_pts: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Fit the model, returning the full partition into clusters and noise.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<DensityFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        check_dims(data)?;

        let mut states = vec![State::Unvisited; n];
        let mut visited = vec![false; n];
        let mut next_cluster = 0usize;

        for idx in 0..n {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let neighbors = self.region_query(data, idx);
            if neighbors.len() + 1 < self.min_pts {
                // Not dense enough to seed a cluster; may become a border
                // point of a later one.
                states[idx] = State::Noise;
                continue;
            }

            self.expand(data, idx, neighbors, next_cluster, &mut states, &mut visited);
            next_cluster += 1;
        }

        let labels: Vec<Option<usize>> = states
            .iter()
            .map(|state| match state {
                State::Assigned(cluster) => Some(*cluster),
                _ => None,
            })
            .collect();

        let mut clusters = vec![Vec::new(); next_cluster];
        let mut noise = Vec::new();
        for (idx, label) in labels.iter().enumerate() {
            match label {
                Some(cluster) => clusters[*cluster].push(idx),
                None => noise.push(idx),
            }
        }

        Ok(DensityFit {
            labels,
            clusters,
            noise,
        })
    }

    /// Grow `cluster` outward from the core point `seed`.
    fn expand(
        &self,
        data: &[Vec<f64>],
        seed: usize,
        neighbors: Vec<usize>,
        cluster: usize,
        states: &mut [State],
        visited: &mut [bool],
    ) {
        states[seed] = State::Assigned(cluster);

        let mut frontier = neighbors;
        while let Some(idx) = frontier.pop() {
            // Assign before the visited check so a point previously marked
            // noise can still be promoted to a border point.
            if matches!(states[idx], State::Unvisited | State::Noise) {
                states[idx] = State::Assigned(cluster);
            }

            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let reachable = self.region_query(data, idx);
            if reachable.len() + 1 >= self.min_pts {
                for other in reachable {
                    if !visited[other] {
                        frontier.push(other);
                    }
                }
            }
        }
    }

    /// All points within epsilon of `center`, excluding `center` itself.
    fn region_query(&self, data: &[Vec<f64>], center: usize) -> Vec<usize> {
        let point = &data[center];
        data.iter()
            .enumerate()
            .filter(|(idx, other)| *idx != center && euclidean(point, other) <= self.epsilon)
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    /// Labels as a plain partition: noise points land in one synthetic
    /// trailing cluster so callers get a label for every point.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let fit = self.fit(data)?;
        let noise_cluster = fit.clusters.len();
        Ok(fit
            .labels
            .into_iter()
            .map(|label| label.unwrap_or(noise_cluster))
            .collect())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// A fitted DBSCAN partition: clusters plus an explicit noise set.
///
/// The clusters and the noise set are disjoint and jointly cover every input
/// point.
#[derive(Clone, Debug)]
pub struct DensityFit {
    /// Cluster label per point; `None` marks noise.
    pub labels: Vec<Option<usize>>,
    /// Member point indices per cluster.
    pub clusters: Vec<Vec<usize>>,
    /// Indices of noise points.
    pub noise: Vec<usize>,
}

impl DensityFit {
    /// Size of the largest cluster, or 0 when there are none.
    pub fn largest_cluster_size(&self) -> usize {
        self.clusters.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbscan_two_clusters() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![0.05, 0.05],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
            vec![5.05, 5.05],
        ];

        let fit = Dbscan::new(0.3, 3).fit(&data).unwrap();

        assert_eq!(fit.clusters.len(), 2);
        assert!(fit.noise.is_empty());

        let first = fit.labels[0];
        for label in &fit.labels[1..5] {
            assert_eq!(*label, first);
        }
        let second = fit.labels[5];
        for label in &fit.labels[6..] {
            assert_eq!(*label, second);
        }
        assert_ne!(first, second);
    }

    #[test]
    fn test_dbscan_identifies_noise() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![100.0, 100.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
        ];

        let fit = Dbscan::new(0.3, 3).fit(&data).unwrap();

        assert_eq!(fit.noise, vec![4]);
        assert_eq!(fit.labels[4], None);
        for (idx, label) in fit.labels.iter().enumerate() {
            if idx != 4 {
                assert!(label.is_some());
            }
        }
    }

    #[test]
    fn test_dbscan_all_noise() {
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ];

        let fit = Dbscan::new(0.5, 3).fit(&data).unwrap();
        assert!(fit.clusters.is_empty());
        assert_eq!(fit.noise.len(), 4);
        assert_eq!(fit.largest_cluster_size(), 0);
    }

    #[test]
    fn test_dbscan_partition_is_exhaustive_and_disjoint() {
        let data: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![(i % 4) as f64 * 3.0, (i / 4) as f64 * 0.1])
            .collect();

        let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();

        let mut seen = vec![0usize; data.len()];
        for cluster in &fit.clusters {
            for &idx in cluster {
                seen[idx] += 1;
            }
        }
        for &idx in &fit.noise {
            seen[idx] += 1;
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_dbscan_chain_connects() {
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 0.3, 0.0]).collect();

        let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
        assert_eq!(fit.clusters.len(), 1);
        assert_eq!(fit.clusters[0].len(), 10);
    }

    #[test]
    fn test_dbscan_fit_predict_noise_cluster() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.0, 0.1],
            vec![50.0, 50.0],
        ];

        let labels = Dbscan::new(0.3, 3).fit_predict(&data).unwrap();
        // Outlier goes to the synthetic trailing cluster.
        assert_eq!(labels[3], 1);
        assert_eq!(labels[0], labels[1]);
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        assert!(Dbscan::new(0.0, 3).fit(&data).is_err());
        assert!(Dbscan::new(-1.0, 3).fit(&data).is_err());
        assert!(Dbscan::new(0.5, 0).fit(&data).is_err());

        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            Dbscan::new(0.5, 3).fit(&empty),
            Err(Error::EmptyInput)
        ));
    }
}
