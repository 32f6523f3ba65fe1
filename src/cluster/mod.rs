//! Clustering primitives for projected track points.
//!
//! Two hard-clustering algorithms, both over Euclidean distance:
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, move centroids to the mean of
//! their points, repeat. Needs `k` up front; the [`crate::sweep::elbow`]
//! module picks it automatically from the distortion curve.
//!
//! ### DBSCAN
//!
//! Density clustering: grows clusters from points with enough neighbors
//! within a radius ε, labeling sparse points as noise. Needs ε up front; the
//! [`crate::sweep::epsilon`] module picks it from the largest-cluster/noise
//! balance.
//!
//! ## Usage
//!
//! ```rust
//! use setlist::cluster::{Clustering, Dbscan, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
//! assert_eq!(fit.clusters.len(), 2);
//! assert!(fit.noise.is_empty());
//! ```

mod dbscan;
mod kmeans;
mod traits;
mod util;

pub use dbscan::{Dbscan, DensityFit};
pub use kmeans::{Kmeans, KmeansFit};
pub use traits::Clustering;
