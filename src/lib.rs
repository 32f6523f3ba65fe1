//! Self-tuning clustering of track feature vectors.
//!
//! `setlist` reduces a table of audio features to a low-dimensional
//! representation and partitions it without hand-picked hyperparameters:
//!
//! 1. z-score standardization of the feature columns ([`standardize`])
//! 2. principal-component projection onto the smallest component prefix
//!    covering a variance threshold ([`project`])
//! 3. clustering of the projected points, either k-means with `k` chosen by
//!    the elbow heuristic, or DBSCAN with ε chosen by delta minimization
//!    ([`cluster`], [`sweep`])
//!
//! [`pipeline`] wires the stages together; [`index`] and [`report`] resolve
//! clusters back to records for downstream reporting.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod project;
pub mod record;
pub mod report;
pub mod standardize;
pub mod sweep;

pub use cluster::{Clustering, Dbscan, DensityFit, Kmeans, KmeansFit};
pub use error::{Error, Result};
pub use index::RecordIndex;
pub use pipeline::{
    run_clustering, run_density_clustering, CentroidRun, Cluster, DensityRun, PipelineConfig,
};
pub use project::{Component, Projection, Projector};
pub use record::{Dataset, Record, FEATURE_COLUMNS};
pub use standardize::{ColumnStats, Standardizer};
pub use sweep::{ElbowSelection, ElbowSweep, EpsilonSample, EpsilonSelection, EpsilonSweep};
