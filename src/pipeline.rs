//! End-to-end clustering pipeline.
//!
//! The strictly sequential batch flow: standardize the feature columns,
//! project onto the retained principal components, then hand the projected
//! points to one of the two self-tuning clusterers. Any failure during
//! standardization or projection aborts the run before clustering starts;
//! downstream stages assume a fully standardized, fully projected input.
//!
//! Given a seed, running the same dataset and configuration twice yields
//! identical `k`, ε, and cluster memberships.

use std::time::Duration;

use crate::error::Result;
use crate::index::RecordIndex;
use crate::project::{Projection, Projector};
use crate::record::Dataset;
use crate::standardize::Standardizer;
use crate::sweep::{ElbowSweep, EpsilonSample, EpsilonSweep};

/// Pipeline configuration, passed by value through every stage.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Cumulative variance-explained threshold for component retention.
    pub variance_threshold: f64,
    /// Inclusive `[k_min, k_max]` candidate range for the elbow sweep.
    pub k_range: (usize, usize),
    /// `(start, stop, step)` candidate grid for the ε sweep.
    pub epsilon_range: (f64, f64, f64),
    /// DBSCAN `min_pts`.
    pub min_points: usize,
    /// Lloyd iteration cap per k-means fit.
    pub max_iterations: usize,
    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,
    /// Optional wall-clock budget per hyperparameter sweep.
    pub sweep_budget: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 0.70,
            k_range: (2, 10),
            epsilon_range: (0.1, 1.0, 0.1),
            min_points: 10,
            max_iterations: 100,
            seed: None,
            sweep_budget: None,
        }
    }
}

/// One centroid-model cluster over projected points.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Centroid in projected space.
    pub centroid: Vec<f64>,
    /// Member record positions (projection order).
    pub members: Vec<usize>,
}

/// Output of the centroid (k-means) path.
#[derive(Debug)]
pub struct CentroidRun {
    /// Selected cluster count.
    pub k: usize,
    /// Distortion curve over the swept candidates.
    pub sse: Vec<f64>,
    /// The selected clustering.
    pub clusters: Vec<Cluster>,
    /// Cluster label per record, in record order.
    pub assignments: Vec<usize>,
    /// The principal-component projection the clustering ran on.
    pub projection: Projection,
    /// Standardized copy of the input (kept for attribute lookups).
    pub standardized: Dataset,
}

impl CentroidRun {
    /// Index resolving projected points back to the source records.
    pub fn index<'a>(&'a self, dataset: &'a Dataset) -> Result<RecordIndex<'a>> {
        RecordIndex::new(dataset.records(), &self.projection.points)
    }
}

/// Output of the density (DBSCAN) path.
#[derive(Debug)]
pub struct DensityRun {
    /// Selected neighborhood radius.
    pub epsilon: f64,
    /// Per-candidate sweep measurements.
    pub samples: Vec<EpsilonSample>,
    /// Member record positions per cluster.
    pub clusters: Vec<Vec<usize>>,
    /// Record positions left as noise.
    pub noise: Vec<usize>,
    /// The principal-component projection the clustering ran on.
    pub projection: Projection,
    /// Standardized copy of the input (kept for attribute lookups).
    pub standardized: Dataset,
}

impl DensityRun {
    /// Index resolving projected points back to the source records.
    pub fn index<'a>(&'a self, dataset: &'a Dataset) -> Result<RecordIndex<'a>> {
        RecordIndex::new(dataset.records(), &self.projection.points)
    }
}

/// Standardize and project; shared head of both paths.
fn prepare(dataset: &Dataset, config: &PipelineConfig) -> Result<(Dataset, Projection)> {
    let (_, standardized) = Standardizer::fit_transform(dataset)?;
    let projection = Projector::new(config.variance_threshold).project(&standardized)?;
    Ok((standardized, projection))
}

/// Run the centroid path: standardize, project, elbow-select `k`, cluster.
pub fn run_clustering(dataset: &Dataset, config: &PipelineConfig) -> Result<CentroidRun> {
    let (standardized, projection) = prepare(dataset, config)?;

    let mut sweep = ElbowSweep::new(config.k_range.0, config.k_range.1)
        .with_max_iter(config.max_iterations);
    if let Some(seed) = config.seed {
        sweep = sweep.with_seed(seed);
    }
    if let Some(budget) = config.sweep_budget {
        sweep = sweep.with_budget(budget);
    }
    let selection = sweep.run(&projection.points)?;

    let clusters = selection
        .fit
        .clusters()
        .into_iter()
        .zip(&selection.fit.centroids)
        .map(|(members, centroid)| Cluster {
            centroid: centroid.clone(),
            members,
        })
        .collect();

    Ok(CentroidRun {
        k: selection.k,
        sse: selection.sse,
        clusters,
        assignments: selection.fit.labels,
        projection,
        standardized,
    })
}

/// Run the density path: standardize, project, delta-select ε, cluster.
pub fn run_density_clustering(dataset: &Dataset, config: &PipelineConfig) -> Result<DensityRun> {
    let (standardized, projection) = prepare(dataset, config)?;

    let (start, stop, step) = config.epsilon_range;
    let mut sweep = EpsilonSweep::new(start, stop, step, config.min_points);
    if let Some(budget) = config.sweep_budget {
        sweep = sweep.with_budget(budget);
    }
    let selection = sweep.run(&projection.points)?;

    Ok(DensityRun {
        epsilon: selection.epsilon,
        samples: selection.samples,
        clusters: selection.fit.clusters,
        noise: selection.fit.noise,
        projection,
        standardized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    /// Two tight blobs plus one outlier, wide enough for z-scores to keep
    /// their shape.
    fn blob_dataset() -> Dataset {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for &(cx, cy) in &[(0.0, 0.0), (20.0, 20.0)] {
            for i in 0..10 {
                rows.push(vec![cx + (i % 5) as f64, cy + (i / 5) as f64]);
            }
        }
        rows.push(vec![100.0, -50.0]);

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, row)| Record {
                id,
                title: format!("track {id}"),
                artist: String::new(),
                genre: String::new(),
                features: row.into_iter().map(Some).collect(),
            })
            .collect();
        Dataset::new(vec!["x".into(), "y".into()], records).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            k_range: (2, 5),
            epsilon_range: (0.2, 1.6, 0.2),
            min_points: 3,
            seed: Some(42),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_centroid_run_partitions_every_record() {
        let dataset = blob_dataset();
        let run = run_clustering(&dataset, &config()).unwrap();

        assert_eq!(run.assignments.len(), dataset.len());
        let total: usize = run.clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, dataset.len());
        assert_eq!(run.clusters.len(), run.k);
    }

    #[test]
    fn test_density_run_partitions_every_record() {
        let dataset = blob_dataset();
        let run = run_density_clustering(&dataset, &config()).unwrap();

        let mut seen = vec![false; dataset.len()];
        for cluster in &run.clusters {
            for &idx in cluster {
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        for &idx in &run.noise {
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_pipeline_idempotent() {
        let dataset = blob_dataset();
        let cfg = config();

        let a = run_clustering(&dataset, &cfg).unwrap();
        let b = run_clustering(&dataset, &cfg).unwrap();
        assert_eq!(a.k, b.k);
        assert_eq!(a.assignments, b.assignments);

        let c = run_density_clustering(&dataset, &cfg).unwrap();
        let d = run_density_clustering(&dataset, &cfg).unwrap();
        assert_eq!(c.epsilon, d.epsilon);
        assert_eq!(c.clusters, d.clusters);
        assert_eq!(c.noise, d.noise);
    }

    #[test]
    fn test_index_round_trip() {
        let dataset = blob_dataset();
        let run = run_clustering(&dataset, &config()).unwrap();
        let index = run.index(&dataset).unwrap();

        for position in 0..dataset.len() {
            let record = index.record(position).unwrap();
            assert_eq!(record.id, position);
        }
    }

    #[test]
    fn test_constant_column_aborts_before_clustering() {
        let records = (0..5)
            .map(|id| Record {
                id,
                title: String::new(),
                artist: String::new(),
                genre: String::new(),
                features: vec![Some(id as f64), Some(1.0)],
            })
            .collect();
        let dataset = Dataset::new(vec!["x".into(), "flat".into()], records).unwrap();

        assert!(matches!(
            run_clustering(&dataset, &config()),
            Err(crate::Error::ConstantColumn(_))
        ));
    }
}
