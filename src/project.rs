//! Principal-component projection.
//!
//! The projector wraps an eigen-decomposition of the covariance matrix of a
//! standardized dataset. Components are ordered by descending eigenvalue and
//! the smallest prefix whose cumulative variance-explained fraction reaches
//! the configured threshold is retained; every record is then projected onto
//! that prefix, preserving record order.
//!
//! The decomposition itself is `nalgebra`'s [`SymmetricEigen`]; this module
//! only orchestrates it. Given identical input and threshold the output is
//! deterministic.
//!
//! Missing standardized values enter the projection as 0.0, which is the
//! column mean after z-scoring.

use std::io::Write;

use log::{debug, info};
use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::{Error, Result};
use crate::record::Dataset;

/// One principal component: a direction in feature space plus its share of
/// the total variance.
#[derive(Clone, Debug)]
pub struct Component {
    /// Unit eigenvector in standardized feature space.
    pub direction: Vec<f64>,
    /// Associated eigenvalue (clamped at zero).
    pub eigenvalue: f64,
    /// Fraction of total variance this component explains.
    pub variance_explained: f64,
}

/// Configuration for a principal-component projection.
#[derive(Clone, Debug)]
pub struct Projector {
    variance_threshold: f64,
}

impl Projector {
    /// Create a projector that retains the smallest component prefix whose
    /// cumulative variance explained reaches `variance_threshold`.
    ///
    /// The threshold must lie in `(0, 1]`.
    pub fn new(variance_threshold: f64) -> Self {
        Self { variance_threshold }
    }

    /// Decompose `dataset` and project every record onto the retained
    /// components.
    pub fn project(&self, dataset: &Dataset) -> Result<Projection> {
        let n = dataset.len();
        let d = dataset.columns().len();

        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if d == 0 {
            return Err(Error::InvalidParameter {
                name: "columns",
                message: "dataset has no feature columns",
            });
        }
        if !(self.variance_threshold > 0.0 && self.variance_threshold <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "variance_threshold",
                message: "must lie in (0, 1]",
            });
        }

        // Rows are standardized records; a missing value sits at the column
        // mean, i.e. zero.
        let matrix = DMatrix::from_fn(n, d, |r, c| {
            dataset.records()[r].features[c].unwrap_or(0.0)
        });

        // Population covariance. The data is centered, so no mean subtraction.
        let covariance = (matrix.transpose() * &matrix) / n as f64;
        let eigen = SymmetricEigen::new(covariance);

        // Descending eigenvalue order; numerically negative eigenvalues are
        // noise around zero and clamp to zero.
        let mut order: Vec<usize> = (0..d).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let eigenvalues: Vec<f64> = order
            .iter()
            .map(|&i| eigen.eigenvalues[i].max(0.0))
            .collect();
        let total: f64 = eigenvalues.iter().sum();
        if total <= 0.0 {
            return Err(Error::Other(
                "covariance matrix carries no variance".to_string(),
            ));
        }

        let mut components = Vec::with_capacity(d);
        let mut cumulative = Vec::with_capacity(d);
        let mut running = 0.0;
        for (rank, &at) in order.iter().enumerate() {
            let fraction = eigenvalues[rank] / total;
            running += fraction;
            cumulative.push(running);
            components.push(Component {
                direction: eigen.eigenvectors.column(at).iter().copied().collect(),
                eigenvalue: eigenvalues[rank],
                variance_explained: fraction,
            });
        }

        // Smallest prefix reaching the threshold; fall back to all components
        // when accumulated rounding keeps the curve just short of it.
        let retained = cumulative
            .iter()
            .position(|&c| c >= self.variance_threshold)
            .map(|p| p + 1)
            .unwrap_or(d);

        debug!("project: cumulative variance curve {cumulative:?}");
        info!(
            "project: retained {retained} of {d} components (cumulative {:.4}, threshold {:.2})",
            cumulative[retained - 1],
            self.variance_threshold
        );

        let points = (0..n)
            .map(|r| {
                components[..retained]
                    .iter()
                    .map(|component| {
                        component
                            .direction
                            .iter()
                            .enumerate()
                            .map(|(c, w)| matrix[(r, c)] * w)
                            .sum()
                    })
                    .collect()
            })
            .collect();

        Ok(Projection {
            components,
            cumulative,
            retained,
            points,
        })
    }
}

/// Output of a projection: the full component spectrum, the retained prefix
/// length, and one projected point per input record (same order).
#[derive(Clone, Debug)]
pub struct Projection {
    /// All components, descending by variance explained.
    pub components: Vec<Component>,
    /// Cumulative variance explained after each component.
    pub cumulative: Vec<f64>,
    /// Number of retained components (`>= 1`).
    pub retained: usize,
    /// Projected points, one per record, each of length `retained`.
    pub points: Vec<Vec<f64>>,
}

impl Projection {
    /// Write the projected points as CSV with `PC1..PCm` headers.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let header: Vec<String> = (1..=self.retained).map(|i| format!("PC{i}")).collect();
        csv.write_record(&header)?;
        for point in &self.points {
            csv.write_record(point.iter().map(|v| v.to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }
}
