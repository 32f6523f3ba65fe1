//! Per-column z-score standardization.
//!
//! Each feature column is rescaled to mean 0 and population standard
//! deviation 1, computed over the values that are actually present; records
//! missing a value for a column are excluded from that column's statistics
//! and keep the value missing after the transform.
//!
//! A constant column has no defined z-score. Rather than emitting NaN the
//! fit fails with [`Error::ConstantColumn`]; callers drop the column from
//! their configuration and retry.

use log::debug;

use crate::error::{Error, Result};
use crate::record::Dataset;

/// Fitted mean and population standard deviation of one feature column.
#[derive(Clone, Debug)]
pub struct ColumnStats {
    /// Column name.
    pub column: String,
    /// Mean over present values.
    pub mean: f64,
    /// Population standard deviation over present values.
    pub std_dev: f64,
    /// Number of records with a present value.
    pub present: usize,
}

/// Per-column z-score scaler fitted on a dataset.
#[derive(Clone, Debug)]
pub struct Standardizer {
    stats: Vec<ColumnStats>,
}

impl Standardizer {
    /// Fit column statistics over every feature column of `dataset`.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut stats = Vec::with_capacity(dataset.columns().len());
        for (at, column) in dataset.columns().iter().enumerate() {
            let values: Vec<f64> = dataset
                .records()
                .iter()
                .filter_map(|r| r.features[at])
                .collect();

            if values.is_empty() {
                return Err(Error::ConstantColumn(column.clone()));
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std_dev = variance.sqrt();

            if std_dev == 0.0 {
                return Err(Error::ConstantColumn(column.clone()));
            }

            debug!(
                "standardize: column {:?} mean={:.4} std={:.4} over {} values",
                column,
                mean,
                std_dev,
                values.len()
            );

            stats.push(ColumnStats {
                column: column.clone(),
                mean,
                std_dev,
                present: values.len(),
            });
        }

        Ok(Self { stats })
    }

    /// Fitted statistics, in column order.
    pub fn stats(&self) -> &[ColumnStats] {
        &self.stats
    }

    /// Produce a standardized copy of `dataset`.
    ///
    /// Present values become `(value - mean) / std_dev`; missing values stay
    /// missing. The source dataset is not touched.
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if dataset.columns().len() != self.stats.len() {
            return Err(Error::DimensionMismatch {
                expected: self.stats.len(),
                found: dataset.columns().len(),
            });
        }

        let records = dataset
            .records()
            .iter()
            .map(|record| {
                let mut scaled = record.clone();
                for (value, stats) in scaled.features.iter_mut().zip(&self.stats) {
                    *value = value.map(|v| (v - stats.mean) / stats.std_dev);
                }
                scaled
            })
            .collect();

        Dataset::new(dataset.columns().to_vec(), records)
    }

    /// Fit on `dataset` and transform it in one call.
    pub fn fit_transform(dataset: &Dataset) -> Result<(Self, Dataset)> {
        let scaler = Self::fit(dataset)?;
        let scaled = scaler.transform(dataset)?;
        Ok((scaler, scaled))
    }
}
