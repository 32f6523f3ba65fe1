//! Positional mapping between projected points and source records.
//!
//! Projection preserves record order, so the point at position `i` always
//! belongs to the record at position `i`. [`RecordIndex`] leans on that
//! invariant for O(1) lookups and is the preferred resolution path.
//!
//! [`RecordIndex::match_point`] resolves by exact coordinate equality
//! instead. It exists for callers that only held on to the coordinates, but
//! it is an O(n) scan and demands bit-exact floats; prefer positions.

use crate::error::{Error, Result};
use crate::record::Record;

/// Read-only index resolving projected points back to their records.
#[derive(Debug)]
pub struct RecordIndex<'a> {
    records: &'a [Record],
    points: &'a [Vec<f64>],
    dim: usize,
}

impl<'a> RecordIndex<'a> {
    /// Bind records to their projected points.
    ///
    /// Both slices must have equal length (positional correspondence) and
    /// all points must share one dimensionality.
    pub fn new(records: &'a [Record], points: &'a [Vec<f64>]) -> Result<Self> {
        if records.len() != points.len() {
            return Err(Error::DimensionMismatch {
                expected: records.len(),
                found: points.len(),
            });
        }

        let dim = points.first().map_or(0, Vec::len);
        for point in points {
            if point.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
        }

        Ok(Self {
            records,
            points,
            dim,
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of the indexed points.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The record behind the point at `position`, if in range.
    pub fn record(&self, position: usize) -> Option<&'a Record> {
        self.records.get(position)
    }

    /// The point at `position`, if in range.
    pub fn point(&self, position: usize) -> Option<&'a [f64]> {
        self.points.get(position).map(Vec::as_slice)
    }

    /// Resolve a point by exact coordinate equality (legacy fallback).
    ///
    /// Returns the first matching position and its record, or `None` when no
    /// stored point matches bit-for-bit.
    pub fn match_point(&self, probe: &[f64]) -> Result<Option<(usize, &'a Record)>> {
        if probe.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: probe.len(),
            });
        }

        Ok(self
            .points
            .iter()
            .position(|point| point.iter().zip(probe).all(|(a, b)| a == b))
            .map(|at| (at, &self.records[at])))
    }
}
