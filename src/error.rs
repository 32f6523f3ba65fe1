use thiserror::Error;

/// Errors returned by the clustering pipeline and its primitives.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A required feature column is absent from the input.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A feature column has zero variance, so z-scores are undefined.
    ///
    /// Constant columns are rejected outright rather than standardized to
    /// NaN; drop the column from the configuration to proceed.
    #[error("constant column: {0} has zero standard deviation")]
    ConstantColumn(String),

    /// A hyperparameter search range is too small to select from.
    #[error("insufficient {name} range: {message}")]
    InsufficientRange {
        /// Hyperparameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A hyperparameter sweep exceeded its wall-clock budget.
    #[error("sweep exceeded its budget of {budget_ms} ms")]
    SweepTimeout {
        /// Configured budget, in milliseconds.
        budget_ms: u128,
    },

    /// I/O failure while reading or writing a dataset.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
