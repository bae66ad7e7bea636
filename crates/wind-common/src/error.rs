//! Error types for wind-sector statistics.

use thiserror::Error;

/// Result type alias using WindStatsError.
pub type WindStatsResult<T> = Result<T, WindStatsError>;

/// Errors raised while validating inputs or computing sector statistics.
///
/// A cell where every time step is filtered out is not an error; it
/// produces a NaN in the output grid instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WindStatsError {
    #[error("Field '{0}' not found in dataset")]
    FieldNotFound(String),

    #[error("Invalid statistic: {0}. Expected 'mean' or a percentile between 0 and 100")]
    InvalidStatistic(String),

    #[error("Shape mismatch for '{field}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        field: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Invalid sector: {0}")]
    InvalidSector(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

impl WindStatsError {
    /// Create a ShapeMismatch error from two array shapes.
    pub fn shape_mismatch(field: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            field: field.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from bad caller input rather than bad data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WindStatsError::InvalidStatistic(_)
                | WindStatsError::InvalidSector(_)
                | WindStatsError::InvalidParameter { .. }
        )
    }
}
