//! Error types for BD-rate computation.

use thiserror::Error;

/// Result type alias for bd-rate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing a BD-rate.
///
/// Every variant is terminal for a single computation. The numeric variants
/// carry the measured values so the caller can adjust parameters and retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input sequences or configuration values.
    #[error("Invalid input ({curve}): {reason}")]
    InvalidInput {
        /// Which curve or parameter was rejected (e.g. "anchor", "min_overlap").
        curve: String,
        /// Reason for the rejection.
        reason: String,
    },

    /// Interpolation method name is not one of `akima` or `cubic`.
    #[error("Unknown method: {0} (expected akima or cubic)")]
    UnknownMethod(String),

    /// The quality-metric domains of the two curves do not intersect.
    #[error(
        "Curves do not overlap. BD cannot be calculated (anchor: [{}, {}], test: [{}, {}])",
        .anchor.0, .anchor.1, .test.0, .test.1
    )]
    NoOverlap {
        /// Anchor metric domain `(min, max)`.
        anchor: (f64, f64),
        /// Test metric domain `(min, max)`.
        test: (f64, f64),
    },

    /// The domains intersect, but the shared fraction is below the threshold.
    #[error("Insufficient curve overlap: {overlap}. Minimum overlap: {min_overlap}")]
    InsufficientOverlap {
        /// Measured overlap ratio in `(0, 1]`.
        overlap: f64,
        /// Threshold that was not met.
        min_overlap: f64,
    },

    /// The interpolant cannot be built from the prepared points.
    #[error("Degenerate curve ({curve}): {reason}")]
    DegenerateCurve {
        /// Which curve was rejected.
        curve: String,
        /// Reason for the rejection.
        reason: String,
    },

    /// Error importing CSV data.
    #[error("CSV import error at line {line}: {reason}")]
    CsvImport {
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_input(curve: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            curve: curve.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(curve: &str, reason: impl Into<String>) -> Self {
        Self::DegenerateCurve {
            curve: curve.to_string(),
            reason: reason.into(),
        }
    }
}
