//! Error types for the enso-anomaly crate.

use enso_field::FieldError;

/// Errors from climatology, anomaly, detrending and smoothing operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnomalyError {
    /// Returned when a reference period starts after it ends.
    #[error("invalid reference period {start_year}..={end_year}")]
    InvalidReferencePeriod {
        /// First year of the period.
        start_year: i32,
        /// Last year of the period.
        end_year: i32,
    },

    /// Returned when too few valid samples remain for a statistic.
    #[error("insufficient data: {reason}")]
    InsufficientData {
        /// What was missing.
        reason: String,
    },

    /// Returned when a climatology is applied to data on a different grid.
    #[error("grid mismatch: climatology has {expected} points, input has {got}")]
    GridMismatch {
        /// Points in the climatology.
        expected: usize,
        /// Points in the input.
        got: usize,
    },

    /// Returned when a smoothing window length is zero.
    #[error("invalid window length: {window}")]
    InvalidWindow {
        /// The rejected window length.
        window: usize,
    },

    /// Field error propagated from the data model.
    #[error(transparent)]
    Field(#[from] FieldError),
}
