//! Error types for the enso-eof crate.

/// Errors from EOF analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EofError {
    /// Returned when zero modes are requested.
    #[error("invalid mode count: {n_modes} (must be at least 1)")]
    InvalidModeCount {
        /// The requested number of modes.
        n_modes: usize,
    },

    /// Returned when the field cannot support a decomposition.
    #[error("insufficient data for EOF analysis: {reason}")]
    InsufficientData {
        /// What was missing.
        reason: String,
    },
}
