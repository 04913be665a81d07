//! Error types for the enso-regression crate.

use enso_seasonal::SeasonalError;

/// Errors from regression fits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegressionError {
    /// Returned when the index and target share too few years.
    #[error("insufficient data: need at least {needed} overlapping years, got {got}")]
    InsufficientData {
        /// Minimum number of overlapping years.
        needed: usize,
        /// Overlapping years with a finite index value.
        got: usize,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Seasonal container error.
    #[error(transparent)]
    Seasonal(#[from] SeasonalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data() {
        let err = RegressionError::InsufficientData { needed: 3, got: 2 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 3 overlapping years, got 2"
        );
    }

    #[test]
    fn error_invalid_config() {
        let err = RegressionError::InvalidConfig {
            reason: "min_pairs must be at least 3".to_string(),
        };
        assert!(err.to_string().contains("min_pairs"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<RegressionError>();
    }
}
