//! Configuration for regression fits.

use crate::error::RegressionError;

/// Alternative hypothesis for the slope p-value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alternative {
    /// Slope differs from zero.
    #[default]
    TwoSided,
    /// Slope is positive.
    Greater,
    /// Slope is negative.
    Less,
}

/// Configuration for [`regress`](crate::regress) and friends.
///
/// # Example
///
/// ```
/// use enso_regression::{Alternative, RegressionConfig};
///
/// let config = RegressionConfig::new().with_alternative(Alternative::Greater);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionConfig {
    alternative: Alternative,
    min_pairs: usize,
}

impl RegressionConfig {
    /// Defaults: two-sided test, at least 3 valid pairs per point.
    pub fn new() -> Self {
        Self {
            alternative: Alternative::TwoSided,
            min_pairs: 3,
        }
    }

    /// Sets the alternative hypothesis.
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Sets the minimum number of valid pairs for a point to be fitted.
    pub fn with_min_pairs(mut self, min_pairs: usize) -> Self {
        self.min_pairs = min_pairs;
        self
    }

    /// Returns the alternative hypothesis.
    pub fn alternative(&self) -> Alternative {
        self.alternative
    }

    /// Returns the minimum number of valid pairs.
    pub fn min_pairs(&self) -> usize {
        self.min_pairs
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `min_pairs < 3` (the t-test needs one degree of
    /// freedom).
    pub fn validate(&self) -> Result<(), RegressionError> {
        if self.min_pairs < 3 {
            return Err(RegressionError::InvalidConfig {
                reason: format!("min_pairs must be at least 3, got {}", self.min_pairs),
            });
        }
        Ok(())
    }
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self::new()
    }
}
