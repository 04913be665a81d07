//! Configuration for EOF analysis.

use crate::error::EofError;

/// Configuration for [`compute_eofs`](crate::compute_eofs).
///
/// # Example
///
/// ```
/// use enso_eof::EofConfig;
///
/// let config = EofConfig::new().with_n_modes(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EofConfig {
    n_modes: usize,
    use_coslat: bool,
}

impl EofConfig {
    /// Defaults: 5 modes, `sqrt(cos(lat))` weighting.
    pub fn new() -> Self {
        Self {
            n_modes: 5,
            use_coslat: true,
        }
    }

    /// Sets the number of leading modes to keep.
    pub fn with_n_modes(mut self, n_modes: usize) -> Self {
        self.n_modes = n_modes;
        self
    }

    /// Enables or disables latitude weighting.
    pub fn with_coslat(mut self, use_coslat: bool) -> Self {
        self.use_coslat = use_coslat;
        self
    }

    /// Returns the number of modes.
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    /// Returns whether latitude weighting is applied.
    pub fn use_coslat(&self) -> bool {
        self.use_coslat
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), EofError> {
        if self.n_modes == 0 {
            return Err(EofError::InvalidModeCount {
                n_modes: self.n_modes,
            });
        }
        Ok(())
    }
}

impl Default for EofConfig {
    fn default() -> Self {
        Self::new()
    }
}
