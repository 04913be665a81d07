//! EOF analysis outputs.

use enso_calendar::MonthlyAxis;
use enso_field::Grid;
use ndarray::Array2;

/// One EOF mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EofMode {
    /// Mode number, 1 for the leading mode.
    pub number: usize,
    /// Unit-norm eigenvector in weighted space, on the grid. Cells excluded
    /// from the analysis are missing.
    pub pattern: Array2<f64>,
    /// Anomaly per one standard deviation of the principal component, in the
    /// units of the input field.
    pub amplitude_pattern: Array2<f64>,
    /// Principal component time series (projection onto `pattern`).
    pub pc: Vec<f64>,
    /// Fraction of total weighted variance carried by the mode.
    pub explained_variance: f64,
    /// Eigenvalue of the weighted covariance matrix.
    pub eigenvalue: f64,
}

impl EofMode {
    /// Principal component scaled to unit population variance.
    pub fn standardized_pc(&self) -> Vec<f64> {
        let n = self.pc.len() as f64;
        let sd = (self.pc.iter().map(|v| v * v).sum::<f64>() / n).sqrt();
        if sd > 0.0 {
            self.pc.iter().map(|v| v / sd).collect()
        } else {
            vec![f64::NAN; self.pc.len()]
        }
    }
}

/// Leading EOF modes of a field, sorted by descending variance.
#[derive(Debug, Clone, PartialEq)]
pub struct EofResult {
    /// Time axis of the principal components.
    pub axis: MonthlyAxis,
    /// Grid of the patterns.
    pub grid: Grid,
    /// Number of cells used in the decomposition.
    pub n_valid_points: usize,
    /// Modes in descending variance order.
    pub modes: Vec<EofMode>,
}

impl EofResult {
    /// Explained-variance fraction per mode.
    pub fn explained_variance(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.explained_variance).collect()
    }
}
