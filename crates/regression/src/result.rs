//! Regression outputs.

use enso_field::Grid;
use ndarray::Array2;
use serde::Serialize;

/// Least-squares statistics of one target regressed on the index.
///
/// All fields are `NaN` (and `n` holds the number of valid pairs) when too
/// few valid pairs were available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionPoint {
    /// Change in target per unit index.
    pub slope: f64,
    /// Target value at index zero.
    pub intercept: f64,
    /// Pearson correlation.
    pub rvalue: f64,
    /// p-value of the slope under the configured alternative.
    pub pvalue: f64,
    /// Standard error of the slope.
    pub stderr: f64,
    /// Number of valid `(index, target)` pairs.
    pub n: usize,
}

impl RegressionPoint {
    pub(crate) fn missing(n: usize) -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
            rvalue: f64::NAN,
            pvalue: f64::NAN,
            stderr: f64::NAN,
            n,
        }
    }

    /// Whether the point was fitted.
    pub fn is_valid(&self) -> bool {
        self.slope.is_finite()
    }
}

/// Per-cell regression maps on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionMap {
    /// Grid of the target field.
    pub grid: Grid,
    /// First year used in the fit.
    pub start_year: i32,
    /// Last year used in the fit.
    pub end_year: i32,
    /// Slope per cell.
    pub slope: Array2<f64>,
    /// Intercept per cell.
    pub intercept: Array2<f64>,
    /// Correlation per cell.
    pub rvalue: Array2<f64>,
    /// p-value per cell.
    pub pvalue: Array2<f64>,
    /// Slope standard error per cell.
    pub stderr: Array2<f64>,
    /// Valid pairs per cell.
    pub n: Array2<usize>,
}

impl RegressionMap {
    /// Number of cells with a valid fit.
    pub fn n_valid(&self) -> usize {
        self.slope.iter().filter(|v| v.is_finite()).count()
    }
}

/// Regression of every lag column of a lead-lag matrix on the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagRegression {
    /// Month offset of each lag relative to January of the index year.
    pub lags: Vec<i64>,
    /// Regression statistics per lag.
    pub points: Vec<RegressionPoint>,
}

impl LagRegression {
    /// Slope per lag.
    pub fn slopes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.slope).collect()
    }

    /// Correlation per lag.
    pub fn rvalues(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rvalue).collect()
    }

    /// p-value per lag.
    pub fn pvalues(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.pvalue).collect()
    }
}
