//! Linear detrending of monthly series and fields.

use enso_field::{Field, TimeSeries};
use ndarray::Axis;
use tracing::debug;

use crate::error::AnomalyError;

/// Straight line `intercept + slope * t`, `t` counted in months from the
/// first time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    /// Value at `t = 0`.
    pub intercept: f64,
    /// Change per month.
    pub slope: f64,
}

impl LinearTrend {
    /// Trend value at month index `t`.
    pub fn at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64
    }
}

/// Least-squares trend through the finite values, `None` with fewer than 2.
pub fn fit_linear_trend(values: &[f64]) -> Option<LinearTrend> {
    let t: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    enso_stats::linear_fit(&t, values).map(|fit| LinearTrend {
        intercept: fit.intercept,
        slope: fit.slope,
    })
}

/// Residuals from the linear trend; missing values stay missing.
pub fn detrend_values(values: &[f64]) -> Option<Vec<f64>> {
    let trend = fit_linear_trend(values)?;
    Some(
        values
            .iter()
            .enumerate()
            .map(|(t, &v)| v - trend.at(t))
            .collect(),
    )
}

/// Removes the least-squares linear trend from a series.
///
/// # Errors
///
/// Returns [`AnomalyError::InsufficientData`] with fewer than 2 valid values.
pub fn detrend_linear(series: &TimeSeries) -> Result<TimeSeries, AnomalyError> {
    let detrended = detrend_values(series.values()).ok_or_else(|| {
        let valid = series.values().iter().filter(|v| v.is_finite()).count();
        AnomalyError::InsufficientData {
            reason: format!("detrending needs at least 2 valid values, got {valid}"),
        }
    })?;
    Ok(series.with_values(detrended)?)
}

/// Removes each cell's own linear trend.
///
/// Cells with fewer than 2 valid values become entirely missing.
///
/// # Errors
///
/// Returns [`AnomalyError::Field`] if the residuals cannot be rewrapped.
pub fn detrend_field(field: &Field) -> Result<Field, AnomalyError> {
    let mut data = field.data().clone();
    let mut dropped = 0usize;
    for mut lane in data.lanes_mut(Axis(0)) {
        let values: Vec<f64> = lane.iter().copied().collect();
        match detrend_values(&values) {
            Some(residuals) => {
                for (dst, r) in lane.iter_mut().zip(residuals) {
                    *dst = r;
                }
            }
            None => {
                dropped += 1;
                lane.fill(f64::NAN);
            }
        }
    }
    debug!(dropped, "detrended field");
    Ok(field.with_data(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use enso_calendar::{MonthlyAxis, YearMonth};
    use enso_field::Grid;
    use ndarray::Array3;

    fn axis(len: usize) -> MonthlyAxis {
        MonthlyAxis::new(YearMonth::new(1990, 1).unwrap(), len).unwrap()
    }

    #[test]
    fn linear_input_detrends_to_zero() {
        let values: Vec<f64> = (0..120).map(|t| 3.0 - 0.25 * t as f64).collect();
        let ts = TimeSeries::new(axis(120), values).unwrap();
        let out = detrend_linear(&ts).unwrap();
        for v in out.values() {
            assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn missing_values_preserved_and_ignored() {
        let mut values: Vec<f64> = (0..24).map(|t| 2.0 * t as f64).collect();
        values[5] = f64::NAN;
        let out = detrend_values(&values).unwrap();
        assert!(out[5].is_nan());
        assert_eq!(out.iter().filter(|v| v.is_finite()).count(), 23);
        assert!(out.iter().filter(|v| v.is_finite()).all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn fitted_trend_matches() {
        let values = [1.0, f64::NAN, 5.0, 7.0];
        let trend = fit_linear_trend(&values).unwrap();
        assert_relative_eq!(trend.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(trend.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(trend.at(3), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn too_few_values_is_insufficient() {
        let ts = TimeSeries::new(axis(3), vec![f64::NAN, 1.0, f64::NAN]).unwrap();
        assert!(matches!(
            detrend_linear(&ts),
            Err(AnomalyError::InsufficientData { .. })
        ));
    }

    #[test]
    fn field_cells_detrended_independently() {
        let grid = Grid::new(vec![0.0], vec![0.0, 1.0, 2.0]).unwrap();
        let data = Array3::from_shape_fn((12, 1, 3), |(t, _, j)| match j {
            0 => t as f64,
            1 => 5.0 - 3.0 * t as f64,
            _ => if t == 0 { 1.0 } else { f64::NAN },
        });
        let field = Field::new(axis(12), grid, data).unwrap();
        let out = detrend_field(&field).unwrap();
        assert!(out.point(0, 0).iter().all(|v| v.abs() < 1e-9));
        assert!(out.point(0, 1).iter().all(|v| v.abs() < 1e-9));
        assert!(out.point(0, 2).iter().all(|v| v.is_nan()));
    }
}
