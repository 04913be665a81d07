//! Per-year windows of monthly values for lead-lag analysis.

use enso_calendar::YearMonth;
use enso_field::TimeSeries;
use ndarray::{Array2, Axis};

use crate::error::SeasonalError;
use crate::yearly::YearlySeries;

/// Monthly values cut into one fixed-length window per year.
///
/// Row `r` belongs to year `start_year + r` and holds `window` consecutive
/// months starting in January of `year + start_offset_years`. Months that
/// fall outside the source series are missing.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadLagMatrix {
    start_year: i32,
    start_offset_years: i32,
    data: Array2<f64>,
}

impl LeadLagMatrix {
    /// First row year.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Years before (negative) or after the row year at which windows start.
    pub fn start_offset_years(&self) -> i32 {
        self.start_offset_years
    }

    /// Number of rows (years).
    pub fn n_years(&self) -> usize {
        self.data.nrows()
    }

    /// Window length in months.
    pub fn window(&self) -> usize {
        self.data.ncols()
    }

    /// Underlying `(year, lag)` array.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Month offset of every column relative to January of the row year.
    pub fn lag_months(&self) -> Vec<i64> {
        let first = i64::from(self.start_offset_years) * 12;
        (0..self.window()).map(|m| first + m as i64).collect()
    }

    /// Column `lag` as a yearly series.
    ///
    /// # Panics
    ///
    /// Panics if `lag >= self.window()`.
    pub fn column(&self, lag: usize) -> YearlySeries {
        let values = self.data.index_axis(Axis(1), lag).to_vec();
        YearlySeries::new(self.start_year, values)
            .expect("lead-lag matrix always has at least one row")
    }
}

/// Builds a lead-lag matrix for the years `start_year..=end_year`.
///
/// With `window = 48` and `start_offset_years = -2`, the row for year `y`
/// spans January `y - 2` through December `y + 1`, which places a
/// January-labelled NDJ season in the middle of the window.
///
/// # Errors
///
/// Returns [`SeasonalError::InvalidWindow`] unless `window` is a positive
/// multiple of 12, and [`SeasonalError::NoOverlap`] if `end_year < start_year`.
pub fn lead_lag(
    series: &TimeSeries,
    start_year: i32,
    end_year: i32,
    window: usize,
    start_offset_years: i32,
) -> Result<LeadLagMatrix, SeasonalError> {
    if window == 0 || window % 12 != 0 {
        return Err(SeasonalError::InvalidWindow { window });
    }
    if end_year < start_year {
        return Err(SeasonalError::NoOverlap {
            start_year,
            end_year,
        });
    }
    let n_years = (end_year - start_year + 1) as usize;
    let axis = series.axis();
    let values = series.values();
    let data = Array2::from_shape_fn((n_years, window), |(r, m)| {
        let year = start_year + r as i32 + start_offset_years;
        axis.position(YearMonth::january(year).offset(m as i64))
            .map_or(f64::NAN, |t| values[t])
    });
    Ok(LeadLagMatrix {
        start_year,
        start_offset_years,
        data,
    })
}
