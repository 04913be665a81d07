//! Gridded monthly fields and monthly time series.

use enso_calendar::MonthlyAxis;
use ndarray::{Array3, ArrayView1, Axis, s};

use crate::error::FieldError;
use crate::grid::Grid;

/// A monthly `(time, lat, lon)` field. Missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    axis: MonthlyAxis,
    grid: Grid,
    data: Array3<f64>,
}

impl Field {
    /// Wraps an array with its time axis and grid.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] unless `data` has shape
    /// `(axis.len(), grid.n_lat(), grid.n_lon())`.
    pub fn new(axis: MonthlyAxis, grid: Grid, data: Array3<f64>) -> Result<Self, FieldError> {
        let expected = [axis.len(), grid.n_lat(), grid.n_lon()];
        let (t, y, x) = data.dim();
        if [t, y, x] != expected {
            return Err(FieldError::ShapeMismatch {
                expected,
                got: [t, y, x],
            });
        }
        Ok(Self { axis, grid, data })
    }

    /// Time axis.
    pub fn axis(&self) -> &MonthlyAxis {
        &self.axis
    }

    /// Spatial grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Underlying `(time, lat, lon)` array.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Number of time steps.
    pub fn n_time(&self) -> usize {
        self.axis.len()
    }

    /// Time series at one grid cell.
    pub fn point(&self, ilat: usize, ilon: usize) -> ArrayView1<'_, f64> {
        self.data.slice(s![.., ilat, ilon])
    }

    /// Same axis and grid with new values.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if `data` has a different shape.
    pub fn with_data(&self, data: Array3<f64>) -> Result<Self, FieldError> {
        Self::new(self.axis, self.grid.clone(), data)
    }

    /// Restricts the field to the months whose year is in
    /// `start_year..=end_year`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NoOverlap`] if no month falls in the window.
    pub fn select_years(&self, start_year: i32, end_year: i32) -> Result<Self, FieldError> {
        let range = self
            .axis
            .year_range(start_year, end_year)
            .ok_or(FieldError::NoOverlap {
                start_year,
                end_year,
            })?;
        let axis = self.axis.slice(range.clone())?;
        let data = self.data.slice(s![range, .., ..]).to_owned();
        Self::new(axis, self.grid.clone(), data)
    }

    /// Count of finite values per time step.
    pub fn valid_counts(&self) -> Vec<usize> {
        self.data
            .axis_iter(Axis(0))
            .map(|slab| slab.iter().filter(|v| v.is_finite()).count())
            .collect()
    }
}

/// A monthly series, e.g. a spatial aggregate or a station record.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    axis: MonthlyAxis,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Wraps values with their time axis.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] if the lengths differ.
    pub fn new(axis: MonthlyAxis, values: Vec<f64>) -> Result<Self, FieldError> {
        if values.len() != axis.len() {
            return Err(FieldError::LengthMismatch {
                expected: axis.len(),
                got: values.len(),
            });
        }
        Ok(Self { axis, values })
    }

    /// Time axis.
    pub fn axis(&self) -> &MonthlyAxis {
        &self.axis
    }

    /// Values, one per month.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a series covers at least one month.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same axis with new values.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] if the length differs.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, FieldError> {
        Self::new(self.axis, values)
    }

    /// Restricts the series to the months whose year is in
    /// `start_year..=end_year`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NoOverlap`] if no month falls in the window.
    pub fn select_years(&self, start_year: i32, end_year: i32) -> Result<Self, FieldError> {
        let range = self
            .axis
            .year_range(start_year, end_year)
            .ok_or(FieldError::NoOverlap {
                start_year,
                end_year,
            })?;
        let axis = self.axis.slice(range.clone())?;
        Self::new(axis, self.values[range].to_vec())
    }
}
