//! Containers holding one value (per grid point) per year.

use enso_field::Grid;
use ndarray::{Array2, Array3, ArrayView1, Axis, s};

use crate::error::SeasonalError;

/// One value per year over a contiguous run of years.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySeries {
    start_year: i32,
    values: Vec<f64>,
}

impl YearlySeries {
    /// Creates a series whose first value belongs to `start_year`.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalError::EmptySeries`] if `values` is empty.
    pub fn new(start_year: i32, values: Vec<f64>) -> Result<Self, SeasonalError> {
        if values.is_empty() {
            return Err(SeasonalError::EmptySeries);
        }
        Ok(Self { start_year, values })
    }

    /// First year.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year.
    pub fn end_year(&self) -> i32 {
        self.start_year + self.values.len() as i32 - 1
    }

    /// All years in order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(|i| self.start_year + i as i32)
    }

    /// Values in year order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a series holds at least one year.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `year`, if covered.
    pub fn get(&self, year: i32) -> Option<f64> {
        let offset = year - self.start_year;
        (offset >= 0)
            .then(|| self.values.get(offset as usize).copied())
            .flatten()
    }

    /// Re-labels every value `offset` years later (negative moves earlier).
    ///
    /// Shifting a January-year NDJ index by `-1` pairs it with the JJA of the
    /// calendar year in which that NDJ season starts.
    pub fn shift_years(&self, offset: i32) -> Self {
        Self {
            start_year: self.start_year + offset,
            values: self.values.clone(),
        }
    }

    /// Restricts the series to `start_year..=end_year`.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalError::NoOverlap`] if no year falls in the window.
    pub fn select_years(&self, start_year: i32, end_year: i32) -> Result<Self, SeasonalError> {
        let lo = start_year.max(self.start_year);
        let hi = end_year.min(self.end_year());
        if lo > hi {
            return Err(SeasonalError::NoOverlap {
                start_year,
                end_year,
            });
        }
        let a = (lo - self.start_year) as usize;
        let b = (hi - self.start_year) as usize + 1;
        Self::new(lo, self.values[a..b].to_vec())
    }
}

/// Years shared by two yearly containers, if any.
pub fn common_years(a: (i32, i32), b: (i32, i32)) -> Option<(i32, i32)> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    (lo <= hi).then_some((lo, hi))
}

/// One `(lat, lon)` map per year over a contiguous run of years.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyField {
    start_year: i32,
    grid: Grid,
    data: Array3<f64>,
}

impl YearlyField {
    /// Wraps a `(year, lat, lon)` array.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalError::EmptySeries`] for zero years and
    /// [`SeasonalError::ShapeMismatch`] if the spatial shape does not match
    /// the grid.
    pub fn new(start_year: i32, grid: Grid, data: Array3<f64>) -> Result<Self, SeasonalError> {
        let (n_years, n_lat, n_lon) = data.dim();
        if n_years == 0 {
            return Err(SeasonalError::EmptySeries);
        }
        if (n_lat, n_lon) != (grid.n_lat(), grid.n_lon()) {
            return Err(SeasonalError::ShapeMismatch {
                expected: [n_years, grid.n_lat(), grid.n_lon()],
                got: [n_years, n_lat, n_lon],
            });
        }
        Ok(Self {
            start_year,
            grid,
            data,
        })
    }

    /// First year.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year.
    pub fn end_year(&self) -> i32 {
        self.start_year + self.n_years() as i32 - 1
    }

    /// Number of years.
    pub fn n_years(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Spatial grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Underlying `(year, lat, lon)` array.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Yearly values at one grid cell.
    pub fn point(&self, ilat: usize, ilon: usize) -> ArrayView1<'_, f64> {
        self.data.slice(s![.., ilat, ilon])
    }

    /// Same years and grid with new values.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalError::ShapeMismatch`] if the shape differs.
    pub fn with_data(&self, data: Array3<f64>) -> Result<Self, SeasonalError> {
        if data.dim() != self.data.dim() {
            let (a, b, c) = self.data.dim();
            let (x, y, z) = data.dim();
            return Err(SeasonalError::ShapeMismatch {
                expected: [a, b, c],
                got: [x, y, z],
            });
        }
        Self::new(self.start_year, self.grid.clone(), data)
    }

    /// Re-labels every map `offset` years later.
    pub fn shift_years(&self, offset: i32) -> Self {
        Self {
            start_year: self.start_year + offset,
            grid: self.grid.clone(),
            data: self.data.clone(),
        }
    }

    /// Restricts the field to `start_year..=end_year`.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonalError::NoOverlap`] if no year falls in the window.
    pub fn select_years(&self, start_year: i32, end_year: i32) -> Result<Self, SeasonalError> {
        let (lo, hi) = common_years((start_year, end_year), (self.start_year, self.end_year()))
            .ok_or(SeasonalError::NoOverlap {
                start_year,
                end_year,
            })?;
        let a = (lo - self.start_year) as usize;
        let b = (hi - self.start_year) as usize + 1;
        Self::new(lo, self.grid.clone(), self.data.slice(s![a..b, .., ..]).to_owned())
    }

    /// Per-cell mean over all years, ignoring missing years.
    pub fn mean_over_years(&self) -> Array2<f64> {
        let (_, n_lat, n_lon) = self.data.dim();
        Array2::from_shape_fn((n_lat, n_lon), |(i, j)| {
            let values: Vec<f64> = self.point(i, j).iter().copied().collect();
            enso_stats::nan_mean(&values)
        })
    }
}

/// Expresses a yearly anomaly field as a percentage of the per-cell mean of
/// a raw yearly field: `100 * anomaly / mean(raw)`.
///
/// Cells whose raw mean is missing or zero yield missing values.
///
/// # Errors
///
/// Returns [`SeasonalError::GridMismatch`] if the grids differ.
pub fn percent_of_climatology(
    anomaly: &YearlyField,
    raw: &YearlyField,
) -> Result<YearlyField, SeasonalError> {
    if anomaly.grid() != raw.grid() {
        return Err(SeasonalError::GridMismatch);
    }
    let clim = raw.mean_over_years();
    let mut data = anomaly.data().clone();
    for mut map in data.axis_iter_mut(Axis(0)) {
        ndarray::Zip::from(&mut map).and(&clim).for_each(|v, &c| {
            *v = if c.is_finite() && c != 0.0 {
                *v * 100.0 / c
            } else {
                f64::NAN
            };
        });
    }
    anomaly.with_data(data)
}
