//! Monthly climatologies and (normalized) anomalies.

use std::fmt;

use enso_calendar::MonthlyAxis;
use enso_field::{Field, TimeSeries};
use ndarray::{Array2, Array3, ArrayView2};
use tracing::debug;

use crate::error::AnomalyError;

/// Inclusive range of years over which a climatology is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePeriod {
    start_year: i32,
    end_year: i32,
}

impl ReferencePeriod {
    /// Creates a reference period.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::InvalidReferencePeriod`] if
    /// `start_year > end_year`.
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, AnomalyError> {
        if start_year > end_year {
            return Err(AnomalyError::InvalidReferencePeriod {
                start_year,
                end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    /// First year.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year.
    pub fn end_year(&self) -> i32 {
        self.end_year
    }
}

impl Default for ReferencePeriod {
    fn default() -> Self {
        Self {
            start_year: 1980,
            end_year: 2024,
        }
    }
}

impl fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Zero-based calendar month of time step `t`.
fn month_of(axis: &MonthlyAxis, t: usize) -> usize {
    (axis.start().month_index() + t) % 12
}

fn flatten(field: &Field) -> Array2<f64> {
    let data = field.data();
    let (n_time, _, n_lon) = data.dim();
    let n_points = field.grid().n_points();
    Array2::from_shape_fn((n_time, n_points), |(t, p)| {
        data[[t, p / n_lon, p % n_lon]]
    })
}

fn unflatten(field: &Field, flat: &Array2<f64>) -> Array3<f64> {
    let (n_time, n_lat, n_lon) = field.data().dim();
    Array3::from_shape_fn((n_time, n_lat, n_lon), |(t, i, j)| {
        flat[[t, i * n_lon + j]]
    })
}

/// Per-point monthly mean and population standard deviation over a
/// reference period.
///
/// Built once and immutable; it can be applied to any series or field on
/// the same grid, including periods outside the reference window.
#[derive(Debug, Clone, PartialEq)]
pub struct Climatology {
    period: ReferencePeriod,
    mean: Array2<f64>,
    sd: Array2<f64>,
    count: Array2<usize>,
}

impl Climatology {
    /// Climatology of a single monthly series.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::InsufficientData`] if some calendar month has
    /// no time step inside the reference period.
    pub fn from_series(series: &TimeSeries, period: ReferencePeriod) -> Result<Self, AnomalyError> {
        let data = ArrayView2::from_shape((series.len(), 1), series.values())
            .map_err(|e| AnomalyError::InsufficientData {
                reason: e.to_string(),
            })?;
        Self::compute(series.axis(), data, period)
    }

    /// Climatology of every cell of a field.
    ///
    /// A cell whose reference samples for a month are all missing gets a
    /// missing mean for that month.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::InsufficientData`] if some calendar month has
    /// no time step inside the reference period.
    pub fn from_field(field: &Field, period: ReferencePeriod) -> Result<Self, AnomalyError> {
        let flat = flatten(field);
        Self::compute(field.axis(), flat.view(), period)
    }

    fn compute(
        axis: &MonthlyAxis,
        data: ArrayView2<'_, f64>,
        period: ReferencePeriod,
    ) -> Result<Self, AnomalyError> {
        let range = axis
            .year_range(period.start_year, period.end_year)
            .ok_or_else(|| AnomalyError::InsufficientData {
                reason: format!(
                    "reference period {period} does not overlap {}",
                    axis.epoch()
                ),
            })?;

        let mut steps: [Vec<usize>; 12] = Default::default();
        for t in range {
            steps[month_of(axis, t)].push(t);
        }
        let absent: Vec<usize> = (0..12).filter(|&m| steps[m].is_empty()).map(|m| m + 1).collect();
        if !absent.is_empty() {
            return Err(AnomalyError::InsufficientData {
                reason: format!("reference period {period} has no data for month(s) {absent:?}"),
            });
        }

        let n_points = data.ncols();
        let mut mean = Array2::from_elem((12, n_points), f64::NAN);
        let mut sd = Array2::from_elem((12, n_points), f64::NAN);
        let mut count = Array2::zeros((12, n_points));

        for (m, ts) in steps.iter().enumerate() {
            for p in 0..n_points {
                let Some(moments) = enso_stats::moments(ts.iter().map(|&t| data[[t, p]])) else {
                    continue;
                };
                mean[[m, p]] = moments.mean;
                count[[m, p]] = moments.count;
                if moments.count >= 2 {
                    sd[[m, p]] = moments.sd();
                }
            }
        }

        let empty = count.iter().filter(|&&c| c == 0).count();
        debug!(%period, n_points, empty_month_points = empty, "computed climatology");

        Ok(Self {
            period,
            mean,
            sd,
            count,
        })
    }

    /// Reference period the climatology was computed over.
    pub fn period(&self) -> ReferencePeriod {
        self.period
    }

    /// Number of spatial points (1 for a series).
    pub fn n_points(&self) -> usize {
        self.mean.ncols()
    }

    /// Monthly means, shape `(12, n_points)`, January first.
    pub fn monthly_mean(&self) -> &Array2<f64> {
        &self.mean
    }

    /// Monthly population standard deviations, shape `(12, n_points)`.
    /// Missing where fewer than 2 valid reference years exist.
    pub fn monthly_sd(&self) -> &Array2<f64> {
        &self.sd
    }

    /// Number of valid reference years per month and point.
    pub fn counts(&self) -> &Array2<usize> {
        &self.count
    }

    fn apply(
        &self,
        axis: &MonthlyAxis,
        data: ArrayView2<'_, f64>,
        normalize: bool,
    ) -> Result<Array2<f64>, AnomalyError> {
        if data.ncols() != self.n_points() {
            return Err(AnomalyError::GridMismatch {
                expected: self.n_points(),
                got: data.ncols(),
            });
        }
        let mut out = data.to_owned();
        for (t, mut row) in out.rows_mut().into_iter().enumerate() {
            let m = month_of(axis, t);
            for (p, v) in row.iter_mut().enumerate() {
                let anomaly = *v - self.mean[[m, p]];
                *v = if !normalize {
                    anomaly
                } else {
                    let s = self.sd[[m, p]];
                    if s.is_finite() && s > 0.0 {
                        anomaly / s
                    } else {
                        f64::NAN
                    }
                };
            }
        }
        Ok(out)
    }

    fn apply_series(&self, series: &TimeSeries, normalize: bool) -> Result<TimeSeries, AnomalyError> {
        let view = ArrayView2::from_shape((series.len(), 1), series.values()).map_err(|e| {
            AnomalyError::InsufficientData {
                reason: e.to_string(),
            }
        })?;
        let out = self.apply(series.axis(), view, normalize)?;
        Ok(series.with_values(out.iter().copied().collect())?)
    }

    fn apply_field(&self, field: &Field, normalize: bool) -> Result<Field, AnomalyError> {
        let flat = flatten(field);
        let out = self.apply(field.axis(), flat.view(), normalize)?;
        Ok(field.with_data(unflatten(field, &out))?)
    }

    /// Series minus the matching-month mean.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::GridMismatch`] if the climatology was built
    /// from a field.
    pub fn anomalies(&self, series: &TimeSeries) -> Result<TimeSeries, AnomalyError> {
        self.apply_series(series, false)
    }

    /// Anomalies divided by the matching-month standard deviation.
    ///
    /// Months whose standard deviation is missing or zero yield missing
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::GridMismatch`] if the climatology was built
    /// from a field.
    pub fn normalized_anomalies(&self, series: &TimeSeries) -> Result<TimeSeries, AnomalyError> {
        self.apply_series(series, true)
    }

    /// Field minus the matching-month mean of each cell.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::GridMismatch`] if the point counts differ.
    pub fn field_anomalies(&self, field: &Field) -> Result<Field, AnomalyError> {
        self.apply_field(field, false)
    }

    /// Field anomalies divided by the matching-month standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::GridMismatch`] if the point counts differ.
    pub fn field_normalized_anomalies(&self, field: &Field) -> Result<Field, AnomalyError> {
        self.apply_field(field, true)
    }
}

/// Anomalies of a series against its own climatology over `period`.
///
/// # Errors
///
/// Returns [`AnomalyError::InsufficientData`] if the reference period misses
/// a calendar month.
pub fn anomalies(series: &TimeSeries, period: ReferencePeriod) -> Result<TimeSeries, AnomalyError> {
    Climatology::from_series(series, period)?.anomalies(series)
}

/// Normalized anomalies of a series against its own climatology.
///
/// # Errors
///
/// Returns [`AnomalyError::InsufficientData`] if the reference period misses
/// a calendar month.
pub fn normalized_anomalies(
    series: &TimeSeries,
    period: ReferencePeriod,
) -> Result<TimeSeries, AnomalyError> {
    Climatology::from_series(series, period)?.normalized_anomalies(series)
}

/// Anomalies of a field against its own climatology over `period`.
///
/// # Errors
///
/// Returns [`AnomalyError::InsufficientData`] if the reference period misses
/// a calendar month.
pub fn field_anomalies(field: &Field, period: ReferencePeriod) -> Result<Field, AnomalyError> {
    Climatology::from_field(field, period)?.field_anomalies(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use enso_calendar::YearMonth;
    use enso_field::Grid;

    fn series(start: (i32, u8), values: Vec<f64>) -> TimeSeries {
        let axis = MonthlyAxis::new(YearMonth::new(start.0, start.1).unwrap(), values.len()).unwrap();
        TimeSeries::new(axis, values).unwrap()
    }

    #[test]
    fn reference_period_validates() {
        assert!(ReferencePeriod::new(2000, 1999).is_err());
        assert_eq!(ReferencePeriod::default().to_string(), "1980-2024");
    }

    #[test]
    fn monthly_cycle_is_removed() {
        // Pure seasonal cycle: anomalies are identically zero.
        let values: Vec<f64> = (0..60).map(|t| (t % 12) as f64 * 1.5).collect();
        let ts = series((2000, 1), values);
        let period = ReferencePeriod::new(2000, 2004).unwrap();
        let anom = anomalies(&ts, period).unwrap();
        assert!(anom.values().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn reference_period_missing_a_month_fails() {
        // Axis starts in March: a one-year reference lacks Jan and Feb.
        let ts = series((2000, 3), vec![1.0; 22]);
        let err = Climatology::from_series(&ts, ReferencePeriod::new(2000, 2000).unwrap())
            .unwrap_err();
        assert!(matches!(err, AnomalyError::InsufficientData { .. }));
        assert!(err.to_string().contains("[1, 2]"));
    }

    #[test]
    fn non_overlapping_period_fails() {
        let ts = series((2000, 1), vec![1.0; 24]);
        let err = Climatology::from_series(&ts, ReferencePeriod::new(1950, 1960).unwrap())
            .unwrap_err();
        assert!(matches!(err, AnomalyError::InsufficientData { .. }));
    }

    #[test]
    fn single_reference_year_gives_missing_normalized() {
        let ts = series((2000, 1), (0..24).map(f64::from).collect());
        let period = ReferencePeriod::new(2000, 2000).unwrap();
        let clim = Climatology::from_series(&ts, period).unwrap();
        assert!(clim.monthly_sd().iter().all(|s| s.is_nan()));
        let norm = clim.normalized_anomalies(&ts).unwrap();
        assert!(norm.values().iter().all(|v| v.is_nan()));
        // Plain anomalies are still defined.
        let anom = clim.anomalies(&ts).unwrap();
        assert_relative_eq!(anom.values()[12], 12.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_month_gives_missing_not_infinite() {
        let ts = series((2000, 1), vec![3.0; 36]);
        let norm = normalized_anomalies(&ts, ReferencePeriod::new(2000, 2002).unwrap()).unwrap();
        assert!(norm.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn applies_outside_reference_window() {
        let values: Vec<f64> = (0..48).map(|t| (t / 12) as f64).collect();
        let ts = series((2000, 1), values);
        let clim = Climatology::from_series(&ts, ReferencePeriod::new(2000, 2001).unwrap()).unwrap();
        let anom = clim.anomalies(&ts).unwrap();
        // Reference mean is 0.5 for every month; 2003 values are 3.
        assert_relative_eq!(anom.values()[47], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn field_climatology_is_per_point() {
        let grid = Grid::new(vec![0.0], vec![0.0, 1.0]).unwrap();
        let axis = MonthlyAxis::new(YearMonth::new(2000, 1).unwrap(), 24).unwrap();
        let data = Array3::from_shape_fn((24, 1, 2), |(t, _, j)| {
            if j == 0 { t as f64 } else { -(t as f64) }
        });
        let field = Field::new(axis, grid, data).unwrap();
        let clim = Climatology::from_field(&field, ReferencePeriod::new(2000, 2001).unwrap()).unwrap();
        assert_eq!(clim.n_points(), 2);
        assert_relative_eq!(clim.monthly_mean()[[0, 0]], 6.0, epsilon = 1e-12);
        assert_relative_eq!(clim.monthly_mean()[[0, 1]], -6.0, epsilon = 1e-12);
        assert_relative_eq!(clim.monthly_sd()[[0, 1]], 6.0, epsilon = 1e-12);

        let anom = clim.field_anomalies(&field).unwrap();
        assert_relative_eq!(anom.point(0, 0)[12], 6.0, epsilon = 1e-12);
        assert_relative_eq!(anom.point(0, 1)[12], -6.0, epsilon = 1e-12);

        let ts = series((2000, 1), vec![0.0; 24]);
        assert!(matches!(
            clim.anomalies(&ts),
            Err(AnomalyError::GridMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn all_missing_point_month_has_missing_mean() {
        let grid = Grid::new(vec![0.0], vec![0.0, 1.0]).unwrap();
        let axis = MonthlyAxis::new(YearMonth::new(2000, 1).unwrap(), 24).unwrap();
        let data = Array3::from_shape_fn((24, 1, 2), |(t, _, j)| {
            if j == 1 && t % 12 == 4 { f64::NAN } else { 1.0 }
        });
        let field = Field::new(axis, grid, data).unwrap();
        let clim = Climatology::from_field(&field, ReferencePeriod::new(2000, 2001).unwrap()).unwrap();
        assert!(clim.monthly_mean()[[4, 1]].is_nan());
        assert_eq!(clim.counts()[[4, 1]], 0);
        assert_eq!(clim.counts()[[4, 0]], 2);
    }
}
