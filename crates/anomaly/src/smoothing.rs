//! Centred running means weighted by month length.

use enso_field::TimeSeries;

use crate::error::AnomalyError;

/// Centred running mean over `window` months, weighted by days per month.
///
/// The window for time step `i` covers `i - window / 2 ..= i + (window - 1) / 2`
/// (for 12 months: six before, the month itself and five after). Steps
/// whose window runs off the series or contains a missing value are missing.
///
/// # Errors
///
/// Returns [`AnomalyError::InvalidWindow`] if `window == 0`.
pub fn running_mean(series: &TimeSeries, window: usize) -> Result<TimeSeries, AnomalyError> {
    if window == 0 {
        return Err(AnomalyError::InvalidWindow { window });
    }
    let values = series.values();
    let n = values.len();
    let days: Vec<f64> = series.axis().iter().map(|ym| f64::from(ym.days())).collect();
    let before = window / 2;
    let after = window - 1 - before;

    let smoothed = (0..n)
        .map(|i| {
            if i < before || i + after >= n {
                return f64::NAN;
            }
            let span = i - before..=i + after;
            let mut num = 0.0;
            let mut den = 0.0;
            for t in span {
                let v = values[t];
                if !v.is_finite() {
                    return f64::NAN;
                }
                num += v * days[t];
                den += days[t];
            }
            num / den
        })
        .collect();

    Ok(series.with_values(smoothed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use enso_calendar::{MonthlyAxis, YearMonth};

    fn series(values: Vec<f64>) -> TimeSeries {
        let axis = MonthlyAxis::new(YearMonth::new(2001, 1).unwrap(), values.len()).unwrap();
        TimeSeries::new(axis, values).unwrap()
    }

    #[test]
    fn constant_is_preserved_inside_edges() {
        let out = running_mean(&series(vec![4.0; 36]), 12).unwrap();
        let v = out.values();
        assert!(v[..6].iter().all(|x| x.is_nan()));
        assert!(v[31..].iter().all(|x| x.is_nan()));
        assert!(v[6..31].iter().all(|x| (x - 4.0).abs() < 1e-12));
    }

    #[test]
    fn weights_follow_month_length() {
        // Jan (31 d) = 0, Feb (28 d) = 1, Mar (31 d) = 0.
        let out = running_mean(&series(vec![0.0, 1.0, 0.0]), 3).unwrap();
        assert_relative_eq!(out.values()[1], 28.0 / 90.0, epsilon = 1e-12);
        assert!(out.values()[0].is_nan());
        assert!(out.values()[2].is_nan());
    }

    #[test]
    fn missing_value_spoils_its_windows() {
        let mut values = vec![1.0; 10];
        values[4] = f64::NAN;
        let out = running_mean(&series(values), 3).unwrap();
        let v = out.values();
        assert!(v[3].is_nan() && v[4].is_nan() && v[5].is_nan());
        assert_relative_eq!(v[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(v[6], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_window_rejected() {
        assert!(matches!(
            running_mean(&series(vec![1.0]), 0),
            Err(AnomalyError::InvalidWindow { window: 0 })
        ));
    }
}
