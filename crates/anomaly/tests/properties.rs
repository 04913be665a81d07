use approx::assert_abs_diff_eq;
use enso_anomaly::{Climatology, ReferencePeriod, detrend_linear};
use enso_calendar::{MonthlyAxis, YearMonth};
use enso_field::TimeSeries;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn noisy_series(seed: u64, start_year: i32, n_years: usize) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.3).unwrap();
    let values: Vec<f64> = (0..n_years * 12)
        .map(|t| {
            let month = (t % 12) as f64;
            20.0 + 4.0 * (month * std::f64::consts::PI / 6.0).sin() + noise.sample(&mut rng)
        })
        .collect();
    let axis = MonthlyAxis::new(YearMonth::new(start_year, 1).unwrap(), values.len()).unwrap();
    TimeSeries::new(axis, values).unwrap()
}

#[test]
fn normalized_anomalies_are_standardized_per_month_over_reference() {
    let series = noisy_series(42, 1970, 40);
    let period = ReferencePeriod::new(1980, 2004).unwrap();
    let clim = Climatology::from_series(&series, period).unwrap();
    let norm = clim.normalized_anomalies(&series).unwrap();
    let inside = norm.select_years(1980, 2004).unwrap();

    for month in 0..12 {
        let values: Vec<f64> = inside
            .values()
            .iter()
            .skip(month)
            .step_by(12)
            .copied()
            .collect();
        assert_eq!(values.len(), 25);
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn missing_month_year_only_affects_its_own_month() {
    let series = noisy_series(7, 1990, 10);
    let period = ReferencePeriod::new(1990, 1999).unwrap();
    let full = Climatology::from_series(&series, period).unwrap();

    let mut values = series.values().to_vec();
    // March 1994
    values[4 * 12 + 2] = f64::NAN;
    let gappy = series.with_values(values.clone()).unwrap();
    let partial = Climatology::from_series(&gappy, period).unwrap();

    for month in 0..12 {
        if month == 2 {
            assert_eq!(partial.counts()[[month, 0]], 9);
            let march: Vec<f64> = values.iter().skip(2).step_by(12).copied().filter(|v| v.is_finite()).collect();
            let expected = march.iter().sum::<f64>() / march.len() as f64;
            assert_abs_diff_eq!(partial.monthly_mean()[[month, 0]], expected, epsilon = 1e-12);
        } else {
            assert_eq!(partial.counts()[[month, 0]], 10);
            assert_eq!(partial.monthly_mean()[[month, 0]], full.monthly_mean()[[month, 0]]);
            assert_eq!(partial.monthly_sd()[[month, 0]], full.monthly_sd()[[month, 0]]);
        }
    }

    let anom = partial.anomalies(&gappy).unwrap();
    assert!(anom.values()[4 * 12 + 2].is_nan());
    assert_eq!(anom.values().iter().filter(|v| v.is_nan()).count(), 1);
}

#[test]
fn detrended_anomalies_have_no_residual_trend() {
    let base = noisy_series(3, 1980, 30);
    let trended: Vec<f64> = base
        .values()
        .iter()
        .enumerate()
        .map(|(t, v)| v + 0.01 * t as f64)
        .collect();
    let series = base.with_values(trended).unwrap();
    let clim = Climatology::from_series(&series, ReferencePeriod::default()).unwrap();
    let detrended = detrend_linear(&clim.anomalies(&series).unwrap()).unwrap();
    let trend = enso_anomaly::fit_linear_trend(detrended.values()).unwrap();
    assert_abs_diff_eq!(trend.slope, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(trend.intercept, 0.0, epsilon = 1e-9);
}
