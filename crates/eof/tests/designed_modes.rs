use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use enso_calendar::{MonthlyAxis, YearMonth};
use enso_eof::{EofConfig, EofError, compute_eofs};
use enso_field::{Field, Grid};
use ndarray::Array3;

/// Field = 2 cos(wt) * P1 + sin(wt) * P2 where P1 is uniform and P2 is the
/// sign of latitude. The patterns are orthogonal under cos-latitude weights
/// and the amplitudes are orthogonal over whole cycles.
fn designed_field(lats: Vec<f64>, n_lon: usize, n_time: usize) -> Field {
    let lons: Vec<f64> = (0..n_lon).map(|j| j as f64 * 360.0 / n_lon as f64).collect();
    let grid = Grid::new(lats.clone(), lons).unwrap();
    let axis = MonthlyAxis::new(YearMonth::new(2000, 1).unwrap(), n_time).unwrap();
    let data = Array3::from_shape_fn((n_time, lats.len(), n_lon), |(t, i, _)| {
        let phase = 2.0 * PI * t as f64 / 12.0;
        2.0 * phase.cos() + phase.sin() * lats[i].signum()
    });
    Field::new(axis, grid, data).unwrap()
}

fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let va: f64 = a.iter().map(|x| (x - ma).powi(2)).sum();
    let vb: f64 = b.iter().map(|y| (y - mb).powi(2)).sum();
    cov / (va * vb).sqrt()
}

fn check_designed(field: &Field) {
    let result = compute_eofs(field, &EofConfig::new()).unwrap();
    // Rank 2: the remaining requested modes are dropped.
    assert_eq!(result.modes.len(), 2);
    let fractions = result.explained_variance();
    assert_abs_diff_eq!(fractions[0], 0.8, epsilon = 1e-9);
    assert_abs_diff_eq!(fractions[1], 0.2, epsilon = 1e-9);

    let n_time = field.n_time();
    let cos_t: Vec<f64> = (0..n_time).map(|t| (2.0 * PI * t as f64 / 12.0).cos()).collect();
    let sin_t: Vec<f64> = (0..n_time).map(|t| (2.0 * PI * t as f64 / 12.0).sin()).collect();
    assert_abs_diff_eq!(correlation(&result.modes[0].pc, &cos_t).abs(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(correlation(&result.modes[1].pc, &sin_t).abs(), 1.0, epsilon = 1e-9);

    // Amplitudes are the standard deviations of the designed time series.
    let lats = field.grid().lats();
    let eof1 = &result.modes[0].amplitude_pattern;
    let eof2 = &result.modes[1].amplitude_pattern;
    let sign1 = eof1[[0, 0]].signum();
    let sign2 = (eof2[[0, 0]] * lats[0].signum()).signum();
    for ((i, j), v) in eof1.indexed_iter() {
        assert_abs_diff_eq!(*v, sign1 * 2.0_f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(
            eof2[[i, j]],
            sign2 * lats[i].signum() / 2.0_f64.sqrt(),
            epsilon = 1e-9
        );
    }

    // Weighted patterns have unit norm.
    let norm: f64 = result.modes[0].pattern.iter().map(|v| v * v).sum();
    assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-9);
}

#[test]
fn recovers_designed_modes_spatial_solve() {
    // 24 time steps, 16 cells: spatial covariance is the smaller matrix.
    check_designed(&designed_field(vec![-30.0, -10.0, 10.0, 30.0], 4, 24));
}

#[test]
fn recovers_designed_modes_temporal_solve() {
    // 12 time steps, 48 cells: temporal covariance is the smaller matrix.
    check_designed(&designed_field(
        vec![-50.0, -30.0, -10.0, 10.0, 30.0, 50.0],
        8,
        12,
    ));
}

#[test]
fn incomplete_cells_are_excluded() {
    let field = designed_field(vec![-30.0, -10.0, 10.0, 30.0], 4, 24);
    let mut data = field.data().clone();
    data[[5, 1, 2]] = f64::NAN;
    let field = field.with_data(data).unwrap();
    let result = compute_eofs(&field, &EofConfig::new().with_n_modes(1)).unwrap();
    assert_eq!(result.n_valid_points, 15);
    assert_eq!(result.modes.len(), 1);
    assert!(result.modes[0].pattern[[1, 2]].is_nan());
    assert!(result.modes[0].amplitude_pattern[[1, 2]].is_nan());
    assert!(result.modes[0].pattern[[1, 1]].is_finite());
}

#[test]
fn rejects_bad_input() {
    let field = designed_field(vec![0.0], 2, 1);
    assert!(matches!(
        compute_eofs(&field, &EofConfig::new()),
        Err(EofError::InsufficientData { .. })
    ));
    let field = designed_field(vec![0.0], 2, 12);
    assert!(matches!(
        compute_eofs(&field, &EofConfig::new().with_n_modes(0)),
        Err(EofError::InvalidModeCount { n_modes: 0 })
    ));
}
