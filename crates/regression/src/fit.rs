//! Ordinary least squares of yearly targets on a yearly index.

use enso_seasonal::{LeadLagMatrix, YearlyField, YearlySeries, common_years};
use ndarray::Array2;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, info};

use crate::config::{Alternative, RegressionConfig};
use crate::error::RegressionError;
use crate::result::{LagRegression, RegressionMap, RegressionPoint};

/// Minimum number of overlapping years for any regression.
const MIN_YEARS: usize = 3;

/// p-value of a t statistic with `df` degrees of freedom.
fn t_pvalue(t: f64, df: f64, alternative: Alternative) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return match alternative {
            Alternative::TwoSided => 0.0,
            Alternative::Greater => if t > 0.0 { 0.0 } else { 1.0 },
            Alternative::Less => if t < 0.0 { 0.0 } else { 1.0 },
        };
    }
    let Ok(dist) = StudentsT::new(0.0, 1.0, df) else {
        return f64::NAN;
    };
    match alternative {
        Alternative::TwoSided => (2.0 * dist.sf(t.abs())).min(1.0),
        Alternative::Greater => dist.sf(t),
        Alternative::Less => dist.cdf(t),
    }
}

/// Fits `y = intercept + slope * x` over the finite pairs.
pub(crate) fn fit_pairs(x: &[f64], y: &[f64], config: &RegressionConfig) -> RegressionPoint {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    let n = pairs.len();
    if n < config.min_pairs() {
        return RegressionPoint::missing(n);
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    let Some(fit) = enso_stats::linear_fit(&xs, &ys) else {
        return RegressionPoint::missing(n);
    };

    let mx = xs.iter().sum::<f64>() / n as f64;
    let sxx: f64 = xs.iter().map(|v| (v - mx).powi(2)).sum();
    let sse: f64 = pairs
        .iter()
        .map(|&(a, b)| (b - fit.predict(a)).powi(2))
        .sum();
    let df = (n - 2) as f64;
    let stderr = (sse / df / sxx).sqrt();

    let t = if stderr > 0.0 {
        fit.slope / stderr
    } else if fit.slope == 0.0 {
        f64::NAN
    } else {
        fit.slope.signum() * f64::INFINITY
    };

    RegressionPoint {
        slope: fit.slope,
        intercept: fit.intercept,
        rvalue: fit.rvalue,
        pvalue: t_pvalue(t, df, config.alternative()),
        stderr,
        n,
    }
}

/// Index values and year span shared with a target covering `target_years`.
///
/// Fails unless at least [`MIN_YEARS`] of the shared years carry a finite
/// index value.
fn aligned_index(
    index: &YearlySeries,
    target_years: (i32, i32),
) -> Result<(Vec<f64>, (i32, i32)), RegressionError> {
    let overlap = common_years((index.start_year(), index.end_year()), target_years);
    let (lo, hi) = overlap.ok_or(RegressionError::InsufficientData {
        needed: MIN_YEARS,
        got: 0,
    })?;
    let n = (hi - lo + 1) as usize;
    if n < MIN_YEARS {
        return Err(RegressionError::InsufficientData {
            needed: MIN_YEARS,
            got: n,
        });
    }
    let x = index.select_years(lo, hi)?.values().to_vec();
    let valid = x.iter().filter(|v| v.is_finite()).count();
    if valid < MIN_YEARS {
        return Err(RegressionError::InsufficientData {
            needed: MIN_YEARS,
            got: valid,
        });
    }
    Ok((x, (lo, hi)))
}

/// Regresses one yearly series on the index over their common years.
///
/// # Errors
///
/// Returns [`RegressionError::InsufficientData`] if fewer than 3 shared
/// years have a finite index value.
pub fn regress(index: &YearlySeries, target: &YearlySeries) -> Result<RegressionPoint, RegressionError> {
    regress_with(index, target, &RegressionConfig::default())
}

/// [`regress`] with an explicit configuration.
///
/// # Errors
///
/// Returns [`RegressionError::InvalidConfig`] for an invalid configuration
/// and [`RegressionError::InsufficientData`] if fewer than 3 shared years
/// have a finite index value.
pub fn regress_with(
    index: &YearlySeries,
    target: &YearlySeries,
    config: &RegressionConfig,
) -> Result<RegressionPoint, RegressionError> {
    config.validate()?;
    let (x, (lo, hi)) = aligned_index(index, (target.start_year(), target.end_year()))?;
    let y = target.select_years(lo, hi)?;
    Ok(fit_pairs(&x, y.values(), config))
}

/// Regresses every grid cell of a yearly field on the index.
///
/// Cells are fitted independently and in parallel; a cell with fewer valid
/// pairs than `config.min_pairs()` is missing in every output map.
///
/// # Errors
///
/// Returns [`RegressionError::InvalidConfig`] for an invalid configuration
/// and [`RegressionError::InsufficientData`] if fewer than 3 shared years
/// have a finite index value.
pub fn regress_field(
    index: &YearlySeries,
    target: &YearlyField,
    config: &RegressionConfig,
) -> Result<RegressionMap, RegressionError> {
    config.validate()?;
    let (x, (lo, hi)) = aligned_index(index, (target.start_year(), target.end_year()))?;
    let target = target.select_years(lo, hi)?;
    let grid = target.grid().clone();
    let (n_lat, n_lon) = (grid.n_lat(), grid.n_lon());

    let points: Vec<RegressionPoint> = (0..n_lat * n_lon)
        .into_par_iter()
        .map(|p| {
            let y: Vec<f64> = target.point(p / n_lon, p % n_lon).to_vec();
            fit_pairs(&x, &y, config)
        })
        .collect();

    let map_of = |f: fn(&RegressionPoint) -> f64| {
        Array2::from_shape_fn((n_lat, n_lon), |(i, j)| f(&points[i * n_lon + j]))
    };
    let map = RegressionMap {
        start_year: lo,
        end_year: hi,
        slope: map_of(|p| p.slope),
        intercept: map_of(|p| p.intercept),
        rvalue: map_of(|p| p.rvalue),
        pvalue: map_of(|p| p.pvalue),
        stderr: map_of(|p| p.stderr),
        n: Array2::from_shape_fn((n_lat, n_lon), |(i, j)| points[i * n_lon + j].n),
        grid,
    };
    info!(
        start_year = lo,
        end_year = hi,
        valid = map.n_valid(),
        cells = n_lat * n_lon,
        "regressed field on index"
    );
    Ok(map)
}

/// Regresses every lag column of a lead-lag matrix on the index.
///
/// # Errors
///
/// Returns [`RegressionError::InvalidConfig`] for an invalid configuration
/// and [`RegressionError::InsufficientData`] if fewer than 3 shared years
/// have a finite index value.
pub fn regress_lead_lag(
    index: &YearlySeries,
    matrix: &LeadLagMatrix,
    config: &RegressionConfig,
) -> Result<LagRegression, RegressionError> {
    config.validate()?;
    let matrix_years = (
        matrix.start_year(),
        matrix.start_year() + matrix.n_years() as i32 - 1,
    );
    let (x, (lo, hi)) = aligned_index(index, matrix_years)?;
    let columns = (0..matrix.window())
        .map(|lag| Ok(matrix.column(lag).select_years(lo, hi)?.values().to_vec()))
        .collect::<Result<Vec<_>, RegressionError>>()?;
    let points: Vec<RegressionPoint> = columns
        .par_iter()
        .map(|y| fit_pairs(&x, y, config))
        .collect();
    debug!(start_year = lo, end_year = hi, lags = points.len(), "lead-lag regression");
    Ok(LagRegression {
        lags: matrix.lag_months(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let p = fit_pairs(&x, &y, &RegressionConfig::default());
        assert_relative_eq!(p.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.rvalue, 1.0, epsilon = 1e-12);
        assert_eq!(p.stderr, 0.0);
        assert_eq!(p.pvalue, 0.0);
    }

    #[test]
    fn matches_reference_values() {
        // Reference: slope 0.6, intercept 2.2, r = 0.7746, p = 0.1240, stderr 0.2828
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let p = fit_pairs(&x, &y, &RegressionConfig::default());
        assert_relative_eq!(p.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(p.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(p.rvalue, 0.774_596_669, epsilon = 1e-8);
        assert_relative_eq!(p.stderr, 0.282_842_712, epsilon = 1e-8);
        assert_relative_eq!(p.pvalue, 0.124_027_06, epsilon = 1e-6);
    }

    #[test]
    fn one_sided_pvalues_split_two_sided() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let two = fit_pairs(&x, &y, &RegressionConfig::default()).pvalue;
        let greater = fit_pairs(
            &x,
            &y,
            &RegressionConfig::new().with_alternative(Alternative::Greater),
        )
        .pvalue;
        let less = fit_pairs(&x, &y, &RegressionConfig::new().with_alternative(Alternative::Less))
            .pvalue;
        assert_relative_eq!(greater, two / 2.0, epsilon = 1e-10);
        assert_relative_eq!(less, 1.0 - two / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn too_few_pairs_is_missing() {
        let x = [1.0, 2.0, f64::NAN, 4.0];
        let y = [1.0, f64::NAN, 3.0, 4.0];
        let p = fit_pairs(&x, &y, &RegressionConfig::default());
        assert!(!p.is_valid());
        assert_eq!(p.n, 2);
    }

    #[test]
    fn years_are_aligned() {
        let index = YearlySeries::new(2000, vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        // Target starts two years later; only 2002..=2004 overlap.
        let target = YearlySeries::new(2002, vec![4.0, 6.0, 8.0, 100.0]).unwrap();
        let p = regress(&index, &target).unwrap();
        assert_eq!(p.n, 3);
        assert_relative_eq!(p.slope, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_index_years_do_not_count() {
        let index = YearlySeries::new(2000, vec![f64::NAN, f64::NAN, f64::NAN, 1.0, 2.0]).unwrap();
        let target = YearlySeries::new(2000, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(matches!(
            regress(&index, &target),
            Err(RegressionError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn short_overlap_errors() {
        let index = YearlySeries::new(2000, vec![0.0, 1.0, 2.0]).unwrap();
        let target = YearlySeries::new(2001, vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            regress(&index, &target),
            Err(RegressionError::InsufficientData { needed: 3, got: 2 })
        ));
        let disjoint = YearlySeries::new(1900, vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            regress(&index, &disjoint),
            Err(RegressionError::InsufficientData { got: 0, .. })
        ));
    }
}
