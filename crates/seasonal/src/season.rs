//! Three-month seasonal means.

use enso_calendar::{MonthlyAxis, Season};
use enso_field::{Field, TimeSeries};
use ndarray::{Array3, s};
use tracing::debug;

use crate::error::SeasonalError;
use crate::yearly::{YearlyField, YearlySeries};

/// For every year with all three constituent months on the axis, the
/// positions of those months.
fn complete_seasons(
    axis: &MonthlyAxis,
    season: &Season,
) -> Result<(i32, Vec<[usize; 3]>), SeasonalError> {
    let mut first_year = None;
    let mut positions = Vec::new();
    for year in axis.start().year()..=axis.end().year() + 1 {
        let months = season.constituents(year);
        let found: Option<Vec<usize>> = months.iter().map(|&m| axis.position(m)).collect();
        if let Some(found) = found {
            first_year.get_or_insert(year);
            positions.push([found[0], found[1], found[2]]);
        }
    }
    match first_year {
        Some(year) => Ok((year, positions)),
        None => Err(SeasonalError::NoCompleteSeason {
            season: season.name().to_string(),
            epoch: axis.epoch(),
        }),
    }
}

/// Mean of three values, missing if any is missing.
fn strict_mean(values: [f64; 3]) -> f64 {
    if values.iter().all(|v| v.is_finite()) {
        values.iter().sum::<f64>() / 3.0
    } else {
        f64::NAN
    }
}

/// Unweighted three-month mean per year.
///
/// Only years whose three months all lie on the axis are emitted, and a
/// year with any missing month is missing. Years follow the season's last
/// month, so NDJ values are labelled with the January year.
///
/// # Errors
///
/// Returns [`SeasonalError::NoCompleteSeason`] if no year is complete.
pub fn season_mean(series: &TimeSeries, season: &Season) -> Result<YearlySeries, SeasonalError> {
    let (start_year, positions) = complete_seasons(series.axis(), season)?;
    let values = series.values();
    let means: Vec<f64> = positions
        .iter()
        .map(|p| strict_mean([values[p[0]], values[p[1]], values[p[2]]]))
        .collect();
    debug!(season = season.name(), start_year, n_years = means.len(), "seasonal mean");
    YearlySeries::new(start_year, means)
}

/// Unweighted three-month mean per year and grid cell.
///
/// Follows the same completeness rules as [`season_mean`].
///
/// # Errors
///
/// Returns [`SeasonalError::NoCompleteSeason`] if no year is complete.
pub fn season_mean_field(field: &Field, season: &Season) -> Result<YearlyField, SeasonalError> {
    let (start_year, positions) = complete_seasons(field.axis(), season)?;
    let data = field.data();
    let (_, n_lat, n_lon) = data.dim();
    let mut out = Array3::from_elem((positions.len(), n_lat, n_lon), f64::NAN);
    for (y, p) in positions.iter().enumerate() {
        let a = data.slice(s![p[0], .., ..]);
        let b = data.slice(s![p[1], .., ..]);
        let c = data.slice(s![p[2], .., ..]);
        ndarray::Zip::from(out.slice_mut(s![y, .., ..]))
            .and(&a)
            .and(&b)
            .and(&c)
            .for_each(|o, &x0, &x1, &x2| *o = strict_mean([x0, x1, x2]));
    }
    debug!(
        season = season.name(),
        start_year,
        n_years = positions.len(),
        "seasonal field mean"
    );
    YearlyField::new(start_year, field.grid().clone(), out)
}
