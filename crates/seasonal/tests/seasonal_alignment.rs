use approx::assert_relative_eq;
use enso_calendar::{MonthlyAxis, Season};
use enso_field::{Field, Grid, TimeSeries};
use enso_seasonal::{
    lead_lag, percent_of_climatology, season_mean, season_mean_field, common_years,
};
use ndarray::Array3;

fn monthly(start_year: i32, end_year: i32, f: impl Fn(usize) -> f64) -> TimeSeries {
    let axis = MonthlyAxis::spanning_years(start_year, end_year).unwrap();
    let values = (0..axis.len()).map(f).collect();
    TimeSeries::new(axis, values).unwrap()
}

#[test]
fn lead_lag_centre_columns_reproduce_ndj_means() {
    let ts = monthly(1990, 1999, |t| (t as f64 * 0.7).sin() + t as f64 / 50.0);
    let ndj = season_mean(&ts, &Season::ndj()).unwrap();
    assert_eq!((ndj.start_year(), ndj.end_year()), (1991, 1999));

    let ll = lead_lag(&ts, 1991, 1999, 48, -2).unwrap();
    // Nov and Dec of the previous year and January of the row year.
    let lags = ll.lag_months();
    let cols: Vec<usize> = [-2, -1, 0]
        .iter()
        .map(|lag| lags.iter().position(|l| l == lag).unwrap())
        .collect();
    assert_eq!(cols, vec![22, 23, 24]);

    for (r, year) in ndj.years().enumerate() {
        let row = ll.data().row(r);
        let mean = (row[cols[0]] + row[cols[1]] + row[cols[2]]) / 3.0;
        assert_relative_eq!(mean, ndj.get(year).unwrap(), epsilon = 1e-12);
    }
}

#[test]
fn shifted_ndj_pairs_with_preceding_summer() {
    // Value = calendar year, so seasonal labels are visible directly.
    let ts = monthly(2000, 2004, |t| 2000.0 + (t / 12) as f64);
    let ndj = season_mean(&ts, &Season::ndj()).unwrap();
    let jja = season_mean(&ts, &Season::jja()).unwrap();

    // NDJ labelled 2001 holds Nov/Dec 2000 and Jan 2001.
    assert_relative_eq!(ndj.get(2001).unwrap(), 2000.0 + 1.0 / 3.0, epsilon = 1e-12);

    let shifted = ndj.shift_years(-1);
    let (lo, hi) = common_years(
        (shifted.start_year(), shifted.end_year()),
        (jja.start_year(), jja.end_year()),
    )
    .unwrap();
    assert_eq!((lo, hi), (2000, 2003));
    // The NDJ season starting in November 2000 lines up with JJA 2000.
    assert_relative_eq!(jja.get(2000).unwrap(), 2000.0, epsilon = 1e-12);
    assert_relative_eq!(shifted.get(2000).unwrap(), 2000.0 + 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn seasonal_percent_change_of_precipitation() {
    let axis = MonthlyAxis::spanning_years(2000, 2003).unwrap();
    let grid = Grid::new(vec![-10.0, 10.0], vec![100.0]).unwrap();
    // Cell 0 rains 4 mm/day every summer, plus 1 in 2002; cell 1 is dry.
    let raw = Array3::from_shape_fn((axis.len(), 2, 1), |(t, i, _)| {
        if i == 1 {
            0.0
        } else if t / 12 == 2 {
            5.0
        } else {
            4.0
        }
    });
    let field = Field::new(axis, grid, raw).unwrap();
    let jja = season_mean_field(&field, &Season::jja()).unwrap();
    assert_eq!(jja.n_years(), 4);

    let clim = jja.mean_over_years();
    let anomaly = jja
        .with_data(jja.data() - &clim.broadcast((4, 2, 1)).unwrap())
        .unwrap();
    let pct = percent_of_climatology(&anomaly, &jja).unwrap();

    // Mean is 4.25, so 2002 is +0.75 / 4.25 and the other years -0.25 / 4.25.
    assert_relative_eq!(pct.data()[[2, 0, 0]], 75.0 / 4.25, epsilon = 1e-10);
    assert_relative_eq!(pct.data()[[0, 0, 0]], -25.0 / 4.25, epsilon = 1e-10);
    assert!(pct.data()[[0, 1, 0]].is_nan());
}
