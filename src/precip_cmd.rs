//! Figure 1d: JJA precipitation change regressed on the following NDJ index.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, info_span};

use enso_anomaly::{detrend_field, field_anomalies};
use enso_io::{OutputFile, OutputVariable};
use enso_regression::{RegressionConfig, regress_field};
use enso_seasonal::{percent_of_climatology, season_mean_field};

use crate::figure::{Figure, FigureContext, FigureSummary};
use crate::index;

pub fn run(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("f1d").entered();
    let years = ctx.config().figures.f1d.years;
    let jja = ctx.season("JJA")?;

    let sst = ctx.load_field("sst", years)?;
    // The NDJ season ending in January y + 1 follows JJA of year y.
    let index = index::ndj_index(ctx, &sst)?.shift_years(-1);

    let pr = ctx.load_field("pr", years)?;
    let epoch = pr.axis().epoch();
    let anomalies = field_anomalies(&pr, ctx.reference()).context("PR anomalies failed")?;
    let detrended = detrend_field(&anomalies).context("PR detrending failed")?;
    let jja_anomalies = season_mean_field(&detrended, &jja).context("JJA anomalies failed")?;
    let jja_raw = season_mean_field(&pr, &jja).context("JJA climatology failed")?;
    let change = percent_of_climatology(&jja_anomalies, &jja_raw)?;

    let map = regress_field(&index, &change, &RegressionConfig::default())
        .context("PR regression failed")?;
    info!(
        start_year = map.start_year,
        end_year = map.end_year,
        valid = map.n_valid(),
        "PR change regression done"
    );

    let flat = |a: &ndarray::Array2<f64>| a.iter().copied().collect::<Vec<_>>();
    let path = ctx.output_path("figure_01d.nc")?;
    OutputFile::new()
        .with_grid(&map.grid)
        .with_variable(
            OutputVariable::new("slope", &["lat", "lon"], flat(&map.slope))
                .with_units("%")
                .with_attribute("short_name", "slope")
                .with_long_name("JJA PR change regressed on normalized NDJ N3.4 rSSTA (%)")
                .with_attribute("epoch", epoch.clone()),
        )
        .with_variable(
            OutputVariable::new("rvalue", &["lat", "lon"], flat(&map.rvalue))
                .with_units("1")
                .with_long_name("correlation of JJA PR change with the NDJ index"),
        )
        .with_variable(
            OutputVariable::new("pvalue", &["lat", "lon"], flat(&map.pvalue))
                .with_units("1")
                .with_long_name("two-sided p-value of the slope"),
        )
        .with_attribute("epoch", epoch.clone())
        .with_attribute("regression_years", format!("{}-{}", map.start_year, map.end_year))
        .write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(FigureSummary::new(Figure::F1d, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({
            "regression_years": [map.start_year, map.end_year],
            "valid_cells": map.n_valid(),
            "cells": map.slope.len(),
        })))
}
