//! Figures 1b and 1c: global mean surface air temperature.

use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing::{info, info_span};

use enso_anomaly::{anomalies, detrend_linear, running_mean};
use enso_io::{OutputFile, OutputVariable};
use enso_regression::{RegressionConfig, regress_lead_lag};
use enso_seasonal::lead_lag;

use crate::figure::{
    Figure, FigureContext, FigureSummary, LEAD_LAG_START_OFFSET_YEARS, LEAD_LAG_WINDOW,
};
use crate::index;

/// Months in the GSAT smoothing window.
const SMOOTHING_MONTHS: usize = 12;

/// Figure 1b: running means of the GSAT estimate and its bounds.
pub fn run_f1b(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("f1b").entered();
    let years = ctx.config().figures.f1b.years;

    let mut smoothed = Vec::new();
    for variable in ctx.series_variables("gsat")? {
        let series = ctx.load_series("gsat", &variable, years)?;
        let mean = running_mean(&series, SMOOTHING_MONTHS)
            .with_context(|| format!("running mean of {variable} failed"))?;
        smoothed.push((variable, mean));
    }
    let Some((_, first)) = smoothed.first() else {
        bail!("no GSAT variables configured");
    };
    let axis = *first.axis();
    if let Some((name, _)) = smoothed.iter().find(|(_, s)| *s.axis() != axis) {
        bail!("GSAT variable {name} does not share the time axis of the others");
    }
    let epoch = axis.epoch();

    let mut out = OutputFile::new()
        .with_time_axis(&axis)
        .with_attribute("epoch", epoch.clone());
    let mut last_values = serde_json::Map::new();
    for (name, series) in &smoothed {
        let last = series.values().iter().rev().copied().find(|v| v.is_finite());
        last_values.insert(name.clone(), json!(last));
        out = out.with_variable(
            OutputVariable::new(name.as_str(), &["time"], series.values().to_vec())
                .with_units("degC")
                .with_long_name("GSAT 12-month running mean")
                .with_attribute("epoch", epoch.clone()),
        );
    }

    let path = ctx.output_path("figure_01b.nc")?;
    out.write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(variables = smoothed.len(), "GSAT running means written");

    Ok(FigureSummary::new(Figure::F1b, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({
            "window_months": SMOOTHING_MONTHS,
            "last_valid": last_values,
        })))
}

/// Figure 1c: detrended GSAT anomalies regressed on the NDJ index at every
/// lag of a four-year window.
pub fn run_f1c(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("f1c").entered();
    let [start, end] = ctx.config().figures.f1c.years;

    let sst = ctx.load_field("sst", [start, end])?;
    let index = index::ndj_index(ctx, &sst)?;

    let variable = ctx
        .series_variables("gsat")?
        .into_iter()
        .next()
        .context("no GSAT variable configured")?;
    let gsat = ctx.load_series("gsat", &variable, [start, end])?;
    let epoch = gsat.axis().epoch();
    let gsat = anomalies(&gsat, ctx.reference()).context("GSAT anomalies failed")?;
    let gsat = detrend_linear(&gsat).context("GSAT detrending failed")?;

    let matrix = lead_lag(&gsat, start, end, LEAD_LAG_WINDOW, LEAD_LAG_START_OFFSET_YEARS)?;
    let curves = regress_lead_lag(&index, &matrix, &RegressionConfig::default())
        .context("lead-lag regression failed")?;

    let slopes = curves.slopes();
    let peak = slopes
        .iter()
        .zip(&curves.lags)
        .filter(|(s, _)| s.is_finite())
        .max_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
        .map(|(s, lag)| json!({ "lag": lag, "slope": s }));

    let path = ctx.output_path("figure_01c.nc")?;
    OutputFile::new()
        .with_coordinate(
            "lag",
            curves.lags.iter().map(|&l| l as f64).collect(),
            "months since January of the index year",
        )
        .with_variable(
            OutputVariable::new("slope", &["lag"], slopes.clone())
                .with_units("degC")
                .with_attribute("short_name", "slope")
                .with_long_name("GSAT regressed on normalized N3.4 rSSTA (degC)"),
        )
        .with_variable(
            OutputVariable::new("rvalue", &["lag"], curves.rvalues())
                .with_units("1")
                .with_long_name("correlation of GSAT with normalized N3.4 rSSTA"),
        )
        .with_variable(
            OutputVariable::new("pvalue", &["lag"], curves.pvalues())
                .with_units("1")
                .with_long_name("two-sided p-value of the slope"),
        )
        .with_attribute("epoch", epoch.clone())
        .write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(FigureSummary::new(Figure::F1c, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({
            "index_years": [index.start_year(), index.end_year()],
            "peak": peak,
        })))
}
