//! Figure 7a: relative SSH anomalies as ENSO precursors.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, info_span};

use enso_anomaly::field_anomalies;
use enso_field::{compute_relative, region_mean};
use enso_io::{OutputFile, OutputVariable};
use enso_regression::{RegressionConfig, regress_lead_lag};
use enso_seasonal::lead_lag;

use crate::figure::{
    Figure, FigureContext, FigureSummary, LEAD_LAG_START_OFFSET_YEARS, LEAD_LAG_WINDOW,
};
use crate::index;

/// Boxes whose mean relative SSH anomaly is correlated with the index, with
/// their short labels.
const BOXES: [(&str, &str); 3] = [
    ("nino34", "N3.4 rSSHA"),
    ("equatorial_pacific", "EP rSSHA"),
    ("western_equatorial_pacific", "WEP rSSHA"),
];

pub fn run(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("f7a").entered();
    let [start, end] = ctx.config().figures.f7a.years;

    let sst = ctx.load_field("sst", [start, end])?;
    let index = index::ndj_index(ctx, &sst)?;

    let ssh = ctx.load_field("ssh", [start, end])?;
    let epoch = ssh.axis().epoch();
    let tropic = ctx.region("tropic")?;
    let relative = compute_relative(&ssh, &tropic).context("failed to remove tropical SSH mean")?;
    let anomalies = field_anomalies(&relative, ctx.reference()).context("SSH anomalies failed")?;

    let mut out = OutputFile::new().with_attribute("epoch", epoch.clone());
    let mut lags_written = false;
    let mut peaks = serde_json::Map::new();
    for (name, label) in BOXES {
        let region = ctx.region(name)?;
        let series = region_mean(&anomalies, &region)
            .with_context(|| format!("no SSH cells in {name}"))?;
        let matrix = lead_lag(&series, start, end, LEAD_LAG_WINDOW, LEAD_LAG_START_OFFSET_YEARS)?;
        let curves = regress_lead_lag(&index, &matrix, &RegressionConfig::default())
            .with_context(|| format!("lead-lag correlation for {name} failed"))?;

        let rvalues = curves.rvalues();
        let peak = rvalues
            .iter()
            .zip(&curves.lags)
            .filter(|(r, _)| r.is_finite())
            .max_by(|a, b| a.0.total_cmp(b.0))
            .map(|(r, lag)| json!({ "lag": lag, "rvalue": r }));
        debug!(region = name, ?peak, "lead-lag correlation");
        peaks.insert(name.to_string(), json!(peak));

        if !lags_written {
            out = out.with_coordinate(
                "lag",
                curves.lags.iter().map(|&l| l as f64).collect(),
                "months since January of the index year",
            );
            lags_written = true;
        }
        out = out.with_variable(
            OutputVariable::new(format!("{name}_rvalue"), &["lag"], rvalues)
                .with_units("1")
                .with_attribute("short_name", label)
                .with_long_name(&format!("{label} correlated with normalized N3.4 rSSTA")),
        );
    }

    let path = ctx.output_path("figure_07a.nc")?;
    out.write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(FigureSummary::new(Figure::F7a, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({ "peak_correlation": peaks })))
}
