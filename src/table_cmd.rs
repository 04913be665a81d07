//! Table 1: monthly Nino3.4 SST anomaly indices.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info_span;

use enso_anomaly::{detrend_field, field_anomalies};
use enso_field::{compute_relative, region_mean};
use enso_io::{OutputFile, OutputVariable};

use crate::figure::{Figure, FigureContext, FigureSummary};

pub fn run(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("t1").entered();
    let years = ctx.config().figures.t1.years;
    let nino34 = ctx.region("nino34")?;
    let tropic = ctx.region("tropic")?;

    let sst = ctx.load_field("sst", years)?;
    let epoch = sst.axis().epoch();

    let relative = compute_relative(&sst, &tropic).context("failed to remove tropical mean")?;
    let rssta = region_mean(&field_anomalies(&relative, ctx.reference())?, &nino34)?;
    let anomalies = field_anomalies(&sst, ctx.reference()).context("SST anomalies failed")?;
    let ssta = region_mean(&anomalies, &nino34)?;
    let ssta_det = region_mean(&detrend_field(&anomalies)?, &nino34)?;

    let columns = [
        (
            "rssta",
            "N3.4 rSSTA",
            "Relative Sea Surface Temperature Anomalies Averaged in Nino3.4",
            &rssta,
        ),
        (
            "ssta",
            "N3.4 SSTA",
            "Sea Surface Temperature Anomalies Averaged in Nino3.4",
            &ssta,
        ),
        (
            "ssta_det",
            "det N3.4 SSTA",
            "Detrended Sea Surface Temperature Anomalies Averaged in Nino3.4",
            &ssta_det,
        ),
    ];

    let mut out = OutputFile::new()
        .with_time_axis(sst.axis())
        .with_attribute("epoch", epoch.clone());
    let mut extremes = serde_json::Map::new();
    for (name, short, long, series) in columns {
        let max = series.values().iter().copied().filter(|v| v.is_finite()).fold(f64::NAN, f64::max);
        let min = series.values().iter().copied().filter(|v| v.is_finite()).fold(f64::NAN, f64::min);
        extremes.insert(name.to_string(), json!({ "min": min, "max": max }));
        out = out.with_variable(
            OutputVariable::new(name, &["time"], series.values().to_vec())
                .with_units("degC")
                .with_attribute("short_name", short)
                .with_long_name(long),
        );
    }

    let file_name = format!("n34_ssta_{}_{}.nc", years[0], years[1]);
    let path = ctx.output_path(&file_name)?;
    out.write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(FigureSummary::new(Figure::T1, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({ "range": extremes })))
}
