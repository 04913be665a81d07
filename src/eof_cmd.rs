//! Figure 1a: leading EOF of detrended global SST anomalies.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, info_span};

use enso_anomaly::{detrend_field, field_anomalies};
use enso_eof::compute_eofs;
use enso_io::{OutputFile, OutputVariable};

use crate::convert;
use crate::figure::{Figure, FigureContext, FigureSummary};

pub fn run(ctx: &FigureContext<'_>) -> Result<FigureSummary> {
    let _span = info_span!("f1a").entered();
    let years = ctx.config().figures.f1a.years;
    let eof_cfg = convert::build_eof_config(ctx.config().eof_k)?;

    let sst = ctx.load_field("sst", years)?;
    let anomalies = field_anomalies(&sst, ctx.reference()).context("SST anomalies failed")?;
    let detrended = detrend_field(&anomalies).context("SST detrending failed")?;
    let eofs = compute_eofs(&detrended, &eof_cfg).context("EOF decomposition failed")?;
    let epoch = eofs.axis.epoch();
    info!(
        modes = eofs.modes.len(),
        valid_points = eofs.n_valid_points,
        "EOF decomposition done"
    );

    let n_modes = eofs.modes.len();
    let explained = eofs.explained_variance();
    let patterns: Vec<f64> = eofs
        .modes
        .iter()
        .flat_map(|m| m.amplitude_pattern.iter().copied())
        .collect();
    let pcs: Vec<f64> = eofs
        .modes
        .iter()
        .flat_map(|m| m.standardized_pc())
        .collect();
    let leading = eofs
        .modes
        .first()
        .map(|m| (m.amplitude_pattern.iter().copied().collect::<Vec<_>>(), m.explained_variance))
        .context("decomposition returned no modes")?;

    let path = ctx.output_path("figure_01a.nc")?;
    OutputFile::new()
        .with_time_axis(&eofs.axis)
        .with_grid(&eofs.grid)
        .with_coordinate("mode", (1..=n_modes).map(|m| m as f64).collect(), "1")
        .with_variable(
            OutputVariable::new("eof1_sst", &["lat", "lon"], leading.0)
                .with_units("degC")
                .with_attribute("short_name", "EOF1 SSTA")
                .with_long_name("first principal pattern from an EOF analysis on SSTA (degC)")
                .with_attribute("epoch", epoch.clone())
                .with_attribute("explained_variance", leading.1),
        )
        .with_variable(
            OutputVariable::new("eof_sst", &["mode", "lat", "lon"], patterns)
                .with_units("degC")
                .with_long_name("SSTA per standard deviation of each principal component"),
        )
        .with_variable(
            OutputVariable::new("pc", &["mode", "time"], pcs)
                .with_units("1")
                .with_long_name("standardized principal components"),
        )
        .with_variable(
            OutputVariable::new("explained_variance", &["mode"], explained.clone())
                .with_units("1")
                .with_long_name("fraction of weighted variance per mode"),
        )
        .with_attribute("epoch", epoch.clone())
        .with_attribute("explained_variance", explained.clone())
        .write(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(FigureSummary::new(Figure::F1a, epoch, ctx.reference())
        .with_output(&path)
        .with_details(json!({
            "n_modes": n_modes,
            "n_valid_points": eofs.n_valid_points,
            "explained_variance": explained,
        })))
}
