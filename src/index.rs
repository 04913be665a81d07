//! Normalized NDJ Nino3.4 relative SST index shared by the regression
//! figures.

use anyhow::{Context, Result};
use tracing::info;

use enso_anomaly::Climatology;
use enso_field::{Field, TimeSeries, area_mean, compute_relative, select_region};
use enso_seasonal::{YearlySeries, season_mean};

use crate::figure::FigureContext;

/// Monthly Nino3.4 relative SST anomaly normalized by the monthly standard
/// deviation: tropical mean removed, anomalies per cell, then averaged.
pub fn normalized_rssta(ctx: &FigureContext<'_>, sst: &Field) -> Result<TimeSeries> {
    let tropic = ctx.region("tropic")?;
    let nino34 = ctx.region("nino34")?;

    let relative = compute_relative(sst, &tropic).context("failed to remove tropical mean")?;
    let box_field = select_region(&relative, &nino34)?;
    let clim = Climatology::from_field(&box_field, ctx.reference())
        .context("failed to build Nino3.4 climatology")?;
    let normalized = clim.field_normalized_anomalies(&box_field)?;
    Ok(area_mean(&normalized)?)
}

/// NDJ seasonal mean of [`normalized_rssta`], labelled by the January year.
pub fn ndj_index(ctx: &FigureContext<'_>, sst: &Field) -> Result<YearlySeries> {
    let monthly = normalized_rssta(ctx, sst)?;
    let ndj = ctx.season("NDJ")?;
    let index = season_mean(&monthly, &ndj).context("failed to build NDJ index")?;
    info!(
        start_year = index.start_year(),
        end_year = index.end_year(),
        "built NDJ Nino3.4 index"
    );
    Ok(index)
}
