//! Pure conversion functions: TOML config structs -> crate API config types.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};

use enso_anomaly::ReferencePeriod;
use enso_calendar::Season;
use enso_eof::EofConfig;
use enso_field::Region;
use enso_io::ReaderConfig;

use crate::config::{DataToml, RegionToml, SeasonToml};

/// Builds the climatology reference period from `[start, end]`.
pub fn build_reference_period(period: [i32; 2]) -> Result<ReferencePeriod> {
    let [start, end] = period;
    ReferencePeriod::new(start, end)
        .with_context(|| format!("invalid reference_period [{start}, {end}]"))
}

/// Resolves a region name: configured boxes take precedence over the
/// built-in ones.
pub fn build_region(name: &str, regions: &BTreeMap<String, RegionToml>) -> Result<Region> {
    match regions.get(name) {
        Some(r) => Region::new(name, r.south, r.north, r.west, r.east)
            .with_context(|| format!("invalid [regions.{name}]")),
        None => Region::named(name).with_context(|| format!("no region named {name:?}")),
    }
}

/// Resolves a season name: configured seasons take precedence over the
/// standard three-letter ones.
///
/// A configured `year_offset` must agree with the months: 1 when the
/// season crosses the year boundary, 0 otherwise.
pub fn build_season(name: &str, seasons: &BTreeMap<String, SeasonToml>) -> Result<Season> {
    let Some(s) = seasons.get(name) else {
        return name
            .parse::<Season>()
            .with_context(|| format!("no season named {name:?}"));
    };
    let season =
        Season::new(name, s.months).with_context(|| format!("invalid [seasons.{name}]"))?;
    if let Some(offset) = s.year_offset
        && offset != season.year_offset()
    {
        bail!(
            "[seasons.{name}] year_offset = {offset} does not match months {:?} (expected {})",
            s.months,
            season.year_offset()
        );
    }
    Ok(season)
}

/// Builds a [`ReaderConfig`] for `variable` of a dataset over `years`.
pub fn build_reader_config(data: &DataToml, variable: &str, years: [i32; 2]) -> Result<ReaderConfig> {
    let mut cfg = ReaderConfig::new(variable)
        .with_years(years[0], years[1])
        .with_constant_mask(data.ensure_constant_mask);
    if let Some([lo, hi]) = data.valid_range {
        cfg = cfg.with_valid_range(lo, hi);
    }
    if let Some(names) = &data.lat_names {
        cfg = cfg.with_lat_aliases(names.iter().cloned());
    }
    if let Some(names) = &data.lon_names {
        cfg = cfg.with_lon_aliases(names.iter().cloned());
    }
    if let Some(names) = &data.time_names {
        cfg = cfg.with_time_aliases(names.iter().cloned());
    }
    cfg.validate()
        .with_context(|| format!("invalid reader settings for variable {variable:?}"))?;
    Ok(cfg)
}

/// Builds an [`EofConfig`] keeping `k` modes.
pub fn build_eof_config(k: usize) -> Result<EofConfig> {
    let cfg = EofConfig::new().with_n_modes(k);
    cfg.validate().context("invalid eof_k")?;
    Ok(cfg)
}
