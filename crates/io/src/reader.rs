//! High-level NetCDF reader configuration and orchestration.

use std::path::{Path, PathBuf};

use enso_calendar::{MonthlyAxis, YearMonth};
use enso_field::{Field, Grid, TimeSeries};
use ndarray::Array3;
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading one monthly variable from NetCDF files.
///
/// Use the builder methods (`with_*`) to choose the variable, coordinate
/// aliases, the year window, and masking behaviour. The [`Default`]
/// implementation reads `sst` with CF-convention coordinate names.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// NetCDF variable holding the data.
    variable: String,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up the time coordinate.
    time_aliases: Vec<String>,
    /// Inclusive year window to keep, `None` for everything.
    years: Option<(i32, i32)>,
    /// Inclusive physical range outside which values are masked.
    valid_range: Option<(f64, f64)>,
    /// Mask cells that are missing at any time step.
    constant_mask: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            variable: "sst".into(),
            lon_aliases: vec!["lon".into(), "longitude".into(), "x".into()],
            lat_aliases: vec!["lat".into(), "latitude".into(), "y".into()],
            time_aliases: vec!["time".into(), "time_counter".into(), "t".into()],
            years: None,
            valid_range: None,
            constant_mask: false,
        }
    }
}

impl ReaderConfig {
    /// Default configuration for `variable`.
    pub fn new(variable: impl Into<String>) -> Self {
        Self::default().with_variable(variable)
    }

    /// Set the data variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.lon_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the latitude aliases.
    pub fn with_lat_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.lat_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the time coordinate aliases.
    pub fn with_time_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.time_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only months whose year is in `start_year..=end_year`.
    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.years = Some((start_year, end_year));
        self
    }

    /// Mask values outside `lo..=hi` after unpacking.
    pub fn with_valid_range(mut self, lo: f64, hi: f64) -> Self {
        self.valid_range = Some((lo, hi));
        self
    }

    /// Enable or disable the constant mask.
    ///
    /// Only gridded reads ([`read_field`]) apply it: a cell missing at any
    /// time step is masked throughout. A 1-D series has a single cell, so
    /// [`read_series`] keeps its missing months as they are and ignores
    /// the flag.
    pub fn with_constant_mask(mut self, enabled: bool) -> Self {
        self.constant_mask = enabled;
        self
    }

    /// Data variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Year window, if any.
    pub fn years(&self) -> Option<(i32, i32)> {
        self.years
    }

    /// Valid range, if any.
    pub fn valid_range(&self) -> Option<(f64, f64)> {
        self.valid_range
    }

    /// Whether the constant mask is applied.
    pub fn constant_mask(&self) -> bool {
        self.constant_mask
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every problem found: an empty
    /// variable name or alias list, a reversed year window, or an empty or
    /// non-finite valid range.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.variable.trim().is_empty() {
            problems.push("variable name is empty".to_string());
        }
        for (what, aliases) in [
            ("longitude", &self.lon_aliases),
            ("latitude", &self.lat_aliases),
            ("time", &self.time_aliases),
        ] {
            if aliases.is_empty() {
                problems.push(format!("no {what} aliases"));
            }
        }
        if let Some((start, end)) = self.years
            && start > end
        {
            problems.push(format!("year window {start}-{end} is reversed"));
        }
        if let Some((lo, hi)) = self.valid_range
            && !(lo.is_finite() && hi.is_finite() && lo < hi)
        {
            problems.push(format!("valid range [{lo}, {hi}] is empty or non-finite"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    fn aliases(list: &[String]) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// Per-file chunks
// ---------------------------------------------------------------------------

/// Months and flattened values read from one file.
struct Chunk {
    path: PathBuf,
    months: Vec<YearMonth>,
    grid: Option<Grid>,
    values: Vec<f64>,
}

/// Time length and non-time dimension sizes.
///
/// Singleton dimensions (a surface level, say) are dropped when the variable
/// has more than `want` non-time dimensions.
fn spatial_dims(var: &netcdf::Variable<'_>, want: usize) -> (usize, Vec<usize>) {
    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let nt = dims.first().copied().unwrap_or(0);
    let mut rest: Vec<usize> = dims.iter().skip(1).copied().collect();
    if rest.len() > want {
        rest.retain(|&n| n != 1);
    }
    (nt, rest)
}

fn read_field_chunk(path: &Path, config: &ReaderConfig) -> Result<Chunk, IoError> {
    let file = netcdf_read::open_file(path)?;

    // -- Coordinates --------------------------------------------------------

    let lons = netcdf_read::read_1d_f64(&file, &ReaderConfig::aliases(&config.lon_aliases), path)?;
    let lats = netcdf_read::read_1d_f64(&file, &ReaderConfig::aliases(&config.lat_aliases), path)?;
    let months =
        netcdf_read::read_time_months(&file, &ReaderConfig::aliases(&config.time_aliases), path)?;

    // -- Data ---------------------------------------------------------------

    let var = netcdf_read::find_variable(&file, &[config.variable.as_str()], path)?;
    let (nt, rest) = spatial_dims(&var, 2);
    if rest.len() != 2 {
        return Err(IoError::DimensionMismatch {
            name: format!("{} spatial dimensions", config.variable),
            expected: 2,
            got: rest.len(),
        });
    }
    for (name, expected, got) in [
        ("time", months.len(), nt),
        ("lat", lats.len(), rest[0]),
        ("lon", lons.len(), rest[1]),
    ] {
        if expected != got {
            return Err(IoError::DimensionMismatch {
                name: name.to_string(),
                expected,
                got,
            });
        }
    }

    let values = netcdf_read::read_masked(&var, config.valid_range)?;
    debug!(
        path = %path.display(),
        variable = %config.variable,
        n_time = nt,
        n_lat = lats.len(),
        n_lon = lons.len(),
        "read field chunk"
    );

    Ok(Chunk {
        path: path.to_path_buf(),
        months,
        grid: Some(Grid::new(lats, lons)?),
        values,
    })
}

fn read_series_chunk(path: &Path, config: &ReaderConfig) -> Result<Chunk, IoError> {
    let file = netcdf_read::open_file(path)?;
    let months =
        netcdf_read::read_time_months(&file, &ReaderConfig::aliases(&config.time_aliases), path)?;

    let var = netcdf_read::find_variable(&file, &[config.variable.as_str()], path)?;
    let (nt, rest) = spatial_dims(&var, 0);
    if !rest.is_empty() {
        return Err(IoError::DimensionMismatch {
            name: format!("{} non-time dimensions", config.variable),
            expected: 0,
            got: rest.len(),
        });
    }
    if nt != months.len() {
        return Err(IoError::DimensionMismatch {
            name: "time".to_string(),
            expected: months.len(),
            got: nt,
        });
    }

    let values = netcdf_read::read_masked(&var, config.valid_range)?;
    Ok(Chunk {
        path: path.to_path_buf(),
        months,
        grid: None,
        values,
    })
}

/// Orders chunks in time and joins them into one contiguous axis.
///
/// Overlapping or gapped files surface as a non-contiguous axis error.
fn join_chunks(mut chunks: Vec<Chunk>) -> Result<(MonthlyAxis, Option<Grid>, Vec<f64>), IoError> {
    chunks.sort_by_key(|c| c.months.first().copied());

    let grid = chunks.first().and_then(|c| c.grid.clone());
    if let Some(odd) = chunks.iter().find(|c| c.grid != grid) {
        return Err(IoError::Validation {
            count: 1,
            details: format!("{} is on a different grid", odd.path.display()),
        });
    }

    let months: Vec<YearMonth> = chunks.iter().flat_map(|c| c.months.iter().copied()).collect();
    let axis = MonthlyAxis::from_months(&months)?;
    let values = chunks.into_iter().flat_map(|c| c.values).collect();
    Ok((axis, grid, values))
}

fn require_paths<P: AsRef<Path>>(paths: &[P]) -> Result<(), IoError> {
    if paths.is_empty() {
        return Err(IoError::Validation {
            count: 1,
            details: "no input files given".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// read_field / read_series
// ---------------------------------------------------------------------------

/// Read a monthly `(time, lat, lon)` field from one or more NetCDF files.
///
/// Files are ordered by their first month and concatenated; together they
/// must form a gap-free monthly axis on a single grid. A singleton level
/// dimension is tolerated. Fill values are masked to NaN, then the year
/// window and constant mask from `config` are applied.
///
/// # Errors
///
/// Returns [`IoError`] on missing files or variables, unexpected
/// dimensions, undecodable time coordinates, gaps or overlaps between files,
/// or a year window outside the data.
pub fn read_field<P: AsRef<Path>>(paths: &[P], config: &ReaderConfig) -> Result<Field, IoError> {
    config.validate()?;
    require_paths(paths)?;

    let chunks = paths
        .iter()
        .map(|p| read_field_chunk(p.as_ref(), config))
        .collect::<Result<Vec<_>, _>>()?;
    let (axis, grid, values) = join_chunks(chunks)?;
    let grid = grid.ok_or_else(|| IoError::Validation {
        count: 1,
        details: "field files carry no grid".to_string(),
    })?;

    let shape = (axis.len(), grid.n_lat(), grid.n_lon());
    let data = Array3::from_shape_vec(shape, values).map_err(|e| IoError::Validation {
        count: 1,
        details: format!("data does not fit {shape:?}: {e}"),
    })?;
    let mut field = Field::new(axis, grid, data)?;

    if let Some((start, end)) = config.years {
        field = field.select_years(start, end)?;
    }
    if config.constant_mask {
        let (masked, n_masked) = enso_field::constant_mask(&field)?;
        if n_masked > 0 {
            info!(variable = %config.variable, n_masked, "masked intermittently missing cells");
        }
        field = masked;
    }

    info!(
        variable = %config.variable,
        files = paths.len(),
        epoch = %field.axis().epoch(),
        n_lat = field.grid().n_lat(),
        n_lon = field.grid().n_lon(),
        "loaded field"
    );
    Ok(field)
}

/// Read a monthly 1-D series from one or more NetCDF files.
///
/// Same concatenation, fill-value masking, and year selection rules as
/// [`read_field`]; the variable may only carry singleton dimensions besides
/// time. The constant mask is not applied, so a missing month stays
/// missing without blanking the rest of the series.
///
/// # Errors
///
/// Returns [`IoError`] under the same conditions as [`read_field`].
pub fn read_series<P: AsRef<Path>>(
    paths: &[P],
    config: &ReaderConfig,
) -> Result<TimeSeries, IoError> {
    config.validate()?;
    require_paths(paths)?;

    let chunks = paths
        .iter()
        .map(|p| read_series_chunk(p.as_ref(), config))
        .collect::<Result<Vec<_>, _>>()?;
    let (axis, _, values) = join_chunks(chunks)?;
    let mut series = TimeSeries::new(axis, values)?;

    if let Some((start, end)) = config.years {
        series = series.select_years(start, end)?;
    }
    if config.constant_mask {
        debug!(variable = %config.variable, "constant mask does not apply to a series");
    }

    info!(
        variable = %config.variable,
        files = paths.len(),
        epoch = %series.axis().epoch(),
        "loaded series"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ReaderConfig::default();
        assert_eq!(config.variable(), "sst");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = ReaderConfig::new("pr")
            .with_years(1980, 2024)
            .with_valid_range(0.0, 500.0)
            .with_constant_mask(true);
        assert_eq!(config.variable(), "pr");
        assert_eq!(config.years(), Some((1980, 2024)));
        assert_eq!(config.valid_range(), Some((0.0, 500.0)));
        assert!(config.constant_mask());
    }

    #[test]
    fn validate_accumulates_problems() {
        let config = ReaderConfig::new("")
            .with_years(2000, 1990)
            .with_valid_range(1.0, 1.0)
            .with_time_aliases(Vec::<String>::new());
        match config.validate() {
            Err(IoError::Validation { count, details }) => {
                assert_eq!(count, 4);
                assert!(details.contains("reversed"));
                assert!(details.contains("time aliases"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_path_list_rejected() {
        let paths: [&str; 0] = [];
        let err = read_field(&paths, &ReaderConfig::default()).expect_err("no files");
        assert!(err.to_string().contains("no input files"));
    }

    #[test]
    fn missing_file_reported() {
        let err = read_series(&["/nonexistent/hadcrut.nc"], &ReaderConfig::new("tas_mean"))
            .expect_err("missing file");
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
