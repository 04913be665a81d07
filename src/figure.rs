//! Figure registry and the shared context figures run in.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::info;

use enso_anomaly::ReferencePeriod;
use enso_calendar::Season;
use enso_field::{Field, Region, TimeSeries};
use enso_io::{read_field, read_series};

use crate::config::{DataToml, EnsoConfig};
use crate::convert;

/// Year of the first lead-lag month, relative to the index year.
pub const LEAD_LAG_START_OFFSET_YEARS: i32 = -2;

/// Months per lead-lag row.
pub const LEAD_LAG_WINDOW: usize = 48;

/// A figure's diagnostics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    F1a,
    F1b,
    F1c,
    F1d,
    F7a,
    T1,
}

impl Figure {
    /// Every figure, in run order.
    pub const ALL: [Figure; 6] = [
        Figure::F1a,
        Figure::F1b,
        Figure::F1c,
        Figure::F1d,
        Figure::F7a,
        Figure::T1,
    ];

    /// Identifier used on the command line and in file names.
    pub fn id(self) -> &'static str {
        match self {
            Figure::F1a => "f1a",
            Figure::F1b => "f1b",
            Figure::F1c => "f1c",
            Figure::F1d => "f1d",
            Figure::F7a => "f7a",
            Figure::T1 => "t1",
        }
    }

    /// One-line description for `enso list`.
    pub fn description(self) -> &'static str {
        match self {
            Figure::F1a => "leading EOF of detrended global SST anomalies",
            Figure::F1b => "12-month running mean of global mean surface air temperature",
            Figure::F1c => "GSAT anomalies regressed on the NDJ Nino3.4 rSST index, by lag",
            Figure::F1d => "JJA precipitation change (%) regressed on the following NDJ index",
            Figure::F7a => "relative SSH anomalies correlated with the NDJ index, by lag",
            Figure::T1 => "monthly Nino3.4 rSSTA, SSTA and detrended SSTA",
        }
    }

    /// Datasets the figure reads.
    pub fn datasets(self) -> &'static [&'static str] {
        match self {
            Figure::F1a | Figure::T1 => &["sst"],
            Figure::F1b => &["gsat"],
            Figure::F1c => &["sst", "gsat"],
            Figure::F1d => &["sst", "pr"],
            Figure::F7a => &["sst", "ssh"],
        }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Figure {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Figure::ALL
            .into_iter()
            .find(|f| f.id() == wanted)
            .ok_or_else(|| anyhow!("unknown figure {s:?} (try `enso list`)"))
    }
}

/// Settings shared by every figure of one run.
pub struct FigureContext<'a> {
    config: &'a EnsoConfig,
    output_dir: PathBuf,
    reference: ReferencePeriod,
}

impl<'a> FigureContext<'a> {
    /// Context for `config`, with CLI overrides already resolved.
    pub fn new(config: &'a EnsoConfig, output_dir: PathBuf, reference: ReferencePeriod) -> Self {
        Self {
            config,
            output_dir,
            reference,
        }
    }

    /// Parsed configuration.
    pub fn config(&self) -> &EnsoConfig {
        self.config
    }

    /// Climatology reference period.
    pub fn reference(&self) -> ReferencePeriod {
        self.reference
    }

    /// Region by name, configured boxes first.
    pub fn region(&self, name: &str) -> Result<Region> {
        convert::build_region(name, &self.config.regions)
    }

    /// Season by name, configured seasons first.
    pub fn season(&self, name: &str) -> Result<Season> {
        convert::build_season(name, &self.config.seasons)
    }

    fn dataset(&self, name: &str) -> Result<&DataToml> {
        self.config
            .data
            .get(name)
            .ok_or_else(|| anyhow!("no [data.{name}] section in config"))
    }

    /// Loads the main variable of a gridded dataset over `years`.
    pub fn load_field(&self, dataset: &str, years: [i32; 2]) -> Result<Field> {
        let data = self.dataset(dataset)?;
        let reader = convert::build_reader_config(data, &data.variable, years)?;
        read_field(&data.paths, &reader).with_context(|| {
            format!(
                "failed to load {dataset} variable {:?} for {}-{}",
                data.variable, years[0], years[1]
            )
        })
    }

    /// Variables of a series dataset: the main one followed by the extras.
    pub fn series_variables(&self, dataset: &str) -> Result<Vec<String>> {
        let data = self.dataset(dataset)?;
        Ok(std::iter::once(data.variable.clone())
            .chain(data.extra_variables.iter().cloned())
            .collect())
    }

    /// Loads one variable of a series dataset over `years`.
    pub fn load_series(&self, dataset: &str, variable: &str, years: [i32; 2]) -> Result<TimeSeries> {
        let data = self.dataset(dataset)?;
        let reader = convert::build_reader_config(data, variable, years)?;
        read_series(&data.paths, &reader).with_context(|| {
            format!(
                "failed to load {dataset} variable {variable:?} for {}-{}",
                years[0], years[1]
            )
        })
    }

    /// Path of an output file, creating the output directory if needed.
    pub fn output_path(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output directory {}", self.output_dir.display())
        })?;
        Ok(self.output_dir.join(file_name))
    }

    /// Writes a figure's JSON summary next to its NetCDF output.
    pub fn write_summary(&self, summary: &FigureSummary) -> Result<PathBuf> {
        let path = self.output_path(&format!("{}.json", summary.figure))?;
        let json = to_json(summary)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!(figure = %summary.figure, path = %path.display(), "summary written");
        Ok(path)
    }
}

/// Machine-readable record of what a figure produced.
#[derive(Debug, Serialize)]
pub struct FigureSummary {
    /// Figure identifier.
    pub figure: String,
    /// Analysis window as `"YYYY-MM to YYYY-MM"`.
    pub epoch: String,
    /// Reference period of the climatology, `"YYYY-YYYY"`.
    pub reference_period: String,
    /// Files written.
    pub outputs: Vec<PathBuf>,
    /// Figure-specific numbers.
    pub details: serde_json::Value,
}

impl FigureSummary {
    /// Summary of `figure` for the window `epoch`.
    pub fn new(figure: Figure, epoch: String, reference: ReferencePeriod) -> Self {
        Self {
            figure: figure.id().to_string(),
            epoch,
            reference_period: reference.to_string(),
            outputs: Vec::new(),
            details: serde_json::Value::Null,
        }
    }

    /// Records a written file.
    pub fn with_output(mut self, path: &Path) -> Self {
        self.outputs.push(path.to_path_buf());
        self
    }

    /// Attaches figure-specific numbers.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Pretty JSON; missing (`NaN`) values come out as `null`.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize summary")
}

/// Checks that every dataset a figure needs is configured.
pub fn check_datasets(figure: Figure, config: &EnsoConfig) -> Result<()> {
    let missing: Vec<&str> = figure
        .datasets()
        .iter()
        .copied()
        .filter(|d| !config.data.contains_key(*d))
        .collect();
    if !missing.is_empty() {
        bail!(
            "figure {figure} needs dataset(s) {} (add [data.<name>] sections)",
            missing.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_ids_round_trip() {
        for f in Figure::ALL {
            assert_eq!(f.id().parse::<Figure>().unwrap(), f);
        }
        assert_eq!("F1A".parse::<Figure>().unwrap(), Figure::F1a);
        assert!("f2".parse::<Figure>().is_err());
    }

    #[test]
    fn missing_dataset_named() {
        let config: EnsoConfig = toml::from_str(
            "[data.sst]\npaths = [\"a.nc\"]\nvariable = \"sst\"",
        )
        .unwrap();
        assert!(check_datasets(Figure::T1, &config).is_ok());
        let err = check_datasets(Figure::F1d, &config).unwrap_err();
        assert!(err.to_string().contains("pr"));
    }

    #[test]
    fn summary_serializes_nan_as_null() {
        let reference = ReferencePeriod::default();
        let summary = FigureSummary::new(Figure::F1c, "1980-01 to 2024-12".to_string(), reference)
            .with_details(serde_json::json!({ "slope": [1.5, f64::NAN] }));
        let json = to_json(&summary).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["figure"], "f1c");
        assert_eq!(parsed["reference_period"], "1980-2024");
        assert_eq!(parsed["details"]["slope"][0], 1.5);
        assert!(parsed["details"]["slope"][1].is_null());
    }
}
