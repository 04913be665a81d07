use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration, usually `enso.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsoConfig {
    /// Directory receiving NetCDF outputs and JSON summaries.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Climatology reference period `[start_year, end_year]`.
    #[serde(default = "default_reference_period")]
    pub reference_period: [i32; 2],

    /// Number of EOF modes kept.
    #[serde(default = "default_eof_k")]
    pub eof_k: usize,

    /// Extra or overriding regions, keyed by name.
    #[serde(default)]
    pub regions: BTreeMap<String, RegionToml>,

    /// Extra or overriding seasons, keyed by name.
    #[serde(default)]
    pub seasons: BTreeMap<String, SeasonToml>,

    /// Input datasets keyed by role: `sst`, `gsat`, `pr`, `ssh`.
    #[serde(default)]
    pub data: BTreeMap<String, DataToml>,

    /// Per-figure analysis windows.
    #[serde(default)]
    pub figures: FiguresToml,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data_output")
}
fn default_reference_period() -> [i32; 2] {
    [1980, 2024]
}
fn default_eof_k() -> usize {
    5
}
fn default_true() -> bool {
    true
}

/// Bounding box in degrees.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionToml {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

/// Three consecutive months and the year the season is attributed to,
/// relative to its first month.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonToml {
    pub months: [u8; 3],
    #[serde(default)]
    pub year_offset: Option<i32>,
}

/// One input dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    /// Files concatenated along time.
    pub paths: Vec<PathBuf>,
    /// Main variable.
    pub variable: String,
    /// Further variables read from the same files (uncertainty bounds).
    #[serde(default)]
    pub extra_variables: Vec<String>,
    /// Mask cells missing at any time step.
    #[serde(default = "default_true")]
    pub ensure_constant_mask: bool,
    /// Physical range outside which values are masked.
    #[serde(default)]
    pub valid_range: Option<[f64; 2]>,
    /// Latitude coordinate names tried in order, replacing the defaults.
    #[serde(default)]
    pub lat_names: Option<Vec<String>>,
    /// Longitude coordinate names tried in order, replacing the defaults.
    #[serde(default)]
    pub lon_names: Option<Vec<String>>,
    /// Time coordinate names tried in order, replacing the defaults.
    #[serde(default)]
    pub time_names: Option<Vec<String>>,
}

/// Analysis window of one figure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureToml {
    pub years: [i32; 2],
}

impl FigureToml {
    fn spanning(start: i32, end: i32) -> Self {
        Self { years: [start, end] }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiguresToml {
    #[serde(default = "default_recent")]
    pub f1a: FigureToml,
    #[serde(default = "default_instrumental")]
    pub f1b: FigureToml,
    #[serde(default = "default_recent")]
    pub f1c: FigureToml,
    #[serde(default = "default_recent")]
    pub f1d: FigureToml,
    #[serde(default = "default_recent")]
    pub f7a: FigureToml,
    #[serde(default = "default_century")]
    pub t1: FigureToml,
}

impl Default for FiguresToml {
    fn default() -> Self {
        Self {
            f1a: default_recent(),
            f1b: default_instrumental(),
            f1c: default_recent(),
            f1d: default_recent(),
            f7a: default_recent(),
            t1: default_century(),
        }
    }
}

fn default_recent() -> FigureToml {
    FigureToml::spanning(1980, 2024)
}
fn default_instrumental() -> FigureToml {
    FigureToml::spanning(1850, 2024)
}
fn default_century() -> FigureToml {
    FigureToml::spanning(1925, 2024)
}
