//! # enso-io
//!
//! Load monthly CF NetCDF data into [`enso_field`] types and write
//! diagnostic results back out as NetCDF.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     F["*.nc (one or more)"] -->|"time units + calendar"| T["YearMonth per step"]
//!     F -->|"_FillValue / scale_factor"| V["masked f64"]
//!     T --> J{"join + year window"}
//!     V --> J
//!     J -->|"read_field()"| FI["Field"]
//!     J -->|"read_series()"| S["TimeSeries"]
//!     R["maps / curves / series"] -->|"OutputFile::write()"| O["*.nc"]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use enso_io::{ReaderConfig, read_field};
//!
//! let config = ReaderConfig::new("sst").with_years(1950, 2024);
//! let field = read_field(&["data/HadISST_sst.nc"], &config)?;
//! println!("{}", field.axis().epoch());
//! # Ok::<(), enso_io::IoError>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `time` | CF time units and calendars |
//! | `reader` | Reader configuration, `read_field`, `read_series` |
//! | `writer` | In-memory output file builder |
//! | `error` | Error types |

mod error;
mod netcdf_read;
mod reader;
mod time;
mod writer;

pub use error::IoError;
pub use reader::{ReaderConfig, read_field, read_series};
pub use time::{CfCalendar, TimeUnit, TimeUnits};
pub use writer::{AttrValue, OutputFile, OutputVariable};
