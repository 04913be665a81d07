//! # enso-field
//!
//! In-memory data model for gridded monthly climate fields, plus the spatial
//! operations of the diagnostics pipeline.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Field (time, lat, lon)"] -->|"select_region()"| B["Field (box)"]
//!     B -->|"area_mean()"| C["TimeSeries"]
//!     A -->|"compute_relative(tropic)"| D["relative Field"]
//!     A -->|"constant_mask()"| E["masked Field"]
//! ```
//!
//! Missing values are `NaN` throughout and are never coerced to zero.
//! Area weights are `cos(latitude)`, renormalised over the cells present
//! at each time step.
//!
//! ## Quick Start
//!
//! ```ignore
//! use enso_field::{Region, compute_relative, region_mean};
//!
//! let rsst = compute_relative(&sst, &Region::tropic())?;
//! let index = region_mean(&rsst, &Region::nino34())?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | Rectilinear latitude/longitude grid |
//! | `region` | Bounding boxes and built-in named regions |
//! | `field` | `Field` and `TimeSeries` containers |
//! | `spatial` | Selection, area means, relative fields, masking |
//! | `error` | Error types |

mod error;
mod field;
mod grid;
mod region;
mod spatial;

pub use error::FieldError;
pub use field::{Field, TimeSeries};
pub use grid::Grid;
pub use region::{NAMED_REGIONS, Region, normalize_lon};
pub use spatial::{area_mean, compute_relative, constant_mask, region_mean, select_region};
