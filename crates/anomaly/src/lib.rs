//! # enso-anomaly
//!
//! Monthly climatologies, anomalies, linear detrending and running means.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["TimeSeries / Field"] -->|"Climatology::from_*(period)"| B["Climatology (12 x points)"]
//!     B -->|".anomalies()"| C["anomalies"]
//!     B -->|".normalized_anomalies()"| D["normalized anomalies"]
//!     C -->|"detrend_linear() / detrend_field()"| E["detrended anomalies"]
//!     A -->|"running_mean(12)"| F["smoothed series"]
//! ```
//!
//! Standard deviations use the population (N) denominator. A month with
//! fewer than 2 valid reference years, or zero spread, has a missing
//! normalized anomaly rather than an infinite one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use enso_anomaly::{Climatology, ReferencePeriod, detrend_linear};
//!
//! let clim = Climatology::from_series(&nino34, ReferencePeriod::new(1980, 2024)?)?;
//! let ssta = detrend_linear(&clim.anomalies(&nino34)?)?;
//! let index = clim.normalized_anomalies(&nino34)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `climatology` | Reference periods, climatologies and anomalies |
//! | `detrend` | Least-squares linear detrending |
//! | `smoothing` | Days-weighted centred running mean |
//! | `error` | Error types |

mod climatology;
mod detrend;
mod error;
mod smoothing;

pub use climatology::{
    Climatology, ReferencePeriod, anomalies, field_anomalies, normalized_anomalies,
};
pub use detrend::{LinearTrend, detrend_field, detrend_linear, detrend_values, fit_linear_trend};
pub use error::AnomalyError;
pub use smoothing::running_mean;
