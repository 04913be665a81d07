//! # enso-seasonal
//!
//! Seasonal (three-month) aggregation and yearly containers.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["TimeSeries"] -->|"season_mean(NDJ)"| B["YearlySeries"]
//!     C["Field"] -->|"season_mean_field(JJA)"| D["YearlyField"]
//!     D -->|"percent_of_climatology()"| E["YearlyField (%)"]
//!     A -->|"lead_lag(window)"| F["LeadLagMatrix (year x lag)"]
//!     B -->|".shift_years(-1)"| B
//! ```
//!
//! Seasons are attributed to the year of their last month: NDJ built from
//! November/December 1997 and January 1998 is labelled 1998. Only complete
//! seasons are emitted and a missing month makes the whole season missing.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `season` | Seasonal means of series and fields |
//! | `yearly` | `YearlySeries`, `YearlyField`, percentage change |
//! | `lead_lag` | Per-year monthly windows |
//! | `error` | Error types |

mod error;
mod lead_lag;
mod season;
mod yearly;

pub use error::SeasonalError;
pub use lead_lag::{LeadLagMatrix, lead_lag};
pub use season::{season_mean, season_mean_field};
pub use yearly::{YearlyField, YearlySeries, common_years, percent_of_climatology};
