//! # enso-regression
//!
//! Least-squares regression of yearly targets onto a yearly index such as
//! the normalized NDJ Niño3.4 index.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     I["YearlySeries (index)"] --> A{"common years"}
//!     T["YearlySeries / YearlyField / LeadLagMatrix"] --> A
//!     A -->|"regress()"| P["RegressionPoint"]
//!     A -->|"regress_field() (rayon)"| M["RegressionMap"]
//!     A -->|"regress_lead_lag()"| L["LagRegression"]
//! ```
//!
//! Each fit reports slope, intercept, Pearson r, the Student-t p-value of
//! the slope (`n - 2` degrees of freedom) and the slope standard error.
//! Pairs with a missing index or target value are dropped per point.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Alternative hypothesis and minimum pair count |
//! | `fit` | Point, field and lead-lag regressions |
//! | `result` | Output containers |
//! | `error` | Error types |

mod config;
mod error;
mod fit;
mod result;

pub use config::{Alternative, RegressionConfig};
pub use error::RegressionError;
pub use fit::{regress, regress_field, regress_lead_lag, regress_with};
pub use result::{LagRegression, RegressionMap, RegressionPoint};
