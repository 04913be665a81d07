//! # enso-eof
//!
//! Empirical orthogonal function (EOF) analysis of gridded monthly fields.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Field (detrended anomalies)"] -->|"centre + sqrt(cos lat)"| B["X (time x cells)"]
//!     B -->|"X X^T or X^T X"| C["SymmetricEigen"]
//!     C -->|"sort descending, truncate to rank"| D["EofResult"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use enso_eof::{EofConfig, compute_eofs};
//!
//! let result = compute_eofs(&ssta, &EofConfig::new().with_n_modes(5))?;
//! let eof1 = &result.modes[0];
//! println!("EOF1 explains {:.1}%", 100.0 * eof1.explained_variance);
//! ```

mod config;
mod decompose;
mod error;
mod result;

pub use config::EofConfig;
pub use decompose::compute_eofs;
pub use error::EofError;
pub use result::{EofMode, EofResult};
