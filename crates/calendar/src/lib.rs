//! # enso-calendar
//!
//! Monthly calendar arithmetic for gridded climate records.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["YearMonth"] -->|".next() / .offset()"| A
//!     A -->|"MonthlyAxis::new()"| B["MonthlyAxis"]
//!     B -->|".year_range()"| C["index range"]
//!     D["Season (NDJ, JJA, ...)"] -->|".constituents(year)"| E["[YearMonth; 3]"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use enso_calendar::{MonthlyAxis, Season, YearMonth};
//!
//! let axis = MonthlyAxis::spanning_years(1980, 2024)?;
//! let reference = axis.year_range(1991, 2020).unwrap();
//!
//! // NDJ is attributed to the year of January.
//! let ndj: Season = "NDJ".parse()?;
//! let [nov, dec, jan] = ndj.constituents(1998);
//! assert_eq!(nov, YearMonth::new(1997, 11)?);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Year–month values and month lengths |
//! | `axis` | Contiguous monthly time axis |
//! | `season` | Three-month seasons and year attribution |
//! | `error` | Error types |

mod axis;
mod error;
mod month;
mod season;

pub use axis::MonthlyAxis;
pub use error::CalendarError;
pub use month::{YearMonth, days_in_month, is_leap_year};
pub use season::Season;
