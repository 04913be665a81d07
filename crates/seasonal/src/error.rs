//! Error types for the enso-seasonal crate.

use enso_calendar::CalendarError;
use enso_field::FieldError;

/// Errors from seasonal aggregation and yearly containers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeasonalError {
    /// Returned when the input axis holds no year with all three months.
    #[error("no complete {season} season in {epoch}")]
    NoCompleteSeason {
        /// Season name.
        season: String,
        /// Extent of the input axis.
        epoch: String,
    },

    /// Returned when a yearly container would be empty.
    #[error("yearly series must contain at least one year")]
    EmptySeries,

    /// Returned when a yearly data array does not match its years and grid.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `(year, lat, lon)` shape.
        expected: [usize; 3],
        /// Actual shape.
        got: [usize; 3],
    },

    /// Returned when two yearly fields sit on different grids.
    #[error("grids differ between operands")]
    GridMismatch,

    /// Returned when a year window does not overlap the data.
    #[error("no years between {start_year} and {end_year}")]
    NoOverlap {
        /// First requested year.
        start_year: i32,
        /// Last requested year.
        end_year: i32,
    },

    /// Returned when a lead-lag window is not a positive multiple of 12.
    #[error("lead-lag window must be a positive multiple of 12, got {window}")]
    InvalidWindow {
        /// The rejected window length.
        window: usize,
    },

    /// Calendar error propagated from season definitions.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Field error propagated from the data model.
    #[error(transparent)]
    Field(#[from] FieldError),
}
