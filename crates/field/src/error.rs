//! Error types for the enso-field crate.

use enso_calendar::CalendarError;

/// Error type for grid, region, and field operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// Returned when a bounding box is malformed.
    #[error("invalid region {name:?}: {reason}")]
    InvalidRegion {
        /// Region name.
        name: String,
        /// What is wrong with the bounds.
        reason: String,
    },

    /// Returned when a region name is not one of the built-in regions.
    #[error("unknown region: {name:?}")]
    UnknownRegion {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when no grid cell centre falls inside a region.
    #[error("region {region:?} contains no grid cells")]
    EmptySelection {
        /// Region name.
        region: String,
    },

    /// Returned when latitude/longitude coordinates are unusable.
    #[error("invalid grid: {reason}")]
    InvalidGrid {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a data array does not match its axis and grid.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `(time, lat, lon)` shape.
        expected: [usize; 3],
        /// Actual shape.
        got: [usize; 3],
    },

    /// Returned when a series length does not match its time axis.
    #[error("series length mismatch: axis has {expected} months, got {got} values")]
    LengthMismatch {
        /// Axis length.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Returned when two fields combined in one operation sit on different grids.
    #[error("grids differ between operands")]
    GridMismatch,

    /// Returned when a requested year window does not overlap the data.
    #[error("no data between {start_year} and {end_year}")]
    NoOverlap {
        /// First requested year.
        start_year: i32,
        /// Last requested year.
        end_year: i32,
    },

    /// Calendar error propagated from the time axis.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_region() {
        let err = FieldError::InvalidRegion {
            name: "box".to_string(),
            reason: "south (5) must be below north (-5)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid region \"box\": south (5) must be below north (-5)"
        );
    }

    #[test]
    fn error_empty_selection() {
        let err = FieldError::EmptySelection {
            region: "nino34".to_string(),
        };
        assert_eq!(err.to_string(), "region \"nino34\" contains no grid cells");
    }

    #[test]
    fn error_shape_mismatch() {
        let err = FieldError::ShapeMismatch {
            expected: [12, 2, 3],
            got: [12, 3, 2],
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected [12, 2, 3], got [12, 3, 2]"
        );
    }

    #[test]
    fn error_from_calendar() {
        let err: FieldError = CalendarError::EmptyAxis.into();
        assert!(matches!(err, FieldError::Calendar(_)));
        assert_eq!(
            err.to_string(),
            "monthly axis must contain at least one month"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<FieldError>();
    }
}
