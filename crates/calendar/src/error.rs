//! Error types for the enso-calendar crate.

/// Error type for all fallible operations in the enso-calendar crate.
///
/// Covers month validation, monthly time axis construction, and
/// three-month season definitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a monthly axis would contain no time steps.
    #[error("monthly axis must contain at least one month")]
    EmptyAxis,

    /// Returned when consecutive axis entries are not one calendar month apart.
    #[error("monthly axis not contiguous at index {index}: expected {expected}, got {got}")]
    NonContiguous {
        /// Position of the offending entry.
        index: usize,
        /// The month that should have appeared at `index`.
        expected: String,
        /// The month that actually appeared at `index`.
        got: String,
    },

    /// Returned when an index range falls outside the axis.
    #[error("index range {start}..{end} out of bounds for axis of length {len}")]
    InvalidRange {
        /// Start of the requested range.
        start: usize,
        /// End (exclusive) of the requested range.
        end: usize,
        /// Length of the axis.
        len: usize,
    },

    /// Returned when a season name is not one of the standard three-month names.
    #[error("unknown season: {name:?}")]
    UnknownSeason {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when the months of a season are not consecutive (mod 12).
    #[error("season {name:?} months {months:?} are not consecutive")]
    NonConsecutiveSeason {
        /// Season name.
        name: String,
        /// The months that were provided.
        months: [u8; 3],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_month() {
        let err = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_non_contiguous() {
        let err = CalendarError::NonContiguous {
            index: 3,
            expected: "2000-04".to_string(),
            got: "2000-05".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "monthly axis not contiguous at index 3: expected 2000-04, got 2000-05"
        );
    }

    #[test]
    fn error_unknown_season() {
        let err = CalendarError::UnknownSeason {
            name: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "unknown season: \"XYZ\"");
    }

    #[test]
    fn error_non_consecutive() {
        let err = CalendarError::NonConsecutiveSeason {
            name: "odd".to_string(),
            months: [1, 3, 5],
        };
        assert_eq!(
            err.to_string(),
            "season \"odd\" months [1, 3, 5] are not consecutive"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_partial_eq() {
        let a = CalendarError::InvalidMonth { month: 0 };
        let b = CalendarError::InvalidMonth { month: 0 };
        assert_eq!(a, b);
        assert_ne!(a, CalendarError::EmptyAxis);
    }
}
