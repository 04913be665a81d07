//! Errors raised while reading or writing gridded NetCDF data.

use std::path::PathBuf;

use enso_calendar::CalendarError;
use enso_field::FieldError;

/// Failure of a read or write in `enso-io`.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// An input path does not exist.
    #[error("no such input file: {}", path.display())]
    FileNotFound {
        /// Path as given.
        path: PathBuf,
    },

    /// The NetCDF library rejected an open, read, define or write call.
    #[error("netcdf: {reason}")]
    Netcdf {
        /// Library message.
        reason: String,
    },

    /// Decoded months do not form one contiguous axis.
    #[error("time axis: {source}")]
    Calendar {
        /// Underlying axis error.
        #[from]
        source: CalendarError,
    },

    /// The decoded data could not be assembled into a field.
    #[error("field assembly: {source}")]
    Field {
        /// Underlying data-model error.
        #[from]
        source: FieldError,
    },

    /// Reader settings or an output file definition are unusable.
    #[error("{count} problem(s) found: {details}")]
    Validation {
        /// Number of problems.
        count: usize,
        /// Problems joined with `"; "`.
        details: String,
    },

    /// None of the accepted names for a variable or coordinate is present.
    #[error("no variable {name:?} in {}", path.display())]
    MissingVariable {
        /// First accepted name.
        name: String,
        /// File searched.
        path: PathBuf,
    },

    /// A variable has the wrong rank or a coordinate the wrong length.
    #[error("{name}: expected {expected}, found {got}")]
    DimensionMismatch {
        /// Variable or dimension name.
        name: String,
        /// Expected rank or length.
        expected: usize,
        /// Actual rank or length.
        got: usize,
    },

    /// CF `units`/`calendar` attributes or a time value cannot be decoded.
    #[error("cannot decode time: {reason}")]
    InvalidTime {
        /// What was wrong.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_name_the_offending_item() {
        let missing = IoError::MissingVariable {
            name: "sst".to_string(),
            path: PathBuf::from("/data/HadISST.nc"),
        };
        assert_eq!(missing.to_string(), "no variable \"sst\" in /data/HadISST.nc");

        let rank = IoError::DimensionMismatch {
            name: "lat".to_string(),
            expected: 180,
            got: 90,
        };
        assert_eq!(rank.to_string(), "lat: expected 180, found 90");

        let time = IoError::InvalidTime {
            reason: "unit \"fortnights\"".to_string(),
        };
        assert_eq!(time.to_string(), "cannot decode time: unit \"fortnights\"");
    }

    #[test]
    fn library_errors_convert() {
        let nc: IoError = netcdf::Error::Str("bad id".to_string()).into();
        assert!(matches!(nc, IoError::Netcdf { ref reason } if reason.contains("bad id")));

        let cal: IoError = CalendarError::EmptyAxis.into();
        assert!(cal.to_string().starts_with("time axis: "));
        assert!(cal.source().is_some());

        let field: IoError = FieldError::GridMismatch.into();
        assert_eq!(field.to_string(), "field assembly: grids differ between operands");
    }

    #[test]
    fn usable_across_threads() {
        fn check<T: Send + Sync + std::error::Error + 'static>() {}
        check::<IoError>();
    }
}
