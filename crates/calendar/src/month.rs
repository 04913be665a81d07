//! Year–month values on the proleptic Gregorian calendar.

use std::fmt;

use crate::error::CalendarError;

/// Days in each month of a non-leap year.
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Returns `true` for Gregorian leap years.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year` (Gregorian).
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
pub fn days_in_month(year: i32, month: u8) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    let days = DAYS_IN_MONTH[(month - 1) as usize];
    Ok(if month == 2 && is_leap_year(year) {
        days + 1
    } else {
        days
    })
}

/// A calendar month with year context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Creates a new `YearMonth`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// January of `year`.
    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Zero-based month index (0 = January), used for climatology lookups.
    pub fn month_index(self) -> usize {
        (self.month - 1) as usize
    }

    /// Number of days in this month.
    pub fn days(self) -> u32 {
        let days = DAYS_IN_MONTH[self.month_index()];
        if self.month == 2 && is_leap_year(self.year) {
            days + 1
        } else {
            days
        }
    }

    /// The following month, wrapping December into January of the next year.
    pub fn next(self) -> Self {
        self.offset(1)
    }

    /// Shifts by a signed number of months.
    pub fn offset(self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() + months)
    }

    /// Signed number of months from `other` to `self`.
    pub fn months_since(self, other: YearMonth) -> i64 {
        self.ordinal() - other.ordinal()
    }

    fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(12) as i32;
        let month = (ordinal.rem_euclid(12) + 1) as u8;
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_month_zero_and_thirteen() {
        assert!(YearMonth::new(2000, 0).is_err());
        assert!(YearMonth::new(2000, 13).is_err());
        assert!(YearMonth::new(2000, 12).is_ok());
    }

    #[test]
    fn next_wraps_year() {
        let dec = YearMonth::new(1999, 12).unwrap();
        let jan = dec.next();
        assert_eq!(jan.year(), 2000);
        assert_eq!(jan.month(), 1);
    }

    #[test]
    fn negative_offset_wraps_back() {
        let jan = YearMonth::new(2000, 1).unwrap();
        let nov = jan.offset(-2);
        assert_eq!((nov.year(), nov.month()), (1999, 11));
        assert_eq!(jan.months_since(nov), 2);
    }

    #[test]
    fn ordering_follows_time() {
        let a = YearMonth::new(1999, 12).unwrap();
        let b = YearMonth::new(2000, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn leap_february() {
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days(), 28);
        assert!(days_in_month(2023, 0).is_err());
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(YearMonth::new(987, 3).unwrap().to_string(), "0987-03");
    }
}
