//! Contiguous monthly time axis.

use std::ops::Range;

use crate::error::CalendarError;
use crate::month::YearMonth;

/// A gap-free sequence of calendar months.
///
/// The axis is stored as its first month and a length, so contiguity holds
/// by construction. [`MonthlyAxis::from_months`] validates arbitrary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAxis {
    start: YearMonth,
    len: usize,
}

impl MonthlyAxis {
    /// Creates an axis of `len` months beginning at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::EmptyAxis`] if `len == 0`.
    pub fn new(start: YearMonth, len: usize) -> Result<Self, CalendarError> {
        if len == 0 {
            return Err(CalendarError::EmptyAxis);
        }
        Ok(Self { start, len })
    }

    /// Creates an axis spanning January of `start_year` to December of
    /// `end_year` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::EmptyAxis`] if `end_year < start_year`.
    pub fn spanning_years(start_year: i32, end_year: i32) -> Result<Self, CalendarError> {
        if end_year < start_year {
            return Err(CalendarError::EmptyAxis);
        }
        let start = YearMonth::new(start_year, 1)?;
        let len = ((end_year - start_year + 1) * 12) as usize;
        Self::new(start, len)
    }

    /// Validates a decoded list of months and builds an axis from it.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::EmptyAxis`] for empty input and
    /// [`CalendarError::NonContiguous`] at the first gap, duplicate, or
    /// out-of-order entry.
    pub fn from_months(months: &[YearMonth]) -> Result<Self, CalendarError> {
        let Some(&start) = months.first() else {
            return Err(CalendarError::EmptyAxis);
        };
        for (index, pair) in months.windows(2).enumerate() {
            let expected = pair[0].next();
            if pair[1] != expected {
                return Err(CalendarError::NonContiguous {
                    index: index + 1,
                    expected: expected.to_string(),
                    got: pair[1].to_string(),
                });
            }
        }
        Self::new(start, months.len())
    }

    /// Number of months on the axis.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; an axis holds at least one month.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First month.
    pub fn start(&self) -> YearMonth {
        self.start
    }

    /// Last month.
    pub fn end(&self) -> YearMonth {
        self.start.offset(self.len as i64 - 1)
    }

    /// Month at position `index`, if on the axis.
    pub fn get(&self, index: usize) -> Option<YearMonth> {
        (index < self.len).then(|| self.start.offset(index as i64))
    }

    /// Position of `ym` on the axis.
    pub fn position(&self, ym: YearMonth) -> Option<usize> {
        let offset = ym.months_since(self.start);
        (offset >= 0 && (offset as usize) < self.len).then_some(offset as usize)
    }

    /// Iterates over every month on the axis.
    pub fn iter(&self) -> impl Iterator<Item = YearMonth> + '_ {
        (0..self.len).map(|i| self.start.offset(i as i64))
    }

    /// Index range of the months whose year lies in `start_year..=end_year`,
    /// clipped to the axis. `None` when the window does not overlap.
    pub fn year_range(&self, start_year: i32, end_year: i32) -> Option<Range<usize>> {
        if end_year < start_year {
            return None;
        }
        let first = self
            .start
            .months_since(YearMonth::new(start_year, 1).ok()?)
            .min(0);
        let lo = (-first) as usize;
        let last = YearMonth::new(end_year, 12).ok()?.months_since(self.start);
        if last < 0 || lo >= self.len {
            return None;
        }
        let hi = (last as usize + 1).min(self.len);
        (lo < hi).then_some(lo..hi)
    }

    /// Sub-axis covering `range`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] if the range is empty or runs
    /// past the end of the axis.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, CalendarError> {
        if range.start >= range.end || range.end > self.len {
            return Err(CalendarError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len,
            });
        }
        Self::new(self.start.offset(range.start as i64), range.len())
    }

    /// Human-readable extent, e.g. `"1980-01 to 2024-12"`.
    pub fn epoch(&self) -> String {
        format!("{} to {}", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn spanning_years_has_twelve_months_per_year() {
        let axis = MonthlyAxis::spanning_years(1980, 1982).unwrap();
        assert_eq!(axis.len(), 36);
        assert_eq!(axis.start(), ym(1980, 1));
        assert_eq!(axis.end(), ym(1982, 12));
    }

    #[test]
    fn from_months_detects_gap() {
        let months = [ym(2000, 1), ym(2000, 2), ym(2000, 4)];
        let err = MonthlyAxis::from_months(&months).unwrap_err();
        assert!(matches!(err, CalendarError::NonContiguous { index: 2, .. }));
    }

    #[test]
    fn from_months_detects_duplicate() {
        let months = [ym(2000, 1), ym(2000, 1)];
        assert!(MonthlyAxis::from_months(&months).is_err());
    }

    #[test]
    fn from_months_empty() {
        assert_eq!(
            MonthlyAxis::from_months(&[]).unwrap_err(),
            CalendarError::EmptyAxis
        );
    }

    #[test]
    fn position_round_trips_get() {
        let axis = MonthlyAxis::new(ym(1999, 11), 5).unwrap();
        for i in 0..5 {
            let m = axis.get(i).unwrap();
            assert_eq!(axis.position(m), Some(i));
        }
        assert_eq!(axis.position(ym(1999, 10)), None);
        assert_eq!(axis.position(ym(2000, 4)), None);
    }

    #[test]
    fn year_range_clips_to_axis() {
        let axis = MonthlyAxis::new(ym(1979, 7), 30).unwrap(); // 1979-07 .. 1981-12
        assert_eq!(axis.year_range(1980, 1980), Some(6..18));
        assert_eq!(axis.year_range(1970, 1979), Some(0..6));
        assert_eq!(axis.year_range(1981, 2000), Some(18..30));
        assert_eq!(axis.year_range(1990, 2000), None);
        assert_eq!(axis.year_range(1960, 1970), None);
    }

    #[test]
    fn slice_rejects_out_of_bounds() {
        let axis = MonthlyAxis::spanning_years(2000, 2000).unwrap();
        let sub = axis.slice(2..5).unwrap();
        assert_eq!(sub.start(), ym(2000, 3));
        assert_eq!(sub.len(), 3);
        assert!(axis.slice(10..13).is_err());
        assert!(axis.slice(4..4).is_err());
    }

    #[test]
    fn epoch_label() {
        let axis = MonthlyAxis::spanning_years(1980, 2024).unwrap();
        assert_eq!(axis.epoch(), "1980-01 to 2024-12");
    }
}
