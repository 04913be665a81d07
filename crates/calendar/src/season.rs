//! Three-month seasons and their year attribution.

use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;
use crate::month::YearMonth;

/// Standard three-month season names, indexed by the zero-based month
/// index of their first month minus one (DJF starts in December).
const STANDARD_NAMES: [&str; 12] = [
    "DJF", "JFM", "FMA", "MAM", "AMJ", "MJJ", "JJA", "JAS", "ASO", "SON", "OND", "NDJ",
];

/// A window of three consecutive calendar months.
///
/// A season is attributed to the year of its **last** month: NDJ built from
/// Nov/Dec of year `y` and Jan of `y + 1` belongs to `y + 1`, and DJF from
/// Dec of `y - 1` with Jan/Feb of `y` belongs to `y`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Season {
    name: String,
    months: [u8; 3],
}

impl Season {
    /// Creates a season from an arbitrary name and three months.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] for a month outside 1..=12 and
    /// [`CalendarError::NonConsecutiveSeason`] if the months do not follow
    /// each other (December wraps to January).
    pub fn new(name: impl Into<String>, months: [u8; 3]) -> Result<Self, CalendarError> {
        let name = name.into();
        for &m in &months {
            if !(1..=12).contains(&m) {
                return Err(CalendarError::InvalidMonth { month: m });
            }
        }
        let consecutive = months.windows(2).all(|w| w[1] == w[0] % 12 + 1);
        if !consecutive {
            return Err(CalendarError::NonConsecutiveSeason { name, months });
        }
        Ok(Self { name, months })
    }

    /// June–July–August.
    pub fn jja() -> Self {
        Self {
            name: "JJA".to_string(),
            months: [6, 7, 8],
        }
    }

    /// November–December–January, spanning the year boundary.
    pub fn ndj() -> Self {
        Self {
            name: "NDJ".to_string(),
            months: [11, 12, 1],
        }
    }

    /// December–January–February, spanning the year boundary.
    pub fn djf() -> Self {
        Self {
            name: "DJF".to_string(),
            months: [12, 1, 2],
        }
    }

    /// Season name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The three constituent months in chronological order.
    pub fn months(&self) -> [u8; 3] {
        self.months
    }

    /// `1` if the season begins in the year before it is attributed to.
    pub fn year_offset(&self) -> i32 {
        if self.months[0] > self.months[2] { 1 } else { 0 }
    }

    /// Whether the season crosses the December/January boundary.
    pub fn spans_year_boundary(&self) -> bool {
        self.year_offset() != 0
    }

    /// Calendar months contributing to the season attributed to `year`.
    pub fn constituents(&self, year: i32) -> [YearMonth; 3] {
        let last = YearMonth::january(year).offset(i64::from(self.months[2]) - 1);
        [last.offset(-2), last.offset(-1), last]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Season {
    type Err = CalendarError;

    /// Parses one of the twelve standard names (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let Some(pos) = STANDARD_NAMES.iter().position(|n| *n == upper) else {
            return Err(CalendarError::UnknownSeason {
                name: s.to_string(),
            });
        };
        // DJF (pos 0) starts in December.
        let first = ((pos + 11) % 12) as u8 + 1;
        let months = [first, first % 12 + 1, (first % 12 + 1) % 12 + 1];
        Self::new(upper, months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_standard_names() {
        for name in STANDARD_NAMES {
            let season: Season = name.parse().unwrap();
            assert_eq!(season.name(), name);
        }
    }

    #[test]
    fn parsed_months_match_helpers() {
        assert_eq!("jja".parse::<Season>().unwrap(), Season::jja());
        assert_eq!("NDJ".parse::<Season>().unwrap(), Season::ndj());
        assert_eq!("DJF".parse::<Season>().unwrap(), Season::djf());
        assert_eq!("SON".parse::<Season>().unwrap().months(), [9, 10, 11]);
        assert_eq!("OND".parse::<Season>().unwrap().months(), [10, 11, 12]);
    }

    #[test]
    fn unknown_name_fails() {
        assert!(matches!(
            "XYZ".parse::<Season>(),
            Err(CalendarError::UnknownSeason { .. })
        ));
    }

    #[test]
    fn rejects_non_consecutive() {
        assert!(Season::new("bad", [1, 2, 4]).is_err());
        assert!(Season::new("bad", [0, 1, 2]).is_err());
        assert!(Season::new("wrap", [12, 1, 2]).is_ok());
    }

    #[test]
    fn ndj_is_attributed_to_january_year() {
        let ndj = Season::ndj();
        assert_eq!(ndj.year_offset(), 1);
        let [n, d, j] = ndj.constituents(2000);
        assert_eq!((n.year(), n.month()), (1999, 11));
        assert_eq!((d.year(), d.month()), (1999, 12));
        assert_eq!((j.year(), j.month()), (2000, 1));
    }

    #[test]
    fn jja_stays_in_year() {
        let jja = Season::jja();
        assert_eq!(jja.year_offset(), 0);
        assert!(!jja.spans_year_boundary());
        let [j, _, a] = jja.constituents(1995);
        assert_eq!((j.year(), j.month()), (1995, 6));
        assert_eq!((a.year(), a.month()), (1995, 8));
    }
}
