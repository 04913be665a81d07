//! CF time-coordinate decoding to calendar months.
//!
//! Monthly datasets store time as `"<unit> since <reference date>"` offsets
//! under one of several model calendars. Only the month each stamp falls in
//! matters downstream, so decoding stops at [`YearMonth`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeDelta};
use enso_calendar::YearMonth;

use crate::error::IoError;

/// Cumulative day counts at the start of each month, 365-day year.
const CUM_DAYS_NOLEAP: [i64; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Cumulative day counts at the start of each month, 366-day year.
const CUM_DAYS_ALL_LEAP: [i64; 13] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// `seconds since`.
    Seconds,
    /// `minutes since`.
    Minutes,
    /// `hours since`.
    Hours,
    /// `days since`.
    Days,
    /// `months since`, counted as whole calendar months.
    Months,
}

impl TimeUnit {
    /// Length of one unit in days, `None` for calendar months.
    fn days(self) -> Option<f64> {
        match self {
            TimeUnit::Seconds => Some(1.0 / 86_400.0),
            TimeUnit::Minutes => Some(1.0 / 1_440.0),
            TimeUnit::Hours => Some(1.0 / 24.0),
            TimeUnit::Days => Some(1.0),
            TimeUnit::Months => None,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "second" | "seconds" | "sec" | "secs" | "s" => Ok(TimeUnit::Seconds),
            "minute" | "minutes" | "min" | "mins" => Ok(TimeUnit::Minutes),
            "hour" | "hours" | "hr" | "hrs" | "h" => Ok(TimeUnit::Hours),
            "day" | "days" | "d" => Ok(TimeUnit::Days),
            "month" | "months" => Ok(TimeUnit::Months),
            other => Err(IoError::InvalidTime {
                reason: format!("unsupported unit '{other}'"),
            }),
        }
    }
}

/// Model calendar named by the CF `calendar` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CfCalendar {
    /// `standard`, `gregorian`, or `proleptic_gregorian`.
    #[default]
    Gregorian,
    /// `noleap` / `365_day`.
    NoLeap,
    /// `all_leap` / `366_day`.
    AllLeap,
    /// `360_day`: twelve 30-day months.
    Day360,
}

impl FromStr for CfCalendar {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(CfCalendar::Gregorian),
            "noleap" | "no_leap" | "365_day" => Ok(CfCalendar::NoLeap),
            "all_leap" | "366_day" => Ok(CfCalendar::AllLeap),
            "360_day" => Ok(CfCalendar::Day360),
            other => Err(IoError::InvalidTime {
                reason: format!("unsupported calendar '{other}'"),
            }),
        }
    }
}

impl fmt::Display for CfCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CfCalendar::Gregorian => "standard",
            CfCalendar::NoLeap => "noleap",
            CfCalendar::AllLeap => "all_leap",
            CfCalendar::Day360 => "360_day",
        };
        f.write_str(name)
    }
}

/// Parsed `units` + `calendar` pair of a time coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUnits {
    unit: TimeUnit,
    year: i32,
    month: u8,
    day: u8,
    calendar: CfCalendar,
}

impl TimeUnits {
    /// Parses a CF units string such as `"days since 1870-1-1 00:00:00"`.
    ///
    /// The reference date may omit zero padding, the day, or the time of
    /// day; any time of day is ignored. A missing calendar means
    /// `standard`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] for a malformed string, an unknown
    /// unit or calendar, or a reference date outside its calendar.
    pub fn parse(units: &str, calendar: Option<&str>) -> Result<Self, IoError> {
        let calendar = match calendar {
            Some(name) => name.parse()?,
            None => CfCalendar::default(),
        };

        let malformed = || IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        };
        let mut parts = units.trim().splitn(3, char::is_whitespace);
        let unit: TimeUnit = parts.next().ok_or_else(malformed)?.parse()?;
        if !parts.next().is_some_and(|s| s.eq_ignore_ascii_case("since")) {
            return Err(malformed());
        }
        let reference = parts.next().ok_or_else(malformed)?.trim();
        let date_part = reference
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        let mut fields = date_part.split('-');
        let parse_field = |s: Option<&str>, default: Option<i64>| -> Result<i64, IoError> {
            match s {
                Some(text) => text.parse::<i64>().map_err(|_| malformed()),
                None => default.ok_or_else(malformed),
            }
        };
        let year = parse_field(fields.next(), None)?;
        let month = parse_field(fields.next(), Some(1))?;
        let day = parse_field(fields.next(), Some(1))?;

        let max_day = match calendar {
            CfCalendar::Day360 => 30,
            _ if (1..=12).contains(&month) => {
                let table = if calendar == CfCalendar::AllLeap {
                    &CUM_DAYS_ALL_LEAP
                } else {
                    &CUM_DAYS_NOLEAP
                };
                let idx = (month - 1) as usize;
                let mut len = table[idx + 1] - table[idx];
                if calendar == CfCalendar::Gregorian
                    && month == 2
                    && enso_calendar::is_leap_year(year as i32)
                {
                    len += 1;
                }
                len
            }
            _ => 0,
        };
        if !(1..=12).contains(&month) || !(1..=max_day).contains(&day) {
            return Err(IoError::InvalidTime {
                reason: format!("reference date '{date_part}' is not valid in the {calendar} calendar"),
            });
        }

        Ok(Self {
            unit,
            year: year as i32,
            month: month as u8,
            day: day as u8,
            calendar,
        })
    }

    /// Offset unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Calendar the offsets are counted in.
    pub fn calendar(&self) -> CfCalendar {
        self.calendar
    }

    /// Month containing the reference date.
    pub fn reference_month(&self) -> Result<YearMonth, IoError> {
        Ok(YearMonth::new(self.year, self.month)?)
    }

    /// Decodes one offset to the month it falls in.
    ///
    /// Partial days are truncated towards the past, so a stamp at 23:59 on
    /// the last day of a month stays in that month.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] for a non-finite offset or one that
    /// leaves the representable date range.
    pub fn decode(&self, offset: f64) -> Result<YearMonth, IoError> {
        if !offset.is_finite() {
            return Err(IoError::InvalidTime {
                reason: format!("non-finite time offset {offset}"),
            });
        }
        let Some(unit_days) = self.unit.days() else {
            return Ok(self.reference_month()?.offset(offset.floor() as i64));
        };
        let days = (offset * unit_days).floor() as i64;

        match self.calendar {
            CfCalendar::Gregorian => self.decode_gregorian(days),
            CfCalendar::NoLeap => self.decode_fixed_year(days, &CUM_DAYS_NOLEAP),
            CfCalendar::AllLeap => self.decode_fixed_year(days, &CUM_DAYS_ALL_LEAP),
            CfCalendar::Day360 => {
                let total = (i64::from(self.month) - 1) * 30 + i64::from(self.day) - 1 + days;
                let year = i64::from(self.year) + total.div_euclid(360);
                let month = total.rem_euclid(360) / 30 + 1;
                self.month_of(year, month)
            }
        }
    }

    /// Decodes a slice of offsets.
    pub fn decode_all(&self, offsets: &[f64]) -> Result<Vec<YearMonth>, IoError> {
        offsets.iter().map(|&o| self.decode(o)).collect()
    }

    fn decode_gregorian(&self, days: i64) -> Result<YearMonth, IoError> {
        let overflow = || IoError::InvalidTime {
            reason: format!(
                "date overflow adding {days} days to {}-{:02}-{:02}",
                self.year, self.month, self.day
            ),
        };
        let base = NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
            .ok_or_else(overflow)?;
        let date = base
            .checked_add_signed(TimeDelta::try_days(days).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;
        Ok(YearMonth::new(date.year(), date.month() as u8)?)
    }

    fn decode_fixed_year(&self, days: i64, cum: &[i64; 13]) -> Result<YearMonth, IoError> {
        let year_len = cum[12];
        let total = cum[usize::from(self.month) - 1] + i64::from(self.day) - 1 + days;
        let year = i64::from(self.year) + total.div_euclid(year_len);
        let doy = total.rem_euclid(year_len);
        let month = cum[1..].iter().position(|&end| doy < end).unwrap_or(11) as i64 + 1;
        self.month_of(year, month)
    }

    fn month_of(&self, year: i64, month: i64) -> Result<YearMonth, IoError> {
        let year = i32::try_from(year).map_err(|_| IoError::InvalidTime {
            reason: format!("decoded year {year} out of range"),
        })?;
        Ok(YearMonth::new(year, month as u8)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).expect("valid month")
    }

    #[test]
    fn parses_unpadded_reference_with_time() {
        let units = TimeUnits::parse("days since 1870-1-1 00:00:00", None).expect("parse");
        assert_eq!(units.unit(), TimeUnit::Days);
        assert_eq!(units.calendar(), CfCalendar::Gregorian);
        assert_eq!(units.reference_month().expect("month"), ym(1870, 1));
    }

    #[test]
    fn parses_iso_t_separator() {
        let units = TimeUnits::parse("hours since 1900-01-01T00:00:00Z", Some("standard"))
            .expect("parse");
        assert_eq!(units.unit(), TimeUnit::Hours);
        assert_eq!(units.decode(24.0 * 31.0).expect("decode"), ym(1900, 2));
    }

    #[test]
    fn rejects_malformed_units() {
        assert!(TimeUnits::parse("days after 1870-01-01", None).is_err());
        assert!(TimeUnits::parse("fortnights since 1870-01-01", None).is_err());
        assert!(TimeUnits::parse("days since", None).is_err());
        assert!(TimeUnits::parse("days since 1870-13-01", None).is_err());
        assert!(TimeUnits::parse("days since 1870-01-01", Some("julian")).is_err());
    }

    #[test]
    fn gregorian_mid_month_stamps() {
        let units = TimeUnits::parse("days since 1870-1-1", Some("gregorian")).expect("parse");
        // 1870-01-16, 1870-02-15, 1870-03-16
        let months = units.decode_all(&[15.0, 45.0, 74.5]).expect("decode");
        assert_eq!(months, vec![ym(1870, 1), ym(1870, 2), ym(1870, 3)]);
    }

    #[test]
    fn gregorian_leap_day_stays_in_february() {
        let units = TimeUnits::parse("days since 2000-01-01", None).expect("parse");
        assert_eq!(units.decode(59.0).expect("decode"), ym(2000, 2));
        assert_eq!(units.decode(60.0).expect("decode"), ym(2000, 3));
    }

    #[test]
    fn negative_offsets_go_backwards() {
        let units = TimeUnits::parse("days since 2000-01-01", None).expect("parse");
        assert_eq!(units.decode(-0.5).expect("decode"), ym(1999, 12));
    }

    #[test]
    fn noleap_year_is_365_days() {
        let units = TimeUnits::parse("days since 2000-01-01", Some("noleap")).expect("parse");
        assert_eq!(units.decode(59.0).expect("decode"), ym(2000, 3));
        assert_eq!(units.decode(365.0).expect("decode"), ym(2001, 1));
        assert_eq!(units.decode(10.0 * 365.0 + 40.0).expect("decode"), ym(2010, 2));
    }

    #[test]
    fn all_leap_year_is_366_days() {
        let units = TimeUnits::parse("days since 2001-01-01", Some("366_day")).expect("parse");
        assert_eq!(units.decode(59.0).expect("decode"), ym(2001, 2));
        assert_eq!(units.decode(365.0).expect("decode"), ym(2001, 12));
        assert_eq!(units.decode(366.0).expect("decode"), ym(2002, 1));
    }

    #[test]
    fn day_360_months_are_30_days() {
        let units = TimeUnits::parse("days since 1850-01-01", Some("360_day")).expect("parse");
        assert_eq!(units.decode(29.9).expect("decode"), ym(1850, 1));
        assert_eq!(units.decode(30.0).expect("decode"), ym(1850, 2));
        assert_eq!(units.decode(360.0 * 3.0 + 15.0).expect("decode"), ym(1853, 1));
        assert_eq!(units.decode(-1.0).expect("decode"), ym(1849, 12));
    }

    #[test]
    fn seconds_and_months_units() {
        let secs = TimeUnits::parse("seconds since 1970-01-01", None).expect("parse");
        assert_eq!(secs.decode(86_400.0 * 40.0).expect("decode"), ym(1970, 2));

        let months = TimeUnits::parse("months since 1960-01-01", Some("360_day")).expect("parse");
        assert_eq!(months.decode(0.5).expect("decode"), ym(1960, 1));
        assert_eq!(months.decode(13.5).expect("decode"), ym(1961, 2));
    }

    #[test]
    fn non_finite_offset_rejected() {
        let units = TimeUnits::parse("days since 2000-01-01", None).expect("parse");
        assert!(matches!(
            units.decode(f64::NAN),
            Err(IoError::InvalidTime { .. })
        ));
    }

    #[test]
    fn calendar_display_round_trips() {
        for cal in [
            CfCalendar::Gregorian,
            CfCalendar::NoLeap,
            CfCalendar::AllLeap,
            CfCalendar::Day360,
        ] {
            assert_eq!(cal.to_string().parse::<CfCalendar>().expect("parse"), cal);
        }
    }
}
