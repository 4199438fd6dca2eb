//! Splits calendar months into the four fixed DAP reporting periods.
//!
//! Every month is cut into `P1` (days 1-7), `P2` (8-14), `P3` (15-21) and
//! `P4` (22 to the last day). All types here are immutable values and all
//! functions are pure.
//!
//! ```
//! use dap_periods::{Period, period_from_date, period_ranges};
//!
//! assert_eq!(period_from_date("2025-07-15"), Ok(Period::P3));
//!
//! let ranges = period_ranges(2025, 7).unwrap();
//! assert_eq!(ranges[3].to_string(), "P4 2025-07-22/2025-07-31");
//! ```

mod bucket;
mod consts;
mod month;
mod period;
mod prelude;
#[cfg(test)]
mod test_utils;
mod types;

pub use bucket::MonthBuckets;
pub use consts::*;
pub use month::CalendarMonth;
pub use period::{Period, PeriodError, PeriodRange};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use std::str::FromStr;
use tracing::{debug, trace};

/// A concrete Gregorian date. Always valid: the day exists in its month.
///
/// Parses from `YYYY-MM-DD`, from an ISO 8601 date-time (only the written
/// calendar date is used, offsets are not applied), and from the day-first
/// `DD/MM/YYYY` or `DD-MM-YYYY` forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from its components, validating each against the calendar.
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component that is out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// The month this date falls in
    pub const fn calendar_month(&self) -> CalendarMonth {
        CalendarMonth::from_parts(self.year, self.month)
    }

    /// The reporting period this date falls in
    pub const fn period(&self) -> Period {
        Period::from_day(self.day.get() as i32)
    }

    /// Parses a component made only of ASCII digits. Signs are rejected.
    pub(crate) fn parse_digits<T: FromStr>(s: &str) -> Result<T, ParseError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }
        s.parse::<T>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        Self::parse_digits(s)
    }

    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        Self::parse_digits(s)
    }

    /// Two-digit clock field no greater than `max`
    fn check_clock_field(field: &str, max: u8) -> Result<(), ParseError> {
        if field.len() != 2 || Self::parse_u8(field)? > max {
            return Err(ParseError::InvalidFormat(field.to_owned()));
        }
        Ok(())
    }

    /// Checks the time that follows the date in a date-time:
    /// `HH:MM[:SS[.fff]]`, then optionally `Z`, `+HH[:MM]` or `-HH[:MM]`.
    fn check_time(time: &str) -> Result<(), ParseError> {
        let invalid = || ParseError::InvalidFormat(time.to_owned());

        let (clock, offset) = time
            .find(['Z', 'z', '+', '-'])
            .map_or((time, ""), |at| time.split_at(at));
        let (hms, fraction) = clock
            .split_once('.')
            .map_or((clock, None), |(hms, fraction)| (hms, Some(fraction)));

        let fields: Vec<&str> = hms.split(':').collect();
        match *fields.as_slice() {
            [hours, minutes] if fraction.is_none() => {
                Self::check_clock_field(hours, 23).map_err(|_| invalid())?;
                Self::check_clock_field(minutes, 59).map_err(|_| invalid())?;
            },
            [hours, minutes, seconds] => {
                Self::check_clock_field(hours, 23).map_err(|_| invalid())?;
                Self::check_clock_field(minutes, 59).map_err(|_| invalid())?;
                Self::check_clock_field(seconds, 59).map_err(|_| invalid())?;
                if let Some(fraction) = fraction {
                    Self::parse_digits::<u64>(fraction).map_err(|_| invalid())?;
                }
            },
            _ => return Err(invalid()),
        }

        match offset {
            "" | "Z" | "z" => Ok(()),
            _ => {
                let zone = offset.get(1..).unwrap_or_default();
                let (hours, minutes) = zone
                    .split_once(':')
                    .map_or((zone, None), |(hours, minutes)| (hours, Some(minutes)));
                Self::check_clock_field(hours, 23).map_err(|_| invalid())?;
                if let Some(minutes) = minutes {
                    Self::check_clock_field(minutes, 59).map_err(|_| invalid())?;
                }
                Ok(())
            },
        }
    }

    fn parse_date(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // ISO date-time: keep the calendar date as written once the time checks out
        let date_part = match s.split_once([DATE_TIME_SEPARATOR, ' ']) {
            Some((date, time)) => {
                Self::check_time(time.trim())?;
                date
            },
            None => s,
        };

        let has_hyphen = date_part.contains(DATE_SEPARATOR);
        let has_slash = date_part.contains(DAY_FIRST_SEPARATOR);
        if has_hyphen && has_slash {
            return Err(ParseError::InvalidFormat(format!(
                "Mixed delimiters ({DATE_SEPARATOR} and {DAY_FIRST_SEPARATOR})"
            )));
        }

        let separator = if has_slash {
            DAY_FIRST_SEPARATOR
        } else {
            DATE_SEPARATOR
        };
        let parts: Vec<&str> = date_part.split(separator).map(str::trim).collect();
        let &[first, second, third] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected 2 {separator} separators, found {}",
                parts.len() - 1
            )));
        };

        match (separator, first.len(), third.len()) {
            (DATE_SEPARATOR, 4, _) => Self::parse_year_first(first, second, third),
            (_, _, 4) => Self::parse_day_first(first, second, third),
            _ => Err(ParseError::InvalidFormat(s.to_owned())),
        }
    }

    fn parse_year_first(year: &str, month: &str, day: &str) -> Result<Self, ParseError> {
        Self::new(
            Self::parse_u16(year)?,
            Self::parse_u8(month)?,
            Self::parse_u8(day)?,
        )
    }

    fn parse_day_first(day: &str, month: &str, year: &str) -> Result<Self, ParseError> {
        Self::new(
            Self::parse_u16(year)?,
            Self::parse_u8(month)?,
            Self::parse_u8(day)?,
        )
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_date(s.trim()).inspect_err(|err| {
            debug!(input = s, error = %err, "rejected date string");
        })
    }
}

impl TryFrom<&str> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&String> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Period for a day of the month.
///
/// Total over every integer: values past day 21, and values that are not a
/// day at all (zero, negative, beyond 31), all map to `P4`.
pub fn period_from_day(day: i32) -> Period {
    if !(i32::from(MIN_DAY)..=31).contains(&day) {
        trace!(day, "day outside 1..=31, using last period");
    }
    Period::from_day(day)
}

/// Period for anything that converts into a [`CalendarDate`]: a date value,
/// a `(year, month, day)` tuple, or a date string.
///
/// # Errors
/// Returns `PeriodError::InvalidDate` if the input is not a valid date.
pub fn period_from_date<T>(date: T) -> Result<Period, PeriodError>
where
    T: TryInto<CalendarDate>,
    PeriodError: From<T::Error>,
{
    let date = date.try_into()?;
    Ok(period_from_day(i32::from(date.day())))
}

/// Number of days in the given month, leap years included.
///
/// # Errors
/// Returns `PeriodError::InvalidMonth` if `month` is outside 1..=12.
pub fn last_day_of_month(year: u16, month: u8) -> Result<u8, PeriodError> {
    let month = Month::new(month).map_err(PeriodError::from_calendar)?;
    Ok(days_in_month(year, month))
}

/// The four period ranges of a month, in order `P1`..`P4`.
///
/// # Errors
/// Returns `PeriodError::InvalidMonth` or `PeriodError::InvalidYear` for
/// components outside the calendar.
pub fn period_ranges(year: u16, month: u8) -> Result<[PeriodRange; PERIOD_COUNT], PeriodError> {
    let month = CalendarMonth::new(year, month).map_err(PeriodError::from_calendar)?;
    Ok(month.period_ranges())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;
    use proptest::prelude::*;

    #[test]
    fn test_parse_formats() {
        struct TestCase {
            input:       &'static str,
            expected:    (u16, u8, u8),
            description: &'static str,
        }

        let cases = [
            TestCase { input: "2025-07-15", expected: (2025, 7, 15), description: "ISO date" },
            TestCase { input: "  2025-07-15 ", expected: (2025, 7, 15), description: "surrounding whitespace" },
            TestCase { input: "2025-07-15T23:59:00", expected: (2025, 7, 15), description: "ISO date-time" },
            TestCase { input: "2025-07-15T23:59:00-03:00", expected: (2025, 7, 15), description: "ISO date-time with offset" },
            TestCase { input: "2025-07-15 08:30:00", expected: (2025, 7, 15), description: "SQL timestamp" },
            TestCase { input: "2025-07-15 08:30:00+00", expected: (2025, 7, 15), description: "SQL timestamp with hour offset" },
            TestCase { input: "2025-07-15T08:30:00.123Z", expected: (2025, 7, 15), description: "fractional seconds" },
            TestCase { input: "2025-07-15T08:30", expected: (2025, 7, 15), description: "minute precision" },
            TestCase { input: "15/07/2025", expected: (2025, 7, 15), description: "day-first slash" },
            TestCase { input: "15-07-2025", expected: (2025, 7, 15), description: "day-first hyphen" },
            TestCase { input: "2024-02-29", expected: (2024, 2, 29), description: "leap day" },
        ];

        for case in &cases {
            let parsed = case
                .input
                .parse::<CalendarDate>()
                .unwrap_or_else(|err| panic!("{}: {err}", case.description));
            assert_eq!(
                (parsed.year(), parsed.month(), parsed.day()),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_parse_rejects() {
        struct TestCase {
            input:       &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase { input: "", description: "empty" },
            TestCase { input: "   ", description: "blank" },
            TestCase { input: "not a date", description: "text" },
            TestCase { input: "2025-07", description: "month only" },
            TestCase { input: "2025-07-15-01", description: "too many separators" },
            TestCase { input: "2025/07-15", description: "mixed delimiters" },
            TestCase { input: "2025/07/15", description: "year-first slash" },
            TestCase { input: "2023-02-29", description: "leap day in common year" },
            TestCase { input: "2025-13-01", description: "month 13" },
            TestCase { input: "2025-04-31", description: "April 31" },
            TestCase { input: "0000-01-01", description: "year zero" },
            TestCase { input: "2025-07-xx", description: "non-numeric day" },
            TestCase { input: "2025-07-15 not a time", description: "text after date" },
            TestCase { input: "2025-07-15Tgarbage", description: "text after T" },
            TestCase { input: "15/07/2025 xyz", description: "text after day-first date" },
            TestCase { input: "2025-07-15T", description: "empty time" },
            TestCase { input: "2025-07-15T24:00", description: "hour 24" },
            TestCase { input: "2025-07-15T12:60", description: "minute 60" },
            TestCase { input: "2025-07-15T12:30.5", description: "fraction without seconds" },
            TestCase { input: "2025-07-15T12:30:00.", description: "empty fraction" },
            TestCase { input: "2025-07-15T12:30:00+x", description: "bad offset" },
            TestCase { input: "2025-07-15T12:30:00-03:60", description: "offset minute 60" },
            TestCase { input: "2025-07-+5", description: "signed day" },
            TestCase { input: "+15/07/2025", description: "signed day-first day" },
            TestCase { input: "+2025-07-15", description: "signed year" },
        ];

        for case in &cases {
            assert!(
                case.input.parse::<CalendarDate>().is_err(),
                "Expected failure for: {}",
                case.description
            );
        }
    }

    #[test]
    fn test_parse_error_variants() {
        assert_eq!("".parse::<CalendarDate>(), Err(ParseError::EmptyInput));
        assert_eq!(
            "2025-13-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidMonth(13))
        );
        assert_eq!(
            "31/04/2025".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay {
                year:  2025,
                month: 4,
                day:   31,
            })
        );
    }

    #[test]
    fn test_trailing_text_is_invalid_date() {
        let inputs = [
            "2025-07-15 not a time",
            "2025-07-15Tgarbage",
            "15/07/2025 xyz",
            "2025-07-+5",
            "+15/07/2025",
        ];

        for input in inputs {
            assert!(
                matches!(
                    period_from_date(input),
                    Err(PeriodError::InvalidDate(ParseError::InvalidFormat(_)))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(date(2025, 7, 5).to_string(), "2025-07-05");
        assert_eq!(date(987, 1, 1).to_string(), "0987-01-01");
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(2024, 12, 31) < date(2025, 1, 1));
        assert!(date(2025, 1, 31) < date(2025, 2, 1));
        assert!(date(2025, 2, 1) < date(2025, 2, 2));
    }

    #[test]
    fn test_serde_string_format() {
        let json = serde_json::to_string(&date(2025, 7, 15)).unwrap();
        assert_eq!(json, r#""2025-07-15""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date(2025, 7, 15));
        assert!(serde_json::from_str::<CalendarDate>(r#""2025-02-30""#).is_err());
    }

    #[test]
    fn test_period_from_day_table() {
        assert_eq!(period_from_day(7), Period::P1);
        assert_eq!(period_from_day(8), Period::P2);
        assert_eq!(period_from_day(21), Period::P3);
        assert_eq!(period_from_day(22), Period::P4);
        assert_eq!(period_from_day(35), Period::P4);
        assert_eq!(period_from_day(0), Period::P4);
        assert_eq!(period_from_day(-3), Period::P4);
    }

    #[test]
    fn test_period_from_date_inputs() {
        assert_eq!(period_from_date(date(2025, 7, 15)), Ok(Period::P3));
        assert_eq!(period_from_date("2025-07-15"), Ok(Period::P3));
        assert_eq!(period_from_date(String::from("01/07/2025")), Ok(Period::P1));
        assert_eq!(period_from_date((2025_u16, 7_u8, 31_u8)), Ok(Period::P4));
        assert_eq!(period_from_date("2025-07-14T23:59:59Z"), Ok(Period::P2));
    }

    #[test]
    fn test_period_from_date_invalid() {
        assert!(matches!(
            period_from_date("garbage"),
            Err(PeriodError::InvalidDate(ParseError::InvalidFormat(_)))
        ));
        assert!(matches!(
            period_from_date((2025_u16, 2_u8, 30_u8)),
            Err(PeriodError::InvalidDate(ParseError::InvalidDay { .. }))
        ));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), Ok(29));
        assert_eq!(last_day_of_month(2023, 2), Ok(28));
        assert_eq!(last_day_of_month(2023, 4), Ok(30));
        assert_eq!(last_day_of_month(2025, 7), Ok(31));
        assert_eq!(last_day_of_month(1900, 2), Ok(28));
        assert_eq!(last_day_of_month(2000, 2), Ok(29));
    }

    #[test]
    fn test_last_day_of_month_rejects_out_of_range_month() {
        assert_eq!(last_day_of_month(2025, 0), Err(PeriodError::InvalidMonth(0)));
        assert_eq!(last_day_of_month(2025, 13), Err(PeriodError::InvalidMonth(13)));
    }

    #[test]
    fn test_period_ranges_july() {
        let ranges = period_ranges(2025, 7).unwrap();
        let periods: Vec<Period> = ranges.iter().map(PeriodRange::period).collect();
        assert_eq!(periods, Period::ALL);
        assert_eq!(ranges[3].start().day(), 22);
        assert_eq!(ranges[3].end().day(), 31);
    }

    #[test]
    fn test_period_ranges_errors() {
        assert_eq!(period_ranges(2025, 13), Err(PeriodError::InvalidMonth(13)));
        assert_eq!(period_ranges(0, 7), Err(PeriodError::InvalidYear(0)));
    }

    #[test]
    fn test_period_ranges_idempotent() {
        assert_eq!(period_ranges(2024, 2), period_ranges(2024, 2));
    }

    proptest! {
        #[test]
        fn prop_period_from_day_is_total(day in any::<i32>()) {
            let period = period_from_day(day);
            prop_assert!(Period::ALL.contains(&period));
            let expected = match day {
                1..=7 => Period::P1,
                8..=14 => Period::P2,
                15..=21 => Period::P3,
                _ => Period::P4,
            };
            prop_assert_eq!(period, expected);
        }

        #[test]
        fn prop_ranges_partition_the_month(year in 1u16..=9999, month in 1u8..=12) {
            let ranges = period_ranges(year, month).unwrap();
            let last = last_day_of_month(year, month).unwrap();

            prop_assert_eq!(ranges[0].start().day(), 1);
            prop_assert_eq!(ranges[3].end().day(), last);
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end().day() + 1, pair[1].start().day());
            }
            let covered: u32 = ranges.iter().map(|r| u32::from(r.len_days())).sum();
            prop_assert_eq!(covered, u32::from(last));

            for range in &ranges {
                prop_assert_eq!(range.start().year(), year);
                prop_assert_eq!(range.start().month(), month);
                for day in range.days() {
                    prop_assert_eq!(period_from_date(day), Ok(range.period()));
                }
            }
        }
    }
}
