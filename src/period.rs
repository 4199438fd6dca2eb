use std::{convert::Infallible, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, CalendarMonth, P1_LAST_DAY, P2_LAST_DAY, P3_LAST_DAY, PERIOD_COUNT, ParseError,
    RANGE_SEPARATOR, prelude::*, types::Day,
};

/// One of the four fixed reporting periods of a month.
///
/// `P1`..`P3` always cover days 1-7, 8-14 and 15-21. `P4` takes the rest of
/// the month, so it is 7 to 10 days long.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Period {
    #[display(fmt = "P1")]
    P1 = 1,
    #[display(fmt = "P2")]
    P2 = 2,
    #[display(fmt = "P3")]
    P3 = 3,
    #[display(fmt = "P4")]
    P4 = 4,
}

/// Error type for period operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Input could not be read as a calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] ParseError),

    #[error("Invalid month: {0} (must be 1-12)")]
    InvalidMonth(u8),

    #[error("Invalid year: {0} (must be 1-9999)")]
    InvalidYear(u16),

    #[error("Invalid period number: {0} (must be 1-4)")]
    InvalidPeriod(u8),

    #[error("Invalid period: {0:?} (expected P1-P4)")]
    InvalidPeriodFormat(String),

    /// Start or end date does not match the period's bounds in its month.
    #[error("Invalid range for {period}: {start}/{end}")]
    InvalidRange {
        period: Period,
        start:  CalendarDate,
        end:    CalendarDate,
    },
}

impl PeriodError {
    /// Maps a (year, month) validation failure onto the operation-level variant.
    pub(crate) fn from_calendar(err: ParseError) -> Self {
        match err {
            ParseError::InvalidMonth(month) => Self::InvalidMonth(month),
            ParseError::InvalidYear(year) => Self::InvalidYear(year),
            other => Self::InvalidDate(other),
        }
    }
}

impl From<Infallible> for PeriodError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl Period {
    pub const ALL: [Self; PERIOD_COUNT] = [Self::P1, Self::P2, Self::P3, Self::P4];

    /// Buckets a day of the month. Anything outside 1..=21, including zero,
    /// negative and past-the-end values, lands in `P4`.
    pub const fn from_day(day: i32) -> Self {
        match day {
            1..=7 => Self::P1,
            8..=14 => Self::P2,
            15..=21 => Self::P3,
            _ => Self::P4,
        }
    }

    /// Period number, 1..=4
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based position, for indexing per-period arrays
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn first_day(self) -> u8 {
        match self {
            Self::P1 => 1,
            Self::P2 => P1_LAST_DAY + 1,
            Self::P3 => P2_LAST_DAY + 1,
            Self::P4 => P3_LAST_DAY + 1,
        }
    }

    /// Last day of this period in a month of `month_length` days
    pub const fn last_day(self, month_length: u8) -> u8 {
        match self {
            Self::P1 => P1_LAST_DAY,
            Self::P2 => P2_LAST_DAY,
            Self::P3 => P3_LAST_DAY,
            Self::P4 => month_length,
        }
    }
}

impl TryFrom<u8> for Period {
    type Error = PeriodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::P1),
            2 => Ok(Self::P2),
            3 => Ok(Self::P3),
            4 => Ok(Self::P4),
            _ => Err(PeriodError::InvalidPeriod(value)),
        }
    }
}

impl From<Period> for u8 {
    fn from(period: Period) -> Self {
        period.number()
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Accepts `P1`, `p1` or a bare `1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .unwrap_or(trimmed);
        let number = CalendarDate::parse_digits::<u8>(digits)
            .map_err(|_| PeriodError::InvalidPeriodFormat(s.to_owned()))?;
        Self::try_from(number)
    }
}

/// A period materialized for one month: its inclusive start and end dates.
///
/// Deserializing rebuilds the range from `period` and the month of `start`,
/// and rejects input whose dates disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{} {}{}{}", period, start, RANGE_SEPARATOR, end)]
#[serde(try_from = "RawPeriodRange")]
pub struct PeriodRange {
    period: Period,
    start:  CalendarDate,
    end:    CalendarDate,
}

impl PeriodRange {
    pub(crate) fn new(month: CalendarMonth, period: Period) -> Self {
        let (year, m) = (month.year_typed(), month.month_typed());
        let at = |day: u8| CalendarDate {
            year,
            month: m,
            day: Day::clamped(day, year, m),
        };
        Self {
            period,
            start: at(period.first_day()),
            end: at(period.last_day(month.last_day())),
        }
    }

    pub const fn period(&self) -> Period {
        self.period
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn month(&self) -> CalendarMonth {
        self.start.calendar_month()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Number of days covered, both ends included
    pub const fn len_days(&self) -> u8 {
        self.end.day.get() - self.start.day.get() + 1
    }

    /// Every date in the range, in order
    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + use<> {
        let CalendarDate { year, month, .. } = self.start;
        (self.start.day.get()..=self.end.day.get()).map(move |day| CalendarDate {
            year,
            month,
            day: Day::clamped(day, year, month),
        })
    }
}

#[derive(Deserialize)]
struct RawPeriodRange {
    period: Period,
    start:  CalendarDate,
    end:    CalendarDate,
}

impl TryFrom<RawPeriodRange> for PeriodRange {
    type Error = PeriodError;

    fn try_from(raw: RawPeriodRange) -> Result<Self, Self::Error> {
        let range = raw.start.calendar_month().period_range(raw.period);
        if range.start != raw.start || range.end != raw.end {
            return Err(PeriodError::InvalidRange {
                period: raw.period,
                start:  raw.start,
                end:    raw.end,
            });
        }
        Ok(range)
    }
}
