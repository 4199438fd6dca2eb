use std::str::FromStr;

use tracing::trace;

use crate::{
    CalendarDate, DATE_SEPARATOR, DAY_FIRST_SEPARATOR, MIN_DAY, MonthBuckets, PERIOD_COUNT,
    ParseError, Period, PeriodRange,
    prelude::*,
    types::{Day, Month, Year, days_in_month},
};

/// A specific month of a specific year, e.g. `2025-07`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}", "year.get()", "month.get()")]
pub struct CalendarMonth {
    year:  Year,
    month: Month,
}

impl CalendarMonth {
    /// # Errors
    /// Returns `ParseError::InvalidYear` or `ParseError::InvalidMonth` for
    /// components outside the calendar.
    pub fn new(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self::from_parts(Year::new(year)?, Month::new(month)?))
    }

    pub const fn from_parts(year: Year, month: Month) -> Self {
        Self { year, month }
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Number of days in this month (28..=31)
    pub const fn last_day(&self) -> u8 {
        days_in_month(self.year.get(), self.month)
    }

    pub fn first_date(&self) -> CalendarDate {
        self.at(MIN_DAY)
    }

    pub fn last_date(&self) -> CalendarDate {
        self.at(self.last_day())
    }

    /// The date for `day` within this month.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the month has no such day.
    pub fn date(&self, day: u8) -> Result<CalendarDate, ParseError> {
        let day = Day::new(day, self.year, self.month)?;
        Ok(CalendarDate {
            year: self.year,
            month: self.month,
            day,
        })
    }

    fn at(&self, day: u8) -> CalendarDate {
        CalendarDate {
            year:  self.year,
            month: self.month,
            day:   Day::clamped(day, self.year, self.month),
        }
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        date.year == self.year && date.month == self.month
    }

    /// Period of `date`, or `None` when the date belongs to another month
    pub fn period_of(&self, date: &CalendarDate) -> Option<Period> {
        self.contains(date).then_some(date.period())
    }

    pub fn period_range(&self, period: Period) -> PeriodRange {
        PeriodRange::new(*self, period)
    }

    /// All four ranges, ordered `P1`..`P4`. Contiguous and covering every day.
    pub fn period_ranges(&self) -> [PeriodRange; PERIOD_COUNT] {
        Period::ALL.map(|period| self.period_range(period))
    }

    /// The following month, or `None` past December of `MAX_YEAR`
    pub fn next(&self) -> Option<Self> {
        let month = self.month.succ_wrapping();
        let year = if month == Month::JANUARY {
            self.year.succ()?
        } else {
            self.year
        };
        Some(Self::from_parts(year, month))
    }

    /// The preceding month, or `None` before January of year 1
    pub fn previous(&self) -> Option<Self> {
        let month = self.month.pred_wrapping();
        let year = if month == Month::DECEMBER {
            self.year.pred()?
        } else {
            self.year
        };
        Some(Self::from_parts(year, month))
    }

    /// Groups `items` into this month's periods by the date `date_of` returns.
    /// Items dated in another month are counted as skipped and dropped.
    pub fn bucket<T, I, F>(&self, items: I, mut date_of: F) -> MonthBuckets<T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> CalendarDate,
    {
        let mut buckets = MonthBuckets::new(*self);
        for item in items {
            let date = date_of(&item);
            match self.period_of(&date) {
                Some(period) => buckets.push(period, item),
                None => {
                    trace!(month = %self, %date, "record outside month, skipping");
                    buckets.skip();
                },
            }
        }
        buckets
    }
}

impl From<CalendarDate> for CalendarMonth {
    fn from(date: CalendarDate) -> Self {
        date.calendar_month()
    }
}

impl FromStr for CalendarMonth {
    type Err = ParseError;

    /// Accepts `YYYY-MM` or month-first `MM/YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let (year, month) = if let Some((year, month)) = trimmed.split_once(DATE_SEPARATOR) {
            (year, month)
        } else if let Some((month, year)) = trimmed.split_once(DAY_FIRST_SEPARATOR) {
            (year, month)
        } else {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        };

        let invalid = |_| ParseError::InvalidFormat(trimmed.to_owned());
        let year = CalendarDate::parse_digits::<u16>(year.trim()).map_err(invalid)?;
        let month = CalendarDate::parse_digits::<u8>(month.trim()).map_err(invalid)?;
        Self::new(year, month)
    }
}

impl serde::Serialize for CalendarMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
