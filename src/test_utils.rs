//! Fixture constructors for tests. Panics on invalid input.

use crate::{CalendarDate, CalendarMonth, Month, Year};

pub fn year(value: u16) -> Year {
    Year::new(value).expect("valid year fixture")
}

pub fn month(value: u8) -> Month {
    Month::new(value).expect("valid month fixture")
}

pub fn cal_month(year: u16, month: u8) -> CalendarMonth {
    CalendarMonth::new(year, month).expect("valid calendar month fixture")
}

pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::new(year, month, day).expect("valid date fixture")
}
