/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Days in each month of a common year (index 0 is unused, months are 1-indexed)
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
pub(crate) const CENTURY_CYCLE: u16 = 100;
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Number of reporting periods in every month
pub const PERIOD_COUNT: usize = 4;

/// Last day of `P1`
pub const P1_LAST_DAY: u8 = 7;
/// Last day of `P2`
pub const P2_LAST_DAY: u8 = 14;
/// Last day of `P3`; `P4` runs from the day after to the end of the month
pub const P3_LAST_DAY: u8 = 21;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Separator between date and time in an ISO 8601 date-time
pub const DATE_TIME_SEPARATOR: char = 'T';
/// Day-first format separator (`DD/MM/YYYY`)
pub const DAY_FIRST_SEPARATOR: char = '/';
/// Range separator used when displaying a period range
pub const RANGE_SEPARATOR: char = '/';
