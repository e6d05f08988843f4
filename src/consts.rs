/// Milliseconds in one second
pub const MS_PER_SECOND: i64 = 1_000;
/// Milliseconds in one minute
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds in one day, used for every day-count computation
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Largest representable instant magnitude (100,000,000 days either side of the epoch)
pub const MAX_INSTANT_MS: i64 = 8_640_000_000_000_000;

/// Base year for the two-digit year convention (95 means 1995)
pub const YEAR_BASE: i32 = 1900;
/// Years below this value (and not negative) are offsets from `YEAR_BASE`
pub const TWO_DIGIT_YEAR_LIMIT: i32 = 100;

/// Number of months in a year
pub const MONTHS_PER_YEAR: i64 = 12;
/// Month index for February
pub const FEBRUARY: u8 = 1;
/// Month index for December
pub const DECEMBER: u8 = 11;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Month lengths in a common year, January first; `days_in_month` swaps in
/// `FEBRUARY_DAYS_LEAP` for leap years
pub const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Every fourth year is a leap year
pub(crate) const LEAP_YEAR_CYCLE: i64 = 4;
/// except for century years
pub(crate) const CENTURY_CYCLE: i64 = 100;
/// that do not start a 400-year cycle
pub(crate) const GREGORIAN_CYCLE: i64 = 400;

/// Days in one 400-year Gregorian era
pub(crate) const DAYS_PER_ERA: i64 = 146_097;
/// Day number of 1970-01-01 counted from 0000-03-01
pub(crate) const EPOCH_DAY_OFFSET: i64 = 719_468;

/// English month names, indexed by 0-based month
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Shortest accepted abbreviation of a month or weekday name
pub const MIN_NAME_PREFIX: usize = 3;

/// Rendering of a date without a time value
pub const INVALID_DATE: &str = "Invalid Date";
