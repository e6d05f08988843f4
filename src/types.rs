use crate::calendar;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, TWO_DIGIT_YEAR_LIMIT, WEEKDAY_NAMES, YEAR_BASE,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Day of the week, numbered the classic way with Sunday as 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the weekday for an index in `0..=6` (0 = Sunday)
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Index with Sunday as 0 and Saturday as 6
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Full English name
    pub const fn name(self) -> &'static str {
        WEEKDAY_NAMES[self as usize]
    }

    /// Three-letter English abbreviation
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("Invalid weekday index: {value}"))
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday.index()
    }
}

/// Broken-down wall-clock fields of an instant.
///
/// `year` is the full (proleptic Gregorian) year and `month` is 0-indexed.
/// Composition accepts values outside the canonical ranges and rolls them
/// over, so `month: 12` means January of the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    #[serde(default)]
    pub hour: i64,
    #[serde(default)]
    pub minute: i64,
    #[serde(default)]
    pub second: i64,
    #[serde(default)]
    pub millisecond: i64,
}

impl CalendarFields {
    /// Fields for midnight at the start of the given day
    pub const fn new(year: i64, month: i64, day: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    /// Replaces the time of day, keeping the date
    #[must_use]
    pub const fn at(self, hour: i64, minute: i64, second: i64) -> Self {
        Self {
            hour,
            minute,
            second,
            ..self
        }
    }

    /// Replaces the millisecond field
    #[must_use]
    pub const fn with_millisecond(self, millisecond: i64) -> Self {
        Self {
            millisecond,
            ..self
        }
    }

    /// Year as an offset from 1900 (1995 gives 95)
    pub const fn year_offset(&self) -> i64 {
        self.year - YEAR_BASE as i64
    }

    /// Day of the week these fields fall on, after rolling over out-of-range values
    pub fn weekday(&self) -> Weekday {
        calendar::weekday_of_fields(self)
    }

    /// Whether every field lies in its canonical range
    pub fn is_normalized(&self) -> bool {
        (0..=i64::from(DECEMBER)).contains(&self.month)
            && self.day >= 1
            && self.day <= i64::from(days_in_month(self.year, self.month as u8))
            && (0..24).contains(&self.hour)
            && (0..60).contains(&self.minute)
            && (0..60).contains(&self.second)
            && (0..1000).contains(&self.millisecond)
    }
}

// Helper functions

/// Applies the two-digit year rule: `0..=99` means 1900..=1999, anything else is a full year
pub const fn expand_year(year: i32) -> i32 {
    if year >= 0 && year < TWO_DIGIT_YEAR_LIMIT {
        YEAR_BASE + year
    } else {
        year
    }
}

pub const fn is_leap_year(year: i64) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Length of a month; `month` is 0-indexed
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    debug_assert!(month <= DECEMBER);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
