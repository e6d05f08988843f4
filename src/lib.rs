mod calendar;
mod consts;
pub mod demo;
mod format;
mod parse;
mod prelude;
mod types;
mod zone;

pub use calendar::{compose, decompose};
pub use consts::*;
pub use demo::{Demo, FCS_DATE, read_date};
pub use types::{CalendarFields, Weekday, days_in_month, expand_year, is_leap_year};
pub use zone::{UtcOffset, Zone, ZoneError};

use crate::prelude::*;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::debug;

/// A point in time, stored as signed milliseconds since 1970-01-01T00:00:00Z,
/// read through a time zone.
///
/// A `Date` may be *invalid* (it has no time value), which is what lenient
/// construction from an unparseable string or an out-of-range count yields.
/// Every accessor returns `None` for an invalid date.
///
/// Equality, ordering and hashing consider only the instant: the same
/// moment viewed in two zones compares equal.
#[derive(Debug, Clone, Copy)]
pub struct Date {
    time: Option<i64>,
    zone: Zone,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Unrecognized word in date string: {_0}")]
    UnknownToken(String),
    #[display(fmt = "Date string has no {_0}")]
    MissingField(&'static str),
    #[display(fmt = "Invalid month: {} (must be 1-12)", "_0")]
    InvalidMonth(i64),
    #[display(fmt = "Invalid day {} for month {}-{:02}", day, year, "u16::from(*month) + 1")]
    InvalidDay { year: i64, month: u8, day: i64 },
    #[display(fmt = "Invalid time of day: {_0}")]
    InvalidTime(String),
    #[display(fmt = "Invalid zone offset: {_0}")]
    InvalidOffset(String),
    #[display(fmt = "Date outside the representable range: {_0}")]
    OutOfRange(String),
}

impl std::error::Error for ParseError {}

/// Error type for operations that need a valid date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The date has no time value.
    #[error("Invalid time value")]
    InvalidTime,

    /// Error parsing a date string.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Keeps an instant within ±`MAX_INSTANT_MS`
const fn time_clip(ms: i64) -> Option<i64> {
    if ms < -MAX_INSTANT_MS || ms > MAX_INSTANT_MS {
        None
    } else {
        Some(ms)
    }
}

impl Date {
    /// The current time, read in the local zone
    pub fn now() -> Self {
        Self::now_in(Zone::Local)
    }

    /// The current time, read in `zone`
    pub fn now_in(zone: Zone) -> Self {
        Self::from_millis_in(chrono::Utc::now().timestamp_millis(), zone)
    }

    /// A date without a time value
    pub const fn invalid() -> Self {
        Self {
            time: None,
            zone: Zone::Local,
        }
    }

    /// Creates a date from milliseconds since the epoch, read in the local zone.
    /// Counts beyond ±8.64e15 give an invalid date.
    pub const fn from_millis(ms: i64) -> Self {
        Self::from_millis_in(ms, Zone::Local)
    }

    pub const fn from_millis_in(ms: i64, zone: Zone) -> Self {
        Self {
            time: time_clip(ms),
            zone,
        }
    }

    /// Lenient string construction: an unparseable string gives an invalid date
    pub fn from_string(s: &str) -> Self {
        Self::from_string_in(s, Zone::Local)
    }

    pub fn from_string_in(s: &str, zone: Zone) -> Self {
        match parse::parse(s, zone) {
            Ok(ms) => Self::from_millis_in(ms, zone),
            Err(err) => {
                debug!(input = s, error = %err, "rejected date string");
                Self {
                    time: None,
                    zone,
                }
            }
        }
    }

    /// Parses a date string into milliseconds since the epoch.
    /// Strings without a zone token are read as local time.
    ///
    /// # Errors
    /// Returns a `ParseError` describing the first piece that could not be understood.
    pub fn parse(s: &str) -> Result<i64, ParseError> {
        parse::parse(s, Zone::Local)
    }

    /// Like [`Date::parse`], reading zone-less strings in `zone`
    ///
    /// # Errors
    /// Returns a `ParseError` describing the first piece that could not be understood.
    pub fn parse_in(s: &str, zone: Zone) -> Result<i64, ParseError> {
        parse::parse(s, zone)
    }

    /// Local midnight of the given day. `year` in `0..=99` counts from 1900;
    /// `month` is 0-indexed and out-of-range values roll over.
    pub fn ymd(year: i32, month: i64, day: i64) -> Self {
        Self::ymd_in(year, month, day, Zone::Local)
    }

    pub fn ymd_in(year: i32, month: i64, day: i64, zone: Zone) -> Self {
        Self::ymd_hms_in(year, month, day, 0, 0, 0, zone)
    }

    /// Local wall-clock time on the given day, with the same year rule as [`Date::ymd`]
    pub fn ymd_hms(year: i32, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self::ymd_hms_in(year, month, day, hour, minute, second, Zone::Local)
    }

    pub fn ymd_hms_in(
        year: i32,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        zone: Zone,
    ) -> Self {
        let fields = CalendarFields::new(i64::from(expand_year(year)), month, day)
            .at(hour, minute, second);
        Self::from_fields_in(&fields, zone)
    }

    /// Interprets full calendar fields as wall-clock time in `zone`
    pub fn from_fields_in(fields: &CalendarFields, zone: Zone) -> Self {
        let time = compose(fields)
            .map(|local| zone.local_to_utc(local))
            .and_then(time_clip);
        Self { time, zone }
    }

    /// Milliseconds since the epoch for fields read as UTC
    pub fn utc(fields: &CalendarFields) -> Option<i64> {
        compose(fields).and_then(time_clip)
    }

    /// Milliseconds since the epoch
    #[inline]
    pub const fn time(&self) -> Option<i64> {
        self.time
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.time.is_some()
    }

    /// The zone local-time accessors read in
    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// The same instant read in another zone
    #[must_use]
    pub const fn with_zone(self, zone: Zone) -> Self {
        Self { zone, ..self }
    }

    /// Offset from UTC in effect at this instant
    pub fn offset(&self) -> Option<UtcOffset> {
        self.time.map(|ms| self.zone.offset_at(ms))
    }

    /// Minutes *behind* UTC, so a zone east of Greenwich is negative
    pub fn timezone_offset(&self) -> Option<i32> {
        self.offset().map(|offset| -offset.minutes())
    }

    /// All wall-clock fields in this date's zone
    pub fn fields(&self) -> Option<CalendarFields> {
        self.time.map(|ms| decompose(self.zone.to_local(ms)))
    }

    /// Year minus 1900, so 1995 reads as 95
    pub fn year(&self) -> Option<i32> {
        self.fields().map(|f| f.year_offset() as i32)
    }

    pub fn full_year(&self) -> Option<i32> {
        self.fields().map(|f| f.year as i32)
    }

    /// Month, 0 (January) to 11 (December)
    pub fn month(&self) -> Option<u8> {
        self.fields().map(|f| f.month as u8)
    }

    /// Day of the month, 1 to 31
    pub fn day(&self) -> Option<u8> {
        self.fields().map(|f| f.day as u8)
    }

    pub fn hours(&self) -> Option<u8> {
        self.fields().map(|f| f.hour as u8)
    }

    pub fn minutes(&self) -> Option<u8> {
        self.fields().map(|f| f.minute as u8)
    }

    pub fn seconds(&self) -> Option<u8> {
        self.fields().map(|f| f.second as u8)
    }

    pub fn milliseconds(&self) -> Option<u16> {
        self.fields().map(|f| f.millisecond as u16)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.time
            .map(|ms| calendar::weekday(calendar::day_number(self.zone.to_local(ms))))
    }

    /// Day of the week, 0 (Sunday) to 6 (Saturday)
    pub fn day_of_week(&self) -> Option<u8> {
        self.weekday().map(Weekday::index)
    }

    /// Decomposes, lets `update` change the fields and recomposes in the same zone
    fn with_fields(self, update: impl FnOnce(&mut CalendarFields)) -> Self {
        let Some(mut fields) = self.fields() else {
            return self;
        };
        update(&mut fields);
        Self::from_fields_in(&fields, self.zone)
    }

    /// Replaces the year, with `0..=99` counting from 1900.
    /// An invalid date starts from local midnight, January 1st 1970.
    #[must_use]
    pub fn with_year(self, year: i32) -> Self {
        self.with_full_year(i64::from(expand_year(year)))
    }

    /// Replaces the year as given.
    /// An invalid date starts from local midnight, January 1st 1970.
    #[must_use]
    pub fn with_full_year(self, year: i64) -> Self {
        let mut fields = self.fields().unwrap_or_else(|| decompose(0));
        fields.year = year;
        Self::from_fields_in(&fields, self.zone)
    }

    /// Replaces the 0-indexed month; values past 11 roll into later years
    #[must_use]
    pub fn with_month(self, month: i64) -> Self {
        self.with_fields(|f| f.month = month)
    }

    /// Replaces the day of the month; 0 is the last day of the previous month
    #[must_use]
    pub fn with_day(self, day: i64) -> Self {
        self.with_fields(|f| f.day = day)
    }

    #[must_use]
    pub fn with_hours(self, hour: i64) -> Self {
        self.with_fields(|f| f.hour = hour)
    }

    #[must_use]
    pub fn with_minutes(self, minute: i64) -> Self {
        self.with_fields(|f| f.minute = minute)
    }

    #[must_use]
    pub fn with_seconds(self, second: i64) -> Self {
        self.with_fields(|f| f.second = second)
    }

    #[must_use]
    pub fn with_milliseconds(self, millisecond: i64) -> Self {
        self.with_fields(|f| f.millisecond = millisecond)
    }

    /// Replaces the instant, keeping the zone
    #[must_use]
    pub const fn with_time(self, ms: i64) -> Self {
        Self::from_millis_in(ms, self.zone)
    }

    /// Whole days from `self` to `other`, rounding half a day away from zero
    pub fn days_until(&self, other: &Self) -> Option<i64> {
        let diff = other.time? - self.time?;
        let half = MS_PER_DAY / 2;
        Some(if diff >= 0 {
            (diff + half) / MS_PER_DAY
        } else {
            -((-diff + half) / MS_PER_DAY)
        })
    }

    /// Whether both dates fall on the same day in `self`'s zone
    pub fn same_calendar_day(&self, other: &Self) -> bool {
        match (self.fields(), other.with_zone(self.zone).fields()) {
            (Some(a), Some(b)) => (a.year, a.month, a.day) == (b.year, b.month, b.day),
            _ => false,
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::now()
    }
}

impl From<i64> for Date {
    fn from(ms: i64) -> Self {
        Self::from_millis(ms)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map(Self::from_millis)
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for Date {}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.hash(state);
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        // Invalid dates sort before every valid one
        self.time.cmp(&other.time)
    }
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.to_iso_string() {
            Ok(iso) => serializer.serialize_str(&iso),
            Err(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => s.parse().map_err(serde::de::Error::custom),
            None => Ok(Self::invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1995-12-25T00:00:00Z
    const CHRISTMAS_1995: i64 = 819_849_600_000;

    fn pst() -> Zone {
        Zone::Fixed(UtcOffset::from_minutes(-480).unwrap())
    }

    #[test]
    fn test_from_fields_reads_back() {
        let date = Date::ymd_hms_in(95, 11, 25, 9, 30, 0, Zone::Utc);
        assert_eq!(date.year(), Some(95));
        assert_eq!(date.full_year(), Some(1995));
        assert_eq!(date.month(), Some(11));
        assert_eq!(date.day(), Some(25));
        assert_eq!(date.hours(), Some(9));
        assert_eq!(date.minutes(), Some(30));
        assert_eq!(date.seconds(), Some(0));
        assert_eq!(date.milliseconds(), Some(0));
        assert_eq!(date.time(), Some(CHRISTMAS_1995 + 34_200_000));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let date = Date::ymd_in(95, 11, 25, Zone::Utc);
        assert_eq!(date.time(), Some(CHRISTMAS_1995));
        assert_eq!(date.hours(), Some(0));
    }

    #[test]
    fn test_full_years_are_kept() {
        let date = Date::ymd_in(1995, 11, 25, Zone::Utc);
        assert_eq!(date.time(), Some(CHRISTMAS_1995));
        let date = Date::ymd_in(2024, 0, 1, Zone::Utc);
        assert_eq!(date.year(), Some(124));
        assert_eq!(date.full_year(), Some(2024));
    }

    #[test]
    fn test_fields_follow_zone() {
        let date = Date::ymd_hms_in(95, 11, 25, 9, 30, 0, pst());
        assert_eq!(date.time(), Some(CHRISTMAS_1995 + 17 * MS_PER_HOUR + 30 * MS_PER_MINUTE));
        assert_eq!(date.hours(), Some(9));
        let utc = date.with_zone(Zone::Utc);
        assert_eq!(utc.hours(), Some(17));
        assert_eq!(utc, date);
    }

    #[test]
    fn test_gmt_parse_reads_as_utc_midnight() {
        let ms = Date::parse("Dec 25,1995 gmt").unwrap();
        let date = Date::from_millis_in(ms, Zone::Utc);
        assert_eq!(date.year(), Some(95));
        assert_eq!(date.month(), Some(11));
        assert_eq!(date.day(), Some(25));
        assert_eq!(date.hours(), Some(0));
        assert_eq!(date.minutes(), Some(0));
        assert_eq!(date.seconds(), Some(0));
    }

    #[test]
    fn test_gmt_parse_in_pacific_time() {
        let ms = Date::parse_in("Dec 25,1995 gmt", pst()).unwrap();
        let date = Date::from_millis_in(ms, pst());
        assert_eq!(date.day(), Some(24));
        assert_eq!(date.hours(), Some(16));
        assert_eq!(date.weekday(), Some(Weekday::Sunday));
    }

    #[test]
    fn test_christmas_1995_is_monday() {
        let date = Date::ymd_in(95, 11, 25, Zone::Utc);
        assert_eq!(date.weekday(), Some(Weekday::Monday));
        assert_eq!(date.day_of_week(), Some(1));
    }

    #[test]
    fn test_setters_change_one_field() {
        let date = Date::ymd_hms_in(95, 11, 25, 9, 30, 15, Zone::Utc);
        let before = date.fields().unwrap();

        let cases: [(Date, CalendarFields); 7] = [
            (date.with_year(96), CalendarFields { year: 1996, ..before }),
            (date.with_full_year(2001), CalendarFields { year: 2001, ..before }),
            (date.with_month(5), CalendarFields { month: 5, ..before }),
            (date.with_day(3), CalendarFields { day: 3, ..before }),
            (date.with_hours(11), CalendarFields { hour: 11, ..before }),
            (date.with_minutes(42), CalendarFields { minute: 42, ..before }),
            (date.with_seconds(1), CalendarFields { second: 1, ..before }),
        ];

        for (updated, expected) in cases {
            assert_eq!(updated.fields(), Some(expected));
        }
        // The original value is untouched
        assert_eq!(date.fields(), Some(before));
    }

    #[test]
    fn test_setters_roll_over() {
        let date = Date::ymd_in(95, 11, 25, Zone::Utc);
        let next = date.with_month(12);
        assert_eq!(next.full_year(), Some(1996));
        assert_eq!(next.month(), Some(0));

        let feb = Date::ymd_in(96, 2, 1, Zone::Utc).with_day(0);
        assert_eq!(feb.month(), Some(1));
        assert_eq!(feb.day(), Some(29));

        let late = date.with_hours(25);
        assert_eq!(late.day(), Some(26));
        assert_eq!(late.hours(), Some(1));

        let earlier = date.with_minutes(-1);
        assert_eq!(earlier.day(), Some(24));
        assert_eq!(earlier.hours(), Some(23));
        assert_eq!(earlier.minutes(), Some(59));
    }

    #[test]
    fn test_sample_setter_chain() {
        let ms = Date::parse("Dec 25,1995 gmt").unwrap();
        let date = Date::from_millis_in(ms, Zone::Utc)
            .with_year(95)
            .with_month(11)
            .with_day(25)
            .with_hours(11)
            .with_minutes(42)
            .with_seconds(1);
        assert_eq!(date.time(), Some(819_891_721_000));
        assert_eq!(date.to_string(), "Mon Dec 25 1995 11:42:01 GMT+0000");
    }

    #[test]
    fn test_invalid_date() {
        let date = Date::from_string("not a date");
        assert!(!date.is_valid());
        assert_eq!(date.time(), None);
        assert_eq!(date.year(), None);
        assert_eq!(date.weekday(), None);
        assert_eq!(date.timezone_offset(), None);
        assert!(!date.with_hours(3).is_valid());
        assert!(!date.with_month(3).is_valid());
    }

    #[test]
    fn test_year_setter_revives_invalid_date() {
        let date = Date::invalid().with_zone(Zone::Utc).with_year(95);
        assert_eq!(date.full_year(), Some(1995));
        assert_eq!(date.month(), Some(0));
        assert_eq!(date.day(), Some(1));
        assert_eq!(date.hours(), Some(0));
    }

    #[test]
    fn test_from_millis_range() {
        assert!(Date::from_millis(MAX_INSTANT_MS).is_valid());
        assert!(Date::from_millis(-MAX_INSTANT_MS).is_valid());
        assert!(!Date::from_millis(MAX_INSTANT_MS + 1).is_valid());
        assert!(!Date::from_millis(i64::MIN).is_valid());
        assert!(!Date::ymd_in(300_000, 0, 1, Zone::Utc).is_valid());
    }

    #[test]
    fn test_pre_epoch_dates() {
        let date = Date::ymd_hms_in(1969, 11, 31, 23, 59, 59, Zone::Utc);
        assert_eq!(date.time(), Some(-1_000));
        let date = Date::from_millis_in(-2_208_988_800_000, Zone::Utc);
        assert_eq!(date.full_year(), Some(1900));
        assert_eq!(date.year(), Some(0));
        assert_eq!(date.weekday(), Some(Weekday::Monday));
        let date = Date::ymd_in(1492, 9, 12, Zone::Utc);
        assert_eq!(date.year(), Some(-408));
        assert_eq!(Date::from_millis_in(date.time().unwrap(), Zone::Utc), date);
    }

    #[test]
    fn test_timezone_offset_sign() {
        let date = Date::from_millis_in(0, pst());
        assert_eq!(date.timezone_offset(), Some(480));
        assert_eq!(date.offset(), Some(UtcOffset::from_minutes(-480).unwrap()));
        assert_eq!(Date::from_millis_in(0, Zone::Utc).timezone_offset(), Some(0));
    }

    #[test]
    fn test_days_until_rounding() {
        let start = Date::from_millis_in(0, Zone::Utc);
        let cases = [
            (0, 0),
            (MS_PER_DAY, 1),
            (MS_PER_DAY / 2 - 1, 0),
            (MS_PER_DAY / 2, 1),
            (-MS_PER_DAY / 2, -1),
            (-MS_PER_DAY / 2 + 1, 0),
            (10 * MS_PER_DAY + 3 * MS_PER_HOUR, 10),
            (-3 * MS_PER_DAY - 13 * MS_PER_HOUR, -4),
        ];
        for (offset, expected) in cases {
            let end = Date::from_millis_in(offset, Zone::Utc);
            assert_eq!(start.days_until(&end), Some(expected), "offset {offset}");
        }
        assert_eq!(start.days_until(&Date::invalid()), None);
        assert_eq!(MS_PER_DAY, 86_400_000);
    }

    #[test]
    fn test_same_calendar_day() {
        let morning = Date::ymd_hms_in(96, 2, 18, 8, 0, 0, Zone::Utc);
        let evening = Date::ymd_hms_in(96, 2, 18, 23, 0, 0, Zone::Utc);
        let next = Date::ymd_in(96, 2, 19, Zone::Utc);
        assert!(morning.same_calendar_day(&evening));
        assert!(!evening.same_calendar_day(&next));
        // 23:00 UTC is already the 19th in a zone two hours east
        let east = Zone::Fixed(UtcOffset::from_minutes(120).unwrap());
        assert!(evening.with_zone(east).same_calendar_day(&next));
        assert!(!morning.same_calendar_day(&Date::invalid()));
    }

    #[test]
    fn test_ordering() {
        let a = Date::from_millis(-1);
        let b = Date::from_millis(0);
        let c = Date::from_millis(1);
        assert!(a < b && b < c);
        assert!(Date::invalid() < a);
        assert_eq!(Date::from_millis_in(5, Zone::Utc), Date::from_millis_in(5, pst()));
    }

    #[test]
    fn test_from_str() {
        let date: Date = "1995-12-25T00:00:00Z".parse().unwrap();
        assert_eq!(date.time(), Some(CHRISTMAS_1995));

        let result = "Smarch 1".parse::<Date>();
        assert!(matches!(result, Err(ParseError::UnknownToken(_))));
    }

    #[test]
    fn test_now_is_valid() {
        let now = Date::now();
        assert!(now.is_valid());
        // Well after this crate was written
        assert!(now.full_year().unwrap() >= 2024);
    }

    #[test]
    fn test_utc_composition() {
        let fields = CalendarFields::new(1995, 11, 25);
        assert_eq!(Date::utc(&fields), Some(CHRISTMAS_1995));
        assert_eq!(Date::utc(&CalendarFields::new(300_000, 0, 1)), None);
    }

    #[test]
    fn test_error_messages() {
        let err = ParseError::InvalidDay {
            year: 1995,
            month: 1,
            day: 30,
        };
        assert_eq!(err.to_string(), "Invalid day 30 for month 1995-02");
        assert_eq!(
            ParseError::MissingField("year").to_string(),
            "Date string has no year"
        );
        let err: DateError = ParseError::EmptyInput.into();
        assert_eq!(err.to_string(), "Empty date string");
        assert_eq!(DateError::InvalidTime.to_string(), "Invalid time value");
    }

    #[test]
    fn test_serde_string_format() {
        let date = Date::from_millis_in(CHRISTMAS_1995 + 34_200_250, Zone::Utc);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"1995-12-25T09:30:00.250Z\"");

        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);

        let json = serde_json::to_string(&Date::invalid()).unwrap();
        assert_eq!(json, "null");
        let parsed: Date = serde_json::from_str("null").unwrap();
        assert!(!parsed.is_valid());

        let result: Result<Date, _> = serde_json::from_str("\"Smarch 1\"");
        assert!(result.is_err());
    }
}
