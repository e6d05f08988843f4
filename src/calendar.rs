//! Day-number arithmetic on the proleptic Gregorian calendar.
//!
//! Instants here are wall-clock milliseconds: the zone offset has already
//! been applied (or has yet to be removed) by the caller. Composition works
//! in `i128` so that arbitrary out-of-range fields roll over without
//! overflowing before the final range check.

use crate::consts::{
    DAYS_PER_ERA, EPOCH_DAY_OFFSET, MAX_INSTANT_MS, MONTHS_PER_YEAR, MS_PER_DAY, MS_PER_HOUR,
    MS_PER_MINUTE, MS_PER_SECOND,
};
use crate::types::{CalendarFields, Weekday};

/// Days from 1970-01-01 to the given civil date (`month` is 1-indexed)
fn days_from_civil(year: i128, month: i128, day: i128) -> i128 {
    let era_days = i128::from(DAYS_PER_ERA);
    let adjusted_year = if month <= 2 { year - 1 } else { year };
    let era = adjusted_year.div_euclid(400);
    let yoe = adjusted_year - era * 400;
    let doy = (153 * (month + if month > 2 { -3 } else { 9 }) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * era_days + doe - i128::from(EPOCH_DAY_OFFSET)
}

/// Civil date of a day number: (year, 0-indexed month, day of month)
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + EPOCH_DAY_OFFSET;
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096).div_euclid(365);
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2).div_euclid(153);
    let day = (doy - (153 * mp + 2).div_euclid(5) + 1) as u8;
    let month = (mp + if mp < 10 { 3 } else { -9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month - 1, day)
}

/// Day number of the given fields' date, rolling excess months into years
/// and excess days into following months
pub(crate) fn make_day(year: i64, month: i64, day: i64) -> i128 {
    let total_months = i128::from(year) * i128::from(MONTHS_PER_YEAR) + i128::from(month);
    let norm_year = total_months.div_euclid(i128::from(MONTHS_PER_YEAR));
    let norm_month = total_months.rem_euclid(i128::from(MONTHS_PER_YEAR)) + 1;
    days_from_civil(norm_year, norm_month, 1) + i128::from(day) - 1
}

/// Milliseconds into the day for the given time fields (may exceed one day)
pub(crate) fn make_time(hour: i64, minute: i64, second: i64, millisecond: i64) -> i128 {
    i128::from(hour) * i128::from(MS_PER_HOUR)
        + i128::from(minute) * i128::from(MS_PER_MINUTE)
        + i128::from(second) * i128::from(MS_PER_SECOND)
        + i128::from(millisecond)
}

fn make_local_ms(fields: &CalendarFields) -> i128 {
    make_day(fields.year, fields.month, fields.day) * i128::from(MS_PER_DAY)
        + make_time(fields.hour, fields.minute, fields.second, fields.millisecond)
}

/// Wall-clock milliseconds for the fields, or `None` when they lie more than
/// a day beyond the representable instant range
pub fn compose(fields: &CalendarFields) -> Option<i64> {
    let limit = i128::from(MAX_INSTANT_MS) + i128::from(MS_PER_DAY);
    let local = make_local_ms(fields);
    if local.abs() > limit {
        return None;
    }
    i64::try_from(local).ok()
}

/// Breaks wall-clock milliseconds into normalized fields
pub fn decompose(local_ms: i64) -> CalendarFields {
    let (year, month, day) = civil_from_days(day_number(local_ms));
    let ms_in_day = local_ms.rem_euclid(MS_PER_DAY);
    CalendarFields {
        year,
        month: i64::from(month),
        day: i64::from(day),
        hour: ms_in_day / MS_PER_HOUR,
        minute: (ms_in_day % MS_PER_HOUR) / MS_PER_MINUTE,
        second: (ms_in_day % MS_PER_MINUTE) / MS_PER_SECOND,
        millisecond: ms_in_day % MS_PER_SECOND,
    }
}

/// Whole days since the epoch, rounding toward negative infinity
pub const fn day_number(local_ms: i64) -> i64 {
    local_ms.div_euclid(MS_PER_DAY)
}

/// Weekday of a day number; day 0 (1970-01-01) was a Thursday
pub fn weekday(day: i64) -> Weekday {
    weekday_of_day(i128::from(day))
}

pub(crate) fn weekday_of_fields(fields: &CalendarFields) -> Weekday {
    weekday_of_day(make_local_ms(fields).div_euclid(i128::from(MS_PER_DAY)))
}

fn weekday_of_day(day: i128) -> Weekday {
    let index = (day + 4).rem_euclid(7) as u8;
    Weekday::from_index(index).unwrap_or(Weekday::Sunday)
}
