//! Date string parsing.
//!
//! Two grammars are accepted. ISO-8601 strings (`1995-12-25`,
//! `1995-12-25T09:30:00.000Z`, `+275760-09-13`) are recognised by their
//! leading year. Everything else goes through the human-readable grammar:
//! English month names, a day and year in any order, an optional
//! `h:mm[:ss]` time with `AM`/`PM`, an optional zone token and parenthetical
//! comments that are dropped, e.g. `"December 25, (Christmas) 1995"` or
//! `"Mon, 25 Dec 1995 13:30:00 GMT+0430"`.

use tracing::trace;

use crate::calendar;
use crate::consts::{MAX_INSTANT_MS, MIN_NAME_PREFIX, MONTH_NAMES, WEEKDAY_NAMES};
use crate::types::{CalendarFields, days_in_month};
use crate::zone::{UtcOffset, Zone};
use crate::{DECEMBER, ParseError, YEAR_BASE};

/// Parses `input` into milliseconds since the epoch.
/// Strings without a zone designator are read as wall-clock time in `zone`.
pub(crate) fn parse(input: &str, zone: Zone) -> Result<i64, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let utc_ms = if looks_like_iso(trimmed) {
        parse_iso(trimmed, zone)?
    } else {
        parse_legacy(trimmed, zone)?
    };

    if utc_ms.unsigned_abs() > MAX_INSTANT_MS.unsigned_abs() {
        return Err(ParseError::OutOfRange(trimmed.to_owned()));
    }
    Ok(utc_ms)
}

fn looks_like_iso(s: &str) -> bool {
    let bytes = s.as_bytes();
    let leading_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    match bytes.first() {
        Some(b'+' | b'-') => leading_digits(1) == 6,
        Some(b) if b.is_ascii_digit() => {
            leading_digits(0) == 4 && matches!(bytes.get(4), None | Some(b'-'))
        }
        _ => false,
    }
}

/// Byte cursor over an ASCII-oriented date string
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    fn is_done(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn digits(&mut self) -> &'a str {
        self.take_while(|b| b.is_ascii_digit())
    }

    /// Exactly `width` digits, as the ISO grammar requires
    fn fixed_digits(&mut self, width: usize) -> Option<i64> {
        let segment = self.src.get(self.pos..self.pos + width)?;
        if !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.pos += width;
        segment.parse().ok()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }
}

/// Parses a run of 1-9 digits into a number
fn number(digits: &str) -> Result<i64, ParseError> {
    if digits.is_empty() || digits.len() > 9 {
        return Err(ParseError::InvalidFormat(digits.to_owned()));
    }
    digits
        .parse()
        .map_err(|_| ParseError::InvalidFormat(digits.to_owned()))
}

/// Milliseconds from a fraction-of-second digit string, truncated past three digits
fn fraction_to_millis(digits: &str) -> Result<i64, ParseError> {
    if digits.is_empty() {
        return Err(ParseError::InvalidTime(digits.to_owned()));
    }
    let padded = format!("{:0<3}", &digits[..digits.len().min(3)]);
    number(&padded)
}

fn wall_clock(fields: &CalendarFields, raw: &str) -> Result<i64, ParseError> {
    calendar::compose(fields).ok_or_else(|| ParseError::OutOfRange(raw.to_owned()))
}

fn parse_iso(s: &str, zone: Zone) -> Result<i64, ParseError> {
    let invalid = || ParseError::InvalidFormat(s.to_owned());
    let mut cur = Cursor::new(s);

    let year = match cur.peek() {
        Some(sign @ (b'+' | b'-')) => {
            cur.pos += 1;
            let digits = cur.fixed_digits(6).ok_or_else(invalid)?;
            if sign == b'-' {
                // -000000 is not a valid expanded year
                if digits == 0 {
                    return Err(invalid());
                }
                -digits
            } else {
                digits
            }
        }
        _ => cur.fixed_digits(4).ok_or_else(invalid)?,
    };

    let mut month = 1;
    let mut day = 1;
    if cur.eat(b'-') {
        month = cur.fixed_digits(2).ok_or_else(invalid)?;
        if cur.eat(b'-') {
            day = cur.fixed_digits(2).ok_or_else(invalid)?;
        }
    }
    if !(1..=12).contains(&month) {
        return Err(ParseError::InvalidMonth(month));
    }
    let month_index = (month - 1) as u8;
    if day < 1 || day > i64::from(days_in_month(year, month_index)) {
        return Err(ParseError::InvalidDay {
            year,
            month: month_index,
            day,
        });
    }

    let mut fields = CalendarFields::new(year, i64::from(month_index), day);
    if cur.is_done() {
        // Date-only forms are UTC
        return wall_clock(&fields, s);
    }

    if !(cur.eat(b'T') || cur.eat(b't') || cur.eat(b' ')) {
        return Err(invalid());
    }
    let time_err = || ParseError::InvalidTime(s.to_owned());
    let hour = cur.fixed_digits(2).ok_or_else(time_err)?;
    if !cur.eat(b':') {
        return Err(time_err());
    }
    let minute = cur.fixed_digits(2).ok_or_else(time_err)?;
    let mut second = 0;
    let mut millisecond = 0;
    if cur.eat(b':') {
        second = cur.fixed_digits(2).ok_or_else(time_err)?;
        if cur.eat(b'.') {
            millisecond = fraction_to_millis(cur.digits())?;
        }
    }
    // 24:00:00 is the end of the day
    let end_of_day = hour == 24 && minute == 0 && second == 0 && millisecond == 0;
    if (hour > 23 && !end_of_day) || minute > 59 || second > 59 {
        return Err(time_err());
    }
    fields = fields.at(hour, minute, second).with_millisecond(millisecond);

    let offset = match cur.peek() {
        None => None,
        Some(b'Z' | b'z') => {
            cur.pos += 1;
            Some(UtcOffset::UTC)
        }
        Some(b'+' | b'-') => {
            let rest = cur.rest();
            let offset = rest
                .parse::<UtcOffset>()
                .map_err(|_| ParseError::InvalidOffset(rest.to_owned()))?;
            cur.pos = s.len();
            Some(offset)
        }
        Some(_) => return Err(invalid()),
    };
    if !cur.is_done() {
        return Err(invalid());
    }

    let local = wall_clock(&fields, s)?;
    Ok(match offset {
        Some(offset) => local - offset.as_millis(),
        None => zone.local_to_utc(local),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Pieces collected from a human-readable date string
#[derive(Debug, Default)]
struct Parts {
    year: Option<i64>,
    month: Option<u8>,
    day: Option<i64>,
    time: Option<(i64, i64, i64, i64)>,
    meridiem: Option<Meridiem>,
    offset: Option<UtcOffset>,
}

/// North American zone abbreviations and their offsets in hours
const NAMED_ZONES: [(&str, i32); 8] = [
    ("est", -5),
    ("edt", -4),
    ("cst", -6),
    ("cdt", -5),
    ("mst", -7),
    ("mdt", -6),
    ("pst", -8),
    ("pdt", -7),
];

/// Index of the name `word` abbreviates, if it is at least three letters long
fn match_name(word: &str, names: &[&str]) -> Option<usize> {
    if word.len() < MIN_NAME_PREFIX {
        return None;
    }
    names.iter().position(|name| {
        name.len() >= word.len() && name[..word.len()].eq_ignore_ascii_case(word)
    })
}

fn parse_legacy(s: &str, zone: Zone) -> Result<i64, ParseError> {
    let mut cur = Cursor::new(s);
    let mut parts = Parts::default();

    while let Some(byte) = cur.peek() {
        match byte {
            b'(' => skip_comment(&mut cur),
            b' ' | b'\t' | b'\n' | b'\r' | b',' | b'.' => cur.pos += 1,
            b'+' | b'-' if starts_offset(&cur, &parts) => read_offset(&mut cur, &mut parts)?,
            // Dash between day, month and year, as in 25-Dec-1995
            b'-' => cur.pos += 1,
            b if b.is_ascii_alphabetic() => {
                let word = cur.take_while(|b| b.is_ascii_alphabetic());
                handle_word(word, &mut parts)?;
            }
            b if b.is_ascii_digit() => {
                let digits = cur.digits();
                match cur.peek() {
                    Some(b':') => read_time(digits, &mut cur, &mut parts)?,
                    Some(b'/') => read_numeric_date(digits, &mut cur, &mut parts)?,
                    _ => handle_number(digits, &mut parts)?,
                }
            }
            _ => {
                let rest = cur.rest();
                let bad = rest.chars().next().map(String::from).unwrap_or_default();
                return Err(ParseError::InvalidFormat(bad));
            }
        }
    }

    finish(&parts, s, zone)
}

/// Skips a parenthesised comment, honouring nesting; an unclosed comment runs to the end
fn skip_comment(cur: &mut Cursor<'_>) {
    let mut depth = 0usize;
    while let Some(byte) = cur.peek() {
        cur.pos += 1;
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// A sign starts an offset when it follows a zone name, a time of day or the year
fn starts_offset(cur: &Cursor<'_>, parts: &Parts) -> bool {
    cur.peek_at(1).is_some_and(|b| b.is_ascii_digit())
        && (parts.offset.is_some() || parts.time.is_some() || parts.year.is_some())
}

fn read_offset(cur: &mut Cursor<'_>, parts: &mut Parts) -> Result<(), ParseError> {
    let start = cur.pos;
    cur.pos += 1;
    cur.digits();
    if cur.peek() == Some(b':') && cur.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
        cur.pos += 1;
        cur.digits();
    }
    let raw = &cur.src[start..cur.pos];
    let offset = raw
        .parse::<UtcOffset>()
        .map_err(|_| ParseError::InvalidOffset(raw.to_owned()))?;
    // GMT+0800: the numeric part refines the zone name
    if parts.offset.is_some_and(|current| current != UtcOffset::UTC) {
        return Err(ParseError::InvalidOffset(raw.to_owned()));
    }
    trace!(offset = %offset, "date string offset");
    parts.offset = Some(offset);
    Ok(())
}

fn handle_word(word: &str, parts: &mut Parts) -> Result<(), ParseError> {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "am" | "pm" => {
            if parts.time.is_none() || parts.meridiem.is_some() {
                return Err(ParseError::InvalidTime(word.to_owned()));
            }
            parts.meridiem = Some(if lower == "am" {
                Meridiem::Am
            } else {
                Meridiem::Pm
            });
        }
        "gmt" | "utc" | "ut" | "z" => set_offset(parts, UtcOffset::UTC, word)?,
        // ISO-style separator left over from `1995-12-25T10:00` variants
        "t" => {}
        _ => {
            if let Some((_, hours)) = NAMED_ZONES.iter().find(|(name, _)| *name == lower) {
                let offset = UtcOffset::from_minutes(hours * 60)
                    .map_err(|_| ParseError::InvalidOffset(word.to_owned()))?;
                set_offset(parts, offset, word)?;
            } else if let Some(index) = match_name(word, &MONTH_NAMES) {
                if parts.month.is_some() {
                    return Err(ParseError::InvalidFormat(word.to_owned()));
                }
                trace!(word, month = index, "date string month");
                parts.month = Some(index as u8);
            } else if match_name(word, &WEEKDAY_NAMES).is_some() {
                // The weekday is implied by the date
                trace!(word, "ignoring weekday");
            } else {
                return Err(ParseError::UnknownToken(word.to_owned()));
            }
        }
    }
    Ok(())
}

fn set_offset(parts: &mut Parts, offset: UtcOffset, word: &str) -> Result<(), ParseError> {
    if parts.offset.is_some() {
        return Err(ParseError::InvalidOffset(word.to_owned()));
    }
    parts.offset = Some(offset);
    Ok(())
}

/// Places a bare number: large values are years, small ones fill the day first
fn handle_number(digits: &str, parts: &mut Parts) -> Result<(), ParseError> {
    let value = number(digits)?;
    if digits.len() > 2 || value > 31 {
        if parts.year.is_some() {
            return Err(ParseError::InvalidFormat(digits.to_owned()));
        }
        parts.year = Some(value);
    } else if parts.day.is_none() {
        parts.day = Some(value);
    } else if parts.year.is_none() {
        parts.year = Some(value);
    } else {
        return Err(ParseError::InvalidFormat(digits.to_owned()));
    }
    trace!(digits, year = ?parts.year, day = ?parts.day, "date string number");
    Ok(())
}

fn read_time(hour: &str, cur: &mut Cursor<'_>, parts: &mut Parts) -> Result<(), ParseError> {
    let start = cur.pos - hour.len();
    let time_err = |cur: &Cursor<'_>| ParseError::InvalidTime(cur.src[start..cur.pos].to_owned());
    if parts.time.is_some() || hour.len() > 2 {
        return Err(time_err(&*cur));
    }
    let hour = number(hour)?;

    cur.pos += 1;
    let minute = cur.digits();
    if minute.len() != 2 {
        return Err(time_err(&*cur));
    }
    let minute = number(minute)?;

    let mut second = 0;
    let mut millisecond = 0;
    if cur.peek() == Some(b':') {
        cur.pos += 1;
        let digits = cur.digits();
        if digits.len() != 2 {
            return Err(time_err(&*cur));
        }
        second = number(digits)?;
        if cur.peek() == Some(b'.') && cur.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            cur.pos += 1;
            millisecond = fraction_to_millis(cur.digits())?;
        }
    }

    parts.time = Some((hour, minute, second, millisecond));
    Ok(())
}

/// `m/d/y` with a 1-indexed month
fn read_numeric_date(
    month: &str,
    cur: &mut Cursor<'_>,
    parts: &mut Parts,
) -> Result<(), ParseError> {
    let start = cur.pos - month.len();
    if parts.month.is_some() || parts.day.is_some() || parts.year.is_some() {
        return Err(ParseError::InvalidFormat(cur.rest().to_owned()));
    }
    let month = number(month)?;
    cur.pos += 1;
    let day = number(cur.digits())?;
    if !cur.eat(b'/') {
        return Err(ParseError::InvalidFormat(cur.src[start..cur.pos].to_owned()));
    }
    let year = number(cur.digits())?;

    if !(1..=12).contains(&month) {
        return Err(ParseError::InvalidMonth(month));
    }
    parts.month = Some((month - 1) as u8);
    parts.day = Some(day);
    parts.year = Some(year);
    Ok(())
}

fn finish(parts: &Parts, raw: &str, zone: Zone) -> Result<i64, ParseError> {
    let month = parts.month.ok_or(ParseError::MissingField("month"))?;
    let day = parts.day.ok_or(ParseError::MissingField("day"))?;
    let mut year = parts.year.ok_or(ParseError::MissingField("year"))?;
    if (0..100).contains(&year) {
        year += i64::from(YEAR_BASE);
    }

    debug_assert!(month <= DECEMBER);
    if day < 1 || day > i64::from(days_in_month(year, month)) {
        return Err(ParseError::InvalidDay { year, month, day });
    }

    let (mut hour, minute, second, millisecond) = parts.time.unwrap_or_default();
    if let Some(meridiem) = parts.meridiem {
        if !(1..=12).contains(&hour) {
            return Err(ParseError::InvalidTime(format!("{hour} {meridiem:?}")));
        }
        hour %= 12;
        if meridiem == Meridiem::Pm {
            hour += 12;
        }
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(ParseError::InvalidTime(format!(
            "{hour:02}:{minute:02}:{second:02}"
        )));
    }

    let fields = CalendarFields::new(year, i64::from(month), day)
        .at(hour, minute, second)
        .with_millisecond(millisecond);
    let local = wall_clock(&fields, raw)?;
    Ok(match parts.offset {
        Some(offset) => local - offset.as_millis(),
        None => zone.local_to_utc(local),
    })
}
