//! String renderings of a [`Date`].

use std::fmt;

use crate::{CalendarFields, Date, DateError, INVALID_DATE, MONTH_NAMES, UtcOffset, decompose};

fn short_month(fields: &CalendarFields) -> &'static str {
    &MONTH_NAMES[fields.month as usize][..3]
}

/// Four-digit year, with a leading `-` before the common era
fn display_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    }
}

/// ISO-8601 year: four digits inside 0..=9999, signed six digits outside
fn iso_year(year: i64) -> String {
    if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", year.unsigned_abs())
    } else {
        format!("+{year:06}")
    }
}

fn date_part(fields: &CalendarFields) -> String {
    format!(
        "{} {} {:02} {}",
        fields.weekday().short_name(),
        short_month(fields),
        fields.day,
        display_year(fields.year)
    )
}

fn time_part(fields: &CalendarFields, offset: UtcOffset) -> String {
    format!(
        "{:02}:{:02}:{:02} GMT{}",
        fields.hour,
        fields.minute,
        fields.second,
        offset.compact()
    )
}

impl Date {
    fn local_view(&self) -> Option<(CalendarFields, UtcOffset)> {
        Some((self.fields()?, self.offset()?))
    }

    /// Date portion of the default rendering: `Mon Dec 25 1995`
    pub fn to_date_string(&self) -> String {
        self.local_view()
            .map_or_else(|| INVALID_DATE.to_owned(), |(fields, _)| date_part(&fields))
    }

    /// Time portion of the default rendering: `09:30:00 GMT-0800`
    pub fn to_time_string(&self) -> String {
        self.local_view().map_or_else(
            || INVALID_DATE.to_owned(),
            |(fields, offset)| time_part(&fields, offset),
        )
    }

    /// RFC 7231 style UTC rendering: `Mon, 25 Dec 1995 17:30:00 GMT`
    pub fn to_utc_string(&self) -> String {
        let Some(ms) = self.time() else {
            return INVALID_DATE.to_owned();
        };
        let fields = decompose(ms);
        format!(
            "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
            fields.weekday().short_name(),
            fields.day,
            short_month(&fields),
            display_year(fields.year),
            fields.hour,
            fields.minute,
            fields.second
        )
    }

    /// ISO-8601 UTC rendering with milliseconds: `1995-12-25T17:30:00.000Z`
    ///
    /// # Errors
    /// Returns `DateError::InvalidTime` for an invalid date.
    pub fn to_iso_string(&self) -> Result<String, DateError> {
        let ms = self.time().ok_or(DateError::InvalidTime)?;
        let fields = decompose(ms);
        Ok(format!(
            "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            iso_year(fields.year),
            fields.month + 1,
            fields.day,
            fields.hour,
            fields.minute,
            fields.second,
            fields.millisecond
        ))
    }

    /// US English rendering: `12/25/1995, 9:30:00 AM`
    pub fn to_locale_string(&self) -> String {
        if !self.is_valid() {
            return INVALID_DATE.to_owned();
        }
        format!(
            "{}, {}",
            self.to_locale_date_string(),
            self.to_locale_time_string()
        )
    }

    /// `12/25/1995`
    pub fn to_locale_date_string(&self) -> String {
        self.fields().map_or_else(
            || INVALID_DATE.to_owned(),
            |f| format!("{}/{}/{}", f.month + 1, f.day, f.year),
        )
    }

    /// `9:30:00 AM`
    pub fn to_locale_time_string(&self) -> String {
        self.fields().map_or_else(
            || INVALID_DATE.to_owned(),
            |f| {
                let meridiem = if f.hour < 12 { "AM" } else { "PM" };
                let hour = match f.hour % 12 {
                    0 => 12,
                    h => h,
                };
                format!("{hour}:{:02}:{:02} {meridiem}", f.minute, f.second)
            },
        )
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_view() {
            Some((fields, offset)) => {
                write!(f, "{} {}", date_part(&fields), time_part(&fields, offset))
            }
            None => f.write_str(INVALID_DATE),
        }
    }
}
