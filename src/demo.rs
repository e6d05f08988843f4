//! The First Customer Shipment countdown: a short tour of the `Date` API
//! that prints how many days are left until FCS and then exercises each
//! construction form, accessor and setter on Christmas 1995.

use std::fmt::Display;
use std::io::{self, Write};

use tracing::debug;

use crate::{Date, DateError, Zone};

/// The countdown target
pub const FCS_DATE: &str = "March 18, 1996";

const FCS_DAY_LINE: &str = "It's FCS day, you shouldn't be looking at date/time functions!";
const NOT_YET_LINE: &str = "It's not FCS yet. Be patient!";

/// Rendering of a missing number, as the classic API prints it
const NOT_A_NUMBER: &str = "NaN";

/// Reads a date argument: a bare integer is milliseconds since the epoch,
/// anything else goes through the date parser with `zone` as the default zone.
///
/// # Errors
/// Returns `DateError::Parse` for an unreadable string and
/// `DateError::InvalidTime` for a count outside the representable range.
pub fn read_date(input: &str, zone: Zone) -> Result<Date, DateError> {
    let ms = match input.trim().parse::<i64>() {
        Ok(ms) => ms,
        Err(_) => Date::parse_in(input, zone)?,
    };
    let date = Date::from_millis_in(ms, zone);
    if !date.is_valid() {
        return Err(DateError::InvalidTime);
    }
    Ok(date)
}

fn number<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_A_NUMBER.to_owned(), |v| v.to_string())
}

/// Report generator for the countdown.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    today: Date,
    fcs: Date,
    zone: Zone,
}

impl Demo {
    /// `today` and `fcs` are re-read in `zone`, which is also where the tour
    /// builds its own dates
    pub const fn new(today: Date, fcs: Date, zone: Zone) -> Self {
        Self {
            today: today.with_zone(zone),
            fcs: fcs.with_zone(zone),
            zone,
        }
    }

    pub const fn today(&self) -> Date {
        self.today
    }

    pub const fn fcs(&self) -> Date {
        self.fcs
    }

    /// Whole days from today to FCS, negative once it has passed
    pub fn days_left(&self) -> Option<i64> {
        self.today.days_until(&self.fcs)
    }

    fn countdown(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.today.same_calendar_day(&self.fcs) {
            lines.push(FCS_DAY_LINE.to_owned());
        } else if self.today < self.fcs {
            lines.push(NOT_YET_LINE.to_owned());
        }

        let days_left = self.days_left();
        debug!(?days_left, "countdown");
        lines.push(format!(
            "You have {} development days left",
            number(days_left)
        ));
        lines.push(format!("Today is {}", self.today));
        lines.push(format!("FCS day is {}", self.fcs));
        lines
    }

    fn tour(&self) -> Vec<String> {
        let zone = self.zone;
        let christmas = Date::from_string_in("December 25, (Christmas) 1995", zone);
        let from_fields = Date::ymd_in(95, 11, 25, zone);
        let with_time = Date::ymd_hms_in(95, 11, 25, 9, 30, 0, zone);
        let gmt = Date::parse_in("Dec 25,1995 gmt", zone)
            .map_or_else(|_| Date::invalid().with_zone(zone), |ms| Date::from_millis_in(ms, zone));

        let mut lines = vec![
            christmas.to_string(),
            from_fields.to_string(),
            with_time.to_string(),
            gmt.to_string(),
            number(gmt.year()),
            number(gmt.month()),
            number(gmt.day()),
            number(gmt.hours()),
            number(gmt.minutes()),
            number(gmt.seconds()),
            number(gmt.day_of_week()),
        ];

        let updated = gmt
            .with_year(95)
            .with_month(11)
            .with_day(25)
            .with_hours(11)
            .with_minutes(42)
            .with_seconds(1);
        lines.push(updated.to_string());
        lines.push(number(updated.time()));
        lines
    }

    /// Every output line, in order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.countdown();
        lines.extend(self.tour());
        lines
    }

    /// Writes [`Demo::lines`] to `out`, one per line
    ///
    /// # Errors
    /// Propagates write failures.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}
