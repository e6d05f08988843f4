use std::{fmt, str::FromStr};

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{MS_PER_MINUTE, prelude::*};

/// Minutes in a day; offsets must stay strictly inside this
const MINUTES_PER_DAY: i32 = 24 * 60;

/// Error type for zone and offset handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// Offset string was not `±hh`, `±hhmm` or `±hh:mm`.
    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    /// Offset magnitude reached a full day.
    #[error("UTC offset out of range: {0} minutes (must be within ±1439)")]
    OutOfRange(i32),

    /// Zone name was neither `utc`, `gmt`, `local` nor an offset.
    #[error("Unknown time zone: {0}")]
    Unknown(String),
}

/// A fixed distance from UTC in whole minutes, positive east of Greenwich.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Into)]
#[serde(try_from = "i32", into = "i32")]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// Zero offset
    pub const UTC: Self = Self(0);

    /// Creates an offset, validating that it is less than a day in either direction
    ///
    /// # Errors
    /// Returns `ZoneError::OutOfRange` if `|minutes| >= 1440`.
    pub const fn from_minutes(minutes: i32) -> Result<Self, ZoneError> {
        if minutes <= -MINUTES_PER_DAY || minutes >= MINUTES_PER_DAY {
            return Err(ZoneError::OutOfRange(minutes));
        }
        Ok(Self(minutes))
    }

    /// Creates an offset from unsigned hours and minutes, west of UTC when `negative` is set
    ///
    /// # Errors
    /// Returns `ZoneError::OutOfRange` for a day or more.
    pub const fn from_hours_minutes(negative: bool, hours: u8, minutes: u8) -> Result<Self, ZoneError> {
        let total = hours as i32 * 60 + minutes as i32;
        Self::from_minutes(if negative { -total } else { total })
    }

    /// Offset in minutes, positive east of UTC
    #[inline]
    pub const fn minutes(self) -> i32 {
        self.0
    }

    /// Offset in milliseconds
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.0 as i64 * MS_PER_MINUTE
    }

    /// `+hhmm` rendering used after `GMT` in date strings
    pub fn compact(self) -> String {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        format!("{sign}{:02}{:02}", abs / 60, abs % 60)
    }
}

impl TryFrom<i32> for UtcOffset {
    type Error = ZoneError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_minutes(value)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl FromStr for UtcOffset {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ZoneError::InvalidOffset(s.to_owned());
        let trimmed = s.trim();
        let negative = match trimmed.chars().next() {
            Some('+') => false,
            Some('-') => true,
            _ => return Err(invalid()),
        };
        let body = &trimmed[1..];
        if !body.bytes().all(|b| b.is_ascii_digit() || b == b':') {
            return Err(invalid());
        }
        let (hours, minutes) = match body.split_once(':') {
            Some((h, m)) if (1..=2).contains(&h.len()) && m.len() == 2 => (h, m),
            Some(_) => return Err(invalid()),
            None => match body.len() {
                1 | 2 => (body, "0"),
                4 => body.split_at(2),
                _ => return Err(invalid()),
            },
        };
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: u8 = hours.parse().map_err(|_| invalid())?;
        let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        Self::from_hours_minutes(negative, hours, minutes)
    }
}

/// Time zone context in which an instant is read as calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    /// Coordinated Universal Time
    Utc,
    /// The host's local zone, including its daylight-saving rules
    #[default]
    Local,
    /// A constant offset from UTC
    Fixed(UtcOffset),
}

impl Zone {
    /// Offset in effect at the given instant
    pub fn offset_at(self, utc_ms: i64) -> UtcOffset {
        match self {
            Self::Utc => UtcOffset::UTC,
            Self::Fixed(offset) => offset,
            Self::Local => Local
                .timestamp_millis_opt(utc_ms)
                .single()
                .and_then(|dt| UtcOffset::from_minutes(dt.offset().local_minus_utc() / 60).ok())
                .unwrap_or(UtcOffset::UTC),
        }
    }

    /// Wall-clock milliseconds for an instant
    pub fn to_local(self, utc_ms: i64) -> i64 {
        utc_ms + self.offset_at(utc_ms).as_millis()
    }

    /// Instant for wall-clock milliseconds.
    ///
    /// Around a daylight-saving transition the offset is looked up twice so
    /// that a skipped wall-clock time resolves forward and a repeated one
    /// resolves to its first occurrence.
    pub fn local_to_utc(self, local_ms: i64) -> i64 {
        match self {
            Self::Utc => local_ms,
            Self::Fixed(offset) => local_ms - offset.as_millis(),
            Self::Local => {
                let guess = local_ms - self.offset_at(local_ms).as_millis();
                local_ms - self.offset_at(guess).as_millis()
            }
        }
    }
}

impl From<UtcOffset> for Zone {
    fn from(offset: UtcOffset) -> Self {
        if offset == UtcOffset::UTC {
            Self::Utc
        } else {
            Self::Fixed(offset)
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Local => f.write_str("Local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for Zone {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "gmt" | "z" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ if trimmed.starts_with(['+', '-']) => trimmed.parse::<UtcOffset>().map(Self::from),
            _ => Err(ZoneError::Unknown(trimmed.to_owned())),
        }
    }
}
