//! Timestamp parsing for timestamp columns
//!
//! Formats use chrono's strftime syntax. Text whose format carries an offset (`%z`, `%:z`) is
//! parsed as an absolute instant; otherwise it is read as local time in the configured
//! timezone. Date-only formats resolve to midnight.

use chrono::format::ParseErrorKind;
use chrono::offset::LocalResult;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::fmt;

use crate::config::ConfigError;
use crate::models::{Column, OPTION_FORMAT, OPTION_TIMEZONE};

/// Timezone used to read local timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    /// Constant offset from UTC
    Fixed(FixedOffset),
    /// IANA zone with its daylight-saving rules
    Named(Tz),
}

impl Timezone {
    pub fn utc() -> Self {
        Timezone::Fixed(Utc.fix())
    }

    /// Attach this timezone to a local time
    ///
    /// A local time repeated by a backward clock change resolves to its earlier instant. A
    /// local time skipped by a forward change is rejected.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>, String> {
        match self {
            Timezone::Fixed(offset) => resolve_in(offset, naive, self),
            Timezone::Named(tz) => resolve_in(tz, naive, self),
        }
    }
}

fn resolve_in<Z: TimeZone>(
    zone: &Z,
    naive: NaiveDateTime,
    name: &Timezone,
) -> Result<DateTime<Utc>, String> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(format!("local time {} does not exist in {}", naive, name)),
    }
}

impl From<FixedOffset> for Timezone {
    fn from(offset: FixedOffset) -> Self {
        Timezone::Fixed(offset)
    }
}

impl From<Tz> for Timezone {
    fn from(tz: Tz) -> Self {
        Timezone::Named(tz)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Fixed(offset) => write!(f, "{}", offset),
            Timezone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// Resolve a timezone name
///
/// Accepts `UTC`, `GMT`, `Z`, offsets written `+09:00`, `-0500`, or `+09`, and IANA zone
/// names such as `Asia/Tokyo`.
pub fn parse_timezone(name: &str) -> Result<Timezone, ConfigError> {
    let unknown = || ConfigError::UnknownTimezone(name.to_string());

    if matches!(name.to_uppercase().as_str(), "UTC" | "GMT" | "Z") {
        return Ok(Timezone::utc());
    }

    match name.as_bytes().first() {
        Some(b'+') => parse_offset(&name[1..], 1).map(Timezone::Fixed).ok_or_else(unknown),
        Some(b'-') => parse_offset(&name[1..], -1).map(Timezone::Fixed).ok_or_else(unknown),
        _ => name.parse::<Tz>().map(Timezone::Named).map_err(|_| unknown()),
    }
}

/// `HH`, `HHMM`, or `HH:MM` after the sign
fn parse_offset(rest: &str, sign: i32) -> Option<FixedOffset> {
    if !rest.is_ascii() {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses text into an instant using one column's format and timezone
#[derive(Debug, Clone)]
pub struct TimestampParser {
    format: String,
    timezone: Timezone,
}

impl TimestampParser {
    pub fn new(format: impl Into<String>, timezone: impl Into<Timezone>) -> Self {
        Self {
            format: format.into(),
            timezone: timezone.into(),
        }
    }

    /// Build a parser from a column's options, falling back to the run defaults
    pub fn for_column(
        column: &Column,
        default_format: &str,
        default_timezone: &str,
    ) -> Result<Self, ConfigError> {
        let format = column.option(OPTION_FORMAT).unwrap_or(default_format);
        let timezone = parse_timezone(column.option(OPTION_TIMEZONE).unwrap_or(default_timezone))?;
        Ok(Self::new(format, timezone))
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Parse text into a UTC instant, returning the parser's reason on rejection
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, String> {
        match DateTime::parse_from_str(text, &self.format) {
            Ok(parsed) => return Ok(parsed.with_timezone(&Utc)),
            Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(e.to_string()),
            Err(_) => {}
        }

        let naive = match NaiveDateTime::parse_from_str(text, &self.format) {
            Ok(naive) => naive,
            Err(e) if e.kind() == ParseErrorKind::NotEnough => {
                NaiveDate::parse_from_str(text, &self.format)
                    .map_err(|e| e.to_string())?
                    .and_time(NaiveTime::MIN)
            }
            Err(e) => return Err(e.to_string()),
        };

        self.timezone.resolve_local(naive)
    }
}
