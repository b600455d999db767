//! 12-hour clock normalization and timestamp parsing.
//!
//! KakaoTalk transcripts stamp every message with a Korean meridiem marker
//! (`오전` = AM, `오후` = PM) and an `h:mm` clock. The date comes from the
//! most recent day header, so normalization always combines the two.
//!
//! Tabular exports carry a full timestamp string instead, parsed by
//! [`parse_generic_timestamp`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::Timestamp;

/// Ante- or post-meridiem marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    /// `오전`
    Am,
    /// `오후`
    Pm,
}

impl Meridiem {
    /// Returns the Korean marker as it appears in exports.
    pub fn marker(self) -> &'static str {
        match self {
            Meridiem::Am => "오전",
            Meridiem::Pm => "오후",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Meridiem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "오전" => Ok(Meridiem::Am),
            "오후" => Ok(Meridiem::Pm),
            other => Err(format!(
                "Unknown meridiem marker: '{other}'. Expected one of: 오전, 오후"
            )),
        }
    }
}

/// Converts a 12-hour `hour` to the 24-hour clock.
///
/// PM adds 12 unless the hour is 12; AM maps 12 to 0. Everything else
/// passes through unchanged.
pub fn normalize_hour(meridiem: Meridiem, hour: u32) -> u32 {
    match (meridiem, hour) {
        (Meridiem::Pm, h) if h != 12 => h.saturating_add(12),
        (Meridiem::Am, 12) => 0,
        (_, h) => h,
    }
}

/// Combines `date` with a 12-hour clock reading.
///
/// Seconds are always zero. Returns `None` when the resulting clock is not
/// a valid time of day (hour above 12, minute above 59).
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use kakaopack::time::{Meridiem, to_24h};
///
/// let date = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
/// let ts = to_24h(date, Meridiem::Am, 12, 0).unwrap();
/// assert_eq!(ts.to_string(), "2024-04-05 00:00:00");
/// ```
pub fn to_24h(date: NaiveDate, meridiem: Meridiem, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    if hour > 12 {
        return None;
    }
    date.and_hms_opt(normalize_hour(meridiem, hour), minute, 0)
}

/// Parses a clock like `"오후 1:23"` and combines it with `date`.
pub fn parse_marked_time(date: NaiveDate, time_str: &str) -> Option<NaiveDateTime> {
    let (marker, clock) = time_str.trim().split_once(' ')?;
    let meridiem = marker.parse::<Meridiem>().ok()?;
    let (hour, minute) = clock.trim().split_once(':')?;
    to_24h(date, meridiem, hour.parse().ok()?, minute.parse().ok()?)
}

/// Full date-time layouts accepted in tabular `Date` cells.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y. %m. %d. %H:%M",
];

/// Date-only layouts accepted in tabular `Date` cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parses a timestamp string the way a lenient table reader would.
///
/// Tries RFC 3339 (offset dropped, wall-clock kept), then the common
/// date-time layouts, then date-only layouts.
pub fn parse_generic_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Timestamp::DateTime(dt.naive_local()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Timestamp::DateTime(naive));
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .map(Timestamp::Date)
}
