//! Canonical message record.
//!
//! Both input strategies produce [`MessageRecord`]s. A record is what
//! downstream chunking and indexing consume: a rendered `text` plus a flat
//! [`RecordMetadata`] mapping.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use kakaopack::record::{RecordBuilder, Timestamp};
//!
//! let mut builder = RecordBuilder::new("room.txt", 3);
//! let ts = Timestamp::DateTime(
//!     NaiveDate::from_ymd_opt(2024, 3, 27).unwrap().and_hms_opt(10, 55, 0).unwrap(),
//! );
//! let record = builder.build("가나다", "안녕하세요", ts);
//!
//! assert_eq!(record.text, "User: **, Message: 안녕하세요");
//! assert_eq!(record.metadata().date, "2024-03-27 10:55:00");
//! ```

use std::fmt;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::anonymize::anonymize_user_id;

/// When a message was sent.
///
/// Transcript messages always have a full date-time (seconds are zero).
/// Tabular rows may only carry a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Date and wall-clock time
    DateTime(NaiveDateTime),
    /// Date only; time of day is unknown
    Date(NaiveDate),
}

impl Timestamp {
    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        match self {
            Timestamp::DateTime(dt) => dt.date(),
            Timestamp::Date(d) => *d,
        }
    }

    /// Returns a date-time, using midnight for date-only timestamps.
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            Timestamp::DateTime(dt) => *dt,
            Timestamp::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// Returns `true` if the time of day is known.
    pub fn has_time(&self) -> bool {
        matches!(self, Timestamp::DateTime(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp::DateTime(dt)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(d: NaiveDate) -> Self {
        Timestamp::Date(d)
    }
}

/// A dated, attributed, anonymized chat message.
///
/// | Field | Description |
/// |-------|-------------|
/// | `text` | `User: <anonymized>, Message: <body>` |
/// | `anonymized_user` | Masked user id |
/// | `timestamp` | When the message was sent |
/// | `year` / `month` / `day` | Components of `timestamp`, kept for filtering |
/// | `row_index` | Zero-based position among records of one load |
/// | `source` | File the record came from |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Rendered content.
    pub text: String,

    /// Masked user id.
    pub anonymized_user: String,

    /// When the message was sent.
    pub timestamp: Timestamp,

    /// Year of `timestamp`.
    pub year: i32,

    /// Month of `timestamp` (1-12).
    pub month: u32,

    /// Day of month of `timestamp`.
    pub day: u32,

    /// Zero-based ordinal among emitted records.
    pub row_index: usize,

    /// Originating file path.
    pub source: String,
}

impl MessageRecord {
    /// Returns the rendered text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the metadata mapping handed to downstream indexers.
    pub fn metadata(&self) -> RecordMetadata {
        RecordMetadata {
            date: self.timestamp.to_string(),
            year: self.year,
            month: self.month,
            day: self.day,
            user: self.anonymized_user.clone(),
            row: self.row_index,
            source: self.source.clone(),
        }
    }
}

/// Flat metadata attached to each record.
///
/// Keys match what vector stores index on: `date`, `year`, `month`, `day`,
/// `user`, `row`, `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub user: String,
    pub row: usize,
    pub source: String,
}

/// Renders the record text for an already anonymized user.
///
/// The text carries no surrounding quote characters. Some older loaders
/// for these exports prefixed every text with a stray `"`; strip it before
/// comparing against their output.
pub fn render_text(anonymized_user: &str, body: &str) -> String {
    format!("User: {anonymized_user}, Message: {body}")
}

/// Assigns row indexes and applies anonymization while records are built.
///
/// One builder lives for exactly one load.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    source: String,
    mask_len: usize,
    next_row: usize,
}

impl RecordBuilder {
    /// Creates a builder for records read from `source`.
    pub fn new(source: impl AsRef<Path>, mask_len: usize) -> Self {
        Self {
            source: source.as_ref().display().to_string(),
            mask_len,
            next_row: 0,
        }
    }

    /// Masks a raw user id with this builder's mask length.
    pub fn anonymize(&self, user: &str) -> String {
        anonymize_user_id(user, self.mask_len)
    }

    /// Builds the next record from a raw (unmasked) user id.
    pub fn build(&mut self, user: &str, body: &str, timestamp: Timestamp) -> MessageRecord {
        let anonymized = self.anonymize(user);
        self.build_anonymized(anonymized, body, timestamp)
    }

    /// Builds the next record from an already masked user id.
    pub fn build_anonymized(
        &mut self,
        anonymized_user: String,
        body: &str,
        timestamp: Timestamp,
    ) -> MessageRecord {
        let date = timestamp.date();
        let record = MessageRecord {
            text: render_text(&anonymized_user, body),
            anonymized_user,
            timestamp,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            row_index: self.next_row,
            source: self.source.clone(),
        };
        self.next_row += 1;
        record
    }

    /// Number of records built so far.
    pub fn emitted(&self) -> usize {
        self.next_row
    }
}
