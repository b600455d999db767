//! Filter records by date and user metadata.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering record collections. The criteria mirror
//! the metadata keys downstream retrievers query on.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Records on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Records on or before date |
//! | Year / month / day | [`with_year`](FilterConfig::with_year) etc. | Component equality |
//! | User | [`with_user`](FilterConfig::with_user) | Anonymized user equality |
//!
//! # Example
//!
//! ```
//! use kakaopack::{InputKind, Loader, LoaderConfig};
//! use kakaopack::core::filter::{FilterConfig, apply_filters};
//!
//! # fn main() -> kakaopack::Result<()> {
//! let loader = Loader::with_kind("chat.csv", InputKind::Csv, LoaderConfig::default());
//! let records = loader.parse_str(
//!     "Date,User,Message\n2024-01-01 09:00:00,frodo,old\n2024-06-15 09:00:00,frodo,new\n",
//! )?;
//!
//! let config = FilterConfig::new().with_date_from("2024-06-01")?;
//! let filtered = apply_filters(records, &config);
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "User: ***do, Message: new");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Date bounds are whole days and inclusive on both ends
//! - User matching is exact, against the masked id
//! - Multiple filters are combined with AND logic

use chrono::NaiveDate;

use crate::error::{KakaopackError, Result};
use crate::record::MessageRecord;

/// Criteria for selecting records.
///
/// Filters are combined with AND logic: a record must match all active
/// filters to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Keep records on or after this date.
    pub after: Option<NaiveDate>,

    /// Keep records on or before this date.
    pub before: Option<NaiveDate>,

    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,

    /// Keep records from this anonymized user.
    pub user: Option<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all records pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`KakaopackError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_filter_date(date_str)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`KakaopackError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        self.before = Some(parse_filter_date(date_str)?);
        Ok(self)
    }

    /// Sets the start date directly.
    #[must_use]
    pub fn with_after(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self
    }

    /// Sets the end date directly.
    #[must_use]
    pub fn with_before(mut self, date: NaiveDate) -> Self {
        self.before = Some(date);
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Sets the user filter. Compared against the anonymized id, e.g. `***DE`.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter()
            || self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.user.is_some()
    }

    /// Returns `true` if a date bound is set.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if `record` passes every active filter.
    ///
    /// Use this inline while streaming instead of collecting first.
    pub fn matches(&self, record: &MessageRecord) -> bool {
        let date = record.timestamp.date();

        self.after.is_none_or(|after| date >= after)
            && self.before.is_none_or(|before| date <= before)
            && self.year.is_none_or(|y| record.year == y)
            && self.month.is_none_or(|m| record.month == m)
            && self.day.is_none_or(|d| record.day == d)
            && self
                .user
                .as_deref()
                .is_none_or(|u| record.anonymized_user == u)
    }
}

fn parse_filter_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| KakaopackError::invalid_date(date_str))
}

/// Keeps the records that match all active filters, preserving order.
///
/// Consumes the input vector. For streaming use cases, call
/// [`FilterConfig::matches`] during iteration instead.
pub fn apply_filters(records: Vec<MessageRecord>, config: &FilterConfig) -> Vec<MessageRecord> {
    if !config.is_active() {
        return records;
    }
    records.into_iter().filter(|r| config.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordBuilder, Timestamp};

    fn records() -> Vec<MessageRecord> {
        let mut builder = RecordBuilder::new("chat.csv", 3);
        let at = |y, m, d, h| {
            Timestamp::DateTime(
                NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap(),
            )
        };
        vec![
            builder.build("ABCDE", "old", at(2024, 1, 1, 9)),
            builder.build("ABCDE", "new", at(2024, 6, 15, 23)),
            builder.build("XYZW", "other", at(2024, 6, 15, 10)),
            builder.build("XYZW", "later", at(2025, 2, 3, 10)),
        ]
    }

    fn bodies(records: &[MessageRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.text.rsplit("Message: ").next().unwrap())
            .collect()
    }

    #[test]
    fn test_no_filters_passes_everything() {
        let config = FilterConfig::new();
        assert!(!config.is_active());
        assert_eq!(apply_filters(records(), &config).len(), 4);
    }

    #[test]
    fn test_date_bounds_are_inclusive_days() {
        let config = FilterConfig::new()
            .with_date_from("2024-06-15")
            .unwrap()
            .with_date_to("2024-06-15")
            .unwrap();
        assert_eq!(bodies(&apply_filters(records(), &config)), vec!["new", "other"]);
    }

    #[test]
    fn test_components() {
        let config = FilterConfig::new().with_year(2024).with_month(6);
        assert_eq!(apply_filters(records(), &config).len(), 2);

        let config = FilterConfig::new().with_day(3);
        assert_eq!(bodies(&apply_filters(records(), &config)), vec!["later"]);
    }

    #[test]
    fn test_user_is_anonymized_id() {
        let config = FilterConfig::new().with_user("***W");
        assert_eq!(bodies(&apply_filters(records(), &config)), vec!["other", "later"]);

        let raw = FilterConfig::new().with_user("XYZW");
        assert!(apply_filters(records(), &raw).is_empty());
    }

    #[test]
    fn test_combined_filters() {
        let config = FilterConfig::new()
            .with_date_from("2024-06-01")
            .unwrap()
            .with_user("***DE");
        assert_eq!(bodies(&apply_filters(records(), &config)), vec!["new"]);
    }

    #[test]
    fn test_invalid_date_format() {
        let result = FilterConfig::new().with_date_from("01-01-2024");
        assert!(matches!(result, Err(KakaopackError::InvalidDate { .. })));
    }

    #[test]
    fn test_matches_streaming() {
        let config = FilterConfig::new().with_year(2025);
        let kept: Vec<_> = records().into_iter().filter(|r| config.matches(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_index, 3);
    }
}
