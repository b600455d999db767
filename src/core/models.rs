//! Output-side data models.

use serde::Serialize;

use crate::record::{MessageRecord, RecordMetadata};

/// Controls which fields the writers emit.
///
/// CSV writers use the `include_*` column switches. JSON and JSONL writers
/// always emit `text` and attach the full metadata mapping unless
/// `include_metadata` is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// `Row` column (default: true)
    pub include_row: bool,
    /// `Date` column (default: true)
    pub include_date: bool,
    /// `User` column (default: true)
    pub include_user: bool,
    /// `Source` column (default: false)
    pub include_source: bool,
    /// `metadata` object in JSON documents (default: true)
    pub include_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_row: true,
            include_date: true,
            include_user: true,
            include_source: false,
            include_metadata: true,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the rendered text, no metadata anywhere.
    pub fn text_only() -> Self {
        Self {
            include_row: false,
            include_date: false,
            include_user: false,
            include_source: false,
            include_metadata: false,
        }
    }

    #[must_use]
    pub fn with_source(mut self) -> Self {
        self.include_source = true;
        self
    }

    #[must_use]
    pub fn without_row(mut self) -> Self {
        self.include_row = false;
        self
    }

    #[must_use]
    pub fn without_metadata(mut self) -> Self {
        self.include_metadata = false;
        self
    }
}

/// The `{"text", "metadata"}` document handed to indexers.
#[derive(Debug, Serialize)]
pub(crate) struct Document<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMetadata>,
}

impl<'a> Document<'a> {
    pub fn new(record: &'a MessageRecord, config: &OutputConfig) -> Self {
        Self {
            text: &record.text,
            metadata: config.include_metadata.then(|| record.metadata()),
        }
    }
}
