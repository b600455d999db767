//! Configuration for loading exports.
//!
//! [`LoaderConfig`] is a plain serde-friendly struct with builder methods,
//! free of any CLI framework dependency, so hosts can embed it in their own
//! configuration files.
//!
//! # Example
//!
//! ```rust
//! use kakaopack::config::LoaderConfig;
//!
//! let config = LoaderConfig::new()
//!     .with_encoding("cp949")
//!     .with_autodetect_encoding(true)
//!     .with_mask_len(2);
//!
//! assert_eq!(config.mask_len, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::anonymize::DEFAULT_MASK_LEN;
use crate::encoding::EncodingResolver;
use crate::error::Result;

/// Default preferred encoding label.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Settings for one [`Loader`](crate::Loader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Preferred encoding label (default: `"utf-8"`).
    ///
    /// Any WHATWG label works, plus `cp949` and `utf8`.
    pub encoding: String,

    /// Fall back to detected encodings when the preferred one fails
    /// (default: false)
    pub autodetect_encoding: bool,

    /// Leading characters of each user id to mask (default: 3)
    pub mask_len: usize,

    /// Drop CSV rows that are join/leave notices (default: false).
    /// Transcripts always drop them.
    pub relevance_filter: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            autodetect_encoding: false,
            mask_len: DEFAULT_MASK_LEN,
            relevance_filter: false,
        }
    }
}

impl LoaderConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with encoding detection enabled.
    pub fn autodetect() -> Self {
        Self {
            autodetect_encoding: true,
            ..Self::default()
        }
    }

    /// Sets the preferred encoding label.
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Enables or disables encoding detection.
    #[must_use]
    pub fn with_autodetect_encoding(mut self, enabled: bool) -> Self {
        self.autodetect_encoding = enabled;
        self
    }

    /// Sets the anonymizer mask length.
    #[must_use]
    pub fn with_mask_len(mut self, len: usize) -> Self {
        self.mask_len = len;
        self
    }

    /// Enables or disables the CSV relevance filter.
    #[must_use]
    pub fn with_relevance_filter(mut self, enabled: bool) -> Self {
        self.relevance_filter = enabled;
        self
    }

    /// Builds the encoding resolver these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an encoding error if the label is unknown.
    pub fn resolver(&self) -> Result<EncodingResolver> {
        Ok(EncodingResolver::new(&self.encoding)?.with_autodetect(self.autodetect_encoding))
    }
}
