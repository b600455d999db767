//! Unified error types for kakaopack.
//!
//! This module provides a single [`KakaopackError`] enum that covers all error
//! cases in the library, in the same spirit as `csv` and `serde_json`.
//!
//! # Error Handling Philosophy
//!
//! - Every failure that terminates a load is a [`KakaopackError::Load`],
//!   carrying the file path and the originating cause ([`LoadErrorKind`])
//! - Encoding problems surface as [`EncodingError`]; they are recoverable
//!   while candidate encodings remain and fatal afterwards
//! - Noise and continuation lines in transcripts are never errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for kakaopack operations.
///
/// # Example
///
/// ```rust
/// use kakaopack::error::Result;
/// use kakaopack::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, KakaopackError>;

/// The error type for all kakaopack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KakaopackError {
    /// An I/O error occurred outside of a load (e.g. writing output).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The declared or detected encoding cannot decode the byte stream.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// A load attempt was terminated.
    ///
    /// Always carries the file path and the original cause.
    #[error("Error loading {}: {source}", path.display())]
    Load {
        /// The file being loaded
        path: PathBuf,
        /// What went wrong
        #[source]
        source: LoadErrorKind,
    },

    /// The input or output format could not be determined.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date in filter configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Causes of a failed load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadErrorKind {
    /// The file could not be opened or read
    #[error("{0}")]
    Io(#[from] io::Error),

    /// No usable encoding
    #[error("{0}")]
    Encoding(#[from] EncodingError),

    /// Malformed delimited row
    #[error("malformed row: {0}")]
    Csv(#[from] csv::Error),

    /// The header lacks one of `Date`, `User`, `Message`
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A `Date` cell that is not a timestamp
    #[error("row {row}: cannot parse '{value}' as a timestamp")]
    InvalidTimestamp {
        /// Zero-based data row
        row: usize,
        /// The offending cell
        value: String,
    },

    /// A message line whose 12-hour clock is out of range
    #[error("line {line}: invalid time '{value}'")]
    InvalidTime {
        /// One-based line number
        line: usize,
        /// The offending clock text
        value: String,
    },

    /// A message line appeared before any day header
    #[error("line {line}: message has no preceding day header")]
    MissingDayHeader {
        /// One-based line number
        line: usize,
    },

    /// Anything else that went wrong while reading
    #[error("{0}")]
    Other(String),
}

/// Decoding failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodingError {
    /// The label does not name a known encoding
    #[error("unknown encoding label '{0}'")]
    UnknownLabel(String),

    /// The bytes are not valid in the given encoding
    #[error("input is not valid {encoding}")]
    Malformed {
        /// Canonical encoding name
        encoding: &'static str,
    },

    /// Every detected candidate failed
    #[error("no candidate encoding could decode the input (tried: {})", tried.join(", "))]
    Exhausted {
        /// Canonical names of the candidates, in the order tried
        tried: Vec<&'static str>,
    },
}

impl From<KakaopackError> for LoadErrorKind {
    fn from(err: KakaopackError) -> Self {
        match err {
            KakaopackError::Io(e) => LoadErrorKind::Io(e),
            KakaopackError::Encoding(e) => LoadErrorKind::Encoding(e),
            KakaopackError::Csv(e) => LoadErrorKind::Csv(e),
            KakaopackError::Load { source, .. } => source,
            other => LoadErrorKind::Other(other.to_string()),
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl KakaopackError {
    /// Creates a load error for `path`.
    pub fn load(path: impl Into<PathBuf>, source: impl Into<LoadErrorKind>) -> Self {
        KakaopackError::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Wraps this error as a load error for `path`, leaving existing load
    /// errors untouched.
    #[must_use]
    pub fn into_load(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ KakaopackError::Load { .. } => err,
            other => KakaopackError::load(path, other),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        KakaopackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        KakaopackError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if an IO failure caused this error, either directly
    /// or as the cause of a load error.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            KakaopackError::Io(_)
                | KakaopackError::Load {
                    source: LoadErrorKind::Io(_),
                    ..
                }
        )
    }

    /// Returns `true` if this is a load error.
    pub fn is_load(&self) -> bool {
        matches!(self, KakaopackError::Load { .. })
    }

    /// Returns `true` if an encoding failure caused this error, either
    /// directly or as the cause of a load error.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            KakaopackError::Encoding(_)
                | KakaopackError::Load {
                    source: LoadErrorKind::Encoding(_),
                    ..
                }
        )
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, KakaopackError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, KakaopackError::InvalidDate { .. })
    }

    /// Returns the cause of a load error.
    pub fn load_kind(&self) -> Option<&LoadErrorKind> {
        match self {
            KakaopackError::Load { source, .. } => Some(source),
            _ => None,
        }
    }
}
