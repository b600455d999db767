//! # kakaopack
//!
//! A Rust library for turning KakaoTalk chat exports into a clean, ordered
//! stream of anonymized, timestamped message records, ready for chunking
//! and indexing in a retrieval pipeline.
//!
//! ## Overview
//!
//! KakaoTalk produces two structurally different exports:
//! - **Transcript** (`.txt`) - dashed day headers, `[user] [오전 10:55] text`
//!   message lines, multi-line messages and join/leave notices
//! - **Table** (`.csv`) - a `Date,User,Message` header and one row per message
//!
//! Both become the same [`MessageRecord`]: `User: <masked>, Message: <body>`
//! text plus `date`/`year`/`month`/`day`/`user`/`row`/`source` metadata.
//! Older Windows exports are CP949; the [`encoding`] module recovers them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kakaopack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let loader = Loader::new("KakaoTalk_Chat.txt", LoaderConfig::autodetect())?;
//!
//!     // Records are produced lazily, one per pull
//!     for record in loader.lazy_load() {
//!         let record = record?;
//!         println!("{} | {}", record.metadata().date, record.text);
//!     }
//!
//!     // Or collect, filter and write JSON Lines for a vector store
//!     let records = apply_filters(loader.load()?, &FilterConfig::new().with_year(2024));
//!     write_jsonl(&records, "chat.jsonl", &OutputConfig::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`loader`] - [`Loader`], [`InputKind`], [`RecordStream`]
//! - [`config`] - [`LoaderConfig`]
//! - [`encoding`] - [`EncodingResolver`](encoding::EncodingResolver) and detection
//! - [`parsing`] - transcript line grammar (day headers, message starts, noise)
//! - [`streaming`] - the transcript and CSV record iterators
//! - [`record`] - [`MessageRecord`], [`Timestamp`], [`RecordMetadata`]
//! - [`anonymize`] / [`time`] - user id masking and 12-hour clock handling
//! - [`core`] - filtering and output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - [`error`] - [`KakaopackError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

pub mod anonymize;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub mod format;
pub mod loader;
pub mod parsing;
pub mod record;
pub mod streaming;
#[cfg(feature = "cli")]
pub mod telemetry;
pub mod time;

// Re-export the main types at the crate root for convenience
pub use config::LoaderConfig;
pub use error::{EncodingError, KakaopackError, LoadErrorKind, Result};
pub use loader::{InputKind, LoadState, Loader, RecordStream};
pub use record::{MessageRecord, RecordMetadata, Timestamp};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use kakaopack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{KakaopackError, Result};
    pub use crate::record::{MessageRecord, RecordMetadata, Timestamp};

    pub use crate::config::LoaderConfig;
    pub use crate::loader::{InputKind, Loader, RecordStream};
    pub use crate::streaming::RecordIterator;

    pub use crate::anonymize::anonymize_user_id;
    pub use crate::encoding::{EncodingDetector, EncodingResolver, HeuristicDetector};

    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::models::OutputConfig;
    pub use crate::format::OutputFormat;

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
}
