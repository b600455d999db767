//! Output format writers.
//!
//! This module provides writers for handing records to other tools:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of documents - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one document per line - requires `json-output` feature
//!
//! JSON and JSONL documents have the shape `{"text": ..., "metadata": {...}}`,
//! ready for vector store ingestion.
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | CSV | Spreadsheets, pasting into an LLM context |
//! | JSON | Structured data, APIs |
//! | JSONL | RAG document ingestion, streaming |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> kakaopack::Result<()> {
//! use kakaopack::core::output::{to_csv, write_jsonl};
//! use kakaopack::core::models::OutputConfig;
//! use kakaopack::{Loader, LoaderConfig};
//!
//! let records = Loader::new("KakaoTalk_Chat.txt", LoaderConfig::default())?.load()?;
//! let config = OutputConfig::new();
//!
//! write_jsonl(&records, "chat.jsonl", &config)?;
//! let csv_string = to_csv(&records, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
