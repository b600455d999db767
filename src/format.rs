//! Output format selection.
//!
//! [`OutputFormat`] names the writers in [`core::output`](crate::core::output)
//! and [`write_to_format`] / [`to_format_string`] dispatch to them, so hosts
//! can pick a format at runtime from a flag or a file name.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> kakaopack::Result<()> {
//! use kakaopack::format::{OutputFormat, to_format_string};
//! use kakaopack::core::models::OutputConfig;
//! use kakaopack::{InputKind, Loader, LoaderConfig};
//!
//! let loader = Loader::with_kind("chat.csv", InputKind::Csv, LoaderConfig::default());
//! let records = loader.parse_str("Date,User,Message\n2024-03-27 10:55:00,가나다,안녕하세요\n")?;
//!
//! let format = OutputFormat::from_path("out.jsonl")?;
//! let jsonl = to_format_string(&records, format, &OutputConfig::new())?;
//! assert!(jsonl.starts_with("{\"text\":\"User: **, Message: 안녕하세요\""));
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::{KakaopackError, Result};
use crate::record::MessageRecord;

/// Serialization format for loaded records.
///
/// - [`Jsonl`](OutputFormat::Jsonl) - one `{"text", "metadata"}` document per
///   line, what vector store loaders ingest (default)
/// - [`Json`](OutputFormat::Json) - the same documents as one array
/// - [`Csv`](OutputFormat::Csv) - `;` delimited table for spreadsheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// JSON Lines, also known as NDJSON
    #[default]
    #[serde(alias = "ndjson")]
    Jsonl,

    /// JSON array
    Json,

    /// CSV with semicolon delimiter
    Csv,
}

impl OutputFormat {
    /// File extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// All names accepted by [`FromStr`](std::str::FromStr).
    pub fn all_names() -> &'static [&'static str] {
        &["jsonl", "ndjson", "json", "csv"]
    }

    /// Cargo feature that enables this format's writer.
    pub fn required_feature(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }

    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`KakaopackError::InvalidFormat`] for unknown extensions.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        ext.parse().map_err(|_| {
            KakaopackError::invalid_format(
                "output",
                format!("unknown file extension '.{ext}'; expected one of: jsonl, json, csv"),
            )
        })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Jsonl => "JSONL",
            OutputFormat::Json => "JSON",
            OutputFormat::Csv => "CSV",
        })
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn feature_disabled(format: OutputFormat) -> KakaopackError {
    KakaopackError::invalid_format(
        "output",
        format!(
            "output format {format} requires the '{}' feature",
            format.required_feature()
        ),
    )
}

/// Writes records to `path` in `format`.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or writing fails.
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[MessageRecord],
    path: impl AsRef<Path>,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(records, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Renders records as a string in `format`.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or serialization
/// fails.
#[allow(unused_variables)]
pub fn to_format_string(
    records: &[MessageRecord],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(records, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}
