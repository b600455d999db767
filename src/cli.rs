//! Command-line interface definition using clap.
//!
//! [`Args`] holds the parsed flags and knows how to turn them into the
//! library's configuration types, so `main.rs` stays a thin driver.
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use kakaopack::cli::Args;
//!
//! let args = Args::parse_from(["kakaopack", "chat.txt", "--mask-len", "2"]);
//! assert_eq!(args.loader_config().mask_len, 2);
//! assert_eq!(args.output_path().unwrap().to_str(), Some("chat.jsonl"));
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{DEFAULT_ENCODING, LoaderConfig};
use crate::core::filter::FilterConfig;
use crate::error::{KakaopackError, Result};
use crate::format::OutputFormat;
use crate::loader::{InputKind, Loader};

/// Turn KakaoTalk chat exports into anonymized, dated records
/// ready for retrieval pipelines.
#[derive(Parser, Debug, Clone)]
#[command(name = "kakaopack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    kakaopack KakaoTalk_Chat.txt
    kakaopack chat.csv -o records.json -f json
    kakaopack old_export.txt --encoding cp949
    kakaopack export.txt --autodetect-encoding --after 2024-01-01
    kakaopack export.csv --relevance-filter --user '***DE'")]
pub struct Args {
    /// Path to the export (.txt transcript or .csv table)
    pub input: PathBuf,

    /// Input layout; inferred from the extension when omitted
    #[arg(short, long, value_name = "csv|txt")]
    pub kind: Option<InputKind>,

    /// Path to output file [default: input name with the format's extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "jsonl", value_name = "jsonl|json|csv")]
    pub format: OutputFormat,

    /// Preferred input encoding (e.g. utf-8, cp949)
    #[arg(long, env = "KAKAOPACK_ENCODING", default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Try detected encodings when the preferred one fails
    #[arg(long)]
    pub autodetect_encoding: bool,

    /// Leading characters of each user id to mask
    #[arg(long, default_value_t = crate::anonymize::DEFAULT_MASK_LEN)]
    pub mask_len: usize,

    /// Drop CSV rows that are join/leave notices
    #[arg(long)]
    pub relevance_filter: bool,

    /// Keep records on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep records on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep records from this year
    #[arg(long)]
    pub year: Option<i32>,

    /// Keep records from this month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Keep records from this day of the month (1-31)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: Option<u32>,

    /// Keep records from this anonymized user (e.g. '***DE')
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Log level filter, used when RUST_LOG is unset
    #[arg(long, env = "KAKAOPACK_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Loader settings from the flags.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::new()
            .with_encoding(self.encoding.clone())
            .with_autodetect_encoding(self.autodetect_encoding)
            .with_mask_len(self.mask_len)
            .with_relevance_filter(self.relevance_filter)
    }

    /// Builds the loader, honoring `--kind` over the extension.
    ///
    /// # Errors
    ///
    /// Returns an invalid format error if no kind is given and the extension
    /// is unknown.
    pub fn loader(&self) -> Result<Loader> {
        match self.kind {
            Some(kind) => Ok(Loader::with_kind(&self.input, kind, self.loader_config())),
            None => Loader::new(&self.input, self.loader_config()),
        }
    }

    /// Record filter from the flags.
    ///
    /// # Errors
    ///
    /// Returns an invalid date error for malformed `--after` / `--before`.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new();

        if let Some(after) = &self.after {
            filter = filter.with_date_from(after)?;
        }
        if let Some(before) = &self.before {
            filter = filter.with_date_to(before)?;
        }
        if let Some(year) = self.year {
            filter = filter.with_year(year);
        }
        if let Some(month) = self.month {
            filter = filter.with_month(month);
        }
        if let Some(day) = self.day {
            filter = filter.with_day(day);
        }
        if let Some(user) = &self.user {
            filter = filter.with_user(user.clone());
        }

        Ok(filter)
    }

    /// Where output goes: `--output`, or the input path with the format's
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an invalid format error when the output would land on the
    /// input export itself.
    pub fn output_path(&self) -> Result<PathBuf> {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.format.extension()));

        if same_file(&output, &self.input) {
            return Err(KakaopackError::invalid_format(
                "output",
                format!(
                    "'{}' is the input export; pass -o with a different path",
                    output.display()
                ),
            ));
        }
        Ok(output)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
