//! The loading façade.
//!
//! A [`Loader`] binds a file, an [`InputKind`] and a [`LoaderConfig`].
//! [`Loader::lazy_load`] returns a [`RecordStream`] that opens and decodes
//! the file on the first pull, then produces records one at a time.
//!
//! ```text
//! Unstarted ──first pull──▶ Opening ──decoded──▶ Reading ──exhausted──▶ Done
//!                              │                    │
//!                              └──────error─────────┴──────▶ Failed
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use kakaopack::{Loader, LoaderConfig};
//!
//! # fn main() -> kakaopack::Result<()> {
//! let loader = Loader::new("KakaoTalk_Chat.txt", LoaderConfig::autodetect())?;
//!
//! for record in loader.lazy_load() {
//!     let record = record?;
//!     println!("{} {}", record.metadata().date, record.text);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::error::{KakaopackError, Result};
use crate::record::MessageRecord;
use crate::streaming::{RecordIterator, TabularRecordIterator, TranscriptRecordIterator};

/// Declared layout of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Delimited export with a `Date,User,Message` header
    Csv,
    /// Free-form "Save chat" transcript
    #[serde(alias = "text")]
    Txt,
}

impl InputKind {
    /// Infers the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(InputKind::Csv),
            "txt" => Some(InputKind::Txt),
            _ => None,
        }
    }

    /// Returns all names accepted by [`FromStr`].
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "txt", "text"]
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Csv => write!(f, "csv"),
            InputKind::Txt => write!(f, "txt"),
        }
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(InputKind::Csv),
            "txt" | "text" => Ok(InputKind::Txt),
            _ => Err(format!(
                "Unknown input kind: '{}'. Expected one of: {}",
                s,
                InputKind::all_names().join(", ")
            )),
        }
    }
}

/// Loads one export file as a stream of [`MessageRecord`]s.
#[derive(Debug, Clone)]
pub struct Loader {
    path: PathBuf,
    kind: InputKind,
    config: LoaderConfig,
}

impl Loader {
    /// Creates a loader, inferring the input kind from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`KakaopackError::InvalidFormat`] if the extension is neither
    /// `.csv` nor `.txt`.
    pub fn new(path: impl Into<PathBuf>, config: LoaderConfig) -> Result<Self> {
        let path = path.into();
        let kind = InputKind::from_path(&path).ok_or_else(|| {
            KakaopackError::invalid_format(
                "input",
                format!(
                    "cannot infer input kind from '{}'; expected a .csv or .txt file",
                    path.display()
                ),
            )
        })?;
        Ok(Self { path, kind, config })
    }

    /// Creates a loader with an explicit input kind.
    pub fn with_kind(path: impl Into<PathBuf>, kind: InputKind, config: LoaderConfig) -> Self {
        Self {
            path: path.into(),
            kind,
            config,
        }
    }

    /// The file this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsing strategy in use.
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// The loader settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns a lazy, single-pass stream of records.
    ///
    /// Nothing is read until the first record is pulled. Each call starts
    /// an independent load.
    pub fn lazy_load(&self) -> RecordStream {
        RecordStream {
            loader: self.clone(),
            stage: Stage::Unstarted,
        }
    }

    /// Loads every record, stopping at the first error.
    pub fn load(&self) -> Result<Vec<MessageRecord>> {
        self.lazy_load().collect()
    }

    /// Parses already decoded `content` with this loader's strategy.
    ///
    /// Records are attributed to the loader's path.
    pub fn parse_str(&self, content: &str) -> Result<Vec<MessageRecord>> {
        self.strategy(content.to_string())?.collect()
    }

    fn strategy(&self, text: String) -> Result<ReadStrategy> {
        Ok(match self.kind {
            InputKind::Txt => ReadStrategy::Transcript(TranscriptRecordIterator::new(
                text,
                &self.path,
                self.config.mask_len,
            )),
            InputKind::Csv => ReadStrategy::Tabular(TabularRecordIterator::new(
                text,
                &self.path,
                self.config.mask_len,
                self.config.relevance_filter,
            )?),
        })
    }

    fn open(&self) -> Result<ReadStrategy> {
        let decoded = self.config.resolver()?.open_text(&self.path)?;
        info!(
            path = %self.path.display(),
            kind = %self.kind,
            encoding = decoded.encoding_name(),
            bytes = decoded.byte_len,
            "opened export"
        );
        self.strategy(decoded.text)
    }
}

/// One parsing strategy, chosen from the [`InputKind`].
#[derive(Debug)]
enum ReadStrategy {
    Transcript(TranscriptRecordIterator),
    Tabular(TabularRecordIterator),
}

impl Iterator for ReadStrategy {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ReadStrategy::Transcript(iter) => iter.next(),
            ReadStrategy::Tabular(iter) => iter.next(),
        }
    }
}

impl RecordIterator for ReadStrategy {
    fn bytes_processed(&self) -> u64 {
        match self {
            ReadStrategy::Transcript(iter) => iter.bytes_processed(),
            ReadStrategy::Tabular(iter) => iter.bytes_processed(),
        }
    }

    fn total_bytes(&self) -> Option<u64> {
        match self {
            ReadStrategy::Transcript(iter) => iter.total_bytes(),
            ReadStrategy::Tabular(iter) => iter.total_bytes(),
        }
    }
}

/// Observable state of a [`RecordStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No record requested yet
    Unstarted,
    /// File decoded, records being produced
    Reading,
    /// All records produced
    Done,
    /// A load error was surfaced
    Failed,
}

#[derive(Debug)]
enum Stage {
    Unstarted,
    Reading(ReadStrategy, usize),
    Done,
    Failed,
}

/// Lazy, forward-only stream of records from one load.
///
/// The stream is fused: after it returns `None` or an error it returns
/// `None` forever. Iterating it again does not restart the load.
#[derive(Debug)]
pub struct RecordStream {
    loader: Loader,
    stage: Stage,
}

impl RecordStream {
    /// Current position in the load lifecycle.
    pub fn state(&self) -> LoadState {
        match self.stage {
            Stage::Unstarted => LoadState::Unstarted,
            Stage::Reading(..) => LoadState::Reading,
            Stage::Done => LoadState::Done,
            Stage::Failed => LoadState::Failed,
        }
    }

    /// The file being loaded.
    pub fn path(&self) -> &Path {
        self.loader.path()
    }

    fn fail(&mut self, err: KakaopackError) -> Option<Result<MessageRecord>> {
        self.stage = Stage::Failed;
        Some(Err(err.into_load(self.loader.path())))
    }
}

impl Iterator for RecordStream {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Stage::Unstarted = self.stage {
            match self.loader.open() {
                Ok(strategy) => self.stage = Stage::Reading(strategy, 0),
                Err(err) => return self.fail(err),
            }
        }

        let Stage::Reading(strategy, count) = &mut self.stage else {
            return None;
        };

        match strategy.next() {
            Some(Ok(record)) => {
                *count += 1;
                Some(Ok(record))
            }
            Some(Err(err)) => self.fail(err),
            None => {
                debug!(
                    path = %self.loader.path().display(),
                    records = *count,
                    "load complete"
                );
                self.stage = Stage::Done;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for RecordStream {}

impl RecordIterator for RecordStream {
    fn bytes_processed(&self) -> u64 {
        match &self.stage {
            Stage::Reading(strategy, _) => strategy.bytes_processed(),
            _ => 0,
        }
    }

    fn total_bytes(&self) -> Option<u64> {
        match &self.stage {
            Stage::Reading(strategy, _) => strategy.total_bytes(),
            _ => None,
        }
    }
}
