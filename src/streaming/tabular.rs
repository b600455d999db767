//! Record iterator for delimited (CSV) exports.
//!
//! Mobile KakaoTalk exports a comma separated file with a
//! `Date,User,Message` header. Extra columns are ignored and the column
//! order does not matter.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{KakaopackError, LoadErrorKind, Result};
use crate::parsing::kakaotalk::{JOIN_NOTICE, LEAVE_NOTICE};
use crate::record::{MessageRecord, RecordBuilder};
use crate::time::parse_generic_timestamp;

use super::RecordIterator;

/// Column positions of the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    date: usize,
    user: usize,
    message: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> std::result::Result<Self, LoadErrorKind> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadErrorKind::MissingColumn(name))
        };
        Ok(Self {
            date: find("Date")?,
            user: find("User")?,
            message: find("Message")?,
        })
    }
}

/// Returns `true` for rows the relevance filter drops.
fn is_membership_row(message: &str) -> bool {
    message.contains(JOIN_NOTICE) || message.contains(LEAVE_NOTICE)
}

/// Iterator over records read from a decoded CSV export.
pub struct TabularRecordIterator {
    rows: StringRecordsIntoIter<Cursor<Vec<u8>>>,
    columns: Columns,
    path: PathBuf,
    builder: RecordBuilder,
    relevance_filter: bool,
    data_row: usize,
    total: u64,
    finished: bool,
}

impl std::fmt::Debug for TabularRecordIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularRecordIterator")
            .field("path", &self.path)
            .field("columns", &self.columns)
            .field("data_row", &self.data_row)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl TabularRecordIterator {
    /// Reads the header of `text` and prepares to iterate rows.
    ///
    /// # Errors
    ///
    /// Returns a load error if the header can't be read or lacks one of
    /// `Date`, `User`, `Message`.
    pub fn new(
        text: String,
        path: impl AsRef<Path>,
        mask_len: usize,
        relevance_filter: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let total = text.len() as u64;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(Cursor::new(text.into_bytes()));

        let columns = reader
            .headers()
            .map_err(LoadErrorKind::from)
            .and_then(Columns::locate)
            .map_err(|kind| KakaopackError::load(&path, kind))?;

        Ok(Self {
            rows: reader.into_records(),
            columns,
            builder: RecordBuilder::new(&path, mask_len),
            path,
            relevance_filter,
            data_row: 0,
            total,
            finished: false,
        })
    }

    /// Number of records emitted so far.
    pub fn emitted(&self) -> usize {
        self.builder.emitted()
    }

    fn convert(&mut self, row: &StringRecord) -> std::result::Result<Option<MessageRecord>, LoadErrorKind> {
        let row_no = self.data_row;
        self.data_row += 1;

        let cell = move |i: usize| row.get(i).unwrap_or("");
        let message = cell(self.columns.message);

        if self.relevance_filter && is_membership_row(message) {
            return Ok(None);
        }

        let raw_date = cell(self.columns.date);
        let timestamp =
            parse_generic_timestamp(raw_date).ok_or_else(|| LoadErrorKind::InvalidTimestamp {
                row: row_no,
                value: raw_date.to_string(),
            })?;

        Ok(Some(self.builder.build(
            cell(self.columns.user),
            message,
            timestamp,
        )))
    }
}

impl Iterator for TabularRecordIterator {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let outcome = match self.rows.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => Err(LoadErrorKind::from(e)),
                Some(Ok(row)) => self.convert(&row),
            };

            match outcome {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(kind) => {
                    self.finished = true;
                    return Some(Err(KakaopackError::load(&self.path, kind)));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for TabularRecordIterator {}

impl RecordIterator for TabularRecordIterator {
    fn bytes_processed(&self) -> u64 {
        self.rows.reader().position().byte()
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.total)
    }
}
