//! Record iterator for free-form KakaoTalk transcripts.
//!
//! The iterator walks the decoded text line by line, carrying the current
//! date from the last day header and holding the most recent message as a
//! pending record. Continuation lines are folded into the pending record
//! with a single space; the record is emitted when the next message starts
//! or the input ends.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::error::{KakaopackError, LoadErrorKind, Result};
use crate::parsing::kakaotalk::{LineKind, MessageStart, classify_line};
use crate::record::{MessageRecord, RecordBuilder, Timestamp};
use crate::time::to_24h;

use super::RecordIterator;

#[derive(Debug)]
struct PendingRecord {
    anonymized_user: String,
    timestamp: NaiveDateTime,
    body: String,
}

impl PendingRecord {
    fn append(&mut self, line: &str) {
        if !self.body.is_empty() {
            self.body.push(' ');
        }
        self.body.push_str(line);
    }
}

/// Parser state threaded through the fold over lines.
#[derive(Debug)]
struct TranscriptState {
    current_date: Option<NaiveDate>,
    pending: Option<PendingRecord>,
    line_no: usize,
    builder: RecordBuilder,
}

impl TranscriptState {
    /// Applies one line, returning a record if the line completed one.
    fn fold_line(
        &mut self,
        line: &str,
    ) -> std::result::Result<Option<MessageRecord>, LoadErrorKind> {
        self.line_no += 1;

        match classify_line(line) {
            LineKind::Blank => Ok(None),
            LineKind::Noise => {
                trace!(line = self.line_no, "skipping system notice");
                Ok(None)
            }
            LineKind::DayHeader(date) => {
                self.current_date = Some(date);
                Ok(None)
            }
            LineKind::MessageStart(start) => {
                let next = self.start_record(&start)?;
                Ok(self.pending.replace(next).map(|p| self.finish(p)))
            }
            LineKind::Content(text) => {
                match self.pending.as_mut() {
                    Some(pending) => pending.append(text),
                    None => trace!(line = self.line_no, "dropping line before first message"),
                }
                Ok(None)
            }
        }
    }

    fn start_record(
        &self,
        start: &MessageStart<'_>,
    ) -> std::result::Result<PendingRecord, LoadErrorKind> {
        let date = self
            .current_date
            .ok_or(LoadErrorKind::MissingDayHeader { line: self.line_no })?;

        let timestamp = to_24h(date, start.meridiem, start.hour, start.minute).ok_or_else(|| {
            LoadErrorKind::InvalidTime {
                line: self.line_no,
                value: start.clock.to_string(),
            }
        })?;

        Ok(PendingRecord {
            anonymized_user: self.builder.anonymize(start.user),
            timestamp,
            body: start.text.to_string(),
        })
    }

    fn finish(&mut self, pending: PendingRecord) -> MessageRecord {
        self.builder.build_anonymized(
            pending.anonymized_user,
            &pending.body,
            Timestamp::DateTime(pending.timestamp),
        )
    }

    fn flush(&mut self) -> Option<MessageRecord> {
        let pending = self.pending.take()?;
        Some(self.finish(pending))
    }
}

/// Iterator over records parsed from a decoded transcript.
///
/// Owns the decoded text; lines are sliced from it on demand.
#[derive(Debug)]
pub struct TranscriptRecordIterator {
    text: String,
    cursor: usize,
    path: PathBuf,
    state: TranscriptState,
    finished: bool,
}

impl TranscriptRecordIterator {
    /// Creates an iterator over `text`, attributing records to `path`.
    pub fn new(text: String, path: impl AsRef<Path>, mask_len: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            text,
            cursor: 0,
            state: TranscriptState {
                current_date: None,
                pending: None,
                line_no: 0,
                builder: RecordBuilder::new(&path, mask_len),
            },
            path,
            finished: false,
        }
    }

    /// Number of records emitted so far.
    pub fn emitted(&self) -> usize {
        self.state.builder.emitted()
    }

    fn next_line_bounds(&mut self) -> Option<(usize, usize)> {
        if self.cursor >= self.text.len() {
            return None;
        }
        let start = self.cursor;
        let end = self.text[start..]
            .find('\n')
            .map_or(self.text.len(), |i| start + i);
        self.cursor = (end + 1).min(self.text.len());
        Some((start, end))
    }
}

impl Iterator for TranscriptRecordIterator {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some((start, end)) = self.next_line_bounds() {
            let line = &self.text[start..end];
            match self.state.fold_line(line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(kind) => {
                    self.finished = true;
                    self.state.pending = None;
                    return Some(Err(KakaopackError::load(&self.path, kind)));
                }
            }
        }

        let last = self.state.flush();
        if last.is_none() {
            self.finished = true;
        }
        last.map(Ok)
    }
}

impl std::iter::FusedIterator for TranscriptRecordIterator {}

impl RecordIterator for TranscriptRecordIterator {
    fn bytes_processed(&self) -> u64 {
        self.cursor as u64
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.text.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Result<MessageRecord>> {
        TranscriptRecordIterator::new(text.to_string(), "room.txt", 3).collect()
    }

    fn ok(text: &str) -> Vec<MessageRecord> {
        parse(text).into_iter().map(|r| r.unwrap()).collect()
    }

    const BASIC: &str = "\
--------------- 2024년 3월 27일 수요일 ---------------
[가나다] [오전 10:55] 안녕하세요
[J] [오후 12:05] 네
[ABCDE] [오후 1:00] 반갑습니다
";

    #[test]
    fn test_basic_records() {
        let records = ok(BASIC);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text, "User: **, Message: 안녕하세요");
        assert_eq!(records[0].metadata().date, "2024-03-27 10:55:00");
        assert_eq!(records[1].metadata().date, "2024-03-27 12:05:00");
        assert_eq!(records[2].text, "User: ***DE, Message: 반갑습니다");
        assert_eq!(records[2].metadata().date, "2024-03-27 13:00:00");
        let rows: Vec<_> = records.iter().map(|r| r.row_index).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_continuation_folded_with_space() {
        let text = "\
--------------- 2024년 3월 27일 수요일 ---------------
[가나다] [오전 11:01] 오우 감사합니다
rag 입문인데
정말요
[J] [오전 11:02] 네
";
        let records = ok(text);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].text,
            "User: **, Message: 오우 감사합니다 rag 입문인데 정말요"
        );
    }

    #[test]
    fn test_day_header_does_not_flush_pending() {
        let text = "\
--------------- 2024년 3월 27일 수요일 ---------------
[가나다] [오후 11:59] 자러 갑니다
--------------- 2024년 3월 28일 목요일 ---------------
늦었네요
[가나다] [오전 7:00] 좋은 아침
";
        let records = ok(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "User: **, Message: 자러 갑니다 늦었네요");
        assert_eq!(records[0].day, 27);
        assert_eq!(records[1].day, 28);
        assert_eq!(records[1].metadata().date, "2024-03-28 07:00:00");
    }

    #[test]
    fn test_noise_does_not_touch_pending() {
        let text = "\
--------------- 2024년 3월 27일 수요일 ---------------
[가나다] [오전 10:00] 첫 줄
홍길동님이 나갔습니다.
둘째 줄
";
        let records = ok(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "User: **, Message: 첫 줄 둘째 줄");
    }

    #[test]
    fn test_preamble_dropped() {
        let text = "\
LLM RAG Langchain 통합 님과 카카오톡 대화
저장한 날짜 : 2024-04-05 01:36:14

--------------- 2024년 3월 27일 수요일 ---------------
불법촬영물등 식별 및 게재제한 조치 안내
[가나다] [오전 10:55] 안녕하세요
";
        let records = ok(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "User: **, Message: 안녕하세요");
    }

    #[test]
    fn test_crlf_lines() {
        let text = "-------- 2024년 4월 5일 화요일 --------\r\n[가나다] [오전 12:00] 자정\r\n";
        let records = ok(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "User: **, Message: 자정");
        assert_eq!(records[0].metadata().date, "2024-04-05 00:00:00");
    }

    #[test]
    fn test_missing_day_header_fails() {
        let results = parse("[가나다] [오전 10:55] 안녕하세요\n");
        assert_eq!(results.len(), 1);
        let err = results.into_iter().next().unwrap().unwrap_err();
        assert!(matches!(
            err.load_kind(),
            Some(LoadErrorKind::MissingDayHeader { line: 1 })
        ));
    }

    #[test]
    fn test_invalid_time_fails_and_fuses() {
        let text = "\
-------- 2024년 4월 5일 화요일 --------
[가나다] [오전 10:55] 안녕하세요
[J] [오전 10:56] 네
[가나다] [오후 13:05] 이상한 시간
[가나다] [오후 1:05] 정상
";
        let mut iter = TranscriptRecordIterator::new(text.to_string(), "room.txt", 3);
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        match err.load_kind() {
            Some(LoadErrorKind::InvalidTime { line, value }) => {
                assert_eq!(*line, 4);
                assert_eq!(value, "오후 13:05");
            }
            other => panic!("expected invalid time, got {other:?}"),
        }
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_progress_reaches_end() {
        let mut iter = TranscriptRecordIterator::new(BASIC.to_string(), "room.txt", 3);
        assert_eq!(iter.progress(), Some(0.0));
        let _: Vec<_> = iter.by_ref().collect();
        assert_eq!(iter.bytes_processed(), BASIC.len() as u64);
        assert!(iter.progress().unwrap() > 99.9);
        assert_eq!(iter.emitted(), 3);
    }

    #[test]
    fn test_no_trailing_newline() {
        let text = "-------- 2024년 4월 5일 화요일 --------\n[J] [오후 3:15] 끝";
        let records = ok(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metadata().date, "2024-04-05 15:15:00");
    }
}
