//! KakaoTalk transcript line grammar.
//!
//! A "Save chat" export from the desktop app looks like this:
//!
//! ```text
//! LLM RAG Langchain 통합 님과 카카오톡 대화
//! 저장한 날짜 : 2024-04-05 01:36:14
//!
//! --------------- 2024년 3월 27일 수요일 ---------------
//! 성민상님이 들어왔습니다.
//! [가나다] [오전 10:55] 안녕하세요
//! [가나다] [오전 11:01] 오우 감사합니다
//! rag 입문인데
//! ```
//!
//! Every line falls into exactly one [`LineKind`]. The stateful part
//! (carrying the current date, folding continuations) lives in
//! [`crate::streaming::TranscriptRecordIterator`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::time::Meridiem;

/// `--------------- 2024년 3월 27일 수요일 ---------------`
static DAY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-+\s*(?P<year>\d{4})년\s*(?P<month>\d{1,2})월\s*(?P<day>\d{1,2})일.*?-+$")
        .expect("valid regex")
});

/// `2024년 3월 27일 수요일`, the undashed heading some exports repeat.
static DATE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}년 \d{1,2}월 \d{1,2}일 \S+요일$").expect("valid regex")
});

/// `[가나다] [오전 10:55] 안녕하세요`
static MESSAGE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\[(?P<user>[^\]]*)\] \[(?P<period>오전|오후) (?P<hour>\d{1,2}):(?P<minute>\d{2})\] ?(?P<text>.*)$",
    )
    .expect("valid regex")
});

/// Someone entered the room.
pub const JOIN_NOTICE: &str = "님이 들어왔습니다";

/// Someone left the room.
pub const LEAVE_NOTICE: &str = "님이 나갔습니다";

/// Someone was removed by the room owner.
pub const KICK_NOTICE: &str = "님을 내보냈습니다";

/// Outcome of [`match_day_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHeaderMatch<'a> {
    /// The line announces this date.
    Matched(NaiveDate),
    /// Not a day header; the line is returned as-is.
    Unmatched(&'a str),
}

impl DayHeaderMatch<'_> {
    /// Returns `true` for [`DayHeaderMatch::Matched`].
    pub fn is_match(&self) -> bool {
        matches!(self, DayHeaderMatch::Matched(_))
    }

    /// Returns the announced date, if any.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DayHeaderMatch::Matched(date) => Some(*date),
            DayHeaderMatch::Unmatched(_) => None,
        }
    }
}

/// Recognizes a dashed day-separator line.
///
/// The trailing text after the day (usually the weekday) is not validated.
/// A header naming an impossible date (`2월 30일`) does not match.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use kakaopack::parsing::kakaotalk::{DayHeaderMatch, match_day_header};
///
/// assert_eq!(
///     match_day_header("-------- 2024년 4월 5일 화요일 --------"),
///     DayHeaderMatch::Matched(NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()),
/// );
/// assert_eq!(
///     match_day_header("This is not a date"),
///     DayHeaderMatch::Unmatched("This is not a date"),
/// );
/// ```
pub fn match_day_header(line: &str) -> DayHeaderMatch<'_> {
    DAY_HEADER
        .captures(line.trim())
        .and_then(|caps| {
            let year = caps["year"].parse().ok()?;
            let month = caps["month"].parse().ok()?;
            let day = caps["day"].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .map_or(DayHeaderMatch::Unmatched(line), DayHeaderMatch::Matched)
}

/// The parts of a message-start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStart<'a> {
    /// Raw display name between the first brackets.
    pub user: &'a str,
    pub meridiem: Meridiem,
    /// Clock hour as written (not range-checked).
    pub hour: u32,
    pub minute: u32,
    /// The clock exactly as written, e.g. `오후 1:23`.
    pub clock: &'a str,
    /// First line of the message body, trailing whitespace removed.
    pub text: &'a str,
}

/// Parses a `[user] [오전|오후 h:mm] text` line.
pub fn parse_message_start(line: &str) -> Option<MessageStart<'_>> {
    let caps = MESSAGE_START.captures(line)?;
    let period = caps.name("period")?;
    let minute = caps.name("minute")?;

    Some(MessageStart {
        user: caps.name("user")?.as_str(),
        meridiem: period.as_str().parse().ok()?,
        hour: caps["hour"].parse().ok()?,
        minute: minute.as_str().parse().ok()?,
        clock: &line[period.start()..minute.end()],
        text: caps.name("text").map_or("", |m| m.as_str().trim_end()),
    })
}

/// Returns `true` if the line contains a join, leave or kick notice.
pub fn contains_membership_notice(text: &str) -> bool {
    text.contains(JOIN_NOTICE) || text.contains(LEAVE_NOTICE) || text.contains(KICK_NOTICE)
}

/// Returns `true` for system lines that never produce records.
///
/// Covers membership notices and the undashed date heading.
pub fn is_noise_line(line: &str) -> bool {
    contains_membership_notice(line) || DATE_HEADING.is_match(line.trim())
}

/// Classification of a single transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace only
    Blank,
    /// System notice, dropped
    Noise,
    /// New current date
    DayHeader(NaiveDate),
    /// Start of a new message
    MessageStart(MessageStart<'a>),
    /// Anything else: continuation text
    Content(&'a str),
}

/// Classifies `line`, checking noise first, then day headers, then message
/// starts.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if is_noise_line(line) {
        return LineKind::Noise;
    }
    if let DayHeaderMatch::Matched(date) = match_day_header(line) {
        return LineKind::DayHeader(date);
    }
    if let Some(start) = parse_message_start(line) {
        return LineKind::MessageStart(start);
    }
    LineKind::Content(line.trim_end())
}
