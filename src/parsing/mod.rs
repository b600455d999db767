//! Line grammar shared by the transcript iterator and the tabular reader.

pub mod kakaotalk;

pub use kakaotalk::{
    DayHeaderMatch, LineKind, MessageStart, classify_line, contains_membership_notice,
    is_noise_line, match_day_header, parse_message_start,
};
