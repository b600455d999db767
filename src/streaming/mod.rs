//! Lazy record iterators over decoded exports.
//!
//! Both iterators own the decoded text of one file and produce
//! [`MessageRecord`](crate::MessageRecord)s one at a time as the consumer
//! pulls. Nothing is buffered beyond the record being assembled.
//!
//! # Architecture
//!
//! - [`RecordIterator`] adds progress reporting to [`Iterator`]
//! - [`TranscriptRecordIterator`] folds transcript lines into records
//! - [`TabularRecordIterator`] converts CSV rows into records
//!
//! Most callers go through [`Loader::lazy_load`](crate::Loader::lazy_load),
//! which picks the iterator from the input kind.
//!
//! # Example
//!
//! ```rust
//! use kakaopack::streaming::{RecordIterator, TranscriptRecordIterator};
//!
//! let text = "-------- 2024년 4월 5일 화요일 --------\n[가나다] [오후 1:23] 안녕하세요\n";
//! let mut iter = TranscriptRecordIterator::new(text.to_string(), "room.txt", 3);
//!
//! let record = iter.next().unwrap().unwrap();
//! assert_eq!(record.metadata().date, "2024-04-05 13:23:00");
//! assert!(iter.next().is_none());
//! ```

mod tabular;
mod traits;
mod transcript;

pub use tabular::TabularRecordIterator;
pub use traits::RecordIterator;
pub use transcript::TranscriptRecordIterator;
