//! Core trait for record iterators.

use crate::error::Result;
use crate::record::MessageRecord;

/// Iterator over records from one load, with progress tracking.
///
/// Extends [`Iterator`] with methods for monitoring how much of the decoded
/// input has been consumed, useful for progress bars and logging.
///
/// Implementations are single-pass: once they return `None` or an error
/// they keep returning `None`.
///
/// # Object Safety
///
/// This trait is object-safe, enabling `Box<dyn RecordIterator>`.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> kakaopack::Result<()> {
/// use kakaopack::{Loader, LoaderConfig};
/// use kakaopack::streaming::RecordIterator;
///
/// let mut stream = Loader::new("KakaoTalk_Chat.txt", LoaderConfig::default())?.lazy_load();
///
/// while let Some(result) = stream.next() {
///     let record = result?;
///     if let Some(pct) = stream.progress() {
///         eprintln!("\r{pct:.1}% {}", record.text);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub trait RecordIterator: Iterator<Item = Result<MessageRecord>> + Send {
    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if the input size is unknown or zero.
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some((self.bytes_processed() as f64 / total as f64) * 100.0)
    }

    /// Returns the number of decoded bytes consumed so far.
    fn bytes_processed(&self) -> u64;

    /// Returns the decoded input size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}
