//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::models::{Document, OutputConfig};
use crate::error::Result;
use crate::record::MessageRecord;

/// Writes records to a JSON file as an array of documents.
///
/// # Format
/// ```json
/// [
///   {
///     "text": "User: **, Message: 안녕하세요",
///     "metadata": {"date": "2024-03-27 10:55:00", "year": 2024, "month": 3,
///                  "day": 27, "user": "**", "row": 0, "source": "chat.txt"}
///   }
/// ]
/// ```
pub fn write_json(
    records: &[MessageRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let json = to_json(records, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts records to a pretty-printed JSON array.
///
/// Same format as [`write_json`], returned as a string.
pub fn to_json(records: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let docs: Vec<Document<'_>> = records.iter().map(|r| Document::new(r, config)).collect();
    Ok(serde_json::to_string_pretty(&docs)?)
}
