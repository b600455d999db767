//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::record::MessageRecord;

/// Writes records to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Row`, `Date`, `User`, `Source`, `Text`, each but `Text`
///   switchable through [`OutputConfig`] (`Source` is off by default)
/// - Encoding: UTF-8
pub fn write_csv(
    records: &[MessageRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_csv_to(records, file, config)
}

/// Converts records to a CSV string.
///
/// Same format as [`write_csv`].
pub fn to_csv(records: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_csv_to(records, &mut buf, config)?;
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

fn write_csv_to<W: Write>(records: &[MessageRecord], sink: W, config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(build_header(config))?;
    for record in records {
        writer.write_record(build_record(record, config))?;
    }

    writer.flush()?;
    Ok(())
}

fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = Vec::new();

    if config.include_row {
        header.push("Row");
    }
    if config.include_date {
        header.push("Date");
    }
    if config.include_user {
        header.push("User");
    }
    if config.include_source {
        header.push("Source");
    }
    header.push("Text");

    header
}

fn build_record(record: &MessageRecord, config: &OutputConfig) -> Vec<String> {
    let mut row = Vec::new();

    if config.include_row {
        row.push(record.row_index.to_string());
    }
    if config.include_date {
        row.push(record.timestamp.to_string());
    }
    if config.include_user {
        row.push(record.anonymized_user.clone());
    }
    if config.include_source {
        row.push(record.source.clone());
    }
    row.push(record.text.clone());

    row
}
