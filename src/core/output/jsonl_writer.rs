//! JSON Lines (JSONL) output writer.
//!
//! One document per line is what most vector store ingestion tools expect,
//! and it can be appended to while streaming.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::models::{Document, OutputConfig};
use crate::error::Result;
use crate::record::MessageRecord;

/// Writes records as JSON Lines.
///
/// Each line is a `{"text": ..., "metadata": {...}}` object:
/// ```jsonl
/// {"text":"User: **, Message: 안녕하세요","metadata":{"date":"2024-03-27 10:55:00",...}}
/// ```
pub fn write_jsonl(
    records: &[MessageRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_jsonl_to(records, &mut writer, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts records to a JSONL string, one document per line.
pub fn to_jsonl(records: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(&Document::new(record, config))?);
        out.push('\n');
    }
    Ok(out)
}

fn write_jsonl_to<W: Write>(records: &[MessageRecord], writer: &mut W, config: &OutputConfig) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, &Document::new(record, config))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
