//! # kakaopack CLI
//!
//! Command-line interface for the kakaopack library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;

use kakaopack::cli::Args;
use kakaopack::core::OutputConfig;
use kakaopack::format::write_to_format;
use kakaopack::telemetry::init_telemetry;
use kakaopack::{KakaopackError, MessageRecord};

fn main() {
    let args = <Args as ClapParser>::parse();

    if let Err(e) = init_telemetry(&args.log_level, args.json_logs) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), KakaopackError> {
    let total_start = Instant::now();

    let loader = args.loader()?;
    let filter = args.filter_config()?;
    let output_path = args.output_path()?;

    println!("kakaopack v{}", env!("CARGO_PKG_VERSION"));
    println!("Input:   {} ({})", loader.path().display(), loader.kind());
    println!("Output:  {} ({})", output_path.display(), args.format);

    let mut loaded = 0usize;
    let mut records: Vec<MessageRecord> = Vec::new();
    for record in loader.lazy_load() {
        let record = record?;
        loaded += 1;
        if filter.matches(&record) {
            records.push(record);
        }
    }

    info!(loaded, kept = records.len(), "records ready");

    write_to_format(&records, &output_path, args.format, &OutputConfig::new())?;

    println!();
    println!("Loaded:  {loaded} records");
    if filter.is_active() {
        println!("Kept:    {} records", records.len());
    }
    println!("Done in {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
