//! Post-processing of loaded records.
//!
//! This module contains:
//! - [`models`] - Output configuration
//! - [`filter`] - Record filtering by date and user
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use kakaopack::core::{
//!     OutputConfig, FilterConfig, apply_filters,
//!     write_csv, write_json, write_jsonl,
//! };
//! # }
//! ```

pub mod filter;
pub mod models;
pub mod output;

pub use filter::{FilterConfig, apply_filters};
pub use models::OutputConfig;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
