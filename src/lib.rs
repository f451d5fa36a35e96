//! `stem-pipeline` reshapes a wide, per-year extract of US STEM degree completions (by
//! citizenship, award level, and field of study) into a dense long-format time series, and
//! answers filter/summary/export queries over it.
//!
//! The primary entrypoint is [`pipeline::build`], which loads the source table, melts the year
//! columns, labels every observation, and fills the GroupKey × Year grid. The result is an
//! immutable [`types::CompleteDataSet`] that is built once and then only read.
//!
//! ## Source table
//!
//! A delimited file (`.csv`, or `.tsv`/`.tab`) with the columns
//! `Citizenship`, `CIP Code and Description (2 digit)`, `Award Level Code`, and one column per
//! year of the configured [`types::YearRange`] (1997–2023 by default).
//!
//! - The award level code is always read as text: `"17"`, `"18"`, `"19"` map to BA, MA, PhD.
//! - Blank count cells read as `0`. Unparseable, negative, or non-finite cells also read as `0`
//!   and are reported as [`processing::CoercionWarning`]s; they never fail a build.
//! - Missing files and missing required columns fail with [`LoadError`].
//!
//! ## Quick example: build, filter, summarize
//!
//! ```rust
//! use stem_pipeline::pipeline::build_from_table;
//! use stem_pipeline::processing::{default_filter, filter, summarize};
//! use stem_pipeline::types::{RawRecord, RawTable, YearRange};
//!
//! let years = YearRange::new(1997, 1999).unwrap();
//! let table = RawTable::new(
//!     years,
//!     vec![RawRecord {
//!         citizenship: "U.S. citizen or permanent resident".to_string(),
//!         cip: "14 - Engineering".to_string(),
//!         award_code: "17".to_string(),
//!         counts: vec!["100".to_string(), "0".to_string(), "".to_string()],
//!     }],
//! );
//! let dataset = build_from_table(&table).dataset;
//! assert_eq!(dataset.rows()[0].group.as_str(), "US | BA | Engineering");
//! assert_eq!(dataset.row_count(), 3);
//!
//! let mut spec = default_filter(&dataset);
//! spec.awards.insert("BA".to_string());
//! let rows = filter(&dataset, &spec);
//! let summary = summarize(rows.iter().copied());
//! assert_eq!(summary.total, 100.0);
//! assert_eq!(summary.peak_year, Some(1997));
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: source loading, format inference, and load observers
//! - [`processing`]: reshape/label/complete stages and the query engine (filter, summarize, export)
//! - [`execution`]: parallel query execution with metrics
//! - [`pipeline`]: one-call build of the complete dataset
//! - [`view`]: view models for the presentation layer
//! - [`config`]: column names, year range, and service configuration
//! - `server` (feature `server`): axum router for the dashboard API

pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
#[cfg(feature = "server")]
pub mod server;
pub mod types;
pub mod view;

pub use error::{LoadError, LoadResult};
