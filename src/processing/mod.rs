//! Reshaping stages and the query engine.
//!
//! The build stages run once, in order, and are usually driven by [`crate::pipeline::build`]:
//!
//! - [`reshape()`]: melt year columns into [`crate::types::Observation`]s, coercing counts
//! - [`label()`]: derive display labels and the [`crate::types::GroupKey`]
//! - [`complete()`]: fill the GroupKey × Year grid into a [`crate::types::CompleteDataSet`]
//!
//! The query engine reads the finished dataset:
//!
//! - [`filter()`], [`summarize()`], [`filter_options()`], [`default_filter()`]
//! - [`export()`]: CSV export of a filtered row set
//!
//! ## Example: reshape → label → complete → filter → summarize
//!
//! ```rust
//! use stem_pipeline::processing::{complete, filter, label, reshape, summarize};
//! use stem_pipeline::types::{FilterSpec, RawRecord, RawTable, YearRange};
//!
//! let years = YearRange::new(2000, 2001).unwrap();
//! let table = RawTable::new(
//!     years,
//!     vec![RawRecord {
//!         citizenship: "Nonresident alien (temporary visa)".to_string(),
//!         cip: "11 - Computer and Information Sciences".to_string(),
//!         award_code: "18".to_string(),
//!         counts: vec!["n/a".to_string(), "42".to_string()],
//!     }],
//! );
//!
//! let reshaped = reshape(&table);
//! assert_eq!(reshaped.warnings.len(), 1);
//! let dataset = complete(reshaped.observations.iter().map(label), years);
//!
//! let rows = filter(&dataset, &FilterSpec::unrestricted(years));
//! let summary = summarize(rows);
//! assert_eq!(summary.total, 42.0);
//! assert_eq!(summary.peak_year, Some(2001));
//! ```

pub mod complete;
pub mod export;
pub mod label;
pub mod query;
pub mod reshape;

pub use complete::complete;
pub use export::{export, export_to_vec, EXPORT_HEADERS};
pub use label::{label, labels_for};
pub use query::{default_filter, filter, filter_options, summarize};
pub use reshape::{reshape, CoercionWarning, CountCell, Reshaped};
