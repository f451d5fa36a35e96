//! Loading the wide source table.
//!
//! Most callers should use [`crate::pipeline::build`], which loads, reshapes, labels and completes
//! in one call and reports the outcome to a [`LoadObserver`]. The pieces are also available here:
//!
//! - [`csv`]: delimited-text decoding into a [`crate::types::RawTable`]
//! - [`source`]: format inference and [`LoadOptions`]
//! - [`observability`]: observer trait and stock observers

pub mod csv;
pub mod observability;
pub mod source;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, StdErrObserver,
    TracingObserver,
};
pub use source::{load_from_path, resolve_format, LoadOptions, SourceFormat};
