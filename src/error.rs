use thiserror::Error;

/// Convenience result type for load/build operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned while loading the source table and building the complete dataset.
///
/// Every variant is fatal at startup: a service must not run on a partially built dataset.
/// Malformed count cells are *not* errors; see [`crate::processing::CoercionWarning`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not have the required shape (missing required columns, unknown format, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The configured year range is empty.
    #[error("invalid year range: first year {first} is after last year {last}")]
    InvalidYearRange { first: i32, last: i32 },
}
