//! Source format selection and load options.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::{RawTable, YearRange};

use super::csv;
use super::observability::{LoadObserver, LoadSeverity};

/// Supported delimited-text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl SourceFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// Options controlling how the source is loaded and how outcomes are reported.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<SourceFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Resolve the format to use for `path`: the forced one, or one inferred from the extension.
pub fn resolve_format(path: &Path, forced: Option<SourceFormat>) -> LoadResult<SourceFormat> {
    if let Some(f) = forced {
        return Ok(f);
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoadError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    SourceFormat::from_extension(ext).ok_or_else(|| LoadError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Load the raw wide table from `path` in the given format.
pub fn load_from_path(
    path: impl AsRef<Path>,
    years: YearRange,
    format: SourceFormat,
) -> LoadResult<RawTable> {
    csv::load_raw_from_path(path, years, format.delimiter())
}
