use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;
use crate::processing::CoercionWarning;

use super::source::SourceFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Non-fatal event, e.g. a count cell coerced to zero.
    Warning,
    /// The build failed.
    Error,
    /// The build failed on an I/O problem (missing/unreadable file).
    Critical,
}

impl LoadSeverity {
    /// Classify a build failure.
    pub fn for_error(e: &LoadError) -> Self {
        match e {
            LoadError::Io(_) => Self::Critical,
            LoadError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            LoadError::SchemaMismatch { .. } | LoadError::InvalidYearRange { .. } => Self::Error,
        }
    }
}

/// Context about a build attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The source path.
    pub path: PathBuf,
    /// Format used to decode the source.
    pub format: SourceFormat,
}

/// Stats reported when a build succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Source rows read.
    pub rows: usize,
    /// Observations produced by the reshape (rows × years).
    pub observations: usize,
    /// Count cells that were non-blank but could not be used and were set to zero.
    pub coerced_cells: usize,
    /// Distinct group keys.
    pub groups: usize,
    /// Rows in the complete dataset (groups × years).
    pub complete_rows: usize,
}

/// Observer interface for build outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called once when the build succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called for each coerced count cell. Never fatal.
    fn on_warning(&self, _ctx: &LoadContext, _warning: &CoercionWarning) {}

    /// Called when the build fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_warning(&self, ctx: &LoadContext, warning: &CoercionWarning) {
        for o in &self.observers {
            o.on_warning(ctx, warning);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs build events to stderr. Coercion warnings are not printed individually.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[build][ok] format={:?} path={} rows={} groups={} complete_rows={} coerced={}",
            ctx.format,
            ctx.path.display(),
            stats.rows,
            stats.groups,
            stats.complete_rows,
            stats.coerced_cells
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!(
            "[build][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!(
            "[ALERT][build][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

/// Forwards build events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            path = %ctx.path.display(),
            format = ?ctx.format,
            rows = stats.rows,
            groups = stats.groups,
            complete_rows = stats.complete_rows,
            coerced_cells = stats.coerced_cells,
            "complete dataset built"
        );
    }

    fn on_warning(&self, ctx: &LoadContext, warning: &CoercionWarning) {
        tracing::debug!(
            path = %ctx.path.display(),
            row = warning.row,
            year = warning.year,
            raw = %warning.raw,
            "count cell coerced to zero"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        tracing::error!(path = %ctx.path.display(), ?severity, %error, "build failed");
    }
}

/// Appends build events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok format={:?} path={} rows={} groups={} complete_rows={} coerced={}",
            unix_ts(),
            ctx.format,
            ctx.path.display(),
            stats.rows,
            stats.groups,
            stats.complete_rows,
            stats.coerced_cells
        ));
    }

    fn on_warning(&self, ctx: &LoadContext, warning: &CoercionWarning) {
        self.append_line(&format!(
            "{} coerced path={} row={} year={} raw={:?}",
            unix_ts(),
            ctx.path.display(),
            warning.row,
            warning.year,
            warning.raw
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
