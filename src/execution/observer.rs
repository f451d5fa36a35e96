use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { rows: usize },
    ChunkScanned { start_row: usize, row_count: usize, matched: usize },
    RunFinished { elapsed: Duration, matched: usize },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("{event:?}");
    }
}

/// Forwards run boundaries to `tracing` at debug level; chunk events at trace level.
#[derive(Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { rows } => tracing::debug!(rows, "query started"),
            ExecutionEvent::ChunkScanned {
                start_row,
                row_count,
                matched,
            } => tracing::trace!(start_row, row_count, matched, "chunk scanned"),
            ExecutionEvent::RunFinished { elapsed, matched } => {
                tracing::debug!(?elapsed, matched, "query finished")
            }
        }
    }
}

/// Cumulative counters across every run of an engine.
///
/// Counters only ever increase, so concurrent runs on a shared engine never clobber each other.
/// Callers can snapshot them at any time.
#[derive(Default)]
pub struct ExecutionMetrics {
    runs: AtomicU64,
    rows_scanned: AtomicU64,
    rows_matched: AtomicU64,
    chunks_scanned: AtomicU64,
    last_elapsed_ns: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_run_start(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn on_chunk(&self, rows: usize, matched: usize) {
        self.chunks_scanned.fetch_add(1, Ordering::Relaxed);
        self.rows_scanned.fetch_add(rows as u64, Ordering::Relaxed);
        self.rows_matched.fetch_add(matched as u64, Ordering::Relaxed);
    }

    pub(crate) fn on_run_end(&self, elapsed: Duration) {
        let ns = elapsed.as_nanos().min(u64::MAX as u128) as u64;
        self.last_elapsed_ns.store(ns, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        ExecutionMetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            rows_matched: self.rows_matched.load(Ordering::Relaxed),
            chunks_scanned: self.chunks_scanned.load(Ordering::Relaxed),
            last_elapsed: Duration::from_nanos(self.last_elapsed_ns.load(Ordering::Relaxed)),
        }
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub runs: u64,
    pub rows_scanned: u64,
    pub rows_matched: u64,
    pub chunks_scanned: u64,
    pub last_elapsed: Duration,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, rows_scanned={}, rows_matched={}, chunks={}, last_elapsed={:?}",
            self.runs, self.rows_scanned, self.rows_matched, self.chunks_scanned, self.last_elapsed
        )
    }
}
