//! Parallel query execution over a shared [`CompleteDataSet`].
//!
//! This module sits "above" [`crate::processing::query`] and provides:
//!
//! - Chunked, parallel filtering on a dedicated rayon pool
//! - Cumulative metrics + observer hooks for monitoring
//!
//! The dataset is only ever borrowed immutably, so one engine can serve many concurrent callers.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::processing::summarize;
use crate::types::{CompleteDataSet, CompleteRow, FilterSpec, Summary};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
    TracingExecutionObserver,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of rows per chunk. Values below 1 are treated as 1.
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: 4_096,
        }
    }
}

/// Rows and aggregates for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput<'a> {
    pub rows: Vec<&'a CompleteRow>,
    pub summary: Summary,
}

/// A parallel query engine for [`CompleteDataSet`]s.
pub struct ExecutionEngine {
    pool: ThreadPool,
    chunk_size: usize,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("stem-query-{i}"))
            .build()?;

        Ok(Self {
            pool,
            chunk_size: opts.chunk_size.max(1),
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to the engine's cumulative metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Parallel equivalent of [`crate::processing::filter`]: same rows, same order.
    pub fn filter_parallel<'a>(&self, dataset: &'a CompleteDataSet, spec: &FilterSpec) -> Vec<&'a CompleteRow> {
        self.pool.install(|| self.filter_parallel_impl(dataset, spec))
    }

    /// Filter in parallel, then summarize the matched rows.
    pub fn query<'a>(&self, dataset: &'a CompleteDataSet, spec: &FilterSpec) -> QueryOutput<'a> {
        let rows = self.filter_parallel(dataset, spec);
        let summary = summarize(rows.iter().copied());
        QueryOutput { rows, summary }
    }

    fn filter_parallel_impl<'a>(&self, dataset: &'a CompleteDataSet, spec: &FilterSpec) -> Vec<&'a CompleteRow> {
        let start = Instant::now();
        self.metrics.on_run_start();
        self.emit(ExecutionEvent::RunStarted {
            rows: dataset.row_count(),
        });

        let chunk_size = self.chunk_size;
        let per_chunk: Vec<Vec<&'a CompleteRow>> = dataset
            .rows()
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let out: Vec<&'a CompleteRow> = chunk.iter().filter(|row| spec.matches(row)).collect();
                self.metrics.on_chunk(chunk.len(), out.len());
                self.emit(ExecutionEvent::ChunkScanned {
                    start_row: chunk_idx * chunk_size,
                    row_count: chunk.len(),
                    matched: out.len(),
                });
                out
            })
            .collect();

        let rows: Vec<&'a CompleteRow> = per_chunk.into_iter().flatten().collect();

        let elapsed = start.elapsed();
        self.metrics.on_run_end(elapsed);
        self.emit(ExecutionEvent::RunFinished {
            elapsed,
            matched: rows.len(),
        });
        rows
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
