// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Load generators for timing calls through a transport adapter.
//!
//! Every generator builds its adapter before starting a timer, so only the
//! calls themselves are measured. Call failures are counted and the run
//! continues; nothing is retried.

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use sumbench_core::{AdapterFactory, BenchError, ConfigError, Shape, TransportError, TransportResult};

/// Outcome of one generator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Time spent in calls; `None` when the adapter could not be built.
    pub elapsed: Option<Duration>,
    pub calls: u64,
    pub failures: u64,
    pub first_error: Option<String>,
}

impl Measurement {
    /// Every expected call counted as failed, nothing timed.
    fn unreachable(expected_calls: u64, err: TransportError) -> Self {
        tracing::debug!(error_kind = err.kind(), error = %err, "Adapter construction failed");
        Self {
            elapsed: None,
            calls: expected_calls,
            failures: expected_calls,
            first_error: Some(err.to_string()),
        }
    }

    pub fn succeeded(&self) -> u64 {
        self.calls - self.failures
    }

    /// Err with the success ratio if any call failed.
    pub fn check(&self) -> Result<(), BenchError> {
        if self.failures == 0 {
            Ok(())
        } else {
            Err(BenchError::PartialFailure {
                succeeded: self.succeeded(),
                attempted: self.calls,
            })
        }
    }
}

/// Running call counters for one measurement.
#[derive(Debug, Default)]
struct Tally {
    calls: u64,
    failures: u64,
    first_error: Option<String>,
}

impl Tally {
    fn record(&mut self, result: TransportResult<i64>) {
        self.calls += 1;
        if let Err(e) = result {
            self.fail(e.kind(), e.to_string());
        }
    }

    fn fail(&mut self, kind: &'static str, error: String) {
        self.failures += 1;
        if self.first_error.is_none() {
            tracing::debug!(error_kind = kind, error = %error, "First failed call");
            self.first_error = Some(error);
        }
    }

    fn finish(self, elapsed: Duration) -> Measurement {
        Measurement {
            elapsed: Some(elapsed),
            calls: self.calls,
            failures: self.failures,
            first_error: self.first_error,
        }
    }
}

/// Timer for measuring individual operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed duration.
    pub fn elapsed(self) -> Duration {
        self.start.elapsed()
    }
}

/// Split `0..total` into contiguous ranges of at most `chunk` items.
///
/// Yields `ceil(total / chunk)` ranges; the last one holds the remainder.
pub fn chunk_ranges(total: usize, chunk: usize) -> Result<Vec<Range<usize>>, ConfigError> {
    if chunk == 0 {
        return Err(ConfigError::InvalidFieldValue {
            field: "chunk_size",
            value: "0".to_string(),
            reason: "Chunk size must be at least 1".to_string(),
        });
    }

    Ok((0..total)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(total))
        .collect())
}

/// Runs the four load shapes with a fixed per-call payload.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    payload: Arc<[i64]>,
}

impl BenchmarkHarness {
    /// Harness sending `0..payload_len` on every per-call shape.
    pub fn new(payload_len: usize) -> Self {
        Self {
            payload: (0..payload_len as i64).collect(),
        }
    }

    pub fn payload(&self) -> &[i64] {
        &self.payload
    }

    /// Dispatch to the generator for `shape`.
    ///
    /// `parameter` is the call count, worker count or total data size;
    /// `chunk_size` only applies to [`Shape::Chunked`].
    pub async fn run(
        &self,
        factory: &dyn AdapterFactory,
        shape: Shape,
        parameter: u64,
        chunk_size: usize,
    ) -> Result<Measurement, BenchError> {
        let measurement = match shape {
            Shape::Single => self.single(factory).await,
            Shape::Repeated => self.repeated(factory, parameter).await,
            Shape::Concurrent => self.concurrent(factory, parameter).await,
            Shape::Chunked => self.chunked(factory, parameter as usize, chunk_size).await?,
        };
        Ok(measurement)
    }

    /// One call, timed on its own.
    pub async fn single(&self, factory: &dyn AdapterFactory) -> Measurement {
        let adapter = match factory.connect().await {
            Ok(adapter) => adapter,
            Err(e) => return Measurement::unreachable(1, e),
        };

        let mut tally = Tally::default();
        let timer = Timer::start();
        let result = adapter.invoke(&self.payload).await;
        let elapsed = timer.elapsed();

        tally.record(result);
        tally.finish(elapsed)
    }

    /// `n` sequential calls under one timer.
    pub async fn repeated(&self, factory: &dyn AdapterFactory, n: u64) -> Measurement {
        let adapter = match factory.connect().await {
            Ok(adapter) => adapter,
            Err(e) => return Measurement::unreachable(n, e),
        };

        let mut tally = Tally::default();
        let timer = Timer::start();
        for _ in 0..n {
            tally.record(adapter.invoke(&self.payload).await);
        }
        tally.finish(timer.elapsed())
    }

    /// `n` calls dispatched at once onto `n` workers.
    pub async fn concurrent(&self, factory: &dyn AdapterFactory, n: u64) -> Measurement {
        self.concurrent_with_workers(factory, n, n as usize).await
    }

    /// `n` calls on a pool of at most `workers` in-flight calls.
    ///
    /// The timer runs from the first submission until every call has
    /// completed; all results are collected, failed ones included.
    pub async fn concurrent_with_workers(
        &self,
        factory: &dyn AdapterFactory,
        n: u64,
        workers: usize,
    ) -> Measurement {
        let adapter = match factory.connect().await {
            Ok(adapter) => adapter,
            Err(e) => return Measurement::unreachable(n, e),
        };

        let pool = Arc::new(Semaphore::new(workers.max(1)));
        let mut tasks = JoinSet::new();
        let mut tally = Tally::default();

        let timer = Timer::start();
        for _ in 0..n {
            let adapter = Arc::clone(&adapter);
            let payload = Arc::clone(&self.payload);
            let pool = Arc::clone(&pool);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = pool.acquire_owned().await;
                adapter.invoke(&payload).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => tally.record(result),
                Err(e) => {
                    tally.calls += 1;
                    tally.fail("join", format!("Worker task failed: {}", e));
                }
            }
        }
        let elapsed = timer.elapsed();

        tracing::debug!(
            calls = tally.calls,
            failures = tally.failures,
            workers,
            "Concurrent batch joined"
        );
        tally.finish(elapsed)
    }

    /// `0..total` sent in chunks of `chunk`, one call per chunk.
    ///
    /// Elapsed is the sum of the per-chunk timers, so the time spent
    /// slicing the payload between calls is not counted.
    pub async fn chunked(
        &self,
        factory: &dyn AdapterFactory,
        total: usize,
        chunk: usize,
    ) -> Result<Measurement, BenchError> {
        let ranges = chunk_ranges(total, chunk)?;
        let data: Vec<i64> = (0..total as i64).collect();

        let adapter = match factory.connect().await {
            Ok(adapter) => adapter,
            Err(e) => return Ok(Measurement::unreachable(ranges.len() as u64, e)),
        };

        let mut tally = Tally::default();
        let mut elapsed = Duration::ZERO;
        for range in ranges {
            let slice = &data[range];
            let timer = Timer::start();
            let result = adapter.invoke(slice).await;
            elapsed += timer.elapsed();
            tally.record(result);
        }

        Ok(tally.finish(elapsed))
    }
}
