// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Process CPU and memory sampling around a benchmark run.
//!
//! CPU usage is a rate between two refreshes, so the first reading after
//! construction has no baseline. The sampler refreshes once up front when
//! warm-up is enabled. Readings are reported as taken, never corrected.

use std::future::Future;

use serde::{Deserialize, Serialize};
use sysinfo::{get_current_pid, Pid, System};

use sumbench_core::BenchError;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One reading of the current process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

impl ResourceSnapshot {
    /// Change from `self` to `later`.
    pub fn delta(&self, later: &ResourceSnapshot) -> ResourceDelta {
        ResourceDelta {
            cpu_percent: f64::from(later.cpu_percent) - f64::from(self.cpu_percent),
            memory_delta_mb: (later.memory_bytes as f64 - self.memory_bytes as f64) / BYTES_PER_MB,
        }
    }
}

/// CPU and resident memory change over a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    /// End minus start CPU percentage.
    pub cpu_percent: f64,
    /// End minus start resident memory in MB.
    pub memory_delta_mb: f64,
}

/// Samples the current process through sysinfo.
pub struct ResourceSampler {
    system: System,
    pid: Pid,
}

impl ResourceSampler {
    pub fn new(warm_up: bool) -> Result<Self, BenchError> {
        let pid = get_current_pid().map_err(|e| BenchError::Sampler {
            reason: e.to_string(),
        })?;

        let mut sampler = Self {
            system: System::new(),
            pid,
        };

        if warm_up {
            sampler.sample()?;
        }

        Ok(sampler)
    }

    /// Refresh and read the current process.
    pub fn sample(&mut self) -> Result<ResourceSnapshot, BenchError> {
        if !self.system.refresh_process(self.pid) {
            return Err(BenchError::Sampler {
                reason: format!("process {} could not be refreshed", self.pid),
            });
        }

        let process = self.system.process(self.pid).ok_or_else(|| BenchError::Sampler {
            reason: format!("process {} not found", self.pid),
        })?;

        Ok(ResourceSnapshot {
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
        })
    }

    /// Sample immediately before and after awaiting `run`.
    ///
    /// A failed reading is logged and yields no delta; the run's own output
    /// is always returned.
    pub async fn measure<F: Future>(&mut self, run: F) -> (F::Output, Option<ResourceDelta>) {
        let start = self.sample();
        let output = run.await;
        let end = self.sample();

        match (start, end) {
            (Ok(start), Ok(end)) => (output, Some(start.delta(&end))),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "Resource sample failed");
                (output, None)
            }
        }
    }
}
