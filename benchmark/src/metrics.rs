// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result and report types for benchmark runs.
//!
//! A [`BenchmarkResult`] is one (transport, shape, parameter) combination;
//! a [`BenchmarkReport`] collects them in execution order together with the
//! machine they ran on and the known timing biases of the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;

use sumbench_core::{BenchError, Shape, Transport};

use crate::harness::Measurement;
use crate::sampler::ResourceDelta;

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Outcome of one (transport, shape, parameter) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub transport: Transport,
    pub shape: Shape,
    /// Call count, worker count or total data size; 1 for single.
    pub parameter: u64,
    /// `None` when no call succeeded.
    pub elapsed_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_delta_mb: Option<f64>,
    pub calls: u64,
    pub failures: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_error: Option<String>,
}

impl BenchmarkResult {
    pub fn from_measurement(
        transport: Transport,
        shape: Shape,
        parameter: u64,
        measurement: Measurement,
        resources: Option<ResourceDelta>,
    ) -> Self {
        let total_failure = measurement.calls > 0 && measurement.failures >= measurement.calls;
        let elapsed_seconds = if total_failure {
            None
        } else {
            measurement.elapsed.map(|d| d.as_secs_f64())
        };

        Self {
            transport,
            shape,
            parameter,
            elapsed_seconds,
            cpu_percent: resources.map(|r| r.cpu_percent),
            memory_delta_mb: resources.map(|r| r.memory_delta_mb),
            calls: measurement.calls,
            failures: measurement.failures,
            first_error: measurement.first_error,
        }
    }

    pub fn succeeded(&self) -> u64 {
        self.calls.saturating_sub(self.failures)
    }

    /// True when calls were attempted and none of them succeeded.
    pub fn is_total_failure(&self) -> bool {
        self.calls > 0 && self.failures >= self.calls
    }
}

/// Complete benchmark suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Known timing asymmetries of this run
    #[serde(default)]
    pub notes: Vec<String>,
    /// Results in execution order
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Create an empty report for the current machine.
    pub fn new(notes: Vec<String>) -> Self {
        Self {
            benchmark_suite: "sumbench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            notes,
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Err unless at least one call in the whole run succeeded.
    pub fn ensure_measured(&self) -> Result<(), BenchError> {
        if self.results.iter().any(|r| r.succeeded() > 0) {
            Ok(())
        } else {
            Err(BenchError::NoMeasurements {
                attempted: self.results.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn measurement(calls: u64, failures: u64) -> Measurement {
        Measurement {
            elapsed: Some(Duration::from_millis(250)),
            calls,
            failures,
            first_error: (failures > 0).then(|| "Call timed out".to_string()),
        }
    }

    #[test]
    fn test_system_info_collect() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(info.cpu_cores > 0);
        assert!(info.memory_bytes > 0);
    }

    #[test]
    fn test_result_from_measurement() {
        let delta = ResourceDelta {
            cpu_percent: 3.1,
            memory_delta_mb: 0.12,
        };
        let result = BenchmarkResult::from_measurement(
            Transport::Rpc,
            Shape::Repeated,
            100,
            measurement(100, 0),
            Some(delta),
        );

        assert_eq!(result.elapsed_seconds, Some(0.25));
        assert_eq!(result.cpu_percent, Some(3.1));
        assert_eq!(result.succeeded(), 100);
        assert!(!result.is_total_failure());
    }

    #[test]
    fn test_unreachable_result() {
        let result = BenchmarkResult::from_measurement(
            Transport::Rest,
            Shape::Concurrent,
            10,
            Measurement {
                elapsed: None,
                calls: 10,
                failures: 10,
                first_error: Some("Endpoint unavailable".into()),
            },
            None,
        );
        assert!(result.is_total_failure());
        assert_eq!(result.elapsed_seconds, None);
    }

    #[test]
    fn test_timed_total_failure_has_no_elapsed() {
        let result = BenchmarkResult::from_measurement(
            Transport::Rest,
            Shape::Repeated,
            5,
            measurement(5, 5),
            None,
        );
        assert!(result.is_total_failure());
        assert_eq!(result.elapsed_seconds, None);

        let partial = BenchmarkResult::from_measurement(
            Transport::Rest,
            Shape::Repeated,
            5,
            measurement(5, 4),
            None,
        );
        assert_eq!(partial.elapsed_seconds, Some(0.25));
    }

    #[test]
    fn test_ensure_measured() {
        let mut report = BenchmarkReport::new(vec![]);
        assert!(matches!(
            report.ensure_measured(),
            Err(BenchError::NoMeasurements { attempted: 0 })
        ));

        report.add_result(BenchmarkResult::from_measurement(
            Transport::Rest,
            Shape::Single,
            1,
            measurement(1, 1),
            None,
        ));
        assert!(report.ensure_measured().is_err());

        report.add_result(BenchmarkResult::from_measurement(
            Transport::Rpc,
            Shape::Single,
            1,
            measurement(1, 0),
            None,
        ));
        assert!(report.ensure_measured().is_ok());
    }

    #[test]
    fn test_result_serialization() {
        let result = BenchmarkResult::from_measurement(
            Transport::Rpc,
            Shape::Chunked,
            1000,
            measurement(1, 0),
            None,
        );

        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("\"grpc\""));
        assert!(json.contains("\"chunked\""));
        assert!(!json.contains("cpu_percent"));

        let back: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
