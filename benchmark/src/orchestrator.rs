// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Walks the configured load table against every selected transport.
//!
//! For each table entry, each parameter and each transport (REST before
//! gRPC) the harness runs once and one [`BenchmarkResult`] is appended, so
//! the report order is the execution order.

use std::sync::Arc;

use sumbench_core::{factory_for, AdapterFactory, BenchError, Config, Shape, ShapeEntry, Transport};

use crate::harness::BenchmarkHarness;
use crate::metrics::{BenchmarkReport, BenchmarkResult};
use crate::sampler::ResourceSampler;

type FactorySource = dyn Fn(Transport, Shape) -> Arc<dyn AdapterFactory> + Send + Sync;

/// Runs the load table and collects the report.
pub struct Orchestrator {
    config: Config,
    transports: Vec<Transport>,
    harness: BenchmarkHarness,
    factories: Box<FactorySource>,
}

impl Orchestrator {
    /// Orchestrator over both transports, with adapters built from `config`.
    pub fn new(config: Config) -> Self {
        let harness = BenchmarkHarness::new(config.harness.payload_len);
        let adapter_config = config.clone();

        Self {
            config,
            transports: Transport::ALL.to_vec(),
            harness,
            factories: Box::new(move |transport, shape| {
                factory_for(&adapter_config, transport, shape)
            }),
        }
    }

    /// Restrict the run to `transports`; order is always REST then gRPC.
    pub fn with_transports(mut self, transports: &[Transport]) -> Self {
        let mut selected = transports.to_vec();
        selected.sort();
        selected.dedup();
        self.transports = selected;
        self
    }

    /// Replace the adapter factories, e.g. with in-memory mocks.
    pub fn with_factories<F>(mut self, factories: F) -> Self
    where
        F: Fn(Transport, Shape) -> Arc<dyn AdapterFactory> + Send + Sync + 'static,
    {
        self.factories = Box::new(factories);
        self
    }

    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }

    /// Run every combination and return the report, even if every call
    /// failed. Only configuration errors abort.
    pub async fn run_all(&self) -> Result<BenchmarkReport, BenchError> {
        let mut report = BenchmarkReport::new(bias_notes(&self.config));
        let mut sampler: Option<ResourceSampler> = None;

        tracing::info!(
            entries = self.config.shapes.len(),
            transports = ?self.transports,
            "Starting benchmark run"
        );

        for entry in &self.config.shapes {
            if entry.sample_resources && sampler.is_none() {
                sampler = self.start_sampler();
            }

            for &parameter in &entry.parameters {
                for &transport in &self.transports {
                    let factory = (self.factories)(transport, entry.shape);
                    let run = self
                        .harness
                        .run(factory.as_ref(), entry.shape, parameter, entry.chunk_size);

                    let (measurement, resources) = match sampler.as_mut() {
                        Some(sampler) if entry.sample_resources => {
                            let (measurement, delta) = sampler.measure(run).await;
                            (measurement?, delta)
                        }
                        _ => (run.await?, None),
                    };

                    let result = BenchmarkResult::from_measurement(
                        transport,
                        entry.shape,
                        parameter,
                        measurement,
                        resources,
                    );

                    tracing::info!(
                        transport = %result.transport,
                        shape = %result.shape,
                        parameter = result.parameter,
                        elapsed_seconds = ?result.elapsed_seconds,
                        failures = result.failures,
                        calls = result.calls,
                        "Benchmark complete"
                    );
                    if let Some(error) = &result.first_error {
                        tracing::warn!(transport = %transport, shape = %entry.shape, error = %error, "Calls failed");
                    }

                    report.add_result(result);
                }
            }
        }

        Ok(report)
    }

    /// Like [`Orchestrator::run_all`], but an error when nothing was measured.
    pub async fn run(&self) -> Result<BenchmarkReport, BenchError> {
        let report = self.run_all().await?;
        report.ensure_measured()?;
        Ok(report)
    }

    fn start_sampler(&self) -> Option<ResourceSampler> {
        match ResourceSampler::new(self.config.harness.warm_up_sampler) {
            Ok(sampler) => Some(sampler),
            Err(e) => {
                tracing::warn!(error = %e, "Resource sampling disabled");
                None
            }
        }
    }
}

/// Narrow the load table to `shapes` and, for every shape that takes a
/// parameter, replace its parameter list with `sizes`.
pub fn filter_table(
    entries: &[ShapeEntry],
    shapes: Option<&[Shape]>,
    sizes: Option<&[u64]>,
) -> Vec<ShapeEntry> {
    entries
        .iter()
        .filter(|entry| shapes.map_or(true, |s| s.contains(&entry.shape)))
        .cloned()
        .map(|mut entry| {
            if let Some(sizes) = sizes {
                if entry.shape != Shape::Single && !sizes.is_empty() {
                    entry.parameters = sizes.to_vec();
                }
            }
            entry
        })
        .collect()
}

/// Timing asymmetries that every report states alongside its numbers.
pub fn bias_notes(config: &Config) -> Vec<String> {
    let mut notes = vec![
        "Single-call timing excludes gRPC channel setup but includes REST connection setup."
            .to_string(),
        "Chunked elapsed time is the sum of per-chunk call timers.".to_string(),
    ];

    if !config.rest.pool_connections {
        notes.push(
            "REST connection pooling is off: every REST call opens a new connection inside its timer."
                .to_string(),
        );
    }

    match (config.rest.single_call_timeout, config.rest.batch_timeout) {
        (Some(single), None) => notes.push(format!(
            "REST single calls time out after {}ms; batch calls have no timeout.",
            single.as_millis()
        )),
        (single, batch) if single != batch => notes.push(format!(
            "REST timeouts differ: single {}, batch {}.",
            describe_timeout(single),
            describe_timeout(batch)
        )),
        _ => {}
    }

    if config.rpc.call_timeout.is_none() {
        notes.push("No gRPC deadline is set: individual gRPC call latency is unbounded.".to_string());
    }

    notes.push(if config.harness.warm_up_sampler {
        "CPU percentages are sampled right around each run and are noisy for short runs; values are not corrected."
            .to_string()
    } else {
        "CPU sampler was not warmed up: the first CPU reading has no baseline and may read 0.".to_string()
    });

    notes
}

fn describe_timeout(timeout: Option<std::time::Duration>) -> String {
    timeout
        .map(|t| format!("{}ms", t.as_millis()))
        .unwrap_or_else(|| "unbounded".to_string())
}
